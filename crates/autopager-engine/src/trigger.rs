//! Viewport-driven load triggering.
//!
//! Two decisions live here. The fill check runs after data is applied: while
//! the rendered rows do not overflow the viewport, the next page is needed
//! right away. Once they do, scrolling takes over and the next page is
//! requested when the first visible row enters the trigger zone near the end.

use autopager_core::{PagerConfig, ViewportMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDecision {
    /// Rows do not fill the viewport; request the next page now.
    RequestNext,
    /// Rows do not fill the viewport but the source is exhausted.
    Exhausted,
    /// Rows overflow the viewport; hand over to the scroll trigger.
    Overflowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    /// A request was already triggered for this zone crossing.
    AlreadyTriggered,
    /// The first visible row has not reached the trigger zone.
    OutsideZone,
    /// The trigger zone was entered; `request_next` is false at the end of the source.
    Triggered { request_next: bool },
}

/// Pure decision logic over viewport metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportTriggerDetector {
    zone_size: usize,
    fill_slack: usize,
}

impl ViewportTriggerDetector {
    pub fn new(zone_size: usize, fill_slack: usize) -> Self {
        Self {
            zone_size,
            fill_slack,
        }
    }

    pub fn from_config(config: &PagerConfig) -> Self {
        Self::new(config.zone_size, config.fill_slack)
    }

    /// Whether the rendered rows overflow the viewport. An unlaid-out view never does.
    pub fn is_overflowing(&self, metrics: &ViewportMetrics) -> bool {
        metrics.visible_item_count != 0
            && metrics.total_item_count > metrics.visible_item_count + self.fill_slack
    }

    pub fn check_fill(&self, metrics: &ViewportMetrics, in_terminal_state: bool) -> FillDecision {
        if self.is_overflowing(metrics) {
            FillDecision::Overflowing
        } else if in_terminal_state {
            FillDecision::Exhausted
        } else {
            FillDecision::RequestNext
        }
    }

    /// Whether the first visible row is within `zone_size` rows of the last full viewport.
    pub fn in_trigger_zone(&self, metrics: &ViewportMetrics) -> bool {
        let threshold = metrics.total_item_count as i64
            - self.zone_size as i64
            - metrics.visible_item_count as i64;
        metrics.first_visible_position as i64 >= threshold
    }

    pub fn check_scroll(
        &self,
        metrics: &ViewportMetrics,
        already_triggered: bool,
        in_terminal_state: bool,
    ) -> ScrollDecision {
        if already_triggered {
            return ScrollDecision::AlreadyTriggered;
        }
        if !self.in_trigger_zone(metrics) {
            return ScrollDecision::OutsideZone;
        }
        ScrollDecision::Triggered {
            request_next: !in_terminal_state,
        }
    }
}

impl Default for ViewportTriggerDetector {
    fn default() -> Self {
        Self::from_config(&PagerConfig::default())
    }
}
