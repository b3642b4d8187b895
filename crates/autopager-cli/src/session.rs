//! Replays a scripted user session against a coordinator and a simulated list view.

use crate::cli::Step;
use crate::source::SimulatedSource;
use anyhow::{Context, Result};
use autopager_core::{PageIndex, PagerConfig, ScrollWindow, ViewportMetrics};
use autopager_domain::RenderSequence;
use autopager_engine::{
    CoordinatorEvent, CoordinatorState, PageProducer, PaginationCoordinator, RequestOutcome,
    ScrollSource, UiMessage,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// A list view of fixed height that tracks the coordinator's row count.
#[derive(Debug, Clone)]
pub struct ListView {
    window: ScrollWindow,
    height: usize,
}

impl ListView {
    pub fn new(height: usize) -> Self {
        Self {
            window: ScrollWindow::new(0),
            height,
        }
    }

    pub fn sync(&mut self, total_rows: usize) {
        self.window.set_total_items(total_rows);
    }

    pub fn scroll_by(&mut self, rows: isize) -> ViewportMetrics {
        self.window.scroll_by(rows, self.height);
        self.metrics()
    }
}

impl ScrollSource for ListView {
    fn metrics(&self) -> ViewportMetrics {
        self.window.metrics(self.height)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub index: PageIndex,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    pub outcome: String,
}

/// What the session ended with.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub pages: Vec<PageIndex>,
    /// Highest loaded page index.
    pub highest_page: Option<PageIndex>,
    /// Element rows, markers excluded.
    pub element_count: usize,
    pub requests: Vec<PageIndex>,
    pub state: CoordinatorState,
    pub viewport: ViewportMetrics,
    pub steps: Vec<StepReport>,
    pub failures: Vec<FailureReport>,
    pub rows: RenderSequence<String>,
}

pub struct Session {
    pager: PaginationCoordinator<String>,
    rx: mpsc::UnboundedReceiver<UiMessage<String>>,
    events: broadcast::Receiver<CoordinatorEvent>,
    source: Arc<SimulatedSource>,
    view: ListView,
    timeout: Duration,
    steps: Vec<StepReport>,
    failures: Vec<FailureReport>,
}

impl Session {
    pub fn new(
        config: PagerConfig,
        source: SimulatedSource,
        height: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let source = Arc::new(source);
        let producer: Arc<dyn PageProducer<String>> = source.clone();
        let (pager, rx) = PaginationCoordinator::new(config, producer)
            .context("Failed to create pagination coordinator")?;
        let events = pager.subscribe();

        Ok(Self {
            pager,
            rx,
            events,
            source,
            view: ListView::new(height),
            timeout,
            steps: Vec::new(),
            failures: Vec::new(),
        })
    }

    /// Request the initial page and let the fill check run to completion.
    pub async fn start(&mut self) -> Result<()> {
        let outcome = self.pager.start();
        tracing::info!("Session started: {:?}", outcome);
        self.settle().await
    }

    pub async fn apply(&mut self, step: Step) -> Result<()> {
        let outcome = match step {
            Step::Scroll(rows) => self.scroll(rows),
            Step::Top => self.scroll(isize::MIN),
            Step::Bottom => self.scroll(isize::MAX),
            Step::Gap => match self.pager.render_sequence().gap_targets().first() {
                Some(&target) => describe(self.pager.on_gap_clicked(target)),
                None => "no gap row".to_string(),
            },
            Step::End => match self.pager.on_end_clicked() {
                Some(outcome) => describe(outcome),
                None => "nothing loaded".to_string(),
            },
            Step::Footer => describe(self.pager.on_footer_clicked()),
            Step::Refresh => describe(self.pager.on_refresh_requested()),
            Step::Reset => {
                self.pager.reset();
                "reset".to_string()
            }
            Step::Page(index) => describe(self.pager.request_page(index)),
        };
        tracing::debug!("Step {:?}: {}", step, outcome);
        self.steps.push(StepReport {
            step: format!("{step:?}"),
            outcome,
        });

        self.view.sync(self.pager.render_sequence().len());
        self.settle().await
    }

    /// Apply queued messages until nothing is loading or scheduled.
    pub async fn settle(&mut self) -> Result<()> {
        while !self.pager.is_settled() {
            let message = tokio::time::timeout(self.timeout, self.rx.recv())
                .await
                .with_context(|| {
                    format!(
                        "Timed out after {} ms waiting for the page source",
                        self.timeout.as_millis()
                    )
                })?
                .context("UI queue closed")?;

            self.pager.handle(message, &self.view);
            self.view.sync(self.pager.render_sequence().len());
        }
        self.drain_events();
        Ok(())
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            pages: self.pager.pages().indices(),
            highest_page: self.pager.pages().last().map(|page| page.index),
            element_count: self.pager.render_sequence().element_count(),
            requests: self.source.requests(),
            state: self.pager.state(),
            viewport: self.view.metrics(),
            steps: self.steps.clone(),
            failures: self.failures.clone(),
            rows: self.pager.render_sequence().clone(),
        }
    }

    #[cfg(test)]
    pub fn pager(&self) -> &PaginationCoordinator<String> {
        &self.pager
    }

    fn scroll(&mut self, rows: isize) -> String {
        let metrics = self.view.scroll_by(rows);
        self.pager.on_scrolled(metrics);
        match self.pager.in_flight() {
            Some(index) => format!(
                "scrolled to row {}; loading page {}",
                metrics.first_visible_position, index
            ),
            None => format!("scrolled to row {}", metrics.first_visible_position),
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(CoordinatorEvent::FetchFailed { index, message }) => {
                    self.failures.push(FailureReport { index, message });
                }
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} coordinator events", skipped);
                }
                Err(_) => break,
            }
        }
    }
}

fn describe(outcome: RequestOutcome) -> String {
    match outcome {
        RequestOutcome::Dispatched => "dispatched",
        RequestOutcome::InFlight => "dropped: a page is still loading",
        RequestOutcome::Detached => "dropped: list detached",
        RequestOutcome::OutOfRange => "dropped: no page follows the current one",
    }
    .to_string()
}
