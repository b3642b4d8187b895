//! The façade a UI layer drives.
//!
//! All methods take `&mut self` and must be called from the single task that
//! owns the list. Fetches run on spawned tokio tasks and post their results
//! onto the UI queue returned by [`PaginationCoordinator::new`]; the host
//! feeds every message back through [`PaginationCoordinator::handle`].
//!
//! # Example
//! ```ignore
//! let (mut pager, mut rx) = PaginationCoordinator::new(config, producer)?;
//! pager.start();
//! while let Some(message) = rx.recv().await {
//!     pager.handle(message, &list);
//!     list.redraw(pager.render_sequence());
//! }
//! ```

use crate::events::{CoordinatorEvent, ScrollSource};
use crate::guard::SingleFlightLoadGuard;
use crate::producer::{FetchError, PageProducer};
use crate::tick::{NextTick, UiMessage};
use crate::trigger::{FillDecision, ScrollDecision, ViewportTriggerDetector};
use autopager_core::{
    PageIndex, PagerConfig, PagerError, PagerResult, ReloadPolicy, ViewportMetrics,
};
use autopager_domain::{ItemSequenceBuilder, Page, PageMap, RenderItem, RenderSequence};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Result of asking for a page. Dropped requests are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Dispatched,
    /// Another page is still loading; the request was dropped, not queued.
    InFlight,
    /// The host context is gone; the request was dropped.
    Detached,
    /// No page index follows the current one.
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Loading { index: PageIndex },
}

/// Point-in-time view of the coordinator's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatorState {
    pub phase: LoadPhase,
    pub current_index: Option<PageIndex>,
    pub first_page_index: Option<PageIndex>,
    pub last_page_index: Option<PageIndex>,
    pub load_locked: bool,
    pub scroll_listening: bool,
    pub scroll_trigger_armed: bool,
    pub in_terminal_state: bool,
}

pub struct PaginationCoordinator<E: Send + Sync + 'static> {
    config: PagerConfig,
    producer: Arc<dyn PageProducer<E>>,
    pages: PageMap<E>,
    sequence: RenderSequence<E>,
    builder: ItemSequenceBuilder,
    detector: ViewportTriggerDetector,
    guard: SingleFlightLoadGuard,
    tx: mpsc::UnboundedSender<UiMessage<E>>,
    tick: NextTick<E>,
    events: broadcast::Sender<CoordinatorEvent>,
    current_index: Option<PageIndex>,
    first_page_index: Option<PageIndex>,
    last_page_index: Option<PageIndex>,
    in_flight: Option<PageIndex>,
    /// Whether the fill check handed over to the scroll trigger this session.
    scroll_listening: bool,
    /// Whether a request was already triggered for the current zone crossing.
    scroll_trigger_armed: bool,
    data_attached: bool,
    host_attached: bool,
}

impl<E> PaginationCoordinator<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Create a coordinator and the UI queue its results arrive on.
    ///
    /// Fails if the config is invalid.
    pub fn new(
        config: PagerConfig,
        producer: Arc<dyn PageProducer<E>>,
    ) -> PagerResult<(Self, mpsc::UnboundedReceiver<UiMessage<E>>)> {
        config.validate()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(64);

        let coordinator = Self {
            detector: ViewportTriggerDetector::from_config(&config),
            config,
            producer,
            pages: PageMap::new(),
            sequence: RenderSequence::empty(),
            builder: ItemSequenceBuilder::new(),
            guard: SingleFlightLoadGuard::new(),
            tick: NextTick::new(tx.clone()),
            tx,
            events,
            current_index: None,
            first_page_index: None,
            last_page_index: None,
            in_flight: None,
            scroll_listening: false,
            scroll_trigger_armed: false,
            data_attached: false,
            host_attached: true,
        };

        Ok((coordinator, rx))
    }

    /// Subscribe to rendering notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.events.subscribe()
    }

    /// Request the configured initial page.
    pub fn start(&mut self) -> RequestOutcome {
        self.request_page(self.config.initial_page)
    }

    /// Dispatch a fetch for `index` unless one is already in flight or the host is gone.
    pub fn request_page(&mut self, index: PageIndex) -> RequestOutcome {
        if !self.host_attached {
            tracing::debug!("Dropping request: {}", PagerError::DetachedContext(index));
            return RequestOutcome::Detached;
        }

        if let Some(pending) = self.in_flight {
            tracing::debug!(
                "Dropping request for page {}: page {} is still loading",
                index,
                pending
            );
            return RequestOutcome::InFlight;
        }

        if let Err(e) = self.guard.lock() {
            self.report_guard_violation(e);
            return RequestOutcome::InFlight;
        }

        self.in_flight = Some(index);
        tracing::debug!("Loading page {}", index);
        self.emit(CoordinatorEvent::LoadStarted { index });

        let producer = Arc::clone(&self.producer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let message = match producer.produce(index).await {
                Ok(page) => UiMessage::Produced(page),
                Err(error) => UiMessage::Failed { index, error },
            };
            if tx.send(message).is_err() {
                tracing::debug!("UI queue closed before page {} was delivered", index);
            }
        });

        RequestOutcome::Dispatched
    }

    /// Apply one message from the UI queue.
    pub fn handle<S>(&mut self, message: UiMessage<E>, source: &S)
    where
        S: ScrollSource + ?Sized,
    {
        match message {
            UiMessage::Produced(page) => self.on_page_produced(page),
            UiMessage::Failed { index, error } => self.on_page_production_failed(index, error),
            UiMessage::FillCheck { epoch } => {
                if self.tick.take(epoch) {
                    self.fill_viewport(source.metrics());
                } else {
                    tracing::debug!("Dropping stale fill check (epoch {})", epoch);
                }
            }
        }
    }

    /// Merge a produced page and recompute the render sequence.
    pub fn on_page_produced(&mut self, page: Page<E>) {
        let index = page.index;

        if self.in_flight.is_some_and(|pending| pending != index) {
            tracing::warn!(
                "Received page {} while page {:?} was requested",
                index,
                self.in_flight
            );
        }

        if self.should_clear_for_reload(index) {
            tracing::info!(
                "Reloading from page {}: discarding {} loaded pages",
                index,
                self.pages.len()
            );
            self.pages.clear();
        }

        self.current_index = Some(index);
        self.last_page_index = Some(page.last_page_index);
        let first_attach = !self.data_attached;
        if first_attach {
            self.first_page_index = Some(page.first_page_index);
            self.data_attached = true;
        }

        tracing::info!(
            "Merged page {} ({} elements, last page {})",
            index,
            page.len(),
            page.last_page_index
        );
        self.pages.merge(page);
        self.rebuild_sequence();

        if first_attach {
            self.emit(CoordinatorEvent::DataFirstAttached);
        }

        self.finish_load();

        if self.scroll_listening {
            self.scroll_trigger_armed = false;
        } else {
            self.tick.schedule_fill_check();
        }
    }

    /// Return to idle after a failed fetch. Loaded pages are untouched.
    pub fn on_page_production_failed(&mut self, index: PageIndex, error: FetchError) {
        let failure = PagerError::FetchFailed {
            index,
            message: error.to_string(),
        };
        tracing::warn!("{}", failure);

        self.finish_load();
        self.emit(CoordinatorEvent::FetchFailed {
            index,
            message: error.to_string(),
        });
        // Redraw so the footer/gap affordances are offered again.
        self.emit(CoordinatorEvent::SequenceChanged {
            len: self.sequence.len(),
        });
    }

    /// Scroll delta from the rendering layer. Ignored until the viewport has been filled.
    pub fn on_scrolled(&mut self, metrics: ViewportMetrics) {
        if !self.scroll_listening {
            return;
        }

        match self.detector.check_scroll(
            &metrics,
            self.scroll_trigger_armed,
            self.is_in_terminal_state(),
        ) {
            ScrollDecision::AlreadyTriggered | ScrollDecision::OutsideZone => {}
            ScrollDecision::Triggered { request_next } => {
                self.scroll_trigger_armed = true;
                if request_next {
                    self.request_next();
                }
            }
        }
    }

    /// Fill-to-viewport check. Normally reached through a deferred `FillCheck` message.
    pub fn fill_viewport(&mut self, metrics: ViewportMetrics) {
        match self
            .detector
            .check_fill(&metrics, self.is_in_terminal_state())
        {
            FillDecision::Overflowing => {
                tracing::debug!(
                    "Viewport filled ({} of {} rows visible); scroll trigger attached",
                    metrics.visible_item_count,
                    metrics.total_item_count
                );
                self.scroll_listening = true;
                self.scroll_trigger_armed = false;
            }
            FillDecision::Exhausted => {
                tracing::debug!("Viewport not filled but all pages are loaded");
            }
            FillDecision::RequestNext => {
                self.request_next();
            }
        }
    }

    pub fn on_gap_clicked(&mut self, target_page_index: PageIndex) -> RequestOutcome {
        self.request_page(target_page_index)
    }

    /// Reload the last page of the source to pick up pages added since.
    pub fn on_end_clicked(&mut self) -> Option<RequestOutcome> {
        self.last_page_index.map(|last| self.request_page(last))
    }

    /// Retry affordance: request the page after the current one.
    pub fn on_footer_clicked(&mut self) -> RequestOutcome {
        self.request_next()
    }

    /// Reload from the first page. The scroll trigger is detached so the fill
    /// check runs again on the reloaded data.
    pub fn on_refresh_requested(&mut self) -> RequestOutcome {
        self.scroll_listening = false;
        self.scroll_trigger_armed = false;
        let first = self.first_page_index.unwrap_or(self.config.initial_page);
        self.request_page(first)
    }

    /// Drop every loaded page and all bookkeeping. An in-flight fetch still lands.
    pub fn reset(&mut self) {
        tracing::info!("Resetting coordinator ({} pages loaded)", self.pages.len());
        self.pages.clear();
        self.current_index = None;
        self.first_page_index = None;
        self.last_page_index = None;
        self.scroll_listening = false;
        self.scroll_trigger_armed = false;
        self.data_attached = false;
        self.tick.cancel();
        self.rebuild_sequence();
    }

    /// The host UI context went away: drop pending ticks and future requests.
    pub fn detach(&mut self) {
        self.host_attached = false;
        self.tick.cancel();
    }

    pub fn attach(&mut self) {
        self.host_attached = true;
    }

    pub fn is_in_terminal_state(&self) -> bool {
        matches!(
            (self.last_page_index, self.current_index),
            (Some(last), Some(current)) if last == current
        )
    }

    pub fn render_sequence(&self) -> &RenderSequence<E> {
        &self.sequence
    }

    pub fn row_at(&self, position: usize) -> Option<&RenderItem<E>> {
        self.sequence.get(position)
    }

    pub fn item_at(&self, position: usize) -> Option<&E> {
        self.sequence.element_at(position)
    }

    pub fn gap_target_at(&self, position: usize) -> Option<PageIndex> {
        self.sequence.gap_target_at(position)
    }

    pub fn pages(&self) -> &PageMap<E> {
        &self.pages
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    pub fn current_index(&self) -> Option<PageIndex> {
        self.current_index
    }

    pub fn first_page_index(&self) -> Option<PageIndex> {
        self.first_page_index
    }

    pub fn last_page_index(&self) -> Option<PageIndex> {
        self.last_page_index
    }

    pub fn in_flight(&self) -> Option<PageIndex> {
        self.in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_pending_tick(&self) -> bool {
        self.tick.is_pending()
    }

    /// Nothing loading and nothing scheduled.
    pub fn is_settled(&self) -> bool {
        !self.is_loading() && !self.has_pending_tick()
    }

    pub fn is_scroll_listening(&self) -> bool {
        self.scroll_listening
    }

    pub fn is_scroll_trigger_armed(&self) -> bool {
        self.scroll_trigger_armed
    }

    pub fn is_attached(&self) -> bool {
        self.host_attached
    }

    pub fn state(&self) -> CoordinatorState {
        CoordinatorState {
            phase: match self.in_flight {
                Some(index) => LoadPhase::Loading { index },
                None => LoadPhase::Idle,
            },
            current_index: self.current_index,
            first_page_index: self.first_page_index,
            last_page_index: self.last_page_index,
            load_locked: self.guard.is_locked(),
            scroll_listening: self.scroll_listening,
            scroll_trigger_armed: self.scroll_trigger_armed,
            in_terminal_state: self.is_in_terminal_state(),
        }
    }

    fn next_index(&self) -> Option<PageIndex> {
        match self.current_index {
            Some(current) => current.checked_add(1),
            None => Some(self.config.initial_page),
        }
    }

    fn request_next(&mut self) -> RequestOutcome {
        match self.next_index() {
            Some(index) => self.request_page(index),
            None => {
                tracing::debug!(
                    "No page follows page {:?}; nothing requested",
                    self.current_index
                );
                RequestOutcome::OutOfRange
            }
        }
    }

    fn should_clear_for_reload(&self, index: PageIndex) -> bool {
        if self.first_page_index != Some(index) {
            return false;
        }
        match self.config.reload_policy {
            ReloadPolicy::ClearIfPresent => self.pages.contains(index),
            ReloadPolicy::AlwaysClear => true,
        }
    }

    fn rebuild_sequence(&mut self) {
        let terminal = self.is_in_terminal_state();
        self.sequence = self.builder.build(self.pages.iter(), terminal);
        self.emit(CoordinatorEvent::SequenceChanged {
            len: self.sequence.len(),
        });
    }

    fn finish_load(&mut self) {
        if self.in_flight.take().is_some() {
            if let Err(e) = self.guard.release() {
                self.report_guard_violation(e);
            }
        }
    }

    fn report_guard_violation(&self, error: PagerError) {
        tracing::error!("{}", error);
        debug_assert!(false, "{}", error);
    }

    fn emit(&self, event: CoordinatorEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
