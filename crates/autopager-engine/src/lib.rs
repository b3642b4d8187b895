pub mod coordinator;
pub mod events;
pub mod guard;
pub mod producer;
pub mod tick;
pub mod trigger;

pub use coordinator::{CoordinatorState, LoadPhase, PaginationCoordinator, RequestOutcome};
pub use events::{CoordinatorEvent, ScrollSource};
pub use guard::{GuardState, SingleFlightLoadGuard};
pub use producer::{FetchError, PageProducer};
pub use tick::{NextTick, UiMessage};
pub use trigger::{FillDecision, ScrollDecision, ViewportTriggerDetector};
