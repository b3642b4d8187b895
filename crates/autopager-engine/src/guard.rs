use autopager_core::{PagerError, PagerResult};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Locked,
    Unlocked,
}

/// Binary lock ensuring at most one page fetch is outstanding.
///
/// Clones share the same state, so the fetch side can inspect it from any
/// thread. Locking a locked guard or releasing an unlocked one is a protocol
/// violation and reported as `PagerError::ReentrantLock`.
#[derive(Debug, Clone)]
pub struct SingleFlightLoadGuard {
    state: Arc<Mutex<GuardState>>,
}

impl SingleFlightLoadGuard {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(GuardState::Unlocked)),
        }
    }

    pub fn lock(&self) -> PagerResult<()> {
        let mut state = self.state.lock();
        match *state {
            GuardState::Locked => Err(PagerError::ReentrantLock(
                "lock() called while a load is already in flight".to_string(),
            )),
            GuardState::Unlocked => {
                *state = GuardState::Locked;
                Ok(())
            }
        }
    }

    pub fn release(&self) -> PagerResult<()> {
        let mut state = self.state.lock();
        match *state {
            GuardState::Unlocked => Err(PagerError::ReentrantLock(
                "release() called with no load in flight".to_string(),
            )),
            GuardState::Locked => {
                *state = GuardState::Unlocked;
                Ok(())
            }
        }
    }

    pub fn state(&self) -> GuardState {
        *self.state.lock()
    }

    pub fn is_locked(&self) -> bool {
        self.state() == GuardState::Locked
    }
}

impl Default for SingleFlightLoadGuard {
    fn default() -> Self {
        Self::new()
    }
}
