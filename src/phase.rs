use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Sleep};

use crate::state::{AppState, Phase};
use crate::store::Store;

pub const LONG_PRESS_DURATION: Duration = Duration::from_millis(800);

// Cancellable timer behind the deliberate-confirmation gesture. Arming
// replaces any previous timer; disarming is idempotent.
pub struct HoldGate {
    threshold: Duration,
    timer: Option<Pin<Box<Sleep>>>,
}

impl HoldGate {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            timer: None,
        }
    }

    pub fn arm(&mut self) {
        self.timer = Some(Box::pin(sleep(self.threshold)));
    }

    pub fn disarm(&mut self) {
        self.timer = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    // Resolves true once the threshold elapses while armed; resolves false
    // immediately when nothing is armed. Dropping the future mid-wait (a
    // lost select) leaves the timer armed.
    pub async fn held(&mut self) -> bool {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.await;
                self.timer = None;
                true
            }
            None => false,
        }
    }
}

// One-directional. Completed ids are cleared: the post-birth checklist is
// a different task universe and its progress starts at zero. The due date
// stays on as the recorded birth date.
pub fn confirm_transition(state: &AppState) -> AppState {
    AppState {
        phase: Phase::PostBirth,
        completed_todos: Vec::new(),
        due_date: state.due_date.clone(),
    }
}

// The write is fire and forget; the caller renders from the returned state.
pub fn apply_transition(store: &Store, state: &AppState) -> AppState {
    let next = confirm_transition(state);
    let _ = store.save_state(&next);
    next
}
