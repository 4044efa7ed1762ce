// ============================================================================
// PLAYER STATE - Estado de carga del runtime de Unity
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum PlayerStatus {
    /// progress en [0, 1]
    Loading { progress: f64 },
    Ready,
    Failed { message: String },
}

#[derive(Clone)]
pub struct PlayerState {
    status: Rc<RefCell<PlayerStatus>>,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            status: Rc::new(RefCell::new(PlayerStatus::Loading { progress: 0.0 })),
        }
    }

    pub fn status(&self) -> PlayerStatus {
        self.status.borrow().clone()
    }

    /// Devuelve true si el porcentaje visible cambió
    pub fn set_progress(&self, progress: f64) -> bool {
        let mut status = self.status.borrow_mut();
        let PlayerStatus::Loading { progress: current } = &mut *status else {
            return false;
        };
        let progress = progress.clamp(0.0, 1.0);
        let changed = (progress * 100.0).floor() != (*current * 100.0).floor();
        *current = progress;
        changed
    }

    pub fn set_ready(&self) {
        *self.status.borrow_mut() = PlayerStatus::Ready;
    }

    pub fn set_failed(&self, message: impl Into<String>) {
        *self.status.borrow_mut() = PlayerStatus::Failed {
            message: message.into(),
        };
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_only_reports_whole_percent_changes() {
        let state = PlayerState::new();
        assert!(state.set_progress(0.10));
        assert!(!state.set_progress(0.105));
        assert!(state.set_progress(0.5));
        assert_eq!(state.status(), PlayerStatus::Loading { progress: 0.5 });
    }

    #[test]
    fn progress_after_ready_is_ignored() {
        let state = PlayerState::new();
        state.set_ready();
        assert!(!state.set_progress(0.9));
        assert_eq!(state.status(), PlayerStatus::Ready);
    }

    #[test]
    fn failure_is_terminal_state() {
        let state = PlayerState::new();
        state.set_failed("canvas #unity-canvas no existe en el documento");
        assert!(matches!(state.status(), PlayerStatus::Failed { .. }));
        assert!(!state.set_progress(0.3));
    }
}
