// ============================================================================
// APP STATE - Estado global de la página del jardín
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::{AuthState, PhotoState, PlayerState};

/// Tipo de actualización de UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateType {
    FullRender,
    Incremental(IncrementalUpdate),
}

/// Secciones que se pueden repintar sin tocar el canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncrementalUpdate {
    PlayerOverlay,
    PhotoGallery,
}

type ChangeCallback = Rc<dyn Fn(UpdateType)>;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub player: PlayerState,
    pub photos: PhotoState,
    change_subscribers: Rc<RefCell<Vec<ChangeCallback>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            auth: AuthState::new(),
            player: PlayerState::new(),
            photos: PhotoState::new(),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Suscribirse a cambios de estado
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn(UpdateType) + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify(&self, update: UpdateType) {
        // Copia para que un subscriber pueda suscribir otro sin doble borrow
        let subscribers: Vec<ChangeCallback> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback(update);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribers_receive_the_update_type() {
        let state = AppState::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            state.subscribe_to_changes(move |update| seen.borrow_mut().push(update));
        }

        state.notify(UpdateType::Incremental(IncrementalUpdate::PhotoGallery));
        state.clone().notify(UpdateType::FullRender);

        assert_eq!(
            *seen.borrow(),
            vec![
                UpdateType::Incremental(IncrementalUpdate::PhotoGallery),
                UpdateType::FullRender
            ]
        );
    }

    #[test]
    fn subscriber_may_subscribe_during_notify() {
        let state = AppState::new();
        let calls = Rc::new(Cell::new(0));
        {
            let inner_state = state.clone();
            let calls = calls.clone();
            state.subscribe_to_changes(move |_| {
                calls.set(calls.get() + 1);
                inner_state.subscribe_to_changes(|_| {});
            });
        }
        state.notify(UpdateType::FullRender);
        assert_eq!(calls.get(), 1);
    }
}
