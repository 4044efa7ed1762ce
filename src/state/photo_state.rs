// ============================================================================
// PHOTO STATE - Estado del listado de fotos (loading / error / resultado)
// ============================================================================
// La petición se hace una sola vez por sesión: una vez completada (éxito o
// fallo) las siguientes son no-op hasta invalidate().
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::PhotoError;
use crate::models::PhotoRecord;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhotoSnapshot {
    pub loading: bool,
    pub error: Option<String>,
    pub photos: Vec<PhotoRecord>,
    pub fetched: bool,
}

#[derive(Clone, Default)]
pub struct PhotoState {
    inner: Rc<RefCell<PhotoSnapshot>>,
}

/// Permiso para una única petición en vuelo. Completar o soltar el ticket
/// siempre apaga `loading`.
pub struct FetchTicket {
    state: PhotoState,
    finished: bool,
}

impl FetchTicket {
    pub fn complete(mut self, result: Result<Vec<PhotoRecord>, PhotoError>) {
        self.finished = true;
        let mut inner = self.state.inner.borrow_mut();
        inner.loading = false;
        inner.fetched = true;
        match result {
            Ok(photos) => {
                inner.photos = photos;
                inner.error = None;
            }
            Err(e) => {
                log::error!("❌ [PHOTOS] {}", e);
                inner.photos.clear();
                inner.error = Some(format!("사진을 불러오지 못했습니다 ({})", e));
            }
        }
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        if !self.finished {
            // Futuro abandonado: no queda "cargando" para siempre
            self.state.inner.borrow_mut().loading = false;
        }
    }
}

impl PhotoState {
    pub fn new() -> Self {
        Self::default()
    }

    /// None si ya se pidió (o hay una petición en vuelo)
    pub fn begin_fetch(&self) -> Option<FetchTicket> {
        let mut inner = self.inner.borrow_mut();
        if inner.fetched || inner.loading {
            return None;
        }
        inner.loading = true;
        Some(FetchTicket {
            state: self.clone(),
            finished: false,
        })
    }

    /// Permite una nueva petición (reset externo del flag)
    pub fn invalidate(&self) {
        self.inner.borrow_mut().fetched = false;
    }

    pub fn snapshot(&self) -> PhotoSnapshot {
        self.inner.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhotoSource, PlantId};

    fn record(id: i64) -> PhotoRecord {
        PhotoRecord {
            plant_id: PlantId::Number(id),
            user_id: None,
            source: PhotoSource::Url(format!("https://s3/{}.png", id)),
        }
    }

    #[test]
    fn only_one_fetch_per_session() {
        let state = PhotoState::new();
        let ticket = state.begin_fetch().expect("first fetch allowed");
        assert!(state.snapshot().loading);
        assert!(state.begin_fetch().is_none(), "no second fetch while loading");

        ticket.complete(Ok(vec![record(1)]));
        let snapshot = state.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.fetched);
        assert_eq!(snapshot.photos.len(), 1);
        assert!(state.begin_fetch().is_none(), "no refetch after completion");
    }

    #[test]
    fn failure_leaves_empty_list_and_error() {
        let state = PhotoState::new();
        state.begin_fetch().unwrap().complete(Err(PhotoError::Http { status: 500 }));

        let snapshot = state.snapshot();
        assert!(snapshot.photos.is_empty());
        assert!(snapshot.error.as_deref().is_some_and(|e| e.contains("500")));
        assert!(!snapshot.loading);
        assert!(state.begin_fetch().is_none());
    }

    #[test]
    fn invalidate_allows_a_new_fetch() {
        let state = PhotoState::new();
        state.begin_fetch().unwrap().complete(Ok(vec![record(1)]));
        state.invalidate();

        let ticket = state.begin_fetch().expect("fetch allowed after invalidate");
        ticket.complete(Ok(vec![record(2), record(3)]));
        assert_eq!(state.snapshot().photos.len(), 2);
    }

    #[test]
    fn dropped_ticket_clears_loading_without_marking_fetched() {
        let state = PhotoState::new();
        drop(state.begin_fetch().unwrap());

        let snapshot = state.snapshot();
        assert!(!snapshot.loading);
        assert!(!snapshot.fetched);
    }
}
