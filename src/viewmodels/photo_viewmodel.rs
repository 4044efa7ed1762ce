// ============================================================================
// PHOTO VIEWMODEL - Pide el listado de fotos una sola vez por sesión
// ============================================================================

use wasm_bindgen_futures::spawn_local;

use crate::services::PhotoService;
use crate::state::app_state::{AppState, IncrementalUpdate, UpdateType};

pub struct PhotoViewModel {
    service: PhotoService,
}

impl PhotoViewModel {
    pub fn new() -> Self {
        Self {
            service: PhotoService::new(),
        }
    }

    /// No-op si ya se pidió en esta sesión o hay una petición en vuelo
    pub fn request_photos(&self, state: &AppState, token: String) {
        let Some(ticket) = state.photos.begin_fetch() else {
            log::debug!("📸 [PHOTOS] Fotos ya solicitadas en esta sesión, se omite");
            return;
        };
        state.notify(UpdateType::Incremental(IncrementalUpdate::PhotoGallery));

        let service = self.service.clone();
        let state = state.clone();
        spawn_local(async move {
            let result = service.fetch_photos(&token).await;
            ticket.complete(result);
            state.notify(UpdateType::Incremental(IncrementalUpdate::PhotoGallery));
        });
    }

    /// Vuelve a pedir las fotos con el último token conocido
    pub fn refresh(&self, state: &AppState) {
        state.photos.invalidate();
        match state.auth.get_token() {
            Some(token) => self.request_photos(state, token),
            None => log::info!("📸 [PHOTOS] Sin token todavía; se pedirán al recibir el login"),
        }
    }
}

impl Default for PhotoViewModel {
    fn default() -> Self {
        Self::new()
    }
}
