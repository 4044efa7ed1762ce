// ============================================================================
// APP - Aplicación principal
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, create_element, document, get_element_by_id, set_inner_html};
use crate::dom::incremental::{update_photo_gallery_incremental, update_player_overlay_incremental};
use crate::state::app_state::{AppState, IncrementalUpdate};
use crate::viewmodels::{PhotoViewModel, UnityPlayerSession};
use crate::views::render_app;

const ROOT_ID: &str = "app";

pub struct App {
    state: AppState,
    root: Element,
    player: Option<UnityPlayerSession>,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = match get_element_by_id(ROOT_ID) {
            Some(root) => root,
            None => {
                log::warn!("⚠️ [APP] No hay #{}, se crea en <body>", ROOT_ID);
                let root = create_element("div")?;
                root.set_id(ROOT_ID);
                let body = document()
                    .and_then(|doc| doc.body())
                    .ok_or_else(|| JsValue::from_str("No body"))?;
                body.append_child(&root)?;
                root
            }
        };

        let state = AppState::new();

        // Batch de updates: se aplican en el siguiente tick
        state.subscribe_to_changes(|update| {
            Timeout::new(0, move || {
                crate::rerender_app_with_type(update);
            })
            .forget();
        });

        Ok(Self {
            state,
            root,
            player: None,
        })
    }

    /// Render completo. Si el reproductor estaba montado se desmonta y se vuelve
    /// a montar, porque el canvas anterior desaparece del DOM.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let had_player = self.player.take().is_some();

        set_inner_html(&self.root, "");
        let view = render_app(&self.state)?;
        append_child(&self.root, &view)?;
        log::debug!("🎬 [APP] Render completo");

        if had_player {
            self.mount_player()?;
        }
        Ok(())
    }

    pub fn mount_player(&mut self) -> Result<(), JsValue> {
        if self.player.is_some() {
            log::warn!("⚠️ [APP] Reproductor ya montado");
            return Ok(());
        }
        self.player = Some(UnityPlayerSession::mount(&self.state)?);
        Ok(())
    }

    /// Repintar solo una sección
    pub fn update_incremental(&self, update: IncrementalUpdate) -> Result<(), JsValue> {
        match update {
            IncrementalUpdate::PlayerOverlay => update_player_overlay_incremental(&self.state),
            IncrementalUpdate::PhotoGallery => update_photo_gallery_incremental(&self.state),
        }
    }

    pub fn refresh_photos(&self) {
        PhotoViewModel::new().refresh(&self.state);
    }

    /// Desmontar el reproductor (restaura fetch/XHR, retira listeners y script)
    pub fn teardown(&mut self) {
        if self.player.take().is_some() {
            log::info!("👋 [APP] Jardín desmontado");
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
