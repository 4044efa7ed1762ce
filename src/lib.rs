// ============================================================================
// PLANTMATE GARDEN - FRONTEND MVVM (RUST PURO)
// ============================================================================
// - Views: funciones que renderizan DOM (sin lógica)
// - ViewModels: ciclo de vida del reproductor y pedido de fotos
// - Services: fetch/XHR, postMessage, loader de Unity, relay de login
// - State: Rc<RefCell> + subscribers
// - Models: formatos de cable
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
mod dom;
mod viewmodels;
mod views;
mod app;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::CONFIG;
use crate::state::app_state::UpdateType;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    log::info!("🪴 PlantMate Garden - Rust + WASM ({})", CONFIG.environment);

    let mut app = App::new()?;
    app.render()?;

    // Fallo del reproductor no tumba la página: la galería sigue funcionando
    if let Err(e) = app.mount_player() {
        log::error!("❌ [APP] No se pudo montar el reproductor: {:?}", e);
        app.state().player.set_failed(format!("{:?}", e));
        if let Err(e) = app.render() {
            log::error!("❌ [APP] Error re-renderizando: {:?}", e);
        }
    }

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Aplicar una actualización de UI (incremental con fallback a render completo)
pub fn rerender_app_with_type(update: UpdateType) {
    APP.with(|cell| {
        let mut app = cell.borrow_mut();
        let Some(app) = app.as_mut() else {
            log::warn!("⚠️ [UPDATE] App no está inicializada");
            return;
        };

        let needs_full_render = match update {
            UpdateType::FullRender => true,
            UpdateType::Incremental(section) => match app.update_incremental(section) {
                Ok(()) => false,
                Err(e) => {
                    log::warn!("🔄 [UPDATE] {:?} falló ({:?}), render completo", section, e);
                    true
                }
            },
        };

        if needs_full_render {
            if let Err(e) = app.render() {
                log::error!("❌ [UPDATE] Error re-renderizando: {:?}", e);
            }
        }
    });
}

/// Desmontar el jardín desde JS (restaura fetch/XHR y retira listeners)
#[wasm_bindgen]
pub fn teardown_garden() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            app.teardown();
        }
    });
}

/// Volver a pedir las fotos (resetea el flag de "ya pedido")
#[wasm_bindgen]
pub fn refresh_photos() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow().as_ref() {
            app.refresh_photos();
        }
    });
}
