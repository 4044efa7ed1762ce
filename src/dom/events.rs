// ============================================================================
// EVENT HANDLING - Listeners globales con limpieza explícita
// ============================================================================
// Los listeners de window NO se limpian solos al destruir el DOM:
// WindowListener guarda el closure y lo retira en Drop.
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Event;

pub struct WindowListener {
    event_type: String,
    closure: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    pub fn new<F>(event_type: &str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        log::debug!("👂 Listener '{}' registrado en window", event_type);
        Ok(Self {
            event_type: event_type.to_string(),
            closure,
        })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                &self.event_type,
                self.closure.as_ref().unchecked_ref(),
            );
            log::debug!("🔌 Listener '{}' retirado de window", self.event_type);
        }
    }
}
