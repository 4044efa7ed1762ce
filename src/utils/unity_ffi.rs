// ============================================================================
// UNITY FFI - Foreign Function Interface para el loader de Unity WebGL
// ============================================================================
// Solo wrappers para funciones JS - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

use crate::error::RelayError;
use crate::services::login_relay::UnityReceiver;

#[wasm_bindgen]
extern "C" {
    /// Instancia devuelta por createUnityInstance
    #[derive(Clone, Debug)]
    pub type UnityInstance;

    /// Definida por unity.loader.js; no existe hasta que el script carga
    #[wasm_bindgen(catch, js_name = createUnityInstance)]
    pub fn create_unity_instance(
        canvas: &web_sys::HtmlCanvasElement,
        config: &JsValue,
        on_progress: &js_sys::Function,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, method, js_name = SendMessage)]
    pub fn send_message(
        this: &UnityInstance,
        object_name: &str,
        method_name: &str,
        value: &str,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, method, js_name = Quit)]
    pub fn quit(this: &UnityInstance) -> Result<js_sys::Promise, JsValue>;
}

impl UnityReceiver for UnityInstance {
    fn send_message(&self, object: &str, method: &str, payload: &str) -> Result<(), RelayError> {
        UnityInstance::send_message(self, object, method, payload)
            .map_err(|e| RelayError::SendMessage(format!("{:?}", e)))
    }
}

/// ¿Ya definió el loader `window.createUnityInstance`?
pub fn unity_factory_available() -> bool {
    web_sys::window()
        .map(|window| {
            js_sys::Reflect::get(&window, &JsValue::from_str("createUnityInstance"))
                .map(|value| value.is_function())
                .unwrap_or(false)
        })
        .unwrap_or(false)
}
