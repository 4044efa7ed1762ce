// ============================================================================
// NETWORK INTERCEPTOR - Observa fetch/XHR y muestra avisos 401/502
// ============================================================================
// Solo observa: el caller recibe la misma promesa / el mismo XHR sin cambios.
// El handle restaura window.fetch y XMLHttpRequest.prototype.send al hacer drop.
// ============================================================================

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::InterceptorConfig;
use crate::services::patch_guard::{PatchGuard, PropertySlot};
use crate::services::popup_policy::{NetworkErrorPolicy, PopupKind};

const SESSION_EXPIRED_MESSAGE: &str = "세션이 만료되었습니다. 다시 로그인해주세요.";
const BAD_GATEWAY_MESSAGE: &str = "서버에 일시적인 문제가 발생했습니다. 잠시 후 다시 시도해주세요.";

/// Efecto visible de un aviso
pub trait PopupNotifier {
    fn notify(&self, kind: PopupKind);
}

/// alert() + redirección diferida al login para 401
pub struct BrowserNotifier {
    login_path: String,
    redirect_delay_ms: u32,
}

impl BrowserNotifier {
    pub fn from_config(config: &InterceptorConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            redirect_delay_ms: config.login_redirect_delay_ms,
        }
    }
}

impl PopupNotifier for BrowserNotifier {
    fn notify(&self, kind: PopupKind) {
        let Some(window) = web_sys::window() else {
            return;
        };

        match kind {
            PopupKind::SessionExpired => {
                log::warn!("🔒 [INTERCEPTOR] 401 recibido, redirigiendo a {}", self.login_path);
                let _ = window.alert_with_message(SESSION_EXPIRED_MESSAGE);
                let login_path = self.login_path.clone();
                Timeout::new(self.redirect_delay_ms, move || {
                    if let Some(window) = web_sys::window() {
                        if let Err(e) = window.location().set_href(&login_path) {
                            log::error!("❌ [INTERCEPTOR] No se pudo navegar al login: {:?}", e);
                        }
                    }
                })
                .forget();
            }
            PopupKind::BadGateway => {
                log::warn!("🌩️ [INTERCEPTOR] 502 recibido");
                let _ = window.alert_with_message(BAD_GATEWAY_MESSAGE);
            }
        }
    }
}

/// Política + notificador compartidos por los wrappers de fetch y XHR
struct ResponseObserver {
    policy: NetworkErrorPolicy,
    notifier: Rc<dyn PopupNotifier>,
}

impl ResponseObserver {
    fn observe_status(&self, url: &str, status: u16) {
        if let Some(kind) = self.policy.on_response(url, status, js_sys::Date::now()) {
            self.notifier.notify(kind);
        }
    }

    fn observe_failure(&self, url: &str, error_text: &str) {
        log::debug!("📡 [INTERCEPTOR] Petición fallida {}: {}", url, error_text);
        if let Some(kind) = self.policy.on_failure(url, error_text, js_sys::Date::now()) {
            self.notifier.notify(kind);
        }
    }
}

/// Handle del interceptor: mientras vive, fetch y XHR están envueltos
pub struct NetworkInterceptor {
    fetch_guard: PatchGuard<PropertySlot>,
    xhr_guard: Option<PatchGuard<PropertySlot>>,
}

impl NetworkInterceptor {
    pub fn install(
        policy: NetworkErrorPolicy,
        notifier: Rc<dyn PopupNotifier>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let observer = Rc::new(ResponseObserver { policy, notifier });

        let fetch_guard = install_fetch_wrapper(&window, observer.clone())?;

        // XHR es opcional: si falla, el interceptor sigue funcionando con fetch
        let xhr_guard = match install_xhr_wrapper(&window, observer) {
            Ok(guard) => Some(guard),
            Err(e) => {
                log::warn!("⚠️ [INTERCEPTOR] XMLHttpRequest no envuelto: {:?}", e);
                None
            }
        };

        log::info!("✅ [INTERCEPTOR] Instalado (fetch{})", if xhr_guard.is_some() { " + XHR" } else { "" });
        Ok(Self {
            fetch_guard,
            xhr_guard,
        })
    }

    /// Restaurar los originales (idempotente)
    fn uninstall(&mut self) {
        if let Err(e) = self.fetch_guard.restore() {
            log::error!("❌ [INTERCEPTOR] Error restaurando fetch: {:?}", e);
        }
        if let Some(guard) = self.xhr_guard.as_mut() {
            if let Err(e) = guard.restore() {
                log::error!("❌ [INTERCEPTOR] Error restaurando XHR: {:?}", e);
            }
        }
    }
}

impl Drop for NetworkInterceptor {
    fn drop(&mut self) {
        let was_active = self.fetch_guard.is_active();
        self.uninstall();
        if was_active {
            log::info!("🔌 [INTERCEPTOR] Desinstalado");
        }
    }
}

fn install_fetch_wrapper(
    window: &web_sys::Window,
    observer: Rc<ResponseObserver>,
) -> Result<PatchGuard<PropertySlot>, JsValue> {
    let original: js_sys::Function = js_sys::Reflect::get(window, &JsValue::from_str("fetch"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("window.fetch no es una función"))?;

    let this: JsValue = window.clone().into();
    let original_fetch = original.clone();
    let wrapper = Closure::wrap(Box::new(move |input: JsValue, init: JsValue| -> JsValue {
        let promise = match original_fetch.call2(&this, &input, &init) {
            Ok(value) => value,
            Err(e) => return js_sys::Promise::reject(&e).into(),
        };

        let url = request_url(&input);
        if observer.policy.in_scope(&url) {
            if let Err(e) = attach_observer(&promise, &url, observer.clone()) {
                log::warn!("⚠️ [INTERCEPTOR] No se pudo observar {}: {:?}", url, e);
            }
        }

        // Siempre la promesa original, sin encadenar
        promise
    }) as Box<dyn FnMut(JsValue, JsValue) -> JsValue>);

    let window_obj: js_sys::Object = window.clone().unchecked_into();
    PatchGuard::install(
        PropertySlot::new(window_obj, "fetch", "window.fetch"),
        wrapper.into_js_value(),
    )
}

/// Rama lateral `promise.then(ok, err)`: observa sin alterar lo que recibe el caller
fn attach_observer(promise: &JsValue, url: &str, observer: Rc<ResponseObserver>) -> Result<(), JsValue> {
    let then: js_sys::Function = js_sys::Reflect::get(promise, &JsValue::from_str("then"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("fetch no devolvió una promesa"))?;

    let on_response = {
        let observer = observer.clone();
        let url = url.to_string();
        Closure::once_into_js(move |response: JsValue| {
            if let Some(response) = response.dyn_ref::<web_sys::Response>() {
                observer.observe_status(&url, response.status());
            }
        })
    };

    let on_failure = {
        let url = url.to_string();
        Closure::once_into_js(move |error: JsValue| {
            observer.observe_failure(&url, &error_text(&error));
        })
    };

    then.call2(promise, &on_response, &on_failure)?;
    Ok(())
}

fn install_xhr_wrapper(
    window: &web_sys::Window,
    observer: Rc<ResponseObserver>,
) -> Result<PatchGuard<PropertySlot>, JsValue> {
    let xhr_class = js_sys::Reflect::get(window, &JsValue::from_str("XMLHttpRequest"))?;
    let prototype: js_sys::Object = js_sys::Reflect::get(&xhr_class, &JsValue::from_str("prototype"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("XMLHttpRequest.prototype no disponible"))?;
    let original_send = js_sys::Reflect::get(&prototype, &JsValue::from_str("send"))?;

    let on_loadend = Closure::wrap(Box::new(move |xhr: JsValue| {
        if let Some(xhr) = xhr.dyn_ref::<web_sys::XmlHttpRequest>() {
            let url = xhr.response_url();
            if !observer.policy.in_scope(&url) {
                return;
            }
            match xhr.status() {
                // status 0 = error de red/abort, sin código que clasificar
                Ok(0) | Err(_) => {}
                Ok(status) => observer.observe_status(&url, status),
            }
        }
    }) as Box<dyn FnMut(JsValue)>)
    .into_js_value();

    // Un Closure de Rust no recibe `this`, así que el wrapper se crea en JS
    let factory = js_sys::Function::new_with_args(
        "original, observe",
        "return function(body) { \
            var xhr = this; \
            xhr.addEventListener('loadend', function() { observe(xhr); }); \
            return original.call(xhr, body); \
        };",
    );
    let replacement = factory.call2(&JsValue::NULL, &original_send, &on_loadend)?;

    PatchGuard::install(
        PropertySlot::new(prototype, "send", "XMLHttpRequest.prototype.send"),
        replacement,
    )
}

/// URL de un argumento de fetch: string, Request o URL
fn request_url(input: &JsValue) -> String {
    if let Some(url) = input.as_string() {
        return url;
    }
    if let Some(request) = input.dyn_ref::<web_sys::Request>() {
        return request.url();
    }
    input
        .dyn_ref::<js_sys::Object>()
        .map(|obj| String::from(obj.to_string()))
        .unwrap_or_default()
}

fn error_text(error: &JsValue) -> String {
    if let Some(err) = error.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}
