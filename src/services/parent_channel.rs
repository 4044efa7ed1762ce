// ============================================================================
// PARENT CHANNEL - Recepción de LOGIN_INFO vía window.postMessage
// ============================================================================
// Solo se confía en orígenes de la allow-list (vacía = mismo origen)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MessageEvent;

use crate::dom::WindowListener;
use crate::models::{parse_login_message, LoginPayload};

#[derive(Clone, Debug, Default)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn allows(&self, origin: &str, own_origin: &str) -> bool {
        let origin = normalize(origin);
        if origin.is_empty() || origin == "null" {
            return false;
        }
        if self.allowed.is_empty() {
            return origin == normalize(own_origin);
        }
        self.allowed.iter().any(|allowed| normalize(allowed) == origin)
    }
}

/// Escuchar mensajes del padre; el listener se retira al soltar el handle
pub fn listen_for_login<F>(policy: OriginPolicy, on_login: F) -> Result<WindowListener, JsValue>
where
    F: Fn(LoginPayload) + 'static,
{
    WindowListener::new("message", move |event: web_sys::Event| {
        let Some(event) = event.dyn_ref::<MessageEvent>() else {
            return;
        };

        let own_origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        let origin = event.origin();
        if !policy.allows(&origin, &own_origin) {
            log::warn!("🚫 [PARENT] Mensaje de origen no autorizado ignorado: {}", origin);
            return;
        }

        // stringify(undefined) no produce string
        let Some(json) = js_sys::JSON::stringify(&event.data())
            .ok()
            .and_then(|json| json.as_string())
        else {
            return;
        };

        match parse_login_message(&json) {
            Some(payload) => {
                log::info!("📩 [PARENT] LOGIN_INFO recibido para {}", payload.user_id);
                on_login(payload);
            }
            None => log::debug!("📥 [PARENT] Mensaje ignorado: {}", json),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN: &str = "https://garden.plantmate.example";

    #[test]
    fn empty_allow_list_means_same_origin_only() {
        let policy = OriginPolicy::default();
        assert!(policy.allows(OWN, OWN));
        assert!(!policy.allows("https://evil.example", OWN));
    }

    #[test]
    fn allow_list_is_exact_match_ignoring_trailing_slash() {
        let policy = OriginPolicy::new(vec!["https://plantmate.example/".to_string()]);
        assert!(policy.allows("https://plantmate.example", OWN));
        assert!(!policy.allows(OWN, OWN));
        assert!(!policy.allows("https://plantmate.example.evil.com", OWN));
    }

    #[test]
    fn opaque_origins_are_rejected() {
        let policy = OriginPolicy::new(vec!["null".to_string()]);
        assert!(!policy.allows("null", OWN));
        assert!(!policy.allows("", ""));
    }
}
