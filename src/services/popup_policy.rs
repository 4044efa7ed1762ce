// ============================================================================
// POPUP POLICY - Decide qué respuestas disparan avisos al usuario
// ============================================================================
// Lógica pura (sin web_sys): alcance por URL, clasificación 401/502 y cooldown
// ============================================================================

use std::cell::Cell;

use crate::config::InterceptorConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupKind {
    /// 401: sesión expirada, se redirige al login
    SessionExpired,
    /// 502: error transitorio del servidor
    BadGateway,
}

/// Qué URLs observa el interceptor
#[derive(Clone, Debug)]
pub struct InterceptScope {
    api_marker: String,
    excluded: Vec<String>,
}

impl InterceptScope {
    pub fn new(api_marker: impl Into<String>, excluded: Vec<String>) -> Self {
        Self {
            api_marker: api_marker.into(),
            excluded,
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        url.contains(&self.api_marker) && !self.excluded.iter().any(|path| url.contains(path))
    }
}

pub fn classify_status(status: u16) -> Option<PopupKind> {
    match status {
        401 => Some(PopupKind::SessionExpired),
        502 => Some(PopupKind::BadGateway),
        _ => None,
    }
}

/// Errores de red sin status: se clasifican por el texto del error
pub fn classify_error_text(text: &str) -> Option<PopupKind> {
    let lower = text.to_lowercase();
    if lower.contains("401") || lower.contains("unauthorized") {
        Some(PopupKind::SessionExpired)
    } else if lower.contains("502") || lower.contains("bad gateway") {
        Some(PopupKind::BadGateway)
    } else {
        None
    }
}

/// Un único timestamp compartido por ambos tipos de aviso
#[derive(Debug)]
pub struct PopupCooldown {
    window_ms: f64,
    last_fired_ms: Cell<Option<f64>>,
}

impl PopupCooldown {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms: f64::from(window_ms),
            last_fired_ms: Cell::new(None),
        }
    }

    /// true si pasó más que la ventana desde el último aviso; registra el disparo
    pub fn try_fire(&self, now_ms: f64) -> bool {
        let elapsed_ok = match self.last_fired_ms.get() {
            Some(last) => now_ms - last > self.window_ms,
            None => true,
        };
        if elapsed_ok {
            self.last_fired_ms.set(Some(now_ms));
        }
        elapsed_ok
    }
}

pub struct NetworkErrorPolicy {
    scope: InterceptScope,
    cooldown: PopupCooldown,
}

impl NetworkErrorPolicy {
    pub fn new(scope: InterceptScope, cooldown: PopupCooldown) -> Self {
        Self { scope, cooldown }
    }

    pub fn from_config(config: &InterceptorConfig) -> Self {
        Self::new(
            InterceptScope::new(config.api_path_marker.clone(), config.excluded_paths.clone()),
            PopupCooldown::new(config.popup_cooldown_ms),
        )
    }

    pub fn in_scope(&self, url: &str) -> bool {
        self.scope.matches(url)
    }

    /// Respuesta HTTP recibida
    pub fn on_response(&self, url: &str, status: u16, now_ms: f64) -> Option<PopupKind> {
        if !self.in_scope(url) {
            return None;
        }
        self.gate(classify_status(status)?, now_ms)
    }

    /// Petición rechazada (sin Response)
    pub fn on_failure(&self, url: &str, error_text: &str, now_ms: f64) -> Option<PopupKind> {
        if !self.in_scope(url) {
            return None;
        }
        self.gate(classify_error_text(error_text)?, now_ms)
    }

    fn gate(&self, kind: PopupKind, now_ms: f64) -> Option<PopupKind> {
        if self.cooldown.try_fire(now_ms) {
            Some(kind)
        } else {
            log::debug!("⏳ [INTERCEPTOR] Aviso {:?} suprimido por cooldown", kind);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> NetworkErrorPolicy {
        NetworkErrorPolicy::from_config(&InterceptorConfig::default())
    }

    #[test]
    fn repeated_401_inside_window_notifies_once() {
        let policy = policy();
        assert_eq!(
            policy.on_response("/api/s3photos", 401, 10_000.0),
            Some(PopupKind::SessionExpired)
        );
        assert_eq!(policy.on_response("/api/s3photos", 401, 11_500.0), None);
    }

    #[test]
    fn cooldown_is_shared_between_kinds() {
        let policy = policy();
        assert_eq!(policy.on_response("/api/a", 502, 0.0), Some(PopupKind::BadGateway));
        assert_eq!(policy.on_response("/api/b", 401, 2_000.0), None);
        assert_eq!(
            policy.on_response("/api/b", 401, 3_001.0),
            Some(PopupKind::SessionExpired)
        );
    }

    #[test]
    fn exactly_window_elapsed_is_not_enough() {
        let cooldown = PopupCooldown::new(3000);
        assert!(cooldown.try_fire(1_000.0));
        assert!(!cooldown.try_fire(4_000.0));
        assert!(cooldown.try_fire(4_000.5));
    }

    #[test]
    fn suppressed_attempt_does_not_extend_the_window() {
        let cooldown = PopupCooldown::new(3000);
        assert!(cooldown.try_fire(0.0));
        assert!(!cooldown.try_fire(2_500.0));
        assert!(cooldown.try_fire(3_100.0));
    }

    #[test]
    fn other_statuses_are_ignored() {
        let policy = policy();
        for status in [200, 204, 403, 404, 500, 503] {
            assert_eq!(policy.on_response("/api/s3photos", status, 0.0), None);
        }
        // Nada se consumió del cooldown
        assert_eq!(policy.on_response("/api/s3photos", 401, 1.0), Some(PopupKind::SessionExpired));
    }

    #[test]
    fn scope_requires_api_path_and_skips_image_proxy() {
        let policy = policy();
        assert_eq!(policy.on_response("/garden/unity/Build/unity.data", 401, 0.0), None);
        assert_eq!(policy.on_response("/api/image-proxy?key=a.png", 502, 0.0), None);
        assert_eq!(
            policy.on_response("https://host/api/s3photos", 502, 0.0),
            Some(PopupKind::BadGateway)
        );
    }

    #[test]
    fn failure_text_is_matched_case_insensitively() {
        assert_eq!(classify_error_text("HTTP 401"), Some(PopupKind::SessionExpired));
        assert_eq!(classify_error_text("Unauthorized access"), Some(PopupKind::SessionExpired));
        assert_eq!(classify_error_text("BAD GATEWAY"), Some(PopupKind::BadGateway));
        assert_eq!(classify_error_text("TypeError: Failed to fetch"), None);

        let policy = policy();
        assert_eq!(
            policy.on_failure("/api/s3photos", "502 Bad Gateway", 0.0),
            Some(PopupKind::BadGateway)
        );
    }
}
