// ============================================================================
// CONFIG - Configuración de la app en tiempo de compilación
// ============================================================================
// Valores leídos con option_env! (build.rs los carga desde .env)
// ============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Prefijo de la API ("" = mismo origen que la página)
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub unity: UnityConfig,
    pub relay: RelayConfig,
    pub interceptor: InterceptorConfig,
    pub photos: PhotoConfig,
    /// Orígenes autorizados a enviar LOGIN_INFO. Vacío = solo el propio origen
    pub allowed_parent_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            environment: "development".to_string(),
            enable_logging: true,
            unity: UnityConfig::default(),
            relay: RelayConfig::default(),
            interceptor: InterceptorConfig::default(),
            photos: PhotoConfig::default(),
            allowed_parent_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnityConfig {
    pub build_prefix: String,
    pub canvas_id: String,
    pub company_name: String,
    pub product_name: String,
    pub product_version: String,
}

impl Default for UnityConfig {
    fn default() -> Self {
        Self {
            build_prefix: "/garden/unity/Build".to_string(),
            canvas_id: "unity-canvas".to_string(),
            company_name: "PlantMate".to_string(),
            product_name: "PlantMate Garden".to_string(),
            product_version: "1.0".to_string(),
        }
    }
}

impl UnityConfig {
    fn asset(&self, file: &str) -> String {
        format!("{}/{}", self.build_prefix.trim_end_matches('/'), file)
    }

    pub fn loader_url(&self) -> String {
        self.asset("unity.loader.js")
    }

    pub fn data_url(&self) -> String {
        self.asset("unity.data")
    }

    pub fn framework_url(&self) -> String {
        self.asset("unity.framework.js")
    }

    pub fn code_url(&self) -> String {
        self.asset("unity.wasm")
    }

    /// StreamingAssets vive junto a Build/ en las plantillas de Unity
    pub fn streaming_assets_url(&self) -> String {
        let prefix = self.build_prefix.trim_end_matches('/');
        match prefix.rsplit_once('/') {
            Some((parent, _)) => format!("{}/StreamingAssets", parent),
            None => "StreamingAssets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub receiver_object: String,
    pub receiver_method: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            receiver_object: "GameManager".to_string(),
            receiver_method: "ReceiveUserInfo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorConfig {
    pub popup_cooldown_ms: u32,
    pub login_redirect_delay_ms: u32,
    pub login_path: String,
    pub api_path_marker: String,
    pub excluded_paths: Vec<String>,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            popup_cooldown_ms: 3000,
            login_redirect_delay_ms: 1500,
            login_path: "/login".to_string(),
            api_path_marker: "/api/".to_string(),
            excluded_paths: vec!["/api/image-proxy".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoConfig {
    pub endpoint: String,
    pub image_proxy_path: String,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/s3photos".to_string(),
            image_proxy_path: "/api/image-proxy".to_string(),
        }
    }
}

/// Parsear lista separada por comas, descartando entradas vacías
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            environment: option_env!("ENVIRONMENT")
                .map(str::to_string)
                .unwrap_or(defaults.environment),
            enable_logging: parse_or(option_env!("ENABLE_LOGGING"), defaults.enable_logging),
            unity: UnityConfig {
                build_prefix: option_env!("UNITY_BUILD_PREFIX")
                    .map(str::to_string)
                    .unwrap_or(defaults.unity.build_prefix),
                canvas_id: option_env!("UNITY_CANVAS_ID")
                    .map(str::to_string)
                    .unwrap_or(defaults.unity.canvas_id),
                company_name: option_env!("UNITY_COMPANY_NAME")
                    .map(str::to_string)
                    .unwrap_or(defaults.unity.company_name),
                product_name: option_env!("UNITY_PRODUCT_NAME")
                    .map(str::to_string)
                    .unwrap_or(defaults.unity.product_name),
                product_version: option_env!("UNITY_PRODUCT_VERSION")
                    .map(str::to_string)
                    .unwrap_or(defaults.unity.product_version),
            },
            relay: RelayConfig {
                receiver_object: option_env!("UNITY_RECEIVER_OBJECT")
                    .map(str::to_string)
                    .unwrap_or(defaults.relay.receiver_object),
                receiver_method: option_env!("UNITY_RECEIVER_METHOD")
                    .map(str::to_string)
                    .unwrap_or(defaults.relay.receiver_method),
            },
            interceptor: InterceptorConfig {
                popup_cooldown_ms: parse_or(
                    option_env!("POPUP_COOLDOWN_MS"),
                    defaults.interceptor.popup_cooldown_ms,
                ),
                login_redirect_delay_ms: parse_or(
                    option_env!("LOGIN_REDIRECT_DELAY_MS"),
                    defaults.interceptor.login_redirect_delay_ms,
                ),
                login_path: option_env!("LOGIN_PATH")
                    .map(str::to_string)
                    .unwrap_or(defaults.interceptor.login_path),
                api_path_marker: option_env!("API_PATH_MARKER")
                    .map(str::to_string)
                    .unwrap_or(defaults.interceptor.api_path_marker),
                excluded_paths: option_env!("INTERCEPT_EXCLUDED_PATHS")
                    .map(parse_list)
                    .unwrap_or(defaults.interceptor.excluded_paths),
            },
            photos: PhotoConfig {
                endpoint: option_env!("PHOTOS_ENDPOINT")
                    .map(str::to_string)
                    .unwrap_or(defaults.photos.endpoint),
                image_proxy_path: option_env!("IMAGE_PROXY_PATH")
                    .map(str::to_string)
                    .unwrap_or(defaults.photos.image_proxy_path),
            },
            allowed_parent_origins: option_env!("ALLOWED_PARENT_ORIGINS")
                .map(parse_list)
                .unwrap_or(defaults.allowed_parent_origins),
        }
    }

    /// URL completa del listado de fotos
    pub fn photos_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.photos.endpoint)
    }

    /// URL base del proxy de imágenes
    pub fn image_proxy_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.photos.image_proxy_path)
    }

    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Debug
        } else {
            log::Level::Warn
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_asset_urls_share_the_build_prefix() {
        let unity = UnityConfig::default();
        assert_eq!(unity.loader_url(), "/garden/unity/Build/unity.loader.js");
        assert_eq!(unity.data_url(), "/garden/unity/Build/unity.data");
        assert_eq!(unity.framework_url(), "/garden/unity/Build/unity.framework.js");
        assert_eq!(unity.code_url(), "/garden/unity/Build/unity.wasm");
        assert_eq!(unity.streaming_assets_url(), "/garden/unity/StreamingAssets");
    }

    #[test]
    fn trailing_slash_in_prefix_is_ignored() {
        let unity = UnityConfig {
            build_prefix: "/unity/Build/".to_string(),
            ..UnityConfig::default()
        };
        assert_eq!(unity.code_url(), "/unity/Build/unity.wasm");
    }

    #[test]
    fn parse_list_drops_blank_entries() {
        assert_eq!(
            parse_list(" https://a.example, ,https://b.example,"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        assert_eq!(parse_or(Some("abc"), 3000u32), 3000);
        assert_eq!(parse_or(Some(" 500 "), 3000u32), 500);
        assert!(parse_or(None, true));
    }

    #[test]
    fn photos_url_joins_base_and_endpoint() {
        let config = AppConfig {
            api_base_url: "https://api.plantmate.example".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.photos_url(), "https://api.plantmate.example/api/s3photos");
        assert_eq!(config.image_proxy_url(), "https://api.plantmate.example/api/image-proxy");
    }
}
