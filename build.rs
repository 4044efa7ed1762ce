use std::env;
use std::fs;
use std::path::Path;

// Variables que el crate lee con option_env! (ver src/config.rs)
const KNOWN_KEYS: &[&str] = &[
    "API_BASE_URL",
    "ENVIRONMENT",
    "ENABLE_LOGGING",
    "UNITY_BUILD_PREFIX",
    "UNITY_CANVAS_ID",
    "UNITY_COMPANY_NAME",
    "UNITY_PRODUCT_NAME",
    "UNITY_PRODUCT_VERSION",
    "UNITY_RECEIVER_OBJECT",
    "UNITY_RECEIVER_METHOD",
    "POPUP_COOLDOWN_MS",
    "LOGIN_REDIRECT_DELAY_MS",
    "LOGIN_PATH",
    "API_PATH_MARKER",
    "INTERCEPT_EXCLUDED_PATHS",
    "PHOTOS_ENDPOINT",
    "IMAGE_PROXY_PATH",
    "ALLOWED_PARENT_ORIGINS",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env");

    for key in KNOWN_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    let env_file = Path::new(".env");
    let Ok(contents) = fs::read_to_string(env_file) else {
        println!("cargo:warning=Sin archivo .env: se usan los valores por defecto de src/config.rs");
        return;
    };

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');

        if !KNOWN_KEYS.contains(&key) {
            println!("cargo:warning=Variable desconocida en .env ignorada: {}", key);
            continue;
        }

        // El entorno del proceso tiene prioridad sobre .env
        if env::var(key).is_err() {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
}
