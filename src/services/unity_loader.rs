// ============================================================================
// UNITY LOADER - Inyecta unity.loader.js e instancia el runtime en el canvas
// ============================================================================
// Cualquier fallo es terminal para la vista: se reporta y no se reintenta.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlScriptElement};

use crate::config::UnityConfig;
use crate::dom::{create_element, document, get_element_by_id};
use crate::error::LoaderError;
use crate::utils::unity_ffi::{create_unity_instance, unity_factory_available, UnityInstance};

fn dom_error(e: JsValue) -> LoaderError {
    LoaderError::Dom(format!("{:?}", e))
}

/// <script> inyectado; se quita del documento al hacer drop
pub struct ScriptTag {
    element: HtmlScriptElement,
    _on_load: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
}

impl Drop for ScriptTag {
    fn drop(&mut self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
        self.element.remove();
        log::debug!("🧹 [LOADER] Script {} retirado", self.element.src());
    }
}

/// Inyectar el script del loader y esperar a su evento load/error
pub async fn inject_script(url: &str) -> Result<ScriptTag, LoaderError> {
    let body = document()
        .and_then(|doc| doc.body())
        .ok_or_else(|| LoaderError::Dom("document.body no disponible".to_string()))?;

    let element: HtmlScriptElement = create_element("script")
        .map_err(dom_error)?
        .dyn_into()
        .map_err(|_| LoaderError::Dom("<script> no es HtmlScriptElement".to_string()))?;
    element.set_src(url);
    element.set_async(true);

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        }) as Box<dyn FnMut()>)
    };
    let on_error = Closure::wrap(Box::new(move || {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(false);
        }
    }) as Box<dyn FnMut()>);

    element.set_onload(Some(on_load.as_ref().unchecked_ref()));
    element.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let tag = ScriptTag {
        element,
        _on_load: on_load,
        _on_error: on_error,
    };
    body.append_child(&tag.element).map_err(dom_error)?;
    log::info!("📜 [LOADER] Cargando {}", url);

    match rx.await {
        Ok(true) => Ok(tag),
        _ => Err(LoaderError::ScriptLoad {
            url: url.to_string(),
        }),
    }
}

/// Pares clave/valor del objeto de configuración de createUnityInstance
pub fn instance_config_entries(config: &UnityConfig) -> Vec<(&'static str, String)> {
    vec![
        ("dataUrl", config.data_url()),
        ("frameworkUrl", config.framework_url()),
        ("codeUrl", config.code_url()),
        ("streamingAssetsUrl", config.streaming_assets_url()),
        ("companyName", config.company_name.clone()),
        ("productName", config.product_name.clone()),
        ("productVersion", config.product_version.clone()),
    ]
}

fn build_instance_config(config: &UnityConfig) -> Result<js_sys::Object, LoaderError> {
    let object = js_sys::Object::new();
    for (key, value) in instance_config_entries(config) {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), &JsValue::from_str(&value))
            .map_err(dom_error)?;
    }
    Ok(object)
}

/// Runtime cargado; al hacer drop se cierra la instancia y se retira el script
pub struct LoadedUnity {
    instance: UnityInstance,
    _script: ScriptTag,
}

impl LoadedUnity {
    pub fn instance(&self) -> &UnityInstance {
        &self.instance
    }
}

impl Drop for LoadedUnity {
    fn drop(&mut self) {
        match self.instance.quit() {
            Ok(_) => log::info!("🔌 [LOADER] Instancia de Unity cerrada"),
            Err(e) => log::warn!("⚠️ [LOADER] Quit() falló: {:?}", e),
        }
    }
}

/// Flujo completo: script -> canvas -> createUnityInstance
pub async fn load_unity<F>(config: &UnityConfig, on_progress: F) -> Result<LoadedUnity, LoaderError>
where
    F: Fn(f64) + 'static,
{
    let script = inject_script(&config.loader_url()).await?;

    let canvas: HtmlCanvasElement = get_element_by_id(&config.canvas_id)
        .and_then(|element| element.dyn_into().ok())
        .ok_or_else(|| LoaderError::CanvasMissing(config.canvas_id.clone()))?;

    if !unity_factory_available() {
        return Err(LoaderError::FactoryMissing);
    }

    let instance_config = build_instance_config(config)?;
    // El loader puede seguir llamando a onProgress aunque este future se aborte:
    // la closure queda en manos del GC de JS
    let progress = Closure::wrap(Box::new(move |value: f64| on_progress(value)) as Box<dyn FnMut(f64)>)
        .into_js_value();

    let promise = create_unity_instance(&canvas, &instance_config, progress.unchecked_ref())
        .map_err(|e| LoaderError::Instantiation(format!("{:?}", e)))?;
    let instance = JsFuture::from(promise)
        .await
        .map_err(|e| LoaderError::Instantiation(format!("{:?}", e)))?;

    log::info!("✅ [LOADER] Instancia de Unity creada");
    Ok(LoadedUnity {
        instance: instance.unchecked_into(),
        _script: script,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_config_points_at_the_three_build_files() {
        let entries = instance_config_entries(&UnityConfig::default());
        let get = |key: &str| {
            entries
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("dataUrl"), Some("/garden/unity/Build/unity.data"));
        assert_eq!(get("frameworkUrl"), Some("/garden/unity/Build/unity.framework.js"));
        assert_eq!(get("codeUrl"), Some("/garden/unity/Build/unity.wasm"));
        assert_eq!(get("companyName"), Some("PlantMate"));
    }
}
