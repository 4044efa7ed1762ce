// ============================================================================
// PATCH GUARD - Sustitución reversible de un global del navegador
// ============================================================================
// install() guarda la referencia original y escribe el reemplazo;
// restore() (o Drop) vuelve a escribir el original exactamente una vez.
// ============================================================================

use wasm_bindgen::JsValue;

/// Un "hueco" global que se puede leer y escribir (p.ej. window.fetch)
pub trait GlobalSlot {
    type Value: Clone;
    type Error: std::fmt::Debug;

    fn describe(&self) -> String;
    fn read(&self) -> Result<Self::Value, Self::Error>;
    fn write(&self, value: &Self::Value) -> Result<(), Self::Error>;
}

pub struct PatchGuard<S: GlobalSlot> {
    slot: S,
    original: Option<S::Value>,
}

impl<S: GlobalSlot> PatchGuard<S> {
    pub fn install(slot: S, replacement: S::Value) -> Result<Self, S::Error> {
        let original = slot.read()?;
        slot.write(&replacement)?;
        log::debug!("🔧 [PATCH] {} sustituido", slot.describe());
        Ok(Self {
            slot,
            original: Some(original),
        })
    }

    /// Referencia original guardada (None si ya se restauró)
    pub fn original(&self) -> Option<&S::Value> {
        self.original.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.original.is_some()
    }

    /// Idempotente: la segunda llamada no escribe nada
    pub fn restore(&mut self) -> Result<(), S::Error> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        if let Err(e) = self.slot.write(&original) {
            // Se conserva para que Drop pueda reintentar
            self.original = Some(original);
            return Err(e);
        }
        log::debug!("🔧 [PATCH] {} restaurado", self.slot.describe());
        Ok(())
    }
}

impl<S: GlobalSlot> Drop for PatchGuard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("❌ [PATCH] No se pudo restaurar {}: {:?}", self.slot.describe(), e);
        }
    }
}

/// Propiedad de un objeto JS (window.fetch, XMLHttpRequest.prototype.send, ...)
pub struct PropertySlot {
    target: js_sys::Object,
    key: &'static str,
    label: String,
}

impl PropertySlot {
    pub fn new(target: js_sys::Object, key: &'static str, label: impl Into<String>) -> Self {
        Self {
            target,
            key,
            label: label.into(),
        }
    }
}

impl GlobalSlot for PropertySlot {
    type Value = JsValue;
    type Error = JsValue;

    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read(&self) -> Result<JsValue, JsValue> {
        js_sys::Reflect::get(&self.target, &JsValue::from_str(self.key))
    }

    fn write(&self, value: &JsValue) -> Result<(), JsValue> {
        let written = js_sys::Reflect::set(&self.target, &JsValue::from_str(self.key), value)?;
        if written {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!("{} es de solo lectura", self.label)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone)]
    struct FakeSlot {
        value: Rc<RefCell<String>>,
        writes: Rc<Cell<usize>>,
    }

    impl FakeSlot {
        fn new(initial: &str) -> Self {
            Self {
                value: Rc::new(RefCell::new(initial.to_string())),
                writes: Rc::new(Cell::new(0)),
            }
        }
    }

    impl GlobalSlot for FakeSlot {
        type Value = String;
        type Error = String;

        fn describe(&self) -> String {
            "fake.fetch".to_string()
        }

        fn read(&self) -> Result<String, String> {
            Ok(self.value.borrow().clone())
        }

        fn write(&self, value: &String) -> Result<(), String> {
            self.writes.set(self.writes.get() + 1);
            *self.value.borrow_mut() = value.clone();
            Ok(())
        }
    }

    #[test]
    fn install_replaces_and_drop_restores_original() {
        let slot = FakeSlot::new("native-fetch");
        {
            let guard = PatchGuard::install(slot.clone(), "wrapped-fetch".to_string()).unwrap();
            assert_eq!(*slot.value.borrow(), "wrapped-fetch");
            assert_eq!(guard.original().map(String::as_str), Some("native-fetch"));
        }
        assert_eq!(*slot.value.borrow(), "native-fetch");
    }

    #[test]
    fn restore_is_idempotent() {
        let slot = FakeSlot::new("native-fetch");
        let mut guard = PatchGuard::install(slot.clone(), "wrapped-fetch".to_string()).unwrap();
        guard.restore().unwrap();
        assert!(!guard.is_active());

        // Alguien vuelve a parchear después: ni restore() ni Drop lo pisan
        *slot.value.borrow_mut() = "third-party".to_string();
        guard.restore().unwrap();
        drop(guard);

        assert_eq!(*slot.value.borrow(), "third-party");
        assert_eq!(slot.writes.get(), 2);
    }
}
