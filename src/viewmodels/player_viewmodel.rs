// ============================================================================
// PLAYER VIEWMODEL - Ciclo de vida del reproductor de Unity
// ============================================================================
// mount(): interceptor -> relay -> listener del padre -> loader
// Drop: desmonta en orden inverso; nada queda colgado en window
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable, FutureExt};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::dom::WindowListener;
use crate::services::{
    listen_for_login, load_unity, BrowserNotifier, LoadedUnity, LoginRelay, NetworkErrorPolicy,
    NetworkInterceptor, OriginPolicy, RelayTarget,
};
use crate::state::app_state::{AppState, IncrementalUpdate, UpdateType};
use crate::state::PlayerState;
use crate::utils::unity_ffi::UnityInstance;
use crate::viewmodels::PhotoViewModel;

thread_local! {
    // Dos reproductores envolverían fetch dos veces
    static PLAYER_MOUNTED: Cell<bool> = const { Cell::new(false) };
}

/// Marca de montaje; se libera al soltarla (también si mount() falla a medias)
struct MountFlag;

impl MountFlag {
    fn acquire() -> Option<Self> {
        if PLAYER_MOUNTED.with(|mounted| mounted.replace(true)) {
            None
        } else {
            Some(MountFlag)
        }
    }
}

impl Drop for MountFlag {
    fn drop(&mut self) {
        PLAYER_MOUNTED.with(|mounted| mounted.set(false));
    }
}

/// Progreso del loader hacia PlayerState. Un loader de una sesión ya desmontada
/// sigue emitiendo progreso: se ignora. Devuelve true si hay que repintar.
fn progress_sink(loader_abort: AbortHandle, player: PlayerState) -> impl Fn(f64) -> bool {
    move |progress| !loader_abort.is_aborted() && player.set_progress(progress)
}

pub struct UnityPlayerSession {
    loader_abort: AbortHandle,
    unity: Rc<RefCell<Option<LoadedUnity>>>,
    parent_listener: Option<WindowListener>,
    relay: Option<LoginRelay<UnityInstance>>,
    interceptor: Option<NetworkInterceptor>,
    _mounted: MountFlag,
}

impl UnityPlayerSession {
    /// Requiere que el canvas ya esté en el DOM (render antes de mount)
    pub fn mount(state: &AppState) -> Result<Self, JsValue> {
        let mounted = MountFlag::acquire()
            .ok_or_else(|| JsValue::from_str("UnityPlayer ya está montado"))?;

        let interceptor = match NetworkInterceptor::install(
            NetworkErrorPolicy::from_config(&CONFIG.interceptor),
            Rc::new(BrowserNotifier::from_config(&CONFIG.interceptor)),
        ) {
            Ok(interceptor) => Some(interceptor),
            Err(e) => {
                log::warn!("⚠️ [PLAYER] Interceptor no instalado: {:?}", e);
                None
            }
        };

        let (relay, relay_task) = LoginRelay::new(RelayTarget::from_config(&CONFIG.relay));
        spawn_local(relay_task);
        relay.sender().replay_known_login(&state.auth);

        let parent_listener = {
            let sender = relay.sender();
            let state = state.clone();
            let photos = PhotoViewModel::new();
            listen_for_login(
                OriginPolicy::new(CONFIG.allowed_parent_origins.clone()),
                move |payload| {
                    state.auth.set_login(Some(payload.clone()));
                    photos.request_photos(&state, payload.token.clone());
                    sender.submit_login(payload);
                },
            )?
        };

        let unity = Rc::new(RefCell::new(None));
        let (loader_abort, registration) = AbortHandle::new_pair();
        let load = {
            let sender = relay.sender();
            let state = state.clone();
            let unity = unity.clone();
            let sink = progress_sink(loader_abort.clone(), state.player.clone());
            async move {
                let progress_state = state.clone();
                let result = load_unity(&CONFIG.unity, move |progress| {
                    if sink(progress) {
                        progress_state.notify(UpdateType::Incremental(IncrementalUpdate::PlayerOverlay));
                    }
                })
                .await;

                match result {
                    Ok(loaded) => {
                        sender.runtime_ready(loaded.instance().clone());
                        *unity.borrow_mut() = Some(loaded);
                        state.player.set_ready();
                    }
                    Err(e) => {
                        log::error!("❌ [PLAYER] Unity no se pudo iniciar: {}", e);
                        state.player.set_failed(e.to_string());
                    }
                }
                state.notify(UpdateType::Incremental(IncrementalUpdate::PlayerOverlay));
            }
        };
        spawn_local(Abortable::new(load, registration).map(|_| ()));

        log::info!("🎮 [PLAYER] Reproductor montado");
        Ok(Self {
            loader_abort,
            unity,
            parent_listener: Some(parent_listener),
            relay: Some(relay),
            interceptor,
            _mounted: mounted,
        })
    }
}

impl Drop for UnityPlayerSession {
    fn drop(&mut self) {
        self.loader_abort.abort();
        drop(self.unity.borrow_mut().take());
        drop(self.parent_listener.take());
        drop(self.relay.take());
        drop(self.interceptor.take());
        log::info!("🧹 [PLAYER] Reproductor desmontado");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlayerStatus;

    #[test]
    fn progress_from_an_aborted_load_is_ignored() {
        let (abort, _registration) = AbortHandle::new_pair();
        let player = PlayerState::new();
        let sink = progress_sink(abort.clone(), player.clone());

        assert!(sink(0.4));
        abort.abort();
        assert!(!sink(0.9));
        assert_eq!(player.status(), PlayerStatus::Loading { progress: 0.4 });
    }
}
