// ============================================================================
// LOGIN RELAY - Entrega el login del padre a Unity exactamente una vez
// ============================================================================
// Máquina de dos estados {Esperando} -> {Entregado}, re-entrada con cada login.
// Corre como una tarea async que consume eventos (login / runtime listo);
// cada evento dispara un intento de entrega. Drop del handle aborta la tarea.
// ============================================================================

use futures::channel::mpsc;
use futures::future::{AbortHandle, Abortable, FutureExt, LocalBoxFuture};
use futures::StreamExt;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::models::LoginPayload;
use crate::state::AuthState;

/// Destino dentro del runtime: SendMessage(object, method, json)
pub trait UnityReceiver {
    fn send_message(&self, object: &str, method: &str, payload: &str) -> Result<(), RelayError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayTarget {
    pub object: String,
    pub method: String,
}

impl RelayTarget {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            object: config.receiver_object.clone(),
            method: config.receiver_method.clone(),
        }
    }
}

pub enum RelayEvent<R> {
    Login(LoginPayload),
    RuntimeReady(R),
}

/// Estado del relay: runtime (cuando exista) + último login sin entregar
pub struct RelayState<R> {
    runtime: Option<R>,
    pending: Option<LoginPayload>,
    delivered: usize,
}

impl<R: UnityReceiver> RelayState<R> {
    pub fn new() -> Self {
        Self {
            runtime: None,
            pending: None,
            delivered: 0,
        }
    }

    /// Último en llegar gana; no hay cola
    pub fn buffer_login(&mut self, payload: LoginPayload) {
        if let Some(previous) = self.pending.replace(payload) {
            log::info!("🔁 [RELAY] Login de {} descartado por uno más reciente", previous.user_id);
        }
    }

    pub fn attach_runtime(&mut self, runtime: R) {
        if self.runtime.is_some() {
            log::warn!("⚠️ [RELAY] Runtime ya adjuntado, se reemplaza");
        }
        self.runtime = Some(runtime);
    }

    pub fn apply(&mut self, event: RelayEvent<R>) {
        match event {
            RelayEvent::Login(payload) => self.buffer_login(payload),
            RelayEvent::RuntimeReady(runtime) => self.attach_runtime(runtime),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered
    }

    /// Entrega si hay runtime y login; no-op en otro caso.
    /// Devuelve true si hubo entrega. Si SendMessage falla, el login sigue en buffer.
    pub fn try_deliver(&mut self, target: &RelayTarget) -> Result<bool, RelayError> {
        let (Some(runtime), Some(payload)) = (self.runtime.as_ref(), self.pending.as_ref()) else {
            log::debug!(
                "⏳ [RELAY] Esperando (runtime: {}, login: {})",
                self.runtime.is_some(),
                self.pending.is_some()
            );
            return Ok(false);
        };

        let json = payload
            .to_unity_json()
            .map_err(|e| RelayError::Serialize(e.to_string()))?;
        runtime.send_message(&target.object, &target.method, &json)?;

        log::info!("🚀 [RELAY] Login de {} entregado a {}.{}", payload.user_id, target.object, target.method);
        self.pending = None;
        self.delivered += 1;
        Ok(true)
    }
}

impl<R: UnityReceiver> Default for RelayState<R> {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_relay<R: UnityReceiver>(mut events: mpsc::UnboundedReceiver<RelayEvent<R>>, target: RelayTarget) {
    let mut state = RelayState::new();
    while let Some(event) = events.next().await {
        state.apply(event);
        if let Err(e) = state.try_deliver(&target) {
            log::error!("❌ [RELAY] {}", e);
        }
    }
    log::info!("🔌 [RELAY] Canal cerrado ({} entregas)", state.delivered_count());
}

/// Lado emisor, clonable para los listeners
pub struct RelaySender<R> {
    events: mpsc::UnboundedSender<RelayEvent<R>>,
}

impl<R> Clone for RelaySender<R> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<R> RelaySender<R> {
    pub fn submit_login(&self, payload: LoginPayload) {
        if self.events.unbounded_send(RelayEvent::Login(payload)).is_err() {
            log::warn!("⚠️ [RELAY] Login recibido con el relay ya detenido");
        }
    }

    /// Re-enviar el login ya recibido: tras un remontaje el padre no lo repite
    pub fn replay_known_login(&self, auth: &AuthState) -> bool {
        let Some(payload) = auth.current_login() else {
            return false;
        };
        log::info!("🔁 [RELAY] Reenviando login de {} al nuevo runtime", payload.user_id);
        self.submit_login(payload);
        true
    }

    pub fn runtime_ready(&self, runtime: R) {
        if self.events.unbounded_send(RelayEvent::RuntimeReady(runtime)).is_err() {
            log::warn!("⚠️ [RELAY] Runtime listo con el relay ya detenido");
        }
    }
}

/// Handle del relay ligado a la vida de la vista
pub struct LoginRelay<R> {
    sender: RelaySender<R>,
    abort: AbortHandle,
}

impl<R: UnityReceiver + 'static> LoginRelay<R> {
    /// Crea el relay y la tarea que hay que lanzar (spawn_local en el navegador)
    pub fn new(target: RelayTarget) -> (Self, LocalBoxFuture<'static, ()>) {
        let (tx, rx) = mpsc::unbounded();
        let (abort, registration) = AbortHandle::new_pair();
        let task = Abortable::new(run_relay(rx, target), registration)
            .map(|result| {
                if result.is_err() {
                    log::info!("🛑 [RELAY] Tarea cancelada");
                }
            })
            .boxed_local();

        (
            Self {
                sender: RelaySender { events: tx },
                abort,
            },
            task,
        )
    }
}

impl<R> LoginRelay<R> {
    pub fn sender(&self) -> RelaySender<R> {
        self.sender.clone()
    }

    pub fn cancel(&self) {
        self.abort.abort();
    }
}

impl<R> Drop for LoginRelay<R> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<(String, String, String)>>>;

    #[derive(Clone)]
    struct RecordingRuntime {
        calls: Calls,
    }

    impl UnityReceiver for RecordingRuntime {
        fn send_message(&self, object: &str, method: &str, payload: &str) -> Result<(), RelayError> {
            self.calls
                .borrow_mut()
                .push((object.to_string(), method.to_string(), payload.to_string()));
            Ok(())
        }
    }

    struct BrokenRuntime;

    impl UnityReceiver for BrokenRuntime {
        fn send_message(&self, _: &str, _: &str, _: &str) -> Result<(), RelayError> {
            Err(RelayError::SendMessage("GameManager not found".to_string()))
        }
    }

    fn target() -> RelayTarget {
        RelayTarget::from_config(&RelayConfig::default())
    }

    fn recording() -> (RecordingRuntime, Calls) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        (RecordingRuntime { calls: calls.clone() }, calls)
    }

    fn start(pool: &LocalPool) -> LoginRelay<RecordingRuntime> {
        let (relay, task) = LoginRelay::new(target());
        pool.spawner().spawn_local(task).unwrap();
        relay
    }

    #[test]
    fn buffered_login_is_delivered_once_when_runtime_appears() {
        let mut pool = LocalPool::new();
        let relay = start(&pool);
        let (runtime, calls) = recording();

        relay.sender().submit_login(LoginPayload::new("u1", "t1"));
        pool.run_until_stalled();
        assert!(calls.borrow().is_empty());

        relay.sender().runtime_ready(runtime.clone());
        pool.run_until_stalled();
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(
            calls.borrow()[0],
            (
                "GameManager".to_string(),
                "ReceiveUserInfo".to_string(),
                r#"{"user_id":"u1","token":"t1"}"#.to_string()
            )
        );

        // Eventos posteriores sin login nuevo no re-entregan
        relay.sender().runtime_ready(runtime);
        pool.run_until_stalled();
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn login_after_runtime_is_delivered_without_second_message() {
        let mut pool = LocalPool::new();
        let relay = start(&pool);
        let (runtime, calls) = recording();

        relay.sender().runtime_ready(runtime);
        pool.run_until_stalled();
        relay.sender().submit_login(LoginPayload::new("u2", "t2"));
        pool.run_until_stalled();

        assert_eq!(calls.borrow().len(), 1);
        assert!(calls.borrow()[0].2.contains("\"u2\""));
    }

    #[test]
    fn latest_login_wins_before_delivery() {
        let mut pool = LocalPool::new();
        let relay = start(&pool);
        let (runtime, calls) = recording();

        relay.sender().submit_login(LoginPayload::new("first", "a"));
        relay.sender().submit_login(LoginPayload::new("second", "b"));
        pool.run_until_stalled();
        relay.sender().runtime_ready(runtime);
        pool.run_until_stalled();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, r#"{"user_id":"second","token":"b"}"#);
    }

    #[test]
    fn each_new_login_reenters_the_machine() {
        let mut pool = LocalPool::new();
        let relay = start(&pool);
        let (runtime, calls) = recording();

        relay.sender().runtime_ready(runtime);
        relay.sender().submit_login(LoginPayload::new("u", "old"));
        pool.run_until_stalled();
        relay.sender().submit_login(LoginPayload::new("u", "refreshed"));
        pool.run_until_stalled();

        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn dropping_the_relay_cancels_the_task() {
        let mut pool = LocalPool::new();
        let relay = start(&pool);
        let (runtime, calls) = recording();
        let sender = relay.sender();

        drop(relay);
        pool.run_until_stalled();

        sender.runtime_ready(runtime);
        sender.submit_login(LoginPayload::new("late", "x"));
        pool.run_until_stalled();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn fresh_relay_replays_the_login_already_in_auth_state() {
        let mut pool = LocalPool::new();
        let auth = AuthState::new();
        auth.set_login(Some(LoginPayload::new("kim", "tok")));

        // Sesión anterior desmontada; la nueva arranca con buffer vacío
        drop(start(&pool));
        let relay = start(&pool);
        let (runtime, calls) = recording();

        assert!(relay.sender().replay_known_login(&auth));
        relay.sender().runtime_ready(runtime);
        pool.run_until_stalled();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, r#"{"user_id":"kim","token":"tok"}"#);
    }

    #[test]
    fn nothing_to_replay_without_a_known_login() {
        let mut pool = LocalPool::new();
        let relay = start(&pool);
        let (runtime, calls) = recording();

        assert!(!relay.sender().replay_known_login(&AuthState::new()));
        relay.sender().runtime_ready(runtime);
        pool.run_until_stalled();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn failed_send_keeps_the_login_buffered() {
        let mut state: RelayState<BrokenRuntime> = RelayState::new();
        state.buffer_login(LoginPayload::new("u", "t"));
        state.attach_runtime(BrokenRuntime);

        assert!(state.try_deliver(&target()).is_err());
        assert!(state.has_pending());
        assert_eq!(state.delivered_count(), 0);
    }

    #[test]
    fn try_deliver_without_runtime_is_a_noop() {
        let mut state: RelayState<RecordingRuntime> = RelayState::new();
        assert_eq!(state.try_deliver(&target()), Ok(false));
        state.buffer_login(LoginPayload::new("u", "t"));
        assert_eq!(state.try_deliver(&target()), Ok(false));
        assert!(state.has_pending());
    }
}
