pub mod login_relay;
pub mod network_interceptor;
pub mod parent_channel;
pub mod patch_guard;
pub mod photo_service;
pub mod popup_policy;
pub mod unity_loader;

pub use login_relay::{LoginRelay, RelaySender, RelayState, RelayTarget, UnityReceiver};
pub use network_interceptor::{BrowserNotifier, NetworkInterceptor, PopupNotifier};
pub use parent_channel::{listen_for_login, OriginPolicy};
pub use photo_service::PhotoService;
pub use popup_policy::{NetworkErrorPolicy, PopupKind};
pub use unity_loader::{load_unity, LoadedUnity};
