pub mod photo_viewmodel;
pub mod player_viewmodel;

pub use photo_viewmodel::PhotoViewModel;
pub use player_viewmodel::UnityPlayerSession;
