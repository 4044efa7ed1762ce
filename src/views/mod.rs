pub mod app;
pub mod unity_player;
pub mod photo_gallery;

pub use app::render_app;
pub use unity_player::{render_unity_player, render_player_overlay, PLAYER_OVERLAY_ID};
pub use photo_gallery::{render_photo_gallery, PHOTO_GALLERY_ID};
