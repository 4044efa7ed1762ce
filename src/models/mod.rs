pub mod login;
pub mod photo;

pub use login::{LoginPayload, ParentMessage, parse_login_message};
pub use photo::{PhotoRecord, PhotoSource, PlantId, decode_photo_response, parse_photo_list};
