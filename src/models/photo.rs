use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PhotoError;

/// Identificador de planta: numérico (pixel_id en la BD) o texto
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(untagged)]
pub enum PlantId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlantId::Number(n) => write!(f, "{}", n),
            PlantId::Text(s) => f.write_str(s),
        }
    }
}

/// Origen de la imagen: URL firmada lista para usar o clave S3 a resolver vía proxy
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PhotoSource {
    Url(String),
    Key(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct PhotoRecord {
    pub plant_id: PlantId,
    pub user_id: Option<String>,
    pub source: PhotoSource,
}

impl PhotoRecord {
    /// URL para el <img>; las claves pasan por el proxy de imágenes
    pub fn display_url(&self, image_proxy_url: &str) -> String {
        match &self.source {
            PhotoSource::Url(url) => url.clone(),
            PhotoSource::Key(key) => {
                format!("{}?key={}", image_proxy_url, urlencoding::encode(key))
            }
        }
    }
}

// Formato de cable: varía según la revisión del backend
#[derive(Deserialize)]
struct PhotoItem {
    #[serde(default)]
    plant_id: Option<PlantId>,
    #[serde(default)]
    pixel_id: Option<PlantId>,
    #[serde(default)]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_key: Option<String>,
}

// Los elementos se decodifican uno a uno: un registro roto no tumba la lista
#[derive(Deserialize)]
#[serde(untagged)]
enum PhotoListBody {
    Bare(Vec<serde_json::Value>),
    Wrapped { photos: Vec<serde_json::Value> },
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PhotoItem {
    fn into_record(self) -> Option<PhotoRecord> {
        let Some(plant_id) = self.plant_id.or(self.pixel_id) else {
            log::warn!("⚠️ [PHOTOS] Foto sin plant_id/pixel_id, ignorada");
            return None;
        };

        let source = match (non_empty(self.image_url), non_empty(self.image_key)) {
            (Some(url), _) => PhotoSource::Url(url),
            (None, Some(key)) => PhotoSource::Key(key),
            (None, None) => {
                log::warn!("⚠️ [PHOTOS] Foto sin image_url/image_key (plant_id {}), ignorada", plant_id);
                return None;
            }
        };

        let user_id = self.user_id.and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

        Some(PhotoRecord {
            plant_id,
            user_id,
            source,
        })
    }
}

fn decode_item(value: serde_json::Value) -> Option<PhotoRecord> {
    match serde_json::from_value::<PhotoItem>(value) {
        Ok(item) => item.into_record(),
        Err(e) => {
            log::warn!("⚠️ [PHOTOS] Registro de foto inválido ignorado: {}", e);
            None
        }
    }
}

/// Parsear el cuerpo JSON del listado (array directo o `{ "photos": [...] }`)
pub fn parse_photo_list(body: &str) -> Result<Vec<PhotoRecord>, PhotoError> {
    let parsed: PhotoListBody =
        serde_json::from_str(body).map_err(|e| PhotoError::Parse(e.to_string()))?;

    let items = match parsed {
        PhotoListBody::Bare(items) => items,
        PhotoListBody::Wrapped { photos } => photos,
    };

    Ok(items.into_iter().filter_map(decode_item).collect())
}

/// Interpretar status + cuerpo de la respuesta de /s3photos
pub fn decode_photo_response(status: u16, body: &str) -> Result<Vec<PhotoRecord>, PhotoError> {
    if !(200..300).contains(&status) {
        return Err(PhotoError::Http { status });
    }
    parse_photo_list(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_list_with_image_url() {
        let photos =
            decode_photo_response(200, r#"{"photos":[{"plant_id":1,"image_url":"x"}]}"#).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].plant_id, PlantId::Number(1));
        assert_eq!(photos[0].source, PhotoSource::Url("x".to_string()));
    }

    #[test]
    fn server_error_yields_http_error() {
        let err = decode_photo_response(500, "Internal Server Error").unwrap_err();
        assert_eq!(err, PhotoError::Http { status: 500 });
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn bare_array_from_presigned_backend_keeps_order() {
        let body = r#"[
            {"pixel_id": 3, "user_id": "kim", "image_url": "https://s3/a.png"},
            {"pixel_id": 1, "user_id": 9, "image_url": "https://s3/b.png"}
        ]"#;
        let photos = decode_photo_response(200, body).unwrap();
        let ids: Vec<String> = photos.iter().map(|p| p.plant_id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert_eq!(photos[0].user_id.as_deref(), Some("kim"));
        assert_eq!(photos[1].user_id.as_deref(), Some("9"));
    }

    #[test]
    fn image_key_goes_through_the_proxy() {
        let photos =
            parse_photo_list(r#"[{"plant_id":"p-1","image_key":"common_photos/plant 01.png"}]"#)
                .unwrap();
        assert_eq!(
            photos[0].display_url("/api/image-proxy"),
            "/api/image-proxy?key=common_photos%2Fplant%2001.png"
        );
    }

    #[test]
    fn items_without_image_are_skipped() {
        let photos = parse_photo_list(
            r#"[{"plant_id":1,"image_url":""},{"plant_id":2,"image_url":"y"}]"#,
        )
        .unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].plant_id, PlantId::Number(2));
    }

    #[test]
    fn broken_item_is_skipped_and_the_rest_survive() {
        let body = r#"[
            {"pixel_id": 1, "user_id": "kim", "image_url": "x"},
            {"pixel_id": null, "user_id": "kim", "image_url": "y"},
            {"pixel_id": 2.5, "image_url": "z"},
            "not an object"
        ]"#;
        let photos = parse_photo_list(body).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].plant_id, PlantId::Number(1));
        assert_eq!(photos[0].source, PhotoSource::Url("x".to_string()));
    }

    #[test]
    fn plant_id_and_pixel_id_together_prefer_plant_id() {
        let photos = parse_photo_list(r#"[{"plant_id":7,"pixel_id":1,"image_url":"x"}]"#).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].plant_id, PlantId::Number(7));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(
            decode_photo_response(200, r#"{"items":[]}"#),
            Err(PhotoError::Parse(_))
        ));
    }
}
