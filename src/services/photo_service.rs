// ============================================================================
// PHOTO SERVICE - SOLO comunicación HTTP con /s3photos (Stateless)
// ============================================================================

use gloo_net::http::Request;

use crate::config::CONFIG;
use crate::error::PhotoError;
use crate::models::{decode_photo_response, PhotoRecord};

#[derive(Clone)]
pub struct PhotoService {
    photos_url: String,
}

impl PhotoService {
    pub fn new() -> Self {
        Self {
            photos_url: CONFIG.photos_url(),
        }
    }

    /// GET autenticado del listado de fotos del usuario
    pub async fn fetch_photos(&self, token: &str) -> Result<Vec<PhotoRecord>, PhotoError> {
        log::info!("📸 [PHOTOS] Obteniendo fotos de {}", self.photos_url);

        let response = Request::get(&self.photos_url)
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| PhotoError::Network(e.to_string()))?;

        let status = response.status();
        if !response.ok() {
            log::warn!("⚠️ [PHOTOS] HTTP {} {}", status, response.status_text());
            return Err(PhotoError::Http { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PhotoError::Network(e.to_string()))?;

        let photos = decode_photo_response(status, &body)?;
        log::info!("✅ [PHOTOS] {} fotos recibidas", photos.len());
        Ok(photos)
    }
}

impl Default for PhotoService {
    fn default() -> Self {
        Self::new()
    }
}
