// ============================================================================
// INCREMENTAL DOM UPDATES - Actualización incremental del DOM
// ============================================================================
// Solo se reemplazan secciones concretas; el canvas de Unity nunca se toca
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::get_element_by_id;
use crate::state::app_state::AppState;
use crate::views::{render_photo_gallery, render_player_overlay, PHOTO_GALLERY_ID, PLAYER_OVERLAY_ID};

/// Sustituir el elemento con `id` por `replacement` (que debe llevar el mismo id)
pub fn replace_section(id: &str, replacement: &Element) -> Result<(), JsValue> {
    let current = get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Section #{} not found, needs full render", id)))?;
    current.replace_with_with_node_1(replacement)
}

pub fn update_photo_gallery_incremental(state: &AppState) -> Result<(), JsValue> {
    let gallery = render_photo_gallery(state)?;
    replace_section(PHOTO_GALLERY_ID, &gallery)
}

pub fn update_player_overlay_incremental(state: &AppState) -> Result<(), JsValue> {
    let overlay = render_player_overlay(state)?;
    replace_section(PLAYER_OVERLAY_ID, &overlay)
}
