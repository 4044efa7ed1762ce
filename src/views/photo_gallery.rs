// ============================================================================
// PHOTO GALLERY VIEW - Miniaturas de las plantas del usuario
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{add_class, append_child, ElementBuilder};
use crate::models::PhotoRecord;
use crate::state::app_state::AppState;

pub const PHOTO_GALLERY_ID: &str = "photo-gallery";

pub fn render_photo_gallery(state: &AppState) -> Result<Element, JsValue> {
    let snapshot = state.photos.snapshot();

    let gallery = ElementBuilder::new("section")?
        .id(PHOTO_GALLERY_ID)?
        .class("photo-gallery")
        .child(ElementBuilder::new("h2")?.text("📷 내 식물 사진").build())?
        .build();

    if snapshot.loading {
        append_child(&gallery, &status_line("⏳ 사진을 불러오는 중...")?)?;
        return Ok(gallery);
    }

    if let Some(error) = snapshot.error.as_deref() {
        let line = status_line(error)?;
        add_class(&line, "photo-gallery__status--error")?;
        append_child(&gallery, &line)?;
        return Ok(gallery);
    }

    if !snapshot.fetched {
        append_child(&gallery, &status_line("로그인 정보를 기다리는 중입니다.")?)?;
        return Ok(gallery);
    }

    if snapshot.photos.is_empty() {
        append_child(&gallery, &status_line("아직 등록된 사진이 없습니다.")?)?;
        return Ok(gallery);
    }

    let grid = ElementBuilder::new("ul")?.class("photo-gallery__grid").build();
    let proxy_url = CONFIG.image_proxy_url();
    for photo in &snapshot.photos {
        append_child(&grid, &render_photo_card(photo, &proxy_url)?)?;
    }
    append_child(&gallery, &grid)?;

    Ok(gallery)
}

fn status_line(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("p")?
        .class("photo-gallery__status")
        .text(text)
        .build())
}

fn render_photo_card(photo: &PhotoRecord, proxy_url: &str) -> Result<Element, JsValue> {
    let alt = format!("plant {}", photo.plant_id);
    let image = ElementBuilder::new("img")?
        .attr("src", &photo.display_url(proxy_url))?
        .attr("alt", &alt)?
        .attr("loading", "lazy")?
        .build();

    let caption = ElementBuilder::new("span")?
        .class("photo-card__id")
        .text(&format!("#{}", photo.plant_id))
        .build();

    ElementBuilder::new("li")?
        .class("photo-card")
        .child(image)?
        .child(caption)
        .map(ElementBuilder::build)
}
