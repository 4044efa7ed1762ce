// ============================================================================
// APP VIEW - Página del jardín
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::state::app_state::AppState;
use crate::views::{render_photo_gallery, render_unity_player};

pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let title = ElementBuilder::new("h1")?
        .style("text-align", "center")?
        .text("🪴PlantMate🪴")
        .build();

    let caption = ElementBuilder::new("p")?
        .class("garden-caption")
        .style("text-align", "center")?
        .style("font-size", "16px")?
        .style("color", "#555")?
        .text("🌱자신이 찍은 식물로 정원을 꾸며보세요!🌱")
        .build();

    let page = ElementBuilder::new("main")?
        .class("garden-page")
        .style("max-width", "960px")?
        .style("margin", "0 auto")?
        .style("padding", "20px")?
        .style("font-family", "Arial, sans-serif")?
        .child(title)?
        .child(render_unity_player(state)?)?
        .child(caption)?
        .child(render_photo_gallery(state)?)?
        .build();

    Ok(page)
}
