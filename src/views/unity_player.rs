// ============================================================================
// UNITY PLAYER VIEW - Marco 16:9 con el canvas y el overlay de estado
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{add_class, ElementBuilder};
use crate::state::app_state::AppState;
use crate::state::PlayerStatus;

pub const PLAYER_OVERLAY_ID: &str = "unity-overlay";

/// Renderizar el reproductor (el canvas se crea una sola vez)
pub fn render_unity_player(state: &AppState) -> Result<Element, JsValue> {
    let canvas = ElementBuilder::new("canvas")?
        .id(&CONFIG.unity.canvas_id)?
        .attr("tabindex", "-1")?
        .style("width", "100%")?
        .style("height", "100%")?
        .style("display", "block")?
        .build();

    let frame = ElementBuilder::new("div")?
        .class("unity-frame")
        .style("position", "relative")?
        .style("height", "70vh")?
        .style("width", "calc(70vh * (16 / 9))")?
        .style("max-width", "100%")?
        .style("border", "1px solid #ccc")?
        .style("margin", "0 auto")?
        .child(canvas)?
        .child(render_player_overlay(state)?)?
        .build();

    let container = ElementBuilder::new("section")?
        .class("unity-player")
        .style("max-width", "100%")?
        .style("margin", "0 auto")?
        .style("padding", "20px")?
        .child(frame)?
        .build();

    Ok(container)
}

/// Overlay de carga/error; vacío (oculto) cuando Unity está listo
pub fn render_player_overlay(state: &AppState) -> Result<Element, JsValue> {
    let overlay = ElementBuilder::new("div")?
        .id(PLAYER_OVERLAY_ID)?
        .class("unity-overlay")
        .style("position", "absolute")?
        .style("inset", "0")?
        .style("display", "flex")?
        .style("align-items", "center")?
        .style("justify-content", "center")?
        .style("pointer-events", "none")?
        .build();

    match state.player.status() {
        PlayerStatus::Loading { progress } => {
            let label = ElementBuilder::new("p")?
                .class("unity-overlay__label")
                .text(&format!("🌱 정원을 불러오는 중... {}%", (progress * 100.0).floor() as u32))
                .build();
            crate::dom::append_child(&overlay, &label)?;
        }
        PlayerStatus::Ready => {
            crate::dom::set_style(&overlay, "display", "none")?;
        }
        PlayerStatus::Failed { message } => {
            add_class(&overlay, "unity-overlay--error")?;
            let label = ElementBuilder::new("p")?
                .class("unity-overlay__label")
                .text(&format!("❌ 정원을 불러오지 못했습니다: {}", message))
                .build();
            crate::dom::append_child(&overlay, &label)?;
        }
    }

    Ok(overlay)
}
