//! Framework-neutral WASM <-> JavaScript bridge.

use chrono::Local;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use vision_core::{
    CardConfig, CardError, Language, LocaleTable, RawCardConfig, CARD_DESCRIPTION, CARD_NAME,
    CARD_TYPE,
};
use wasm_bindgen::prelude::*;

/// Entry pushed into `window.customCards` by the loader.
#[derive(Serialize)]
struct CardMetadata {
    #[serde(rename = "type")]
    card_type: &'static str,
    name: &'static str,
    description: &'static str,
}

/// Render the card view for a `hass.states` map.
#[wasm_bindgen]
pub fn summarize_states(states: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let states_value = from_value::<serde_json::Value>(states)
        .map_err(|err| JsValue::from_str(&format!("Could not read states: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => parse_config(js_cfg)?,
        None => CardConfig::default(),
    };

    let view = vision_hass::summarize_states_value(&states_value, &cfg, &Local::now())
        .map_err(|err| JsValue::from_str(&format_card_error(err)))?;

    to_value(&view).map_err(|err| JsValue::from_str(&format!("Could not serialize view: {err}")))
}

/// Default configuration for the dashboard editor.
#[wasm_bindgen]
pub fn stub_config() -> Result<JsValue, JsValue> {
    to_value(&CardConfig::stub())
        .map_err(|err| JsValue::from_str(&format!("Could not serialize config: {err}")))
}

/// Normalize a host-supplied config, filling in defaults.
#[wasm_bindgen]
pub fn normalize_config(config: JsValue) -> Result<JsValue, JsValue> {
    let cfg = parse_config(config)?;
    to_value(&cfg).map_err(|err| JsValue::from_str(&format!("Could not serialize config: {err}")))
}

#[wasm_bindgen]
pub fn resolve_icon(label: &str, language: Option<String>) -> Result<String, JsValue> {
    let language = match language {
        Some(code) => code
            .parse::<Language>()
            .map_err(|err| JsValue::from_str(&format_card_error(err)))?,
        None => Language::default(),
    };
    let table =
        LocaleTable::builtin(language).map_err(|err| JsValue::from_str(&format_card_error(err)))?;
    Ok(table.resolve_icon(label).to_string())
}

#[wasm_bindgen]
pub fn card_metadata() -> Result<JsValue, JsValue> {
    to_value(&CardMetadata {
        card_type: CARD_TYPE,
        name: CARD_NAME,
        description: CARD_DESCRIPTION,
    })
    .map_err(|err| JsValue::from_str(&format!("Could not serialize metadata: {err}")))
}

fn parse_config(js_cfg: JsValue) -> Result<CardConfig, JsValue> {
    let raw: RawCardConfig = from_value(js_cfg)
        .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
    CardConfig::try_from(raw).map_err(|err| JsValue::from_str(&format_card_error(err)))
}

fn format_card_error(err: CardError) -> String {
    format!("Card error: {err}")
}
