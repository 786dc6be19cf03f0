#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-vision-card]";

/// Card body styles, rendered inside the card so they reach its shadow root.
pub const CARD_STYLES: &str = r#"
.date-header h2 {
  margin: 16px 0 8px;
  font-size: 1.1em;
  color: var(--primary-text-color);
}

.date-header:first-child h2 {
  margin-top: 0;
}

.event-container {
  display: flex;
  align-items: center;
  justify-content: flex-start;
  height: auto;
  z-index: 2;
  margin-bottom: 10px;
  cursor: pointer;
}

.event-container:last-child {
  margin-bottom: 0;
}

.event-container img {
  width: 100px;
  height: 100px;
  margin-left: auto;
  border-radius: 12px;
  object-fit: cover;
}

.event-container h3 {
  margin: 0;
  flex-grow: 1;
  color: var(--primary-text-color);
}

.event-container p {
  margin: 0;
  flex-grow: 1;
  color: var(--secondary-text-color);
}

.event-details {
  flex-grow: 1;
}

.icon-container {
  width: 40px;
  height: 40px;
  border-radius: 50%;
  background-color: rgba(95, 252, 234, 0.2);
  display: flex;
  align-items: center;
  justify-content: center;
  margin-right: 15px;
  position: relative;
  flex-shrink: 0;
}

.icon-container ha-icon {
  color: #5ffcea;
}

.no-events {
  margin: 0;
  color: var(--secondary-text-color);
}
"#;

/// Overlay styles. The popup lives under `<body>`, outside any shadow root.
pub const POPUP_STYLES: &str = r#"
.vision-popup-overlay {
  position: fixed;
  top: 0;
  left: 0;
  width: 100%;
  height: 100%;
  background: rgba(0, 0, 0, 0.5);
  display: flex;
  align-items: center;
  justify-content: center;
  z-index: 1000;
}

.vision-popup-content {
  position: relative;
  background: var(--ha-card-background, var(--card-background-color, black));
  color: var(--primary-text-color);
  padding: 20px;
  border-radius: var(--border-radius, 15px);
  max-width: 500px;
  width: 100%;
}

.vision-popup-content h2 {
  margin-bottom: 0;
}

.vision-popup-secondary {
  font-weight: bold;
  color: var(--secondary-text-color);
}

.vision-popup-content img {
  width: 100%;
  height: auto;
  border-radius: 12px;
}

.vision-popup-close {
  position: absolute;
  top: 10px;
  right: 10px;
  background: none;
  border: none;
  font-size: 30px;
  cursor: pointer;
  color: var(--primary-text-color);
}
"#;

/// Install the popup rules once per document.
///
/// The popup is portaled to `<body>`, outside the card's own subtree, so the
/// inline `CARD_STYLES` block does not reach it; its rules live in `<head>`.
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-vision-card", "v1")?;
    style_el.set_text_content(Some(POPUP_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
