//! Card presentation layer for the WebAssembly target.

#[cfg(target_arch = "wasm32")]
mod console_log;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::{console_log, styles};
    use chrono::Local;
    use js_sys::Reflect;
    use log::{debug, warn, LevelFilter};
    use serde_wasm_bindgen::{from_value, to_value};
    use vision_core::{
        Card, CardConfig, CardError, CardView, DateGroup, EventEntry, PopupState,
        RawCardConfig, RawFeed,
    };
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, HtmlImageElement, Window};
    use yew::prelude::*;
    use yew::{create_portal, AppHandle, TargetCast};

    #[derive(Properties, PartialEq)]
    pub struct CardRootProps {
        pub view: CardView,
    }

    #[function_component(CardRoot)]
    fn card_root(props: &CardRootProps) -> Html {
        let view = &props.view;

        use_effect_with((), |_| {
            if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                if let Err(err) = styles::ensure_styles(&document) {
                    console::error_1(&err);
                }
            }
            || ()
        });

        let popup = use_state(PopupState::default);

        let on_select = {
            let popup = popup.clone();
            Callback::from(move |entry: EventEntry| {
                let mut next = (*popup).clone();
                next.show(entry);
                popup.set(next);
            })
        };

        let on_close = {
            let popup = popup.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*popup).clone();
                next.dismiss();
                popup.set(next);
            })
        };

        html! {
            <>
                <ha-card>
                    <div class="card-content">
                        {
                            match view.placeholder.as_ref() {
                                Some(text) if view.groups.is_empty() => html! {
                                    <p class="no-events">{ text.clone() }</p>
                                },
                                _ => html! {
                                    for view.groups.iter().map(|group| render_group(group, &on_select))
                                },
                            }
                        }
                    </div>
                </ha-card>
                <style>{ styles::CARD_STYLES }</style>
                { render_popup(popup.current(), on_close) }
            </>
        }
    }

    fn render_group(group: &DateGroup, on_select: &Callback<EventEntry>) -> Html {
        html! {
            <>
                <div class="date-header">
                    <h2>{ group.label.clone() }</h2>
                </div>
                { for group.entries.iter().map(|entry| render_entry(entry, &group.label, on_select)) }
            </>
        }
    }

    fn render_entry(entry: &EventEntry, date_label: &str, on_select: &Callback<EventEntry>) -> Html {
        debug!(
            "Attaching click event for event: {}, dateLabel: {}",
            entry.title, date_label
        );

        let onclick = {
            let on_select = on_select.clone();
            let entry = entry.clone();
            Callback::from(move |_: MouseEvent| on_select.emit(entry.clone()))
        };

        html! {
            <div class="event-container" onclick={onclick}>
                <div class="icon-container">
                    <ha-icon icon={entry.icon.clone()}></ha-icon>
                </div>
                <div class="event-details">
                    <h3>{ entry.title.clone() }</h3>
                    <p>{ entry.secondary.clone() }</p>
                </div>
                { render_thumbnail(entry) }
            </div>
        }
    }

    fn render_thumbnail(entry: &EventEntry) -> Html {
        match entry.key_frame.as_ref() {
            Some(src) => html! {
                <img src={src.clone()} alt={entry.alt.clone()} onerror={hide_broken_image()} />
            },
            None => Html::default(),
        }
    }

    fn hide_broken_image() -> Callback<Event> {
        Callback::from(|event: Event| {
            let image: HtmlImageElement = event.target_unchecked_into();
            if let Err(err) = image.style().set_property("display", "none") {
                console::error_1(&err);
            }
        })
    }

    fn render_popup(entry: Option<&EventEntry>, on_close: Callback<MouseEvent>) -> Html {
        let Some(entry) = entry else {
            return Html::default();
        };

        let content = html! {
            <div class="vision-popup-overlay">
                <div class="vision-popup-content">
                    <button type="button" class="vision-popup-close" onclick={on_close}>{"×"}</button>
                    <div>
                        <h2>{ entry.title.clone() }</h2>
                        <p><span class="vision-popup-secondary">{ entry.secondary.clone() }</span></p>
                        <p>{ entry.summary.clone() }</p>
                        {
                            entry.key_frame.as_ref().map(|src| html! {
                                <img src={src.clone()} alt="Key frame" />
                            }).unwrap_or_default()
                        }
                    </div>
                </div>
            </div>
        };

        match web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
        {
            Some(body) => create_portal(content, body.into()),
            None => content,
        }
    }

    fn card_error(err: CardError) -> JsValue {
        JsValue::from_str(&format!("Card error: {err}"))
    }

    /// Feed of `entity_id` from a `hass` object (or its `states` map).
    /// Anything unreadable counts as a missing entity.
    fn read_entity(hass: &JsValue, entity_id: &str) -> Option<RawFeed> {
        if hass.is_undefined() || hass.is_null() {
            return None;
        }

        let states = Reflect::get(hass, &JsValue::from_str("states")).ok()?;
        let states = if states.is_undefined() || states.is_null() {
            hass.clone()
        } else {
            states
        };

        let entity = Reflect::get(&states, &JsValue::from_str(entity_id)).ok()?;
        if entity.is_undefined() || entity.is_null() {
            return None;
        }

        match from_value::<serde_json::Value>(entity) {
            Ok(entity) => Some(vision_hass::feed_from_entity(&entity)),
            Err(err) => {
                warn!("Could not read {entity_id}: {err}");
                None
            }
        }
    }

    fn find_element(selector: &str) -> Result<Element, JsValue> {
        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Document is not accessible"))?;

        document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("No element matches the selector"))
    }

    /// One card instance, driven by the custom element that owns it.
    #[wasm_bindgen]
    pub struct VisionCard {
        card: Card,
        view: CardView,
        app: Option<AppHandle<CardRoot>>,
    }

    #[wasm_bindgen]
    impl VisionCard {
        #[wasm_bindgen(constructor)]
        pub fn new() -> Result<VisionCard, JsValue> {
            console_error_panic_hook::set_once();
            console_log::init(LevelFilter::Info);

            let card = Card::new(CardConfig::default()).map_err(card_error)?;
            Ok(Self {
                card,
                view: CardView::default(),
                app: None,
            })
        }

        #[wasm_bindgen(js_name = setConfig)]
        pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
            let raw: RawCardConfig = from_value(config)?;
            let config = CardConfig::try_from(raw).map_err(card_error)?;
            self.card.reconfigure(config).map_err(card_error)
        }

        /// Render into `element`, normally the custom element itself.
        pub fn attach(&mut self, element: Element) {
            let props = CardRootProps {
                view: self.view.clone(),
            };
            self.app = Some(yew::Renderer::<CardRoot>::with_root_and_props(element, props).render());
        }

        pub fn mount(&mut self, selector: &str) -> Result<(), JsValue> {
            let target = find_element(selector)?;
            self.attach(target);
            Ok(())
        }

        /// Handle a state push. Returns whether the card re-rendered.
        #[wasm_bindgen(js_name = setHass)]
        pub fn set_hass(&mut self, hass: JsValue) -> bool {
            let now = Local::now();
            if !self.card.should_render(&now) {
                return false;
            }

            let source = read_entity(&hass, &self.card.config().calendar_entity);
            self.view = self.card.render(source.as_ref(), &now);
            if let Some(app) = self.app.as_mut() {
                app.update(CardRootProps {
                    view: self.view.clone(),
                });
            }
            true
        }

        #[wasm_bindgen(js_name = getStubConfig)]
        pub fn get_stub_config() -> Result<JsValue, JsValue> {
            to_value(&CardConfig::stub())
                .map_err(|err| JsValue::from_str(&format!("Could not serialize config: {err}")))
        }

        /// Rows in the current view; dashboards use it for `getCardSize`.
        #[wasm_bindgen(js_name = cardSize)]
        pub fn card_size(&self) -> usize {
            self.view.entry_count() + self.view.groups.len()
        }
    }

    /// Mount a view computed elsewhere, e.g. by `vision-wasm`'s `summarize_states`.
    #[wasm_bindgen]
    pub fn mount_card_view(selector: &str, view: JsValue) -> Result<(), JsValue> {
        let target = find_element(selector)?;
        let view: CardView = from_value(view)?;

        yew::Renderer::<CardRoot>::with_root_and_props(target, CardRootProps { view }).render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_card_view, VisionCard};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_card_view(_: &str, _: wasm_bindgen::JsValue) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "vision-ui only supports the wasm32 target",
    ))
}
