//! Config panel: one range slider per manual-config entry, grouped by
//! section, plus the submit button.

use crate::api;
use crate::constants::*;
use crate::dom::{self, js_error};
use crate::overlay;
use avatar_core::{ConfigSection, ManualConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type SharedConfig = Rc<RefCell<ManualConfig>>;

#[inline]
fn slider_id(section: ConfigSection, key: &str) -> String {
    format!("cfg-{}-{}", section.key(), key)
}

#[inline]
fn group_id(section: ConfigSection) -> String {
    format!("cfg-{}", section.key())
}

#[inline]
fn readout_id(section: ConfigSection, key: &str) -> String {
    format!("{}-value", slider_id(section, key))
}

fn build_slider(
    document: &web::Document,
    config: &SharedConfig,
    section: ConfigSection,
    key: &str,
    value: f32,
) -> anyhow::Result<web::Element> {
    let row = document.create_element("div").map_err(js_error)?;
    row.set_class_name("slider-row");

    let label = document.create_element("label").map_err(js_error)?;
    label.set_text_content(Some(key));
    _ = label.set_attribute("for", &slider_id(section, key));

    let input: web::HtmlInputElement = document
        .create_element("input")
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    input.set_type("range");
    input.set_id(&slider_id(section, key));
    input.set_min(&SLIDER_MIN.to_string());
    input.set_max(&SLIDER_MAX.to_string());
    input.set_step(&SLIDER_STEP.to_string());
    input.set_value(&value.to_string());

    let readout = document.create_element("span").map_err(js_error)?;
    readout.set_id(&readout_id(section, key));
    readout.set_text_content(Some(&format!("{value:.2}")));

    let config = config.clone();
    let key_owned = key.to_string();
    let input_for_cb = input.clone();
    let readout_for_cb = readout.clone();
    let on_input = Closure::wrap(Box::new(move || {
        let v = input_for_cb.value_as_number() as f32;
        if v.is_nan() {
            return;
        }
        config.borrow_mut().set(section, &key_owned, v);
        readout_for_cb.set_text_content(Some(&format!("{v:.2}")));
    }) as Box<dyn FnMut()>);
    _ = input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref());
    on_input.forget();

    row.append_child(&label).map_err(js_error)?;
    row.append_child(&input).map_err(js_error)?;
    row.append_child(&readout).map_err(js_error)?;
    Ok(row)
}

/// Populate the panel container from the current config and wire submit.
pub fn build(document: &web::Document, config: &SharedConfig) -> anyhow::Result<()> {
    let container = document
        .get_element_by_id(PANEL_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{PANEL_ID}"))?;

    let snapshot = config.borrow().clone();
    for section in ConfigSection::ALL {
        let group = document.create_element("section").map_err(js_error)?;
        group.set_id(&group_id(section));
        let title = document.create_element("h3").map_err(js_error)?;
        title.set_text_content(Some(section.title()));
        group.append_child(&title).map_err(js_error)?;
        for (key, value) in snapshot.section(section).iter() {
            let row = build_slider(document, config, section, key, value)?;
            group.append_child(&row).map_err(js_error)?;
        }
        container.append_child(&group).map_err(js_error)?;
    }

    let config = config.clone();
    dom::add_click_listener(document, PANEL_SUBMIT_ID, move || {
        let snapshot = config.borrow().clone();
        spawn_local(async move {
            let Some(document) = dom::window_document() else {
                return;
            };
            dom::set_disabled(&document, PANEL_SUBMIT_ID, true);
            match api::submit_config(&snapshot).await {
                Ok(message) => overlay::notify(&document, &message, false),
                Err(e) => {
                    log::error!("config submit failed: {e:#}");
                    overlay::notify(&document, &format!("{e:#}"), true);
                }
            }
            dom::set_disabled(&document, PANEL_SUBMIT_ID, false);
        });
    });
    Ok(())
}

/// Push config values back into the sliders, e.g. after emotions were
/// synced from an inference response. Keys without a slider get one.
pub fn refresh(document: &web::Document, config: &SharedConfig) -> anyhow::Result<()> {
    let snapshot = config.borrow().clone();
    for section in ConfigSection::ALL {
        for (key, value) in snapshot.section(section).iter() {
            let input = document
                .get_element_by_id(&slider_id(section, key))
                .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok());
            match input {
                Some(input) => {
                    input.set_value(&value.to_string());
                    dom::set_text(document, &readout_id(section, key), &format!("{value:.2}"));
                }
                None => {
                    if let Some(group) = document.get_element_by_id(&group_id(section)) {
                        let row = build_slider(document, config, section, key, value)?;
                        group.append_child(&row).map_err(js_error)?;
                    }
                }
            }
        }
    }
    Ok(())
}
