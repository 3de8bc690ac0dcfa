use crate::constants::{LOADING_ID, NOTICE_ID};
use web_sys as web;

#[inline]
pub fn show_loading(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        _ = el.class_list().remove_1("hidden");
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide_loading(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        _ = el.class_list().add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    }
}

/// Show a one-line status message; errors are styled apart from info.
pub fn notify(document: &web::Document, message: &str, is_error: bool) {
    if let Some(el) = document.get_element_by_id(NOTICE_ID) {
        el.set_text_content(Some(message));
        let cl = el.class_list();
        if is_error {
            _ = cl.add_1("error");
        } else {
            _ = cl.remove_1("error");
        }
    }
}
