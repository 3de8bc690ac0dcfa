//! Network collaborators: prompt inference and config submission.

use crate::constants::*;
use crate::dom::js_error;
use avatar_core::{InferenceResponse, ManualConfig, Take};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn window() -> anyhow::Result<web::Window> {
    web::window().ok_or_else(|| anyhow::anyhow!("no window"))
}

async fn send(request: &web::Request) -> anyhow::Result<web::Response> {
    let value = JsFuture::from(window()?.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    value.dyn_into::<web::Response>().map_err(js_error)
}

async fn get(url: &str) -> anyhow::Result<web::Response> {
    let value = JsFuture::from(window()?.fetch_with_str(url))
        .await
        .map_err(js_error)?;
    let response: web::Response = value.dyn_into().map_err(js_error)?;
    if !response.ok() {
        anyhow::bail!("GET {url} failed with status: {}", response.status());
    }
    Ok(response)
}

async fn response_text(response: &web::Response) -> anyhow::Result<String> {
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| anyhow::anyhow!("response body is not text"))
}

/// Download a static asset as raw bytes.
pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let response = get(url).await?;
    let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Ask the inference service to voice and animate `prompt`, sending the
/// persisted model config along as a file part.
pub async fn generate_animation(prompt: &str) -> anyhow::Result<Take> {
    let config = get(CONFIG_DOCUMENT_URL).await?;
    let config_blob: web::Blob = JsFuture::from(config.blob().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    let form = web::FormData::new().map_err(js_error)?;
    form.append_with_str("prompt", prompt).map_err(js_error)?;
    form.append_with_blob_and_filename("config_file", &config_blob, CONFIG_FILE_NAME)
        .map_err(js_error)?;

    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_body(&form);
    let request = web::Request::new_with_str_and_init(INFERENCE_URL, &init).map_err(js_error)?;
    let response = send(&request).await?;
    if !response.ok() {
        anyhow::bail!("API call failed with status: {}", response.status());
    }

    let text = response_text(&response).await?;
    let take = InferenceResponse::from_json(&text)?.into_take()?;
    log::info!(
        "inference returned {} animation frames, {} emotion frames",
        take.animation_frames.len(),
        take.emotions.len()
    );
    Ok(take)
}

/// POST the manual config to the persistence endpoint; returns the server's
/// acknowledgement message.
pub async fn submit_config(config: &ManualConfig) -> anyhow::Result<String> {
    let body = serde_json::to_string(&config.to_json()?)?;

    let headers = web::Headers::new().map_err(js_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_error)?;
    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));
    let request =
        web::Request::new_with_str_and_init(UPDATE_CONFIG_URL, &init).map_err(js_error)?;
    let response = send(&request).await?;

    let text = response_text(&response).await?;
    let ack: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
    let message = ack["message"].as_str().unwrap_or_default().to_string();
    if !response.ok() {
        let detail = ack["error"].as_str().unwrap_or(text.as_str());
        anyhow::bail!("{message} ({}): {detail}", response.status());
    }
    Ok(message)
}
