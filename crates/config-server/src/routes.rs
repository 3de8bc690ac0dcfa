//! HTTP surface: the config update endpoint and the static asset root.

use anyhow::Context;
use avatar_core::merge_document;
use serde_json::json;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use warp::http::{header, Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::Filter;

/// Serialises read-merge-write cycles on the persisted document.
#[derive(Clone)]
pub struct ConfigStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shallow-merge a JSON object body into the stored YAML document.
    pub async fn update(&self, body: &[u8]) -> anyhow::Result<()> {
        let incoming: serde_json::Value =
            serde_json::from_slice(body).context("request body is not valid JSON")?;
        log::info!("received config update: {incoming}");

        let _guard = self.lock.lock().await;
        let existing = match tokio::fs::read_to_string(self.path()).await {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        let merged = merge_document(existing.as_deref(), &incoming)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(self.path(), merged)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

async fn update_config(body: Bytes, store: ConfigStore) -> impl warp::Reply {
    match store.update(&body).await {
        Ok(()) => warp::reply::with_status(
            warp::reply::json(&json!({ "message": "Config updated successfully!" })),
            StatusCode::OK,
        ),
        Err(e) => {
            log::error!("error updating config: {e:#}");
            warp::reply::with_status(
                warp::reply::json(&json!({
                    "message": "Failed to update config",
                    "error": format!("{e:#}"),
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

fn method_not_allowed(method: Method) -> impl warp::Reply {
    let reply = warp::reply::with_status(
        format!("Method {method} Not Allowed"),
        StatusCode::METHOD_NOT_ALLOWED,
    );
    warp::reply::with_header(reply, header::ALLOW, "POST")
}

pub fn routes(
    public_dir: PathBuf,
    store: ConfigStore,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let update = warp::path!("api" / "update-config")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(warp::any().map(move || store.clone()))
        .then(update_config);

    let wrong_method = warp::path!("api" / "update-config")
        .and(warp::method())
        .map(method_not_allowed);

    let assets = warp::get().and(warp::fs::dir(public_dir));

    update.or(wrong_method).or(assets)
}
