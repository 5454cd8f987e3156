use std::future::Future;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::builder::{QrOptions, build_qr};
use crate::color::Rgb;
use crate::config::ServerConfig;
use crate::desktop::{BORDER_RANGE, BOX_SIZE_RANGE};
use crate::error::{QrError, QrResult};
use crate::output::{data_url, encode_png};
use crate::store::ArtifactStore;
use crate::style::{EcLevel, MaskKind, ModuleDrawer};

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPT_JS: &str = include_str!("../static/script.js");

pub struct AppState {
    pub store: ArtifactStore,
}

/// An uploaded file from the form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Raw fields of `POST /generate`. Absent fields take the builder defaults.
#[derive(Debug, Clone, Default)]
pub struct GenerateForm {
    pub data: Option<String>,
    pub version: Option<String>,
    pub error_correction: Option<String>,
    pub box_size: Option<String>,
    pub border: Option<String>,
    pub fill_color: Option<String>,
    pub back_color: Option<String>,
    pub gradient_color: Option<String>,
    pub module_drawer: Option<String>,
    pub color_mask: Option<String>,
    pub embedded_image: Option<Upload>,
}

impl GenerateForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = GenerateForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "embedded_image" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers post an empty part when no file was chosen.
                if !filename.is_empty() && !bytes.is_empty() {
                    form.embedded_image = Some(Upload { filename, bytes: bytes.to_vec() });
                }
                continue;
            }

            let value = field.text().await?;
            let slot = match name.as_str() {
                "data" => &mut form.data,
                "version" => &mut form.version,
                "error_correction" => &mut form.error_correction,
                "box_size" => &mut form.box_size,
                "border" => &mut form.border,
                "fill_color" => &mut form.fill_color,
                "back_color" => &mut form.back_color,
                "gradient_color" => &mut form.gradient_color,
                "module_drawer" => &mut form.module_drawer,
                "color_mask" => &mut form.color_mask,
                _ => continue,
            };
            *slot = Some(value);
        }
        Ok(form)
    }

    /// Builder options from the text fields. The upload is handled by the
    /// caller since it needs a home on disk first.
    pub fn options(&self) -> QrResult<QrOptions> {
        let mut options = QrOptions::default();
        if let Some(data) = &self.data {
            options.data = data.clone();
        }
        if let Some(version) = &self.version {
            options.version = version.parse()?;
        }
        if let Some(level) = &self.error_correction {
            options.ec_level = EcLevel::lookup(level);
        }
        if let Some(size) = &self.box_size {
            options.box_size = parse_number("box_size", size, BOX_SIZE_RANGE)?;
        }
        if let Some(border) = &self.border {
            options.border = parse_number("border", border, BORDER_RANGE)?;
        }
        if let Some(fill) = &self.fill_color {
            options.fill = Rgb::parse_hex(fill)?;
        }
        if let Some(back) = &self.back_color {
            options.back = Rgb::parse_hex(back)?;
        }
        options.gradient = match self.gradient_color.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(hex) => Some(Rgb::parse_hex(hex)?),
        };
        if let Some(drawer) = &self.module_drawer {
            options.drawer = ModuleDrawer::lookup(drawer);
        }
        if let Some(mask) = &self.color_mask {
            options.mask = MaskKind::lookup(mask);
        }
        Ok(options)
    }
}

/// Parses a number field, refusing anything outside the form's `min`/`max`.
fn parse_number(field: &'static str, value: &str, (min, max): (u32, u32)) -> QrResult<u32> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|n| (min..=max).contains(n))
        .ok_or_else(|| QrError::InvalidField { field, value: value.to_string() })
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    fn success(image: String, qr_id: String) -> Self {
        Self { success: true, image: Some(image), qr_id: Some(qr_id), error: None }
    }

    fn failure(error: impl ToString) -> Self {
        Self { success: false, image: None, qr_id: None, error: Some(error.to_string()) }
    }
}

#[derive(Debug, Deserialize)]
pub struct CleanupForm {
    pub qr_id: Option<String>,
}

/// Renders the form's image and stores it. Returns the data URL for display
/// and the id to download or clean it up with.
pub async fn generate_artifact(state: &AppState, form: GenerateForm) -> QrResult<(String, String)> {
    let mut options = form.options()?;

    let upload_key = match &form.embedded_image {
        Some(upload) => {
            let ext = std::path::Path::new(&upload.filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();
            let key = format!("{}{ext}", Uuid::new_v4());
            let path = state.store.dir().join(&key);
            tokio::fs::write(&path, &upload.bytes).await?;
            state.store.insert_path(key.clone(), path.clone());
            options.embedded_image = Some(path);
            Some(key)
        }
        None => None,
    };

    let rendered = tokio::task::spawn_blocking(move || encode_png(&build_qr(&options)?)).await;

    if let Some(key) = upload_key {
        state.store.remove(&key);
    }

    let png = rendered.map_err(|e| QrError::Io(std::io::Error::other(e)))??;
    let image = data_url(&png);
    let qr_id = state.store.insert_bytes(png);
    Ok((image, qr_id))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], SCRIPT_JS)
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Json<GenerateResponse>) {
    let form = match GenerateForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "unreadable form");
            return (e.status(), Json(GenerateResponse::failure(e.body_text())));
        }
    };

    match generate_artifact(&state, form).await {
        Ok((image, qr_id)) => {
            info!(%qr_id, "QR code generated");
            (StatusCode::OK, Json(GenerateResponse::success(image, qr_id)))
        }
        Err(e) => {
            warn!(error = %e, "generation failed");
            (StatusCode::OK, Json(GenerateResponse::failure(e)))
        }
    }
}

pub async fn download(State(state): State<Arc<AppState>>, Path(qr_id): Path<String>) -> Response {
    let not_found = || (StatusCode::NOT_FOUND, "File not found").into_response();

    let shared = state.clone();
    let id = qr_id.clone();
    let persisted = tokio::task::spawn_blocking(move || shared.store.persist(&id))
        .await
        .unwrap_or_else(|e| Err(QrError::Io(std::io::Error::other(e))));

    let path = match persisted {
        Ok(Some(path)) => path,
        Ok(None) => return not_found(),
        Err(e) => {
            warn!(%qr_id, error = %e, "could not persist artifact");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"qrcode.png\""),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => not_found(),
    }
}

pub async fn cleanup(State(state): State<Arc<AppState>>, Form(form): Form<CleanupForm>) -> Json<Value> {
    if let Some(qr_id) = form.qr_id {
        state.store.remove(&qr_id);
    }
    Json(json!({ "success": true }))
}

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/script.js", get(script))
        .route("/generate", post(generate))
        .route("/download/:qr_id", get(download))
        .route("/cleanup", post(cleanup))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn shutdown_signal() -> QrResult<impl Future<Output = ()>> {
    let notify = Arc::new(Notify::new());
    let trigger = notify.clone();
    ctrlc::set_handler(move || trigger.notify_one()).map_err(|e| QrError::Io(std::io::Error::other(e)))?;
    Ok(async move {
        notify.notified().await;
        info!("shutdown requested");
    })
}

pub async fn run_server(config: ServerConfig) -> QrResult<()> {
    let store = ArtifactStore::new(&config.upload_dir)?;
    store.sweep_orphans();
    let state = Arc::new(AppState { store });

    let app = router(state.clone(), config.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, upload_dir = %config.upload_dir.display(), "server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()?).await?;

    state.store.purge();
    Ok(())
}
