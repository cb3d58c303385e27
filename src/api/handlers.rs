//! API request handlers

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::error::HorariosError;
use crate::export::ExportFormat;
use crate::normalizer::MSG_MISSING_FILE;
use crate::types::{FilterMode, ParseResult, SelectedCell, ViewState};
use crate::view::{build_view, ViewModel};

pub const PARSE_OK_MESSAGE: &str = "Parseado OK";
pub const NOTHING_LOADED_MESSAGE: &str = "No hay horarios cargados";

/// Standard API response wrapper for the informational endpoints
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }
}

/// `{ "error": "..." }` with a non-2xx status. Only the message crosses the boundary.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn nothing_loaded() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOTHING_LOADED_MESSAGE)
    }
}

impl From<HorariosError> for ApiError {
    fn from(err: HorariosError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Horarios API Server".to_string(),
        version: state.version.clone(),
        description: "Shift schedule parsing from .xlsx uploads".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint(
                "/api/parse-horarios",
                "POST",
                "Parse an uploaded .xlsx (multipart field 'file', optional 'sheet')",
            ),
            endpoint("/api/horarios", "GET", "Last parsed schedule"),
            endpoint(
                "/api/horarios/view",
                "GET",
                "Grouped view with search, filter and companions",
            ),
            endpoint("/api/export/json", "GET", "Download horarios.json"),
            endpoint("/api/export/csv", "GET", "Download horarios.csv"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["parse", "view", "companions", "export-json", "export-csv"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Parse endpoint success body
#[derive(Serialize, Deserialize)]
pub struct ParseResponse {
    #[serde(flatten)]
    pub result: ParseResult,
    pub message: String,
}

/// POST /api/parse-horarios - Parse an uploaded workbook
///
/// On success the result replaces whatever was cached before. A request that
/// is not `multipart/form-data` carries no file and is answered as such.
pub async fn parse_horarios(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "upload is not multipart");
        HorariosError::MissingInput(MSG_MISSING_FILE.to_string())
    })?;
    let mut upload: Option<Vec<u8>> = None;
    let mut sheet: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        let is_file = field.file_name().is_some();
        match name.as_deref() {
            Some("file") if is_file => {
                upload = Some(field.bytes().await?.to_vec());
            }
            Some("sheet") => {
                sheet = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let bytes = upload.ok_or_else(|| HorariosError::MissingInput(MSG_MISSING_FILE.to_string()))?;
    info!(bytes = bytes.len(), sheet = ?sheet, "parsing upload");

    let result = state.parser.parse_bytes(&bytes, sheet.as_deref())?;

    if let Err(e) = state.cache.save(&result) {
        warn!(error = %e, "parsed schedule could not be cached");
    }

    Ok(Json(ParseResponse {
        result,
        message: PARSE_OK_MESSAGE.to_string(),
    }))
}

fn cached(state: &AppState) -> Result<ParseResult, ApiError> {
    state.cache.load()?.ok_or_else(ApiError::nothing_loaded)
}

/// GET /api/horarios - Last parsed schedule
pub async fn get_horarios(State(state): State<Arc<AppState>>) -> Result<Json<ParseResult>, ApiError> {
    Ok(Json(cached(&state)?))
}

/// View query string. Selection fields only take effect when all four are
/// present and `shift` is non-blank; empty cells are never selectable.
#[derive(Deserialize, Default, Debug)]
pub struct ViewQuery {
    #[serde(default)]
    pub search: String,
    pub filter: Option<String>,
    pub date: Option<String>,
    pub shift: Option<String>,
    pub subgroup: Option<String>,
    pub name: Option<String>,
}

impl ViewQuery {
    pub fn to_state(&self) -> ViewState {
        let filter = self
            .filter
            .as_deref()
            .map(FilterMode::parse_lenient)
            .unwrap_or_default();
        let mut state = ViewState::new(self.search.clone(), filter);

        let shift = self.shift.as_ref().filter(|s| !s.trim().is_empty());
        if let (Some(date), Some(shift), Some(subgroup), Some(name)) =
            (&self.date, shift, &self.subgroup, &self.name)
        {
            state = state.with_selection(SelectedCell {
                date: date.clone(),
                shift_code: shift.clone(),
                subgroup: subgroup.clone(),
                name: name.clone(),
            });
        }
        state
    }
}

/// GET /api/horarios/view - Grouped, filtered view of the last schedule
pub async fn view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ApiResponse<ViewModel>>, ApiError> {
    let result = cached(&state)?;
    let view = build_view(&result.records, &query.to_state());
    Ok(Json(ApiResponse::ok(view)))
}

fn export(state: &AppState, format: ExportFormat) -> Result<Response, ApiError> {
    let result = cached(state)?;
    if result.is_empty() {
        return Err(ApiError::nothing_loaded());
    }

    let body = format.encode(&result.records)?;
    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// GET /api/export/json - Download horarios.json
pub async fn export_json(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    export(&state, ExportFormat::Json)
}

/// GET /api/export/csv - Download horarios.csv
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    export(&state, ExportFormat::Csv)
}
