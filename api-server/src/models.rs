use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use cube_core::classifier::Hsl;
use cube_core::facelet::FaceletString;
use cube_core::{CubeError, CubeState, Face, Rgb, StickerColor, Strategy, ValidationResult};
use cube_solver::SolveResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session {0} not found")]
    SessionNotFound(Uuid),
    #[error(transparent)]
    Cube(#[from] CubeError),
    #[error("{}", .0.join(" "))]
    InvalidCube(Vec<String>),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Cube(_) | ApiError::InvalidCube(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let data = match &self {
            ApiError::InvalidCube(errors) => Some(errors.clone()),
            _ => None,
        };
        let body = ApiResponse {
            success: false,
            data,
            message: Some(self.to_string()),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub cube: CubeState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session as returned to clients, with everything derived from the
/// cube computed at read time.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub cube: CubeState,
    pub colors: String,
    pub facelets: FaceletString,
    pub validation: ValidationResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            cube: session.cube.clone(),
            colors: session.cube.to_color_string(),
            facelets: cube_core::facelet::encode(&session.cube),
            validation: cube_core::validate(&session.cube),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStickerRequest {
    pub face: Face,
    pub index: usize,
    pub color: Option<StickerColor>,
}

#[derive(Debug, Deserialize)]
pub struct StickerRef {
    pub face: Face,
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct CubeInput {
    pub cube: String,
}

#[derive(Debug, Serialize)]
pub struct EncodeResponse {
    pub facelets: FaceletString,
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Serialize)]
pub struct HslView {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl From<Hsl> for HslView {
    fn from(hsl: Hsl) -> Self {
        Self {
            h: hsl.h,
            s: hsl.s,
            l: hsl.l,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub color: StickerColor,
    pub hex: String,
    pub sample: Rgb,
    pub hsl: HslView,
    pub strategy: Strategy,
}

#[derive(Debug, Serialize)]
pub struct SolveView {
    #[serde(flatten)]
    pub result: SolveResult,
    pub genuine: bool,
    pub notice: Option<String>,
}
