use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use cube_core::classifier::rgb_to_hsl;
use cube_core::{facelet, validate, ColorClassifier, CubeState, Rgb, ValidationResult};
use cube_solver::solver::UNEXPECTED_FAILURE_MESSAGE;
use cube_solver::{SolutionSource, Solver};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{
    ApiError, ApiResponse, ClassifyRequest, ClassifyResponse, CubeInput, EncodeResponse,
    SessionView, SetStickerRequest, SolveView, StickerRef,
};
use crate::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub solver: Arc<Solver>,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SessionView>>) {
    let session = state.sessions.create_session().await;
    let active = state.sessions.count().await;
    info!(session = %session.id, active, "session created");
    (
        StatusCode::CREATED,
        ApiResponse::ok(SessionView::from(&session), "Session created"),
    )
}

pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<SessionView> {
    let session = state.sessions.get_session(id).await?;
    Ok(ApiResponse::ok(SessionView::from(&session), "Session retrieved"))
}

pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    state.sessions.delete_session(id).await?;
    Ok(ApiResponse::ok((), "Session deleted"))
}

pub async fn set_sticker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStickerRequest>,
) -> ApiResult<SessionView> {
    let (session, ()) = state
        .sessions
        .update_cube(id, |cube| match payload.color {
            Some(color) => cube.set_sticker(payload.face, payload.index, color),
            None => cube.clear_sticker(payload.face, payload.index),
        })
        .await?;
    Ok(ApiResponse::ok(SessionView::from(&session), "Sticker updated"))
}

pub async fn cycle_sticker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StickerRef>,
) -> ApiResult<SessionView> {
    let (session, color) = state
        .sessions
        .update_cube(id, |cube| cube.cycle_sticker(payload.face, payload.index))
        .await?;
    Ok(ApiResponse::ok(
        SessionView::from(&session),
        format!("Sticker set to {}", color),
    ))
}

pub async fn reset_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<SessionView> {
    let (session, ()) = state
        .sessions
        .update_cube(id, |cube| {
            cube.reset();
            Ok(())
        })
        .await?;
    Ok(ApiResponse::ok(SessionView::from(&session), "Cube reset"))
}

/// Validation gates the solve; an invalid cube never reaches the solver.
pub async fn solve_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<SolveView> {
    let session = state.sessions.get_session(id).await?;
    solve_cube(&state, session.cube).await
}

pub async fn solve(State(state): State<AppState>, Json(payload): Json<CubeInput>) -> ApiResult<SolveView> {
    let cube = CubeState::from_color_string(&payload.cube)?;
    solve_cube(&state, cube).await
}

async fn solve_cube(state: &AppState, cube: CubeState) -> ApiResult<SolveView> {
    let validation = validate(&cube);
    if !validation.is_valid {
        return Err(ApiError::InvalidCube(validation.errors));
    }

    let solver = state.solver.clone();
    let result = tokio::spawn(async move { solver.solve(&cube).await })
        .await
        .map_err(|e| {
            error!("solve task failed: {}", e);
            ApiError::Internal(UNEXPECTED_FAILURE_MESSAGE.to_string())
        })?;

    if let Some(message) = &result.error {
        return Err(ApiError::InvalidCube(vec![message.clone()]));
    }

    let message = match &result.source {
        SolutionSource::AlreadySolved => "Cube Already Solved!".to_string(),
        SolutionSource::Endpoint(_) => "Solution Found!".to_string(),
        SolutionSource::Placeholder | SolutionSource::Incomplete => {
            result.notice().unwrap_or_default().to_string()
        }
    };
    let view = SolveView {
        genuine: result.is_genuine(),
        notice: result.notice().map(str::to_string),
        result,
    };
    Ok(ApiResponse::ok(view, message))
}

pub async fn validate_cube(Json(payload): Json<CubeInput>) -> ApiResult<ValidationResult> {
    let cube = CubeState::from_color_string(&payload.cube)?;
    let validation = validate(&cube);
    let message = if validation.is_valid {
        "Cube is valid".to_string()
    } else {
        validation.summary()
    };
    Ok(ApiResponse::ok(validation, message))
}

pub async fn encode_cube(Json(payload): Json<CubeInput>) -> ApiResult<EncodeResponse> {
    let cube = CubeState::from_color_string(&payload.cube)?;
    let facelets = facelet::encode(&cube);
    let complete = facelets.is_complete();
    Ok(ApiResponse::ok(EncodeResponse { facelets, complete }, "Cube encoded"))
}

pub async fn classify(Json(payload): Json<ClassifyRequest>) -> Json<ApiResponse<ClassifyResponse>> {
    let sample = Rgb::new(payload.r, payload.g, payload.b);
    let color = payload.strategy.classify(sample);
    ApiResponse::ok(
        ClassifyResponse {
            color,
            hex: color.hex(),
            sample,
            hsl: rgb_to_hsl(sample).into(),
            strategy: payload.strategy,
        },
        format!("Classified as {}", color),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use cube_solver::mock_api::MockSolverApi;
    use cube_solver::SolverApi;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    const SCRAMBLED: &str = "RWWWWWWWW WRRRRRRRR GGGGGGGGG YYYYYYYYY OOOOOOOOO BBBBBBBBB";

    fn app_with(api: Arc<MockSolverApi>) -> Router {
        let solver = Solver::new(vec![api as Arc<dyn SolverApi>], Duration::from_secs(10));
        build_router(AppState {
            sessions: SessionStore::new(),
            solver: Arc::new(solver),
        })
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn test_create_session_is_send() {
        let api = Arc::new(MockSolverApi::responding("mock", "R"));
        let state = AppState {
            sessions: SessionStore::new(),
            solver: Arc::new(Solver::new(vec![api as Arc<dyn SolverApi>], Duration::from_secs(10))),
        };
        assert_send(create_session(State(state)));
    }

    #[tokio::test]
    async fn test_session_editing_flow() {
        let app = app_with(Arc::new(MockSolverApi::responding("mock", "R")));

        let (status, created) = call(&app, "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["facelets"], "????U????????R????????F????????D????????L????????B????");
        assert_eq!(created["data"]["validation"]["is_valid"], false);
        assert_eq!(created["data"]["validation"]["errors"][0], "48 stickers not filled in yet.");

        let (status, body) = call(
            &app,
            "PUT",
            &format!("/api/sessions/{}/stickers", id),
            Some(json!({"face": "Front", "index": 0, "color": "W"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cube"]["F"][0], "W");
        assert_eq!(body["data"]["facelets"].as_str().unwrap().chars().nth(18), Some('U'));

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/sessions/{}/stickers/cycle", id),
            Some(json!({"face": "Front", "index": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cube"]["F"][0], "Y");

        let (status, body) = call(&app, "POST", &format!("/api/sessions/{}/reset", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["cube"]["F"][0].is_null());
    }

    #[tokio::test]
    async fn test_center_edit_is_rejected() {
        let app = app_with(Arc::new(MockSolverApi::responding("mock", "R")));
        let (_, created) = call(&app, "POST", "/api/sessions", None).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "PUT",
            &format!("/api/sessions/{}/stickers", id),
            Some(json!({"face": "Up", "index": 4, "color": "Red"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app_with(Arc::new(MockSolverApi::responding("mock", "R")));
        let (status, _) = call(&app, "GET", &format!("/api/sessions/{}", Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_solve_incomplete_session_is_blocked() {
        let api = Arc::new(MockSolverApi::responding("mock", "R"));
        let app = app_with(api.clone());
        let (_, created) = call(&app, "POST", "/api/sessions", None).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, "POST", &format!("/api/sessions/{}/solve", id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"][0], "48 stickers not filled in yet.");
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_solve_uses_service() {
        let api = Arc::new(MockSolverApi::responding("mock", r#"{"solution": "R' U"}"#));
        let app = app_with(api.clone());

        let (status, body) = call(&app, "POST", "/api/solve", Some(json!({"cube": SCRAMBLED}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["solution"], "R' U");
        assert_eq!(body["data"]["moves"], json!(["R'", "U"]));
        assert_eq!(body["data"]["genuine"], true);
        assert_eq!(body["message"], "Solution Found!");
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_solve_placeholder_is_flagged() {
        let app = app_with(Arc::new(MockSolverApi::failing("mock", "offline")));
        let (status, body) = call(&app, "POST", "/api/solve", Some(json!({"cube": SCRAMBLED}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["source"]["kind"], "placeholder");
        assert_eq!(body["data"]["genuine"], false);
        assert!(body["data"]["notice"].is_string());
    }

    #[tokio::test]
    async fn test_solve_already_solved() {
        let api = Arc::new(MockSolverApi::responding("mock", "R"));
        let app = app_with(api.clone());
        let solved = "W".repeat(9) + &"R".repeat(9) + &"G".repeat(9) + &"Y".repeat(9) + &"O".repeat(9) + &"B".repeat(9);
        let (status, body) = call(&app, "POST", "/api/solve", Some(json!({"cube": solved}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["moves"], json!([]));
        assert_eq!(body["message"], "Cube Already Solved!");
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_and_encode() {
        let app = app_with(Arc::new(MockSolverApi::responding("mock", "R")));
        let (status, body) = call(&app, "POST", "/api/validate", Some(json!({"cube": SCRAMBLED}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_valid"], true);

        let (status, body) = call(&app, "POST", "/api/encode", Some(json!({"cube": SCRAMBLED}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["complete"], true);
        assert_eq!(&body["data"]["facelets"].as_str().unwrap()[..10], "RUUUUUUUUU");

        let (status, _) = call(&app, "POST", "/api/encode", Some(json!({"cube": "WWW"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_classify() {
        let app = app_with(Arc::new(MockSolverApi::responding("mock", "R")));
        let (status, body) = call(
            &app,
            "POST",
            "/api/classify",
            Some(json!({"r": 0, "g": 155, "b": 72, "strategy": "weighted"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["color"], "Green");
        assert_eq!(body["data"]["strategy"], "weighted");

        let (_, body) = call(&app, "POST", "/api/classify", Some(json!({"r": 255, "g": 213, "b": 0}))).await;
        assert_eq!(body["data"]["color"], "Yellow");
        assert_eq!(body["data"]["strategy"], "hsl");
    }
}
