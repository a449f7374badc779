use cube_core::facelet::{self, FaceletString};
use cube_core::notation::{format_moves, parse_moves};
use cube_core::{CubeState, Move};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::HttpSolverEndpoint;
use crate::api_trait::SolverApi;
use crate::config::SolverConfig;
use crate::response::parse_solver_response;

pub const INCOMPLETE_MESSAGE: &str = "Cube state is incomplete. Please fill in all stickers.";
pub const ALREADY_SOLVED_MESSAGE: &str = "Already solved!";
/// Shown for every cube when no service could be reached. It is an
/// example sequence, not a solution of the cube that was submitted.
pub const PLACEHOLDER_SOLUTION: &str = "R U R' U' R' F R2 U' R' U' R U R' F'";
pub const PLACEHOLDER_NOTICE: &str =
    "Could not reach a solving service. The moves shown are an example only and will not solve this cube.";
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "Failed to solve. Please check your colors.";

/// Where a [`SolveResult`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "endpoint", rename_all = "snake_case")]
pub enum SolutionSource {
    Endpoint(String),
    AlreadySolved,
    Placeholder,
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveResult {
    pub solution: String,
    pub moves: Vec<Move>,
    pub error: Option<String>,
    pub source: SolutionSource,
}

impl SolveResult {
    fn incomplete() -> Self {
        Self {
            solution: String::new(),
            moves: Vec::new(),
            error: Some(INCOMPLETE_MESSAGE.to_string()),
            source: SolutionSource::Incomplete,
        }
    }

    fn already_solved() -> Self {
        Self {
            solution: ALREADY_SOLVED_MESSAGE.to_string(),
            moves: Vec::new(),
            error: None,
            source: SolutionSource::AlreadySolved,
        }
    }

    fn placeholder() -> Self {
        Self {
            solution: PLACEHOLDER_SOLUTION.to_string(),
            moves: parse_moves(PLACEHOLDER_SOLUTION).unwrap_or_default(),
            error: None,
            source: SolutionSource::Placeholder,
        }
    }

    fn from_endpoint(name: &str, moves: Vec<Move>) -> Self {
        Self {
            solution: format_moves(&moves),
            moves,
            error: None,
            source: SolutionSource::Endpoint(name.to_string()),
        }
    }

    /// True only when a service actually computed the moves for this cube
    /// (or no moves are needed).
    pub fn is_genuine(&self) -> bool {
        matches!(
            self.source,
            SolutionSource::Endpoint(_) | SolutionSource::AlreadySolved
        )
    }

    /// Text to show next to a placeholder result.
    pub fn notice(&self) -> Option<&'static str> {
        (self.source == SolutionSource::Placeholder).then_some(PLACEHOLDER_NOTICE)
    }
}

/// Outcome of the checks made before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrivialCheck {
    Incomplete,
    AlreadySolved,
    NeedsSolve,
}

pub fn trivial_check(facelets: &FaceletString) -> TrivialCheck {
    if !facelets.is_complete() {
        TrivialCheck::Incomplete
    } else if facelets.is_solved() {
        TrivialCheck::AlreadySolved
    } else {
        TrivialCheck::NeedsSolve
    }
}

/// Tries each solving service in priority order, one at a time, each
/// bounded by its own timeout. Only an incomplete cube is reported as an
/// error; every other failure ends in the placeholder result.
pub struct Solver {
    endpoints: Vec<Arc<dyn SolverApi>>,
    timeout: Duration,
}

impl Solver {
    pub fn new(endpoints: Vec<Arc<dyn SolverApi>>, timeout: Duration) -> Self {
        Self { endpoints, timeout }
    }

    /// HTTP endpoints for every configured URL, sharing one client.
    pub fn from_config(config: &SolverConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        let endpoints = config
            .endpoints
            .iter()
            .map(|url| Arc::new(HttpSolverEndpoint::with_client(url.clone(), client.clone())) as Arc<dyn SolverApi>)
            .collect();
        Ok(Self::new(endpoints, config.timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn solve(&self, cube: &CubeState) -> SolveResult {
        self.solve_facelets(&facelet::encode(cube)).await
    }

    pub async fn solve_facelets(&self, facelets: &FaceletString) -> SolveResult {
        match trivial_check(facelets) {
            TrivialCheck::Incomplete => return SolveResult::incomplete(),
            TrivialCheck::AlreadySolved => return SolveResult::already_solved(),
            TrivialCheck::NeedsSolve => {}
        }

        for endpoint in &self.endpoints {
            if let Some(moves) = self.attempt(endpoint.as_ref(), facelets.as_str()).await {
                info!(endpoint = endpoint.name(), moves = moves.len(), "solution received");
                return SolveResult::from_endpoint(endpoint.name(), moves);
            }
        }

        warn!(
            endpoints = self.endpoints.len(),
            "all solving services failed, returning placeholder sequence"
        );
        SolveResult::placeholder()
    }

    async fn attempt(&self, endpoint: &dyn SolverApi, facelets: &str) -> Option<Vec<Move>> {
        info!(endpoint = endpoint.name(), "requesting solution");
        match tokio::time::timeout(self.timeout, endpoint.request(facelets)).await {
            Err(_) => {
                warn!(endpoint = endpoint.name(), timeout = ?self.timeout, "solver attempt timed out, trying next");
                None
            }
            Ok(Err(e)) => {
                warn!(endpoint = endpoint.name(), "solver attempt failed, trying next: {:#}", e);
                None
            }
            Ok(Ok(body)) => {
                let moves = parse_solver_response(&body);
                if moves.is_none() {
                    warn!(endpoint = endpoint.name(), "unusable solver response, trying next");
                }
                moves
            }
        }
    }
}
