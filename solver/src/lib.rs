//! Solving a cube state through remote solving services.

pub mod api;
pub mod api_trait;
pub mod config;
pub mod mock_api;
pub mod response;
pub mod solver;

pub use api::HttpSolverEndpoint;
pub use api_trait::SolverApi;
pub use config::{ConfigError, SolverConfig};
pub use solver::{SolutionSource, SolveResult, Solver};
