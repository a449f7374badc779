use anyhow::Result;
use async_trait::async_trait;

/// One remote solving service. Takes a 54-character facelet string and
/// returns the raw response body of a successful request.
#[async_trait]
pub trait SolverApi: Send + Sync {
    fn name(&self) -> &str;
    async fn request(&self, facelets: &str) -> Result<String>;
}
