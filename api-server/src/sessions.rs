use chrono::Utc;
use cube_core::{CubeError, CubeState};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ApiError, Session};

/// In-memory cube sessions. Each session owns one cube state; all changes
/// go through the cube's own mutation methods.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_session(&self) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            cube: CubeState::with_centers(),
            created_at: now,
            updated_at: now,
        };
        self.sessions.write().await.insert(session.id, session.clone());
        session
    }

    pub async fn get_session(&self, id: Uuid) -> Result<Session, ApiError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ApiError::SessionNotFound(id))
    }

    /// Applies `change` to the session's cube. A failed change leaves the
    /// session untouched.
    pub async fn update_cube<T>(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut CubeState) -> Result<T, CubeError>,
    ) -> Result<(Session, T), ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound(id))?;
        let mut cube = session.cube.clone();
        let value = change(&mut cube)?;
        session.cube = cube;
        session.updated_at = Utc::now();
        Ok((session.clone(), value))
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<(), ApiError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::SessionNotFound(id))
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
