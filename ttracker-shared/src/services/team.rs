/// Team service

use std::sync::Arc;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::models::{Team, TeamRequest};
use crate::storage::TeamStorage;

/// Team lookup and creation
#[derive(Clone)]
pub struct TeamService {
    store: Arc<dyn TeamStorage>,
}

impl TeamService {
    pub fn new(store: Arc<dyn TeamStorage>) -> Self {
        Self { store }
    }

    /// Gets a team by ID
    pub async fn get(&self, team_id: i32) -> ServiceResult<Team> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Team {}", team_id)))
    }

    /// Creates a team
    ///
    /// Rejects an empty or overlong name or a zero admin ID before storage
    /// is touched.
    pub async fn create(&self, req: TeamRequest) -> ServiceResult<Team> {
        req.validate()?;

        let team = self.store.create_team(req).await?;
        tracing::debug!(team_id = team.id, admin_id = team.admin_id, "Team created");

        Ok(team)
    }
}
