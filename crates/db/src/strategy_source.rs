//! Postgres-backed [`StrategySource`] for the strategy aggregator.

use async_trait::async_trait;
use regatta_core::aggregate::StrategySource;
use regatta_core::strategy::{
    AiStrategy, CoachTarget, CrewTarget, Preparation, RaceInfo, SailorProfile,
};
use regatta_core::types::DbId;

use crate::repositories::{
    CoachProfileRepo, CrewMemberRepo, RacePreparationRepo, RaceRepo, RaceStrategyRepo,
    SailorProfileRepo,
};
use crate::DbPool;

/// Reads strategy bundle inputs from the repositories.
#[derive(Clone)]
pub struct PgStrategySource {
    pool: DbPool,
}

impl PgStrategySource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StrategySource for PgStrategySource {
    type Error = sqlx::Error;

    async fn profile_by_id(&self, profile_id: DbId) -> Result<Option<SailorProfile>, sqlx::Error> {
        Ok(SailorProfileRepo::find_by_id(&self.pool, profile_id)
            .await?
            .map(Into::into))
    }

    async fn profile_by_user_id(
        &self,
        user_id: DbId,
    ) -> Result<Option<SailorProfile>, sqlx::Error> {
        Ok(SailorProfileRepo::find_by_user_id(&self.pool, user_id)
            .await?
            .map(Into::into))
    }

    async fn race(&self, race_id: DbId) -> Result<Option<RaceInfo>, sqlx::Error> {
        Ok(RaceRepo::find_by_id(&self.pool, race_id).await?.map(Into::into))
    }

    async fn preparation(
        &self,
        race_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Preparation>, sqlx::Error> {
        Ok(RacePreparationRepo::find(&self.pool, race_id, user_id)
            .await?
            .map(Into::into))
    }

    async fn strategy(
        &self,
        race_id: DbId,
        user_id: DbId,
    ) -> Result<Option<AiStrategy>, sqlx::Error> {
        Ok(RaceStrategyRepo::find(&self.pool, race_id, user_id)
            .await?
            .map(Into::into))
    }

    async fn coaches(&self, user_id: DbId) -> Result<Vec<CoachTarget>, sqlx::Error> {
        let rows = CoachProfileRepo::list_for_sailor(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn crew(&self, user_id: DbId) -> Result<Vec<CrewTarget>, sqlx::Error> {
        let rows = CrewMemberRepo::list_for_sailor(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
