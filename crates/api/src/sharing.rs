//! Postgres-backed [`ShareSink`] and the public-link operations built on it.

use async_trait::async_trait;
use chrono::Utc;
use regatta_core::error::CoreError;
use regatta_core::public_link::{self, PublicLinkView};
use regatta_core::sharing::{
    CrewDelivery, ShareContext, ShareSink, KIND_COACH_SHARE, KIND_CREW_SHARE,
};
use regatta_core::types::DbId;
use regatta_db::models::notification::NotificationContent;
use regatta_db::repositories::{
    CrewMemberRepo, NotificationRepo, RaceStrategyRepo, StrategyShareRepo,
};
use regatta_db::DbPool;

use crate::error::AppError;

/// Writes shares for one sender through the repositories.
pub struct PgShareSink<'a> {
    pub pool: &'a DbPool,
    /// Base URL of the public web app.
    pub public_web_url: &'a str,
}

#[async_trait]
impl ShareSink for PgShareSink<'_> {
    type Error = AppError;

    async fn share_with_coach(
        &self,
        ctx: &ShareContext<'_>,
        coach_id: DbId,
    ) -> Result<DbId, AppError> {
        let title = ctx.title();
        let content = NotificationContent {
            sender_user_id: ctx.sender_user_id,
            kind: KIND_COACH_SHARE,
            race_id: ctx.race_id,
            title: &title,
            body: ctx.text,
        };
        let share = StrategyShareRepo::share_with_coach(self.pool, coach_id, &content)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "CoachProfile",
                id: coach_id,
            })?;

        tracing::info!(
            user_id = ctx.sender_user_id,
            race_id = ctx.race_id,
            coach_id,
            share_id = share.id,
            "Strategy shared with coach"
        );
        Ok(share.id)
    }

    async fn notify_crew(
        &self,
        ctx: &ShareContext<'_>,
        crew_member_ids: &[DbId],
    ) -> Result<CrewDelivery, AppError> {
        let members =
            CrewMemberRepo::find_selected(self.pool, ctx.sender_user_id, crew_member_ids).await?;

        let mut recipients: Vec<DbId> = members.iter().filter_map(|m| m.member_user_id).collect();
        recipients.sort_unstable();
        recipients.dedup();

        let notified = if recipients.is_empty() {
            0
        } else {
            let title = ctx.title();
            let content = NotificationContent {
                sender_user_id: ctx.sender_user_id,
                kind: KIND_CREW_SHARE,
                race_id: ctx.race_id,
                title: &title,
                body: ctx.text,
            };
            NotificationRepo::create_for_users(self.pool, &recipients, &content)
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        user_id = ctx.sender_user_id,
                        race_id = ctx.race_id,
                        recipients = recipients.len(),
                        "Crew notification batch failed"
                    );
                    AppError::Database(e)
                })? as usize
        };

        let skipped = crew_member_ids.len().saturating_sub(notified);
        tracing::info!(
            user_id = ctx.sender_user_id,
            race_id = ctx.race_id,
            notified,
            skipped,
            "Strategy shared with crew"
        );
        Ok(CrewDelivery { notified, skipped })
    }

    async fn set_public_link(
        &self,
        ctx: &ShareContext<'_>,
        enabled: bool,
    ) -> Result<PublicLinkView, AppError> {
        toggle_public_link(
            self.pool,
            self.public_web_url,
            ctx.race_id,
            ctx.sender_user_id,
            enabled,
        )
        .await
    }
}

/// Turn public sharing on or off for a user's strategy on a race.
pub async fn toggle_public_link(
    pool: &DbPool,
    public_web_url: &str,
    race_id: DbId,
    user_id: DbId,
    enabled: bool,
) -> Result<PublicLinkView, AppError> {
    let row = RaceStrategyRepo::update_public_link(pool, race_id, user_id, |state| {
        public_link::toggle(state, enabled, Utc::now())
    })
    .await?;

    tracing::info!(user_id, race_id, enabled, "Public strategy link updated");
    Ok(row.public_link().view(public_web_url))
}

/// Replace the public token so previously shared links stop working.
pub async fn rotate_public_link(
    pool: &DbPool,
    public_web_url: &str,
    race_id: DbId,
    user_id: DbId,
) -> Result<PublicLinkView, AppError> {
    let row = RaceStrategyRepo::update_public_link(pool, race_id, user_id, |state| {
        public_link::rotate(state, Utc::now())
    })
    .await?;

    tracing::info!(user_id, race_id, "Public strategy link rotated");
    Ok(row.public_link().view(public_web_url))
}
