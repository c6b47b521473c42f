//! Request handlers.
//!
//! Handlers delegate to `regatta_core` for domain logic and to the
//! repositories in `regatta_db` for storage, mapping errors via
//! [`AppError`].

pub mod notification;
pub mod pricing;
pub mod public;
pub mod strategy;
pub mod timer;

use regatta_core::error::CoreError;
use regatta_core::types::DbId;
use regatta_db::repositories::RaceRepo;

use crate::error::{AppError, AppResult};

/// Verify that a race exists, returning NotFound if it does not.
pub(crate) async fn ensure_race_exists(pool: &sqlx::PgPool, race_id: DbId) -> AppResult<()> {
    if !RaceRepo::exists(pool, race_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Race",
            id: race_id,
        }));
    }
    Ok(())
}
