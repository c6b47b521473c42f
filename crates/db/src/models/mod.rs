//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, the `Deserialize` DTOs used for writes, and conversions
//! into the `regatta_core` domain records where one exists.

pub mod coach_profile;
pub mod crew_member;
pub mod notification;
pub mod race;
pub mod race_preparation;
pub mod race_strategy;
pub mod regatta;
pub mod sailor_profile;
pub mod strategy_share;
pub mod timer;
pub mod user;
