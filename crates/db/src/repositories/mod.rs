//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async data access
//! methods that accept `&PgPool` as the first argument.

pub mod coach_profile_repo;
pub mod crew_member_repo;
pub mod notification_repo;
pub mod race_preparation_repo;
pub mod race_repo;
pub mod race_strategy_repo;
pub mod regatta_notice_repo;
pub mod regatta_repo;
pub mod sailor_profile_repo;
pub mod strategy_share_repo;
pub mod timer_session_repo;
pub mod user_repo;

pub use coach_profile_repo::CoachProfileRepo;
pub use crew_member_repo::CrewMemberRepo;
pub use notification_repo::NotificationRepo;
pub use race_preparation_repo::RacePreparationRepo;
pub use race_repo::RaceRepo;
pub use race_strategy_repo::RaceStrategyRepo;
pub use regatta_notice_repo::RegattaNoticeRepo;
pub use regatta_repo::RegattaRepo;
pub use sailor_profile_repo::SailorProfileRepo;
pub use strategy_share_repo::StrategyShareRepo;
pub use timer_session_repo::TimerSessionRepo;
pub use user_repo::UserRepo;
