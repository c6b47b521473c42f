//! Domain logic for the regatta strategy service.
//!
//! This crate has no database or HTTP dependencies. Persistence is reached
//! through the [`aggregate::StrategySource`] and [`sharing::ShareSink`]
//! traits, which the `db` and `api` crates implement.

pub mod aggregate;
pub mod error;
pub mod pricing;
pub mod public_link;
pub mod sharing;
pub mod strategy;
pub mod strategy_text;
pub mod track;
pub mod types;
