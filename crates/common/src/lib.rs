//! Common types for the Colony governance engine
//!
//! This crate provides the identifier newtypes, the 20-byte account address,
//! and the configuration shared by every other colony crate.

pub mod config;
pub mod types;
pub mod utils;

pub use config::ColonyConfig;
pub use types::{Address, AddressError, DomainId, PotId, SkillId, TaskId, TokenId};
pub use utils::timestamp_secs;
