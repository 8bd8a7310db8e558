//! Funding pots, domains, and token issuance for the Colony governance
//! engine
//!
//! Value lives in pots. Domains form a tree rooted at domain 1, each with
//! its own pot; tasks get a pot of their own, seeded from their domain's
//! pot. New supply enters through the issuance controller, which enforces
//! the global ceiling and a rate schedule with bounded rate-of-change.

pub mod domain;
pub mod error;
pub mod issuance;
pub mod pot;

pub use domain::{Domain, DomainRegistry};
pub use error::{IssuanceError, IssuanceResult, LedgerError, LedgerResult};
pub use issuance::{IssuanceRate, TokenIssuanceController};
pub use pot::{Pot, PotLedger};
