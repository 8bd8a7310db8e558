//! Error types for the funding ledger and issuance controller

use colony_common::{DomainId, PotId};
use thiserror::Error;

/// Errors from pot and domain operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// No pot exists with the given id
    #[error("Pot not found: {0}")]
    PotNotFound(PotId),

    /// No domain exists with the given id
    #[error("Domain not found: {0}")]
    DomainNotFound(DomainId),

    /// The source pot cannot cover the transfer
    #[error("Insufficient balance in pot {pot}: have {available}, need {required}")]
    InsufficientBalance {
        /// The source pot
        pot: PotId,
        /// Its current balance in the token
        available: u128,
        /// The amount the transfer needs
        required: u128,
    },

    /// The move or payout would leave a task pot below its committed payouts
    #[error("Committed payouts exceed pot {pot} balance: committed {committed}, balance {balance}")]
    PayoutExceedsPot {
        /// The task pot
        pot: PotId,
        /// The committed payout total
        committed: u128,
        /// The balance that would remain
        balance: u128,
    },

    /// A balance would overflow
    #[error("Balance overflow in pot {0}")]
    BalanceOverflow(PotId),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors from issuance policy checks
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IssuanceError {
    /// The cooldown window since the last rate change has not elapsed
    #[error("Rate change cooldown not elapsed: {remaining_secs}s remaining")]
    CooldownNotElapsed {
        /// Seconds until the next change is allowed
        remaining_secs: u64,
    },

    /// The new rate differs from the old by more than 10%
    #[error("Rate change too large: {0} tenths of a percent over the old rate")]
    RateChangeTooLarge(u128),

    /// The supplied precision factor rounds a per-unit rate to zero
    #[error("Precision too low: a per-unit rate rounds to zero")]
    PrecisionTooLow,

    /// Minting this amount would exceed the global supply ceiling
    #[error("Supply ceiling exceeded: supply {supply}, ceiling {ceiling}, requested {requested}")]
    SupplyCeilingExceeded {
        /// Current total supply
        supply: u128,
        /// The configured ceiling
        ceiling: u128,
        /// The requested mint amount
        requested: u128,
    },

    /// The requested amount exceeds what the elapsed time allows
    #[error("Amount exceeds allowance: allowed {allowed}, requested {requested}")]
    AmountExceedsAllowance {
        /// The currently mintable maximum
        allowed: u128,
        /// The requested mint amount
        requested: u128,
    },

    /// The rate itself is malformed (zero period, overflowing arithmetic)
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
}

/// Result type for issuance operations
pub type IssuanceResult<T> = Result<T, IssuanceError>;
