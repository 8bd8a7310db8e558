//! Funding pots

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use colony_common::{PotId, TokenId};

use crate::error::{LedgerError, LedgerResult};

/// A balance bucket per token, owned by a domain or a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pot {
    /// Identifier of the pot
    pub id: PotId,
    /// Balance per token
    pub balances: BTreeMap<TokenId, u128>,
}

impl Pot {
    fn new(id: PotId) -> Self {
        Self {
            id,
            balances: BTreeMap::new(),
        }
    }

    /// The pot's balance in one token
    pub fn balance(&self, token: TokenId) -> u128 {
        self.balances.get(&token).copied().unwrap_or(0)
    }
}

/// The pot ledger: allocates pot ids monotonically and moves balances
/// between pots
#[derive(Debug, Clone)]
pub struct PotLedger {
    pots: HashMap<PotId, Pot>,
    next_pot: u64,
}

impl PotLedger {
    /// Create a ledger with pot 1 already allocated (the root domain pot)
    pub fn new() -> Self {
        let mut pots = HashMap::new();
        pots.insert(PotId(1), Pot::new(PotId(1)));
        Self { pots, next_pot: 2 }
    }

    /// Allocate the next pot
    pub fn add_pot(&mut self) -> PotId {
        let id = PotId(self.next_pot);
        self.next_pot += 1;
        self.pots.insert(id, Pot::new(id));
        id
    }

    /// Look up a pot
    pub fn pot(&self, id: PotId) -> LedgerResult<&Pot> {
        self.pots.get(&id).ok_or(LedgerError::PotNotFound(id))
    }

    /// A pot's balance in one token
    pub fn balance(&self, id: PotId, token: TokenId) -> LedgerResult<u128> {
        Ok(self.pot(id)?.balance(token))
    }

    /// Credit a pot directly. Only the issuance path uses this; everything
    /// else moves value between existing pots.
    pub fn credit(&mut self, id: PotId, token: TokenId, amount: u128) -> LedgerResult<()> {
        let pot = self.pots.get_mut(&id).ok_or(LedgerError::PotNotFound(id))?;
        let balance = pot.balances.entry(token).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(id))?;
        Ok(())
    }

    /// Debit a pot without a destination: the claimed payout leaves the
    /// ledger for the claimant's own account.
    pub fn debit(&mut self, id: PotId, token: TokenId, amount: u128) -> LedgerResult<()> {
        let available = self.balance(id, token)?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                pot: id,
                available,
                required: amount,
            });
        }
        let pot = self.pots.get_mut(&id).expect("validated above");
        *pot.balances.entry(token).or_insert(0) -= amount;
        Ok(())
    }

    /// Move `amount` of `token` from one pot to another.
    ///
    /// `source_floor` is the balance that must remain in the source after
    /// the move — the committed unclaimed payouts when the source is a task
    /// pot, zero otherwise.
    pub fn move_funds(
        &mut self,
        source: PotId,
        dest: PotId,
        token: TokenId,
        amount: u128,
        source_floor: u128,
    ) -> LedgerResult<()> {
        // validate both sides before mutating either
        let available = self.balance(source, token)?;
        self.pot(dest)?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                pot: source,
                available,
                required: amount,
            });
        }
        let remaining = available - amount;
        if remaining < source_floor {
            return Err(LedgerError::PayoutExceedsPot {
                pot: source,
                committed: source_floor,
                balance: remaining,
            });
        }
        let dest_balance = self.balance(dest, token)?;
        dest_balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(dest))?;

        let source_pot = self.pots.get_mut(&source).expect("validated above");
        *source_pot.balances.entry(token).or_insert(0) -= amount;
        let dest_pot = self.pots.get_mut(&dest).expect("validated above");
        *dest_pot.balances.entry(token).or_insert(0) += amount;

        debug!(%source, %dest, %token, amount, "moved funds");
        Ok(())
    }
}

impl Default for PotLedger {
    fn default() -> Self {
        Self::new()
    }
}
