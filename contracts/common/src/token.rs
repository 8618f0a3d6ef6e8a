//! Base-Asset Token Ledger
//!
//! In-memory fungible-token ledger with the pull/push semantics the
//! allocation components consume: `transfer`, `transfer_from` gated by
//! allowances, `balance_of`, and `mint` for seeding balances and for
//! simulating destination-side yield.
//!
//! ## Key Features
//!
//! - **Conservation**: total supply always equals the sum of balances
//! - **Exact Allowances**: pulls consume allowance, none is left standing
//! - **Checked Math**: no silent wrap on any balance movement

use crate::errors::{PoolBtcError, PoolBtcResult};
use crate::math::{safe_add, safe_sub};
use crate::types::{Address, AssetId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Balance entry on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenBalance {
    /// Owner address
    pub owner: Address,
    /// Balance amount in base units
    pub amount: u64,
}

/// Allowance entry: `owner` lets `spender` pull up to `amount`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Allowance {
    pub owner: Address,
    pub spender: Address,
    pub amount: u64,
}

/// Fungible base-asset ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenLedger {
    asset: AssetId,
    total_supply: u64,
    balances: Vec<TokenBalance>,
    allowances: Vec<Allowance>,
}

impl TokenLedger {
    /// Create a new empty ledger for the given asset
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            total_supply: 0,
            balances: Vec::new(),
            allowances: Vec::new(),
        }
    }

    /// The asset this ledger tracks
    pub fn asset(&self) -> AssetId {
        self.asset
    }

    /// Total supply on this ledger
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Balance of an owner (0 when no entry exists)
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances
            .iter()
            .find(|b| &b.owner == owner)
            .map(|b| b.amount)
            .unwrap_or(0)
    }

    /// Remaining allowance from `owner` to `spender`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .iter()
            .find(|a| &a.owner == owner && &a.spender == spender)
            .map(|a| a.amount)
            .unwrap_or(0)
    }

    /// Mint new supply to `to`. Also used by tests to simulate yield
    /// accruing at a destination address.
    pub fn mint(&mut self, to: Address, amount: u64) -> PoolBtcResult<()> {
        if amount == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        let new_supply = safe_add(self.total_supply, amount)?;
        self.credit(to, amount)?;
        self.total_supply = new_supply;
        Ok(())
    }

    /// Set the allowance from `owner` to `spender`
    pub fn approve(&mut self, owner: Address, spender: Address, amount: u64) {
        if let Some(entry) = self
            .allowances
            .iter_mut()
            .find(|a| a.owner == owner && a.spender == spender)
        {
            entry.amount = amount;
        } else {
            self.allowances.push(Allowance {
                owner,
                spender,
                amount,
            });
        }
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(&mut self, from: Address, to: Address, amount: u64) -> PoolBtcResult<()> {
        if amount == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        let available = self.balance_of(&from);
        if available < amount {
            return Err(PoolBtcError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        // Receiver overflow is checked before the debit so a failed
        // transfer moves nothing
        safe_add(self.balance_of(&to), amount)?;
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        Ok(())
    }

    /// Pull `amount` from `from` to `to` on behalf of `spender`,
    /// consuming allowance. A spender moving its own funds needs no
    /// allowance.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> PoolBtcResult<()> {
        if amount == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        if spender != from {
            let granted = self.allowance(&from, &spender);
            if granted < amount {
                return Err(PoolBtcError::InsufficientAllowance {
                    available: granted,
                    requested: amount,
                });
            }
            let available = self.balance_of(&from);
            if available < amount {
                return Err(PoolBtcError::InsufficientBalance {
                    available,
                    requested: amount,
                });
            }
            self.set_allowance(from, spender, granted - amount);
        }
        self.transfer(from, to, amount)
    }

    /// Check that the supply equals the sum of all balances
    pub fn is_conserved(&self) -> bool {
        let held: u128 = self.balances.iter().map(|b| b.amount as u128).sum();
        held == self.total_supply as u128
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: u64) {
        if let Some(entry) = self
            .allowances
            .iter_mut()
            .find(|a| a.owner == owner && a.spender == spender)
        {
            entry.amount = amount;
        }
    }

    fn credit(&mut self, to: Address, amount: u64) -> PoolBtcResult<()> {
        if let Some(entry) = self.balances.iter_mut().find(|b| b.owner == to) {
            entry.amount = safe_add(entry.amount, amount)?;
        } else {
            self.balances.push(TokenBalance { owner: to, amount });
        }
        Ok(())
    }

    fn debit(&mut self, from: Address, amount: u64) -> PoolBtcResult<()> {
        match self.balances.iter_mut().find(|b| b.owner == from) {
            Some(entry) if entry.amount >= amount => {
                entry.amount = safe_sub(entry.amount, amount)?;
                Ok(())
            }
            Some(entry) => Err(PoolBtcError::InsufficientBalance {
                available: entry.amount,
                requested: amount,
            }),
            None => Err(PoolBtcError::InsufficientBalance {
                available: 0,
                requested: amount,
            }),
        }
    }
}
