//! Core Types for the poolBTC Allocation Core
//!
//! Fundamental data structures shared across the allocation contracts.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{PoolBtcError, PoolBtcResult};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for asset identifiers (the address of the asset's ledger)
pub type AssetId = Address;

/// The null identifier
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Derive a deterministic component address from a tag and a seed
/// address, used when wiring up allocator, dispatcher, and multi-asset
/// vault accounts.
pub fn derive_address(tag: &str, seed: &Address) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    hasher.update(seed);
    hasher.finalize().into()
}

// ============ Position Types ============

/// External-custody position record.
///
/// Shared by the single-destination allocator (cardinality one) and the
/// multi-asset vault (one per deposit record). `deposit_id == 0` means
/// no position is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CustodyPosition {
    /// External deposit id at the destination (0 = none)
    pub deposit_id: u64,
    /// Base asset currently placed externally, as tracked here
    pub principal: u64,
}

impl CustodyPosition {
    /// An empty position
    pub fn empty() -> Self {
        Self::default()
    }

    /// Open a position under a freshly minted external id
    pub fn open(deposit_id: u64, amount: u64) -> Self {
        Self {
            deposit_id,
            principal: amount,
        }
    }

    /// Returns true if a position is currently open
    pub fn is_open(&self) -> bool {
        self.deposit_id != 0
    }

    /// Add to the open position's principal
    pub fn top_up(&mut self, amount: u64) -> PoolBtcResult<()> {
        self.principal = self
            .principal
            .checked_add(amount)
            .ok_or(PoolBtcError::Overflow)?;
        Ok(())
    }

    /// Remove from the open position's principal. Clears the external
    /// id when the principal reaches zero; a partial reduction leaves
    /// the id unchanged.
    pub fn reduce(&mut self, amount: u64) -> PoolBtcResult<()> {
        if amount > self.principal {
            return Err(PoolBtcError::InsufficientPrincipal {
                available: self.principal,
                requested: amount,
            });
        }
        self.principal -= amount;
        if self.principal == 0 {
            self.deposit_id = 0;
        }
        Ok(())
    }

    /// Close the position, returning the cleared `(deposit_id, principal)`
    pub fn close(&mut self) -> (u64, u64) {
        let closed = (self.deposit_id, self.principal);
        *self = Self::empty();
        closed
    }
}
