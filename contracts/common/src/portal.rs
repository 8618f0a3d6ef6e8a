//! Custody Portal Destination Model
//!
//! Keyed-deposit yield destination shared by the single-destination
//! allocator and the multi-asset vault. Every deposit is tracked under
//! a monotonically increasing external deposit id and can be topped
//! up, partially withdrawn, or fully unwound. Funds live on the
//! portal's account on the per-asset `TokenLedger`.

use crate::errors::{PoolBtcError, PoolBtcResult};
use crate::math::safe_add;
use crate::token::TokenLedger;
use crate::types::{Address, AssetId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// A single tracked deposit at the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PortalDeposit {
    /// Account that placed the deposit
    pub depositor: Address,
    /// Asset the deposit is denominated in
    pub asset: AssetId,
    /// External deposit id (unique across all depositors and assets)
    pub deposit_id: u64,
    /// Remaining balance of the deposit
    pub balance: u64,
}

/// Keyed-deposit destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CustodyPortal {
    address: Address,
    deposit_count: u64,
    deposits: Vec<PortalDeposit>,
}

impl CustodyPortal {
    /// Create a new empty portal holding funds at `address`
    pub fn new(address: Address) -> Self {
        Self {
            address,
            deposit_count: 0,
            deposits: Vec::new(),
        }
    }

    /// The portal's account on each asset ledger
    pub fn address(&self) -> Address {
        self.address
    }

    /// Total number of deposit ids ever minted
    pub fn deposit_count(&self) -> u64 {
        self.deposit_count
    }

    /// Remaining balance of a deposit (0 when no record exists)
    pub fn balance_of(&self, depositor: &Address, asset: &AssetId, deposit_id: u64) -> u64 {
        self.deposits
            .iter()
            .find(|d| &d.depositor == depositor && &d.asset == asset && d.deposit_id == deposit_id)
            .map(|d| d.balance)
            .unwrap_or(0)
    }

    /// Pull `amount` from `depositor` and open a new deposit, returning
    /// the freshly minted external deposit id. Requires an allowance
    /// from the depositor to the portal.
    pub fn deposit(
        &mut self,
        ledger: &mut TokenLedger,
        depositor: Address,
        amount: u64,
    ) -> PoolBtcResult<u64> {
        if amount == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        let deposit_id = safe_add(self.deposit_count, 1)?;
        ledger.transfer_from(self.address, depositor, self.address, amount)?;
        self.deposit_count = deposit_id;
        self.deposits.push(PortalDeposit {
            depositor,
            asset: ledger.asset(),
            deposit_id,
            balance: amount,
        });
        Ok(deposit_id)
    }

    /// Pull `amount` from `depositor` into one of its existing deposits
    pub fn top_up(
        &mut self,
        ledger: &mut TokenLedger,
        depositor: Address,
        deposit_id: u64,
        amount: u64,
    ) -> PoolBtcResult<()> {
        if amount == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        let asset = ledger.asset();
        let position = self
            .find(&depositor, &asset, deposit_id)
            .ok_or(PoolBtcError::DepositNotFound {
                owner: depositor,
                deposit_id,
            })?;
        let new_balance = safe_add(self.deposits[position].balance, amount)?;
        ledger.transfer_from(self.address, depositor, self.address, amount)?;
        self.deposits[position].balance = new_balance;
        Ok(())
    }

    /// Push `amount` of a deposit back to its depositor. The record is
    /// removed once its balance reaches zero, so a fully withdrawn id
    /// reads the same as one that never existed.
    pub fn withdraw(
        &mut self,
        ledger: &mut TokenLedger,
        depositor: Address,
        deposit_id: u64,
        amount: u64,
    ) -> PoolBtcResult<()> {
        if amount == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        let asset = ledger.asset();
        let position = self
            .find(&depositor, &asset, deposit_id)
            .ok_or(PoolBtcError::DepositNotFound {
                owner: depositor,
                deposit_id,
            })?;
        let balance = self.deposits[position].balance;
        if amount > balance {
            return Err(PoolBtcError::InsufficientBalance {
                available: balance,
                requested: amount,
            });
        }
        ledger.transfer(self.address, depositor, amount)?;
        if amount == balance {
            self.deposits.swap_remove(position);
        } else {
            self.deposits[position].balance = balance - amount;
        }
        Ok(())
    }

    fn find(&self, depositor: &Address, asset: &AssetId, deposit_id: u64) -> Option<usize> {
        self.deposits.iter().position(|d| {
            &d.depositor == depositor && &d.asset == asset && d.deposit_id == deposit_id
        })
    }
}
