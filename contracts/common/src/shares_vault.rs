//! Shares Vault Destination Model
//!
//! Share-issuing yield destination: deposits mint shares against the
//! vault's live asset balance, withdrawals and redemptions burn them.
//! Quotes round against the caller, and an empty vault quotes 1:1 for
//! the first depositor.
//!
//! The vault's total assets are its balance on the asset `TokenLedger`,
//! so yield accruing at the destination is simply base asset arriving
//! on that account.

use crate::errors::{PoolBtcError, PoolBtcResult};
use crate::math::{assets_to_shares, safe_add, safe_sub, shares_to_assets, Rounding};
use crate::token::TokenLedger;
use crate::types::{Address, AssetId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Share balance entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ShareBalance {
    /// Holder address
    pub owner: Address,
    /// Shares held
    pub shares: u64,
}

/// Share-issuing destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct SharesVault {
    address: Address,
    asset: AssetId,
    total_shares: u64,
    holdings: Vec<ShareBalance>,
}

impl SharesVault {
    /// Create a new empty vault for `asset`, holding funds at `address`
    pub fn new(address: Address, asset: AssetId) -> Self {
        Self {
            address,
            asset,
            total_shares: 0,
            holdings: Vec::new(),
        }
    }

    /// The vault's account on the asset ledger
    pub fn address(&self) -> Address {
        self.address
    }

    /// The asset this vault accepts
    pub fn asset(&self) -> AssetId {
        self.asset
    }

    /// Total shares outstanding
    pub fn total_shares(&self) -> u64 {
        self.total_shares
    }

    /// Live asset balance backing the shares
    pub fn total_assets(&self, ledger: &TokenLedger) -> u64 {
        ledger.balance_of(&self.address)
    }

    /// Shares held by `owner`
    pub fn shares_of(&self, owner: &Address) -> u64 {
        self.holdings
            .iter()
            .find(|h| &h.owner == owner)
            .map(|h| h.shares)
            .unwrap_or(0)
    }

    /// Shares that a deposit of `assets` would mint (rounded down)
    pub fn preview_deposit(&self, ledger: &TokenLedger, assets: u64) -> PoolBtcResult<u64> {
        assets_to_shares(
            assets,
            self.total_shares,
            self.total_assets(ledger),
            Rounding::Down,
        )
    }

    /// Shares that withdrawing `assets` would burn (rounded up)
    pub fn preview_withdraw(&self, ledger: &TokenLedger, assets: u64) -> PoolBtcResult<u64> {
        assets_to_shares(
            assets,
            self.total_shares,
            self.total_assets(ledger),
            Rounding::Up,
        )
    }

    /// Assets that redeeming `shares` would return (rounded down)
    pub fn preview_redeem(&self, ledger: &TokenLedger, shares: u64) -> PoolBtcResult<u64> {
        shares_to_assets(
            shares,
            self.total_shares,
            self.total_assets(ledger),
            Rounding::Down,
        )
    }

    /// Pull `assets` from `caller` and mint shares to `receiver`,
    /// returning the shares minted. Requires an allowance from the
    /// caller to the vault.
    pub fn deposit(
        &mut self,
        ledger: &mut TokenLedger,
        caller: Address,
        assets: u64,
        receiver: Address,
    ) -> PoolBtcResult<u64> {
        if assets == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        // Quote before the pull lands on our own balance
        let shares = self.preview_deposit(ledger, assets)?;
        let new_total = safe_add(self.total_shares, shares)?;
        safe_add(self.shares_of(&receiver), shares)?;
        ledger.transfer_from(self.address, caller, self.address, assets)?;
        self.credit_shares(receiver, shares);
        self.total_shares = new_total;
        Ok(shares)
    }

    /// Burn exactly enough of `caller`'s shares to send `assets` to
    /// `receiver`, returning the shares burned.
    pub fn withdraw(
        &mut self,
        ledger: &mut TokenLedger,
        caller: Address,
        assets: u64,
        receiver: Address,
    ) -> PoolBtcResult<u64> {
        if assets == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        let shares = self.preview_withdraw(ledger, assets)?;
        let held = self.shares_of(&caller);
        if held < shares {
            return Err(PoolBtcError::InsufficientBalance {
                available: held,
                requested: shares,
            });
        }
        ledger.transfer(self.address, receiver, assets)?;
        self.burn_shares(caller, shares)?;
        Ok(shares)
    }

    /// Burn exactly `shares` of `caller`'s shares and send the
    /// corresponding assets to `receiver`, returning the assets sent.
    pub fn redeem(
        &mut self,
        ledger: &mut TokenLedger,
        caller: Address,
        shares: u64,
        receiver: Address,
    ) -> PoolBtcResult<u64> {
        if shares == 0 {
            return Err(PoolBtcError::ZeroAmount);
        }
        let held = self.shares_of(&caller);
        if held < shares {
            return Err(PoolBtcError::InsufficientBalance {
                available: held,
                requested: shares,
            });
        }
        let assets = self.preview_redeem(ledger, shares)?;
        if assets > 0 {
            ledger.transfer(self.address, receiver, assets)?;
        }
        self.burn_shares(caller, shares)?;
        Ok(assets)
    }

    fn credit_shares(&mut self, owner: Address, shares: u64) {
        if shares == 0 {
            return;
        }
        if let Some(entry) = self.holdings.iter_mut().find(|h| h.owner == owner) {
            entry.shares += shares;
        } else {
            self.holdings.push(ShareBalance { owner, shares });
        }
    }

    fn burn_shares(&mut self, owner: Address, shares: u64) -> PoolBtcResult<()> {
        let position = self
            .holdings
            .iter()
            .position(|h| h.owner == owner)
            .ok_or(PoolBtcError::InsufficientBalance {
                available: 0,
                requested: shares,
            })?;
        self.holdings[position].shares = safe_sub(self.holdings[position].shares, shares)?;
        if self.holdings[position].shares == 0 {
            self.holdings.swap_remove(position);
        }
        self.total_shares = safe_sub(self.total_shares, shares)?;
        Ok(())
    }
}
