//! Multi-Asset Deposit Vault
//!
//! Generalizes external-custody position tracking to many base assets
//! and many logical owners at once. Each `(owner, asset)` pair numbers
//! its deposits with a local id starting at 1 that is never reused;
//! custody of every deposit is delegated to one shared custody portal.
//!
//! ## Core Operations
//!
//! - **deposit_for**: pull a supported asset from the caller and open
//!   a position for `owner` (deposits on behalf of others are allowed)
//! - **withdraw**: all-or-nothing unwind of one position by its owner,
//!   funds forwarded to any receiver
//! - **get_deposit**: balance read; withdrawn and never-created ids
//!   are indistinguishable
//!
//! Governance curates the supported-asset list. Balances are never
//! conflated across assets; no cross-asset aggregate is exposed.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use poolbtc_common::{
    constants::limits,
    errors::{PoolBtcError, PoolBtcResult},
    events::{EventLog, PoolBtcEvent},
    math::safe_add,
    portal::CustodyPortal,
    token::TokenLedger,
    types::{Address, AssetId, ZERO_ADDRESS},
    Vec,
};

// ============ State Types ============

/// One tracked deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AssetDeposit {
    /// Position holder (not necessarily the funder)
    pub owner: Address,
    /// Asset the position is denominated in
    pub asset: AssetId,
    /// Local deposit id, unique per `(owner, asset)`
    pub deposit_id: u64,
    /// Recorded balance
    pub balance: u64,
    /// External deposit id at the shared custody portal
    pub portal_deposit_id: u64,
}

/// Highest local id ever issued for an `(owner, asset)` pair.
/// Survives record deletion so ids are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
struct DepositCounter {
    owner: Address,
    asset: AssetId,
    last_id: u64,
}

/// State for the multi-asset deposit vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct MultiAssetVaultState {
    /// The vault's own account on each asset ledger
    pub address: Address,
    /// Governance principal curating the supported-asset list
    pub governance: Address,
    supported_assets: Vec<AssetId>,
    deposits: Vec<AssetDeposit>,
    counters: Vec<DepositCounter>,
}

impl MultiAssetVaultState {
    /// Create a new vault with an empty supported-asset list
    pub fn new(address: Address, governance: Address) -> Self {
        Self {
            address,
            governance,
            supported_assets: Vec::new(),
            deposits: Vec::new(),
            counters: Vec::new(),
        }
    }

    /// Check whether an asset is on the supported list
    pub fn is_supported(&self, asset: &AssetId) -> bool {
        self.supported_assets.contains(asset)
    }

    /// Supported assets, in unspecified order
    pub fn supported_assets(&self) -> &[AssetId] {
        &self.supported_assets
    }

    /// Balance of one deposit record (0 when no record exists; a
    /// withdrawn id reads the same as one that never existed)
    pub fn get_deposit(&self, owner: &Address, asset: &AssetId, deposit_id: u64) -> u64 {
        self.deposits
            .iter()
            .find(|d| &d.owner == owner && &d.asset == asset && d.deposit_id == deposit_id)
            .map(|d| d.balance)
            .unwrap_or(0)
    }

    /// Total recorded balance for one asset across all owners
    pub fn total_deposited(&self, asset: &AssetId) -> u64 {
        self.deposits
            .iter()
            .filter(|d| &d.asset == asset)
            .map(|d| d.balance)
            .sum()
    }

    fn next_deposit_id(&self, owner: &Address, asset: &AssetId) -> PoolBtcResult<u64> {
        let last = self
            .counters
            .iter()
            .find(|c| &c.owner == owner && &c.asset == asset)
            .map(|c| c.last_id)
            .unwrap_or(0);
        safe_add(last, 1)
    }

    fn record_deposit_id(&mut self, owner: Address, asset: AssetId, deposit_id: u64) {
        if let Some(counter) = self
            .counters
            .iter_mut()
            .find(|c| c.owner == owner && c.asset == asset)
        {
            counter.last_id = deposit_id;
        } else {
            self.counters.push(DepositCounter {
                owner,
                asset,
                last_id: deposit_id,
            });
        }
    }

    fn ensure_governance(&self, caller: Address) -> PoolBtcResult<()> {
        if caller != self.governance {
            return Err(PoolBtcError::Unauthorized {
                expected: self.governance,
                actual: caller,
            });
        }
        Ok(())
    }
}

// ============ Governance Operations ============

/// Add an asset to the supported list. Governance only.
pub fn add_supported_asset(
    state: &mut MultiAssetVaultState,
    caller: Address,
    asset: AssetId,
    events: &mut EventLog,
) -> PoolBtcResult<()> {
    state.ensure_governance(caller)?;
    if asset == ZERO_ADDRESS {
        return Err(PoolBtcError::ZeroAddress);
    }
    if state.is_supported(&asset) {
        return Err(PoolBtcError::AssetAlreadySupported { asset });
    }
    state.supported_assets.push(asset);
    events.emit(PoolBtcEvent::SupportedAssetAdded { asset });
    Ok(())
}

/// Remove an asset from the supported list. Governance only. Existing
/// positions stay withdrawable; only new deposits are blocked.
pub fn remove_supported_asset(
    state: &mut MultiAssetVaultState,
    caller: Address,
    asset: AssetId,
    events: &mut EventLog,
) -> PoolBtcResult<()> {
    state.ensure_governance(caller)?;
    let position = state
        .supported_assets
        .iter()
        .position(|a| a == &asset)
        .ok_or(PoolBtcError::UnsupportedAsset { asset })?;
    state.supported_assets.swap_remove(position);
    events.emit(PoolBtcEvent::SupportedAssetRemoved { asset });
    Ok(())
}

// ============ Deposit Operations ============

/// Pull `amount` of a supported asset from `caller` and open a
/// position for `owner`, forwarding custody to the shared portal.
/// Returns the freshly minted local deposit id.
pub fn deposit_for(
    state: &mut MultiAssetVaultState,
    caller: Address,
    amount: u64,
    owner: Address,
    ledger: &mut TokenLedger,
    portal: &mut CustodyPortal,
    events: &mut EventLog,
) -> PoolBtcResult<u64> {
    let asset = ledger.asset();
    if !state.is_supported(&asset) {
        return Err(PoolBtcError::UnsupportedAsset { asset });
    }
    if owner == ZERO_ADDRESS {
        return Err(PoolBtcError::ZeroAddress);
    }
    if amount == 0 {
        return Err(PoolBtcError::ZeroAmount);
    }
    if amount < limits::MIN_DEPOSIT {
        return Err(PoolBtcError::BelowMinimum {
            amount,
            minimum: limits::MIN_DEPOSIT,
        });
    }

    let deposit_id = state.next_deposit_id(&owner, &asset)?;
    ledger.transfer_from(state.address, caller, state.address, amount)?;
    ledger.approve(state.address, portal.address(), amount);
    let portal_deposit_id = portal.deposit(ledger, state.address, amount)?;

    state.record_deposit_id(owner, asset, deposit_id);
    state.deposits.push(AssetDeposit {
        owner,
        asset,
        deposit_id,
        balance: amount,
        portal_deposit_id,
    });
    events.emit(PoolBtcEvent::MultiAssetDepositCreated {
        owner,
        asset,
        deposit_id,
        amount,
    });
    Ok(deposit_id)
}

/// Unwind one position in full: pull the recorded balance from the
/// portal, forward it to `receiver`, and delete the record. Only the
/// position's owner may withdraw, regardless of who funded it.
/// Returns the amount withdrawn.
pub fn withdraw(
    state: &mut MultiAssetVaultState,
    caller: Address,
    deposit_id: u64,
    receiver: Address,
    ledger: &mut TokenLedger,
    portal: &mut CustodyPortal,
    events: &mut EventLog,
) -> PoolBtcResult<u64> {
    let asset = ledger.asset();
    if receiver == ZERO_ADDRESS {
        return Err(PoolBtcError::ZeroAddress);
    }
    let position = state
        .deposits
        .iter()
        .position(|d| d.owner == caller && d.asset == asset && d.deposit_id == deposit_id)
        .ok_or(PoolBtcError::DepositNotFound {
            owner: caller,
            deposit_id,
        })?;

    let record = state.deposits[position].clone();
    portal.withdraw(ledger, state.address, record.portal_deposit_id, record.balance)?;
    ledger.transfer(state.address, receiver, record.balance)?;
    state.deposits.swap_remove(position);

    events.emit(PoolBtcEvent::MultiAssetDepositWithdrawn {
        owner: caller,
        asset,
        deposit_id,
        amount: record.balance,
        receiver,
    });
    Ok(record.balance)
}

// ============ Tests ============
