//! Single-Destination Allocator
//!
//! Routes the owning vault's pooled base asset into one trusted
//! custody portal, tracked as a single `CustodyPosition` with a
//! running principal balance.
//!
//! ## Core Operations
//!
//! - **allocate**: pull surplus liquidity from the owning vault and
//!   place it at the portal
//! - **withdraw**: partially or fully unwind the position back to the
//!   owning vault
//! - **release**: governance-triggered emergency full unwind
//! - **total_assets**: principal currently placed externally
//!
//! The first allocate after an empty state mints a fresh external
//! deposit id; every further allocate tops up that same id. Partial
//! withdrawals keep the id; withdrawing the full principal returns the
//! position to empty.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use poolbtc_common::{
    errors::{PoolBtcError, PoolBtcResult},
    events::{EventLog, PoolBtcEvent},
    math::safe_add,
    portal::CustodyPortal,
    token::TokenLedger,
    types::{Address, AssetId, CustodyPosition},
};

// ============ Allocator State ============

/// State for the single-destination allocator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AllocatorState {
    /// The allocator's own account on the base-asset ledger
    pub address: Address,
    /// Base asset this allocator routes
    pub asset: AssetId,
    /// Owning vault allowed to allocate and withdraw
    pub owning_vault: Address,
    /// Governance principal allowed to release
    pub governance: Address,
    /// Current external position
    pub position: CustodyPosition,
}

impl AllocatorState {
    /// Create a new allocator with an empty position
    pub fn new(address: Address, asset: AssetId, owning_vault: Address, governance: Address) -> Self {
        Self {
            address,
            asset,
            owning_vault,
            governance,
            position: CustodyPosition::empty(),
        }
    }
}

// ============ Operations ============

/// Pull `amount` of the base asset from the owning vault and place it
/// at the portal. A zero amount is a successful no-op.
pub fn allocate(
    state: &mut AllocatorState,
    caller: Address,
    amount: u64,
    ledger: &mut TokenLedger,
    portal: &mut CustodyPortal,
    events: &mut EventLog,
) -> PoolBtcResult<()> {
    ensure_vault(state, caller)?;
    ensure_asset(state, ledger)?;
    if amount == 0 {
        return Ok(());
    }

    safe_add(state.position.principal, amount)?;
    ledger.transfer_from(state.address, state.owning_vault, state.address, amount)?;
    ledger.approve(state.address, portal.address(), amount);

    let old_deposit_id = state.position.deposit_id;
    let deposit_id = if state.position.is_open() {
        portal.top_up(ledger, state.address, old_deposit_id, amount)?;
        state.position.top_up(amount)?;
        old_deposit_id
    } else {
        let fresh_id = portal.deposit(ledger, state.address, amount)?;
        state.position = CustodyPosition::open(fresh_id, amount);
        fresh_id
    };

    events.emit(PoolBtcEvent::DepositAllocated {
        old_deposit_id,
        new_deposit_id: deposit_id,
        amount,
        total_principal: state.position.principal,
    });
    Ok(())
}

/// Pull `amount` of the position back out of the portal and forward it
/// to the owning vault. A partial withdrawal keeps the external id;
/// withdrawing the full principal empties the position.
pub fn withdraw(
    state: &mut AllocatorState,
    caller: Address,
    amount: u64,
    ledger: &mut TokenLedger,
    portal: &mut CustodyPortal,
    events: &mut EventLog,
) -> PoolBtcResult<()> {
    ensure_vault(state, caller)?;
    ensure_asset(state, ledger)?;
    if !state.position.is_open() {
        return Err(PoolBtcError::NothingToWithdraw);
    }
    if amount == 0 {
        return Err(PoolBtcError::ZeroAmount);
    }
    if amount > state.position.principal {
        return Err(PoolBtcError::InsufficientPrincipal {
            available: state.position.principal,
            requested: amount,
        });
    }

    let deposit_id = state.position.deposit_id;
    portal.withdraw(ledger, state.address, deposit_id, amount)?;
    ledger.transfer(state.address, state.owning_vault, amount)?;
    state.position.reduce(amount)?;

    events.emit(PoolBtcEvent::DepositWithdrawn { deposit_id, amount });
    Ok(())
}

/// Governance-triggered emergency unwind: pull the full remaining
/// principal back to the owning vault and clear the position.
/// Returns the amount released.
pub fn release(
    state: &mut AllocatorState,
    caller: Address,
    ledger: &mut TokenLedger,
    portal: &mut CustodyPortal,
    events: &mut EventLog,
) -> PoolBtcResult<u64> {
    ensure_governance(state, caller)?;
    ensure_asset(state, ledger)?;
    if !state.position.is_open() {
        return Err(PoolBtcError::NothingToWithdraw);
    }

    let (deposit_id, amount) = (state.position.deposit_id, state.position.principal);
    portal.withdraw(ledger, state.address, deposit_id, amount)?;
    ledger.transfer(state.address, state.owning_vault, amount)?;
    state.position.close();

    events.emit(PoolBtcEvent::DepositReleased { deposit_id, amount });
    Ok(amount)
}

/// Principal currently placed at the portal. A pure read of tracked
/// state, not a live query of the destination.
pub fn total_assets(state: &AllocatorState) -> u64 {
    state.position.principal
}

/// The external deposit id currently in use (0 when empty)
pub fn deposit_id(state: &AllocatorState) -> u64 {
    state.position.deposit_id
}

fn ensure_vault(state: &AllocatorState, caller: Address) -> PoolBtcResult<()> {
    if caller != state.owning_vault {
        return Err(PoolBtcError::CallerNotVault { caller });
    }
    Ok(())
}

fn ensure_governance(state: &AllocatorState, caller: Address) -> PoolBtcResult<()> {
    if caller != state.governance {
        return Err(PoolBtcError::Unauthorized {
            expected: state.governance,
            actual: caller,
        });
    }
    Ok(())
}

fn ensure_asset(state: &AllocatorState, ledger: &TokenLedger) -> PoolBtcResult<()> {
    if ledger.asset() != state.asset {
        return Err(PoolBtcError::UnsupportedAsset {
            asset: ledger.asset(),
        });
    }
    Ok(())
}

// ============ Tests ============
