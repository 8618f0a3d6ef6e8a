//! Multi-Destination Dispatcher
//!
//! Routes the owning vault's pooled base asset into any number of
//! registry-approved share-issuing destinations, with caller-specified
//! slippage bounds in both directions.
//!
//! ## Core Operations
//!
//! - **deposit_to_destination**: pull assets from the owning vault and
//!   deposit them for shares, enforcing a minimum-shares floor
//! - **withdraw_from_destination**: burn shares for an exact asset
//!   amount, enforcing a maximum-shares ceiling
//! - **redeem_from_destination**: burn an exact share amount for
//!   assets, enforcing a minimum-assets floor
//!
//! Every entry point is maintainer-gated and re-checks the registry;
//! all bounds are checked against the quoted outcome before any
//! balance moves, so a failed call moves nothing. The dispatcher never
//! holds base asset at rest; amounts pass through within one call.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use poolbtc_common::{
    errors::{PoolBtcError, PoolBtcResult},
    events::{EventLog, PoolBtcEvent},
    registry::AllocationRegistry,
    shares_vault::SharesVault,
    token::TokenLedger,
    types::Address,
};

// ============ Dispatcher State ============

/// State for the multi-destination dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct DispatcherState {
    /// The dispatcher's own account on the base-asset ledger
    pub address: Address,
    /// Owning vault the dispatcher pulls from and returns to
    pub owning_vault: Address,
}

impl DispatcherState {
    /// Create a new dispatcher
    pub fn new(address: Address, owning_vault: Address) -> Self {
        Self {
            address,
            owning_vault,
        }
    }
}

// ============ Operations ============

/// Pull `assets` from the owning vault and deposit them at an approved
/// destination for shares. Fails with `SharesBelowMinimum` when the
/// quoted shares fall short of `min_shares_out`. Returns the shares
/// received.
pub fn deposit_to_destination(
    state: &DispatcherState,
    registry: &AllocationRegistry,
    caller: Address,
    destination: &mut SharesVault,
    assets: u64,
    min_shares_out: u64,
    ledger: &mut TokenLedger,
    events: &mut EventLog,
) -> PoolBtcResult<u64> {
    registry.ensure_maintainer(caller)?;
    registry.ensure_approved(destination.address())?;
    ensure_asset(destination, ledger)?;
    if assets == 0 {
        return Err(PoolBtcError::ZeroAmount);
    }

    let shares = destination.preview_deposit(ledger, assets)?;
    if shares < min_shares_out {
        return Err(PoolBtcError::SharesBelowMinimum {
            shares,
            min_shares: min_shares_out,
        });
    }

    ledger.transfer_from(state.address, state.owning_vault, state.address, assets)?;
    ledger.approve(state.address, destination.address(), assets);
    let minted = destination.deposit(ledger, state.address, assets, state.address)?;

    events.emit(PoolBtcEvent::DestinationDeposit {
        destination: destination.address(),
        assets,
        shares: minted,
    });
    Ok(minted)
}

/// Burn just enough of the dispatcher's shares at an approved
/// destination to send exactly `assets` to the owning vault. Fails
/// with `SharesAboveMaximum` when the quoted share cost exceeds
/// `max_shares_in`. Returns the shares burned.
pub fn withdraw_from_destination(
    state: &DispatcherState,
    registry: &AllocationRegistry,
    caller: Address,
    destination: &mut SharesVault,
    assets: u64,
    max_shares_in: u64,
    ledger: &mut TokenLedger,
    events: &mut EventLog,
) -> PoolBtcResult<u64> {
    registry.ensure_maintainer(caller)?;
    registry.ensure_approved(destination.address())?;
    ensure_asset(destination, ledger)?;
    if assets == 0 {
        return Err(PoolBtcError::ZeroAmount);
    }

    let shares = destination.preview_withdraw(ledger, assets)?;
    if shares > max_shares_in {
        return Err(PoolBtcError::SharesAboveMaximum {
            shares,
            max_shares: max_shares_in,
        });
    }

    let burned = destination.withdraw(ledger, state.address, assets, state.owning_vault)?;

    events.emit(PoolBtcEvent::DestinationWithdraw {
        destination: destination.address(),
        assets,
        shares: burned,
    });
    Ok(burned)
}

/// Burn exactly `shares` of the dispatcher's shares at an approved
/// destination and send the resulting assets to the owning vault.
/// Fails with `AssetsBelowMinimum` when the quoted assets fall short
/// of `min_assets_out`. Returns the assets received.
pub fn redeem_from_destination(
    state: &DispatcherState,
    registry: &AllocationRegistry,
    caller: Address,
    destination: &mut SharesVault,
    shares: u64,
    min_assets_out: u64,
    ledger: &mut TokenLedger,
    events: &mut EventLog,
) -> PoolBtcResult<u64> {
    registry.ensure_maintainer(caller)?;
    registry.ensure_approved(destination.address())?;
    ensure_asset(destination, ledger)?;
    if shares == 0 {
        return Err(PoolBtcError::ZeroAmount);
    }

    let assets = destination.preview_redeem(ledger, shares)?;
    if assets < min_assets_out {
        return Err(PoolBtcError::AssetsBelowMinimum {
            assets,
            min_assets: min_assets_out,
        });
    }

    let received = destination.redeem(ledger, state.address, shares, state.owning_vault)?;

    events.emit(PoolBtcEvent::DestinationRedeem {
        destination: destination.address(),
        shares,
        assets: received,
    });
    Ok(received)
}

/// Shares the dispatcher currently holds at a destination
pub fn shares_at(state: &DispatcherState, destination: &SharesVault) -> u64 {
    destination.shares_of(&state.address)
}

fn ensure_asset(destination: &SharesVault, ledger: &TokenLedger) -> PoolBtcResult<()> {
    if destination.asset() != ledger.asset() {
        return Err(PoolBtcError::UnsupportedAsset {
            asset: destination.asset(),
        });
    }
    Ok(())
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use poolbtc_common::types::AssetId;

    fn base_asset() -> AssetId {
        [9u8; 32]
    }

    fn vault() -> Address {
        [1u8; 32]
    }

    fn governance() -> Address {
        [2u8; 32]
    }

    fn maintainer() -> Address {
        [3u8; 32]
    }

    fn dispatcher_address() -> Address {
        [4u8; 32]
    }

    fn destination_address() -> Address {
        [5u8; 32]
    }

    fn setup() -> (
        DispatcherState,
        AllocationRegistry,
        SharesVault,
        TokenLedger,
        EventLog,
    ) {
        let mut events = EventLog::new();
        let mut registry = AllocationRegistry::new(governance());
        registry
            .add_maintainer(governance(), maintainer(), &mut events)
            .unwrap();
        registry
            .add_destination(governance(), destination_address(), &mut events)
            .unwrap();
        events.clear();

        let mut ledger = TokenLedger::new(base_asset());
        ledger.mint(vault(), 10_000).unwrap();
        ledger.approve(vault(), dispatcher_address(), u64::MAX);

        (
            DispatcherState::new(dispatcher_address(), vault()),
            registry,
            SharesVault::new(destination_address(), base_asset()),
            ledger,
            events,
        )
    }

    /// Seed the destination with 500 assets for 500 shares, then let
    /// 300 units of yield accrue (800 assets backing 500 shares).
    fn setup_with_yield() -> (
        DispatcherState,
        AllocationRegistry,
        SharesVault,
        TokenLedger,
        EventLog,
    ) {
        let (state, registry, mut destination, mut ledger, mut events) = setup();
        let shares = deposit_to_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            500,
            500,
            &mut ledger,
            &mut events,
        )
        .unwrap();
        assert_eq!(shares, 500);
        ledger.mint(destination_address(), 300).unwrap();
        events.clear();
        (state, registry, destination, ledger, events)
    }

    #[test]
    fn test_first_deposit_mints_one_to_one() {
        let (state, registry, mut destination, mut ledger, mut events) = setup();

        let shares = deposit_to_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            500,
            500,
            &mut ledger,
            &mut events,
        )
        .unwrap();

        assert_eq!(shares, 500);
        assert_eq!(shares_at(&state, &destination), 500);
        assert_eq!(ledger.balance_of(&vault()), 9_500);
        // Pass-through: the dispatcher parks nothing
        assert_eq!(ledger.balance_of(&dispatcher_address()), 0);
    }

    #[test]
    fn test_withdraw_burns_rounded_up_shares() {
        let (state, registry, mut destination, mut ledger, mut events) = setup_with_yield();

        let burned = withdraw_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            320,
            200,
            &mut ledger,
            &mut events,
        )
        .unwrap();

        assert_eq!(burned, 200);
        assert_eq!(ledger.balance_of(&vault()), 9_500 + 320);
        assert_eq!(shares_at(&state, &destination), 300);
    }

    #[test]
    fn test_redeem_returns_rounded_down_assets() {
        let (state, registry, mut destination, mut ledger, mut events) = setup_with_yield();

        let assets = redeem_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            250,
            400,
            &mut ledger,
            &mut events,
        )
        .unwrap();

        assert_eq!(assets, 400);
        assert_eq!(ledger.balance_of(&vault()), 9_500 + 400);
        assert_eq!(shares_at(&state, &destination), 250);
        assert_eq!(ledger.balance_of(&dispatcher_address()), 0);
    }

    #[test]
    fn test_min_shares_bound_is_strict() {
        let (state, registry, mut destination, mut ledger, mut events) = setup_with_yield();

        // 100 assets quote floor(100 * 500 / 800) = 62 shares
        let result = deposit_to_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            100,
            63,
            &mut ledger,
            &mut events,
        );
        assert!(matches!(
            result,
            Err(PoolBtcError::SharesBelowMinimum {
                shares: 62,
                min_shares: 63
            })
        ));
        // A failed deposit pulls nothing from the vault
        assert_eq!(ledger.balance_of(&vault()), 9_500);

        let shares = deposit_to_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            100,
            62,
            &mut ledger,
            &mut events,
        )
        .unwrap();
        assert_eq!(shares, 62);
    }

    #[test]
    fn test_max_shares_bound_is_strict() {
        let (state, registry, mut destination, mut ledger, mut events) = setup_with_yield();

        // 321 assets quote ceil(321 * 500 / 800) = 201 shares
        let result = withdraw_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            321,
            200,
            &mut ledger,
            &mut events,
        );
        assert!(matches!(
            result,
            Err(PoolBtcError::SharesAboveMaximum {
                shares: 201,
                max_shares: 200
            })
        ));
        assert_eq!(shares_at(&state, &destination), 500);

        let burned = withdraw_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            321,
            201,
            &mut ledger,
            &mut events,
        )
        .unwrap();
        assert_eq!(burned, 201);
    }

    #[test]
    fn test_min_assets_bound_is_strict() {
        let (state, registry, mut destination, mut ledger, mut events) = setup_with_yield();

        // 250 shares quote floor(250 * 800 / 500) = 400 assets
        let result = redeem_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            250,
            401,
            &mut ledger,
            &mut events,
        );
        assert!(matches!(
            result,
            Err(PoolBtcError::AssetsBelowMinimum {
                assets: 400,
                min_assets: 401
            })
        ));
        assert_eq!(shares_at(&state, &destination), 500);
    }

    #[test]
    fn test_caller_must_be_maintainer() {
        let (state, registry, mut destination, mut ledger, mut events) = setup();

        let result = deposit_to_destination(
            &state,
            &registry,
            vault(),
            &mut destination,
            100,
            0,
            &mut ledger,
            &mut events,
        );
        assert!(matches!(
            result,
            Err(PoolBtcError::CallerNotMaintainer { .. })
        ));
    }

    #[test]
    fn test_destination_must_be_approved() {
        let (state, mut registry, mut destination, mut ledger, mut events) = setup();

        registry
            .remove_destination(governance(), destination_address(), &mut events)
            .unwrap();

        let result = deposit_to_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            100,
            0,
            &mut ledger,
            &mut events,
        );
        assert!(matches!(result, Err(PoolBtcError::NotApproved { .. })));

        // Re-approval restores the path with no residual state
        registry
            .add_destination(governance(), destination_address(), &mut events)
            .unwrap();
        let shares = deposit_to_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            100,
            100,
            &mut ledger,
            &mut events,
        )
        .unwrap();
        assert_eq!(shares, 100);
    }

    #[test]
    fn test_membership_is_rechecked_per_call() {
        let (state, mut registry, mut destination, mut ledger, mut events) = setup();

        deposit_to_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            100,
            100,
            &mut ledger,
            &mut events,
        )
        .unwrap();

        // An earlier successful call grants nothing once removed
        registry
            .remove_destination(governance(), destination_address(), &mut events)
            .unwrap();
        let result = withdraw_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            50,
            u64::MAX,
            &mut ledger,
            &mut events,
        );
        assert!(matches!(result, Err(PoolBtcError::NotApproved { .. })));
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let (state, registry, mut destination, mut ledger, mut events) = setup();

        assert!(matches!(
            deposit_to_destination(
                &state,
                &registry,
                maintainer(),
                &mut destination,
                0,
                0,
                &mut ledger,
                &mut events,
            ),
            Err(PoolBtcError::ZeroAmount)
        ));
        assert!(matches!(
            redeem_from_destination(
                &state,
                &registry,
                maintainer(),
                &mut destination,
                0,
                0,
                &mut ledger,
                &mut events,
            ),
            Err(PoolBtcError::ZeroAmount)
        ));
    }

    #[test]
    fn test_round_trip_conserves_supply() {
        let (state, registry, mut destination, mut ledger, mut events) = setup_with_yield();

        withdraw_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            320,
            u64::MAX,
            &mut ledger,
            &mut events,
        )
        .unwrap();
        redeem_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            250,
            0,
            &mut ledger,
            &mut events,
        )
        .unwrap();

        assert!(ledger.is_conserved());
        // 10_000 minted to the vault plus 300 yield
        assert_eq!(ledger.total_supply(), 10_300);
        // Remaining 50 shares back 80 assets at the destination
        assert_eq!(shares_at(&state, &destination), 50);
        assert_eq!(destination.total_assets(&ledger), 80);
    }

    #[test]
    fn test_dispatcher_events() {
        let (state, registry, mut destination, mut ledger, mut events) = setup_with_yield();

        withdraw_from_destination(
            &state,
            &registry,
            maintainer(),
            &mut destination,
            320,
            200,
            &mut ledger,
            &mut events,
        )
        .unwrap();

        assert_eq!(
            events.events(),
            &[PoolBtcEvent::DestinationWithdraw {
                destination: destination_address(),
                assets: 320,
                shares: 200,
            }]
        );
    }
}
