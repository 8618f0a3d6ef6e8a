//! Protocol Events for the poolBTC Allocation Core
//!
//! Events are emitted during contract execution and can be indexed
//! off-chain for building UIs, analytics, and notifications.

use crate::types::{Address, AssetId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Registry Events (0x01 - 0x1F)
    DestinationAdded = 0x01,
    DestinationRemoved = 0x02,
    MaintainerAdded = 0x03,
    MaintainerRemoved = 0x04,

    // Single-Destination Allocator Events (0x20 - 0x3F)
    DepositAllocated = 0x20,
    DepositWithdrawn = 0x21,
    DepositReleased = 0x22,

    // Dispatcher Events (0x40 - 0x5F)
    DestinationDeposit = 0x40,
    DestinationWithdraw = 0x41,
    DestinationRedeem = 0x42,

    // Multi-Asset Vault Events (0x60 - 0x7F)
    SupportedAssetAdded = 0x60,
    SupportedAssetRemoved = 0x61,
    MultiAssetDepositCreated = 0x62,
    MultiAssetDepositWithdrawn = 0x63,
}

/// Main event enum containing all possible protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum PoolBtcEvent {
    // ============ Registry Events ============

    /// Emitted when a destination is approved
    DestinationAdded { destination: Address },

    /// Emitted when a destination is removed from the active set
    DestinationRemoved { destination: Address },

    /// Emitted when a maintainer is registered
    MaintainerAdded { maintainer: Address },

    /// Emitted when a maintainer is deregistered
    MaintainerRemoved { maintainer: Address },

    // ============ Single-Destination Allocator Events ============

    /// Emitted when liquidity is placed at the custody portal
    DepositAllocated {
        old_deposit_id: u64,
        new_deposit_id: u64,
        amount: u64,
        total_principal: u64,
    },

    /// Emitted when principal is pulled back to the owning vault
    DepositWithdrawn { deposit_id: u64, amount: u64 },

    /// Emitted on a governance-triggered full release
    DepositReleased { deposit_id: u64, amount: u64 },

    // ============ Dispatcher Events ============

    /// Emitted when assets are deposited into a shares destination
    DestinationDeposit {
        destination: Address,
        assets: u64,
        shares: u64,
    },

    /// Emitted when an exact asset amount is withdrawn from a
    /// shares destination
    DestinationWithdraw {
        destination: Address,
        assets: u64,
        shares: u64,
    },

    /// Emitted when an exact share amount is redeemed at a
    /// shares destination
    DestinationRedeem {
        destination: Address,
        shares: u64,
        assets: u64,
    },

    // ============ Multi-Asset Vault Events ============

    /// Emitted when an asset joins the supported list
    SupportedAssetAdded { asset: AssetId },

    /// Emitted when an asset leaves the supported list
    SupportedAssetRemoved { asset: AssetId },

    /// Emitted when a multi-asset deposit record is created
    MultiAssetDepositCreated {
        owner: Address,
        asset: AssetId,
        deposit_id: u64,
        amount: u64,
    },

    /// Emitted when a multi-asset deposit record is fully withdrawn
    MultiAssetDepositWithdrawn {
        owner: Address,
        asset: AssetId,
        deposit_id: u64,
        amount: u64,
        receiver: Address,
    },
}

impl PoolBtcEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::DestinationAdded { .. } => EventType::DestinationAdded,
            Self::DestinationRemoved { .. } => EventType::DestinationRemoved,
            Self::MaintainerAdded { .. } => EventType::MaintainerAdded,
            Self::MaintainerRemoved { .. } => EventType::MaintainerRemoved,
            Self::DepositAllocated { .. } => EventType::DepositAllocated,
            Self::DepositWithdrawn { .. } => EventType::DepositWithdrawn,
            Self::DepositReleased { .. } => EventType::DepositReleased,
            Self::DestinationDeposit { .. } => EventType::DestinationDeposit,
            Self::DestinationWithdraw { .. } => EventType::DestinationWithdraw,
            Self::DestinationRedeem { .. } => EventType::DestinationRedeem,
            Self::SupportedAssetAdded { .. } => EventType::SupportedAssetAdded,
            Self::SupportedAssetRemoved { .. } => EventType::SupportedAssetRemoved,
            Self::MultiAssetDepositCreated { .. } => EventType::MultiAssetDepositCreated,
            Self::MultiAssetDepositWithdrawn { .. } => EventType::MultiAssetDepositWithdrawn,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<PoolBtcEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: PoolBtcEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[PoolBtcEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<PoolBtcEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&PoolBtcEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
