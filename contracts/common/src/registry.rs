//! Allocation Registry
//!
//! Governance-controlled sets of approved allocation destinations and
//! registered maintainers. Pure set-membership logic with no external
//! calls; every allocation path re-checks membership here rather than
//! caching an earlier result.
//!
//! Removal uses swap-with-last-and-pop, so iteration order after a
//! removal is unspecified while every other entry remains present
//! exactly once.

use crate::constants::limits;
use crate::errors::{PoolBtcError, PoolBtcResult};
use crate::events::{EventLog, PoolBtcEvent};
use crate::types::{Address, ZERO_ADDRESS};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Registry of allocation destinations and maintainers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AllocationRegistry {
    governance: Address,
    destinations: Vec<Address>,
    maintainers: Vec<Address>,
}

impl AllocationRegistry {
    /// Create a new registry controlled by `governance`
    pub fn new(governance: Address) -> Self {
        Self {
            governance,
            destinations: Vec::new(),
            maintainers: Vec::new(),
        }
    }

    /// The governance principal controlling this registry
    pub fn governance(&self) -> Address {
        self.governance
    }

    /// Approved destinations, in unspecified order
    pub fn destinations(&self) -> &[Address] {
        &self.destinations
    }

    /// Registered maintainers, in unspecified order
    pub fn maintainers(&self) -> &[Address] {
        &self.maintainers
    }

    /// Check whether a destination is currently approved
    pub fn is_approved(&self, destination: &Address) -> bool {
        self.destinations.contains(destination)
    }

    /// Check whether an identity is a registered maintainer
    pub fn is_maintainer(&self, id: &Address) -> bool {
        self.maintainers.contains(id)
    }

    /// Fail with `CallerNotMaintainer` unless `caller` is registered
    pub fn ensure_maintainer(&self, caller: Address) -> PoolBtcResult<()> {
        if !self.is_maintainer(&caller) {
            return Err(PoolBtcError::CallerNotMaintainer { caller });
        }
        Ok(())
    }

    /// Fail with `NotApproved` unless `destination` is approved
    pub fn ensure_approved(&self, destination: Address) -> PoolBtcResult<()> {
        if !self.is_approved(&destination) {
            return Err(PoolBtcError::NotApproved { destination });
        }
        Ok(())
    }

    /// Approve a new destination. Governance only.
    pub fn add_destination(
        &mut self,
        caller: Address,
        destination: Address,
        events: &mut EventLog,
    ) -> PoolBtcResult<()> {
        self.ensure_governance(caller)?;
        if self.is_approved(&destination) {
            return Err(PoolBtcError::AlreadyApproved { destination });
        }
        if self.destinations.len() >= limits::MAX_DESTINATIONS {
            return Err(PoolBtcError::RegistryFull {
                count: self.destinations.len(),
                maximum: limits::MAX_DESTINATIONS,
            });
        }
        self.destinations.push(destination);
        events.emit(PoolBtcEvent::DestinationAdded { destination });
        Ok(())
    }

    /// Remove a destination from the active set. Governance only.
    pub fn remove_destination(
        &mut self,
        caller: Address,
        destination: Address,
        events: &mut EventLog,
    ) -> PoolBtcResult<()> {
        self.ensure_governance(caller)?;
        let position = self
            .destinations
            .iter()
            .position(|d| d == &destination)
            .ok_or(PoolBtcError::NotApproved { destination })?;
        self.destinations.swap_remove(position);
        events.emit(PoolBtcEvent::DestinationRemoved { destination });
        Ok(())
    }

    /// Register a new maintainer. Governance only.
    pub fn add_maintainer(
        &mut self,
        caller: Address,
        maintainer: Address,
        events: &mut EventLog,
    ) -> PoolBtcResult<()> {
        self.ensure_governance(caller)?;
        if maintainer == ZERO_ADDRESS {
            return Err(PoolBtcError::ZeroAddress);
        }
        if self.is_maintainer(&maintainer) {
            return Err(PoolBtcError::AlreadyRegistered { maintainer });
        }
        if self.maintainers.len() >= limits::MAX_MAINTAINERS {
            return Err(PoolBtcError::RegistryFull {
                count: self.maintainers.len(),
                maximum: limits::MAX_MAINTAINERS,
            });
        }
        self.maintainers.push(maintainer);
        events.emit(PoolBtcEvent::MaintainerAdded { maintainer });
        Ok(())
    }

    /// Deregister a maintainer. Governance only.
    pub fn remove_maintainer(
        &mut self,
        caller: Address,
        maintainer: Address,
        events: &mut EventLog,
    ) -> PoolBtcResult<()> {
        self.ensure_governance(caller)?;
        let position = self
            .maintainers
            .iter()
            .position(|m| m == &maintainer)
            .ok_or(PoolBtcError::NotRegistered { maintainer })?;
        self.maintainers.swap_remove(position);
        events.emit(PoolBtcEvent::MaintainerRemoved { maintainer });
        Ok(())
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
