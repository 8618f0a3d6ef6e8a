//! poolBTC Common Library
//!
//! Shared types, constants, and utilities for the poolBTC allocation
//! contracts. This crate provides the foundation the allocator,
//! dispatcher, and multi-asset vault crates build on.
//!
//! ## Modules
//!
//! - **Registry**: governance-controlled destination and maintainer sets
//! - **Token Ledger**: base-asset balances, allowances, pull/push transfers
//! - **Custody Portal**: keyed-deposit yield destination model
//! - **Shares Vault**: share-issuing yield destination model
//! - **Math**: checked arithmetic and share/asset conversion
//! - **Events**: protocol events for off-chain indexing
//!
//! This crate is `no_std` compatible for WASM compilation when built
//! with the `no_std` feature enabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export Vec for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(feature = "std")]
pub use std::vec::Vec;

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod events;
pub mod token;
pub mod registry;
pub mod portal;
pub mod shares_vault;


// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use math::*;
pub use events::*;
pub use token::*;
pub use registry::*;
pub use portal::*;
pub use shares_vault::*;
