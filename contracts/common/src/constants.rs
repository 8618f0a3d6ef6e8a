//! Protocol Constants
//!
//! All magic numbers and configuration values for the poolBTC
//! allocation core.
//!
//! # Network Configuration
//!
//! Use feature flags to compile for different networks:
//! - `mainnet` - Production values (real deposit floor)
//! - Default (no feature) - Testnet values (minimal floor for testing)
//!
//! ```toml
//! # For mainnet deployment:
//! poolbtc-common = { path = "...", features = ["mainnet"] }
//! ```

/// Base Asset Metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Pool Bitcoin";
    /// Token symbol
    pub const SYMBOL: &str = "poolBTC";
    /// Decimal places (same as Bitcoin satoshis)
    pub const DECIMALS: u8 = 8;
    /// One unit with decimals (1 poolBTC = 100_000_000 base units)
    pub const ONE: u64 = 100_000_000;
}

/// Registry and Deposit Limits
///
/// Values differ between mainnet and testnet to allow easier testing.
pub mod limits {
    /// Maximum number of approved allocation destinations
    pub const MAX_DESTINATIONS: usize = 100;

    /// Maximum number of registered maintainers
    pub const MAX_MAINTAINERS: usize = 100;

    /// Minimum deposit into the multi-asset vault
    /// - Mainnet: 0.001 BTC (keeps unwinding a position worthwhile)
    /// - Testnet: 1 base unit (only zero is rejected)
    #[cfg(feature = "mainnet")]
    pub const MIN_DEPOSIT: u64 = super::token::ONE / 1_000;
    #[cfg(not(feature = "mainnet"))]
    pub const MIN_DEPOSIT: u64 = 1;

    /// Helper to check if running in mainnet mode
    #[cfg(feature = "mainnet")]
    pub const IS_MAINNET: bool = true;
    #[cfg(not(feature = "mainnet"))]
    pub const IS_MAINNET: bool = false;
}
