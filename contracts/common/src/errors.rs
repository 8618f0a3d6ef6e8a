//! Error Types for the poolBTC Allocation Core
//!
//! Typed errors with stable codes for logging and debugging. Every
//! failing operation aborts with one of these and no partial state
//! change.

use crate::types::Address;

/// Result type alias for poolBTC operations
pub type PoolBtcResult<T> = Result<T, PoolBtcError>;

/// Main error enum for all poolBTC allocation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolBtcError {
    // ============ Authorization Errors ============
    /// Caller does not match the identity required for this operation
    Unauthorized { expected: Address, actual: Address },

    /// Caller is not a registered maintainer
    CallerNotMaintainer { caller: Address },

    /// Caller is not the owning vault
    CallerNotVault { caller: Address },

    // ============ Registry Errors ============
    /// Destination is already approved
    AlreadyApproved { destination: Address },

    /// Destination is not currently approved
    NotApproved { destination: Address },

    /// Maintainer is already registered
    AlreadyRegistered { maintainer: Address },

    /// Maintainer is not currently registered
    NotRegistered { maintainer: Address },

    /// Active destination set is full
    RegistryFull { count: usize, maximum: usize },

    // ============ Input Validation Errors ============
    /// The null identifier is not a valid address here
    ZeroAddress,

    /// Zero amount not allowed
    ZeroAmount,

    /// Amount below minimum threshold
    BelowMinimum { amount: u64, minimum: u64 },

    /// Asset is not on the supported list
    UnsupportedAsset { asset: Address },

    /// Asset is already on the supported list
    AssetAlreadySupported { asset: Address },

    // ============ Position Errors ============
    /// No position is currently open
    NothingToWithdraw,

    /// Withdrawal exceeds the recorded principal
    InsufficientPrincipal { available: u64, requested: u64 },

    /// No deposit record exists for this key
    DepositNotFound { owner: Address, deposit_id: u64 },

    // ============ Bound-Violation Errors ============
    /// Shares received would be below the caller's floor
    SharesBelowMinimum { shares: u64, min_shares: u64 },

    /// Shares required would be above the caller's ceiling
    SharesAboveMaximum { shares: u64, max_shares: u64 },

    /// Assets returned would be below the caller's floor
    AssetsBelowMinimum { assets: u64, min_assets: u64 },

    // ============ Token Errors ============
    /// Insufficient balance for operation
    InsufficientBalance { available: u64, requested: u64 },

    /// Insufficient allowance for pull
    InsufficientAllowance { available: u64, requested: u64 },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    /// Division by zero
    DivisionByZero,
}

impl PoolBtcError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "E001_UNAUTHORIZED",
            Self::CallerNotMaintainer { .. } => "E002_NOT_MAINTAINER",
            Self::CallerNotVault { .. } => "E003_NOT_VAULT",
            Self::AlreadyApproved { .. } => "E010_ALREADY_APPROVED",
            Self::NotApproved { .. } => "E011_NOT_APPROVED",
            Self::AlreadyRegistered { .. } => "E012_ALREADY_REGISTERED",
            Self::NotRegistered { .. } => "E013_NOT_REGISTERED",
            Self::RegistryFull { .. } => "E014_REGISTRY_FULL",
            Self::ZeroAddress => "E020_ZERO_ADDRESS",
            Self::ZeroAmount => "E021_ZERO_AMOUNT",
            Self::BelowMinimum { .. } => "E022_BELOW_MINIMUM",
            Self::UnsupportedAsset { .. } => "E023_UNSUPPORTED_ASSET",
            Self::AssetAlreadySupported { .. } => "E024_ASSET_SUPPORTED",
            Self::NothingToWithdraw => "E030_NOTHING_TO_WITHDRAW",
            Self::InsufficientPrincipal { .. } => "E031_INSUFFICIENT_PRINCIPAL",
            Self::DepositNotFound { .. } => "E032_DEPOSIT_NOT_FOUND",
            Self::SharesBelowMinimum { .. } => "E040_MIN_SHARES",
            Self::SharesAboveMaximum { .. } => "E041_MAX_SHARES",
            Self::AssetsBelowMinimum { .. } => "E042_MIN_ASSETS",
            Self::InsufficientBalance { .. } => "E050_INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "E051_INSUFFICIENT_ALLOWANCE",
            Self::Overflow => "E060_OVERFLOW",
            Self::Underflow => "E061_UNDERFLOW",
            Self::DivisionByZero => "E062_DIV_ZERO",
        }
    }

    /// Returns true if the same call can succeed after conditions
    /// change (bound violations, funding gaps). Authorization and
    /// state-precondition failures are not retryable as-is.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SharesBelowMinimum { .. } => true,
            Self::SharesAboveMaximum { .. } => true,
            Self::AssetsBelowMinimum { .. } => true,
            Self::InsufficientBalance { .. } => true,
            Self::InsufficientAllowance { .. } => true,
            Self::BelowMinimum { .. } => true,
            _ => false,
        }
    }
}
