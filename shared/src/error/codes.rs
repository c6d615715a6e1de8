//! Unified error codes for the Nyumba storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Catalog errors
//! - 3xxx: Cart errors
//! - 4xxx: Storage errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Unknown phone or wrong one-time code
    InvalidCredentials = 1002,
    /// Phone already registered
    PhoneTaken = 1003,
    /// Role does not allow the operation
    PermissionDenied = 1004,

    // ==================== 2xxx: Catalog ====================
    /// Catalog service could not be reached or answered with an error
    CatalogUnavailable = 2001,
    /// Product not found in the loaded catalog
    ProductNotFound = 2002,
    /// Variant not found on the product
    VariantNotFound = 2003,

    // ==================== 3xxx: Cart ====================
    /// Variant has no stock left
    OutOfStock = 3001,
    /// Requested quantity exceeds available stock
    InsufficientStock = 3002,
    /// Cart is empty
    CartEmpty = 3003,

    // ==================== 4xxx: Storage ====================
    /// Local storage read or write failed
    StorageFailed = 4001,
    /// Persisted data could not be parsed
    StorageCorrupted = 4002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",

            ErrorCode::NotAuthenticated => "Please log in to continue",
            ErrorCode::InvalidCredentials => "Invalid phone number or code",
            ErrorCode::PhoneTaken => "This phone number is already registered",
            ErrorCode::PermissionDenied => "Permission denied",

            ErrorCode::CatalogUnavailable => "Could not load the catalog",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::VariantNotFound => "Variant not found",

            ErrorCode::OutOfStock => "This item is out of stock",
            ErrorCode::InsufficientStock => "Not enough stock available",
            ErrorCode::CartEmpty => "Your cart is empty",

            ErrorCode::StorageFailed => "Local storage operation failed",
            ErrorCode::StorageCorrupted => "Stored data is corrupted",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::PhoneTaken),
            1004 => Ok(ErrorCode::PermissionDenied),

            2001 => Ok(ErrorCode::CatalogUnavailable),
            2002 => Ok(ErrorCode::ProductNotFound),
            2003 => Ok(ErrorCode::VariantNotFound),

            3001 => Ok(ErrorCode::OutOfStock),
            3002 => Ok(ErrorCode::InsufficientStock),
            3003 => Ok(ErrorCode::CartEmpty),

            4001 => Ok(ErrorCode::StorageFailed),
            4002 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
