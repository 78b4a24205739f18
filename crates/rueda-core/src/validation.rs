//! # Validation Module
//!
//! Input validation run by the CRUD commands before any network call.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command input (Rust)                                         │
//! │  └── THIS MODULE: required fields, formats, positive amounts           │
//! │           │                                                             │
//! │           ▼  (only valid input leaves the process)                     │
//! │  Layer 2: REST backend                                                 │
//! │  └── uniqueness (SKU, document number), referential checks             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rueda_core::validation::{validate_sku, validate_adjustment_amount};
//! use rueda_core::Money;
//!
//! assert!(validate_sku("FRE-SHI-M315").is_ok());
//! assert!(validate_adjustment_amount(Money::zero()).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CategoryInput, ClientInput, CreditInput, ProductInput};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty, at most 50 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product, client, category).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a document number: digits with optional hyphens.
pub fn validate_document_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::required("document number"));
    }

    if !number.chars().all(|c| c.is_ascii_digit() || c == '-')
        || !number.chars().any(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "document number".to_string(),
            reason: "must contain only digits and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Loose email check: one `@` with something on both sides and a dot after it.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let (local, domain) = email.trim().split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Prices may be zero (gifts, warranty parts) but never negative.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Balance adjustments must move a positive amount.
pub fn validate_adjustment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::must_be_positive("amount"));
    }

    Ok(())
}

fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Input DTO Validators
// =============================================================================

impl ProductInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_sku(&self.sku)?;
        validate_price("sale price", self.sale_price)?;
        validate_price("cost price", self.cost_price)?;
        validate_stock_level("current stock", self.current_stock)?;

        if let Some(min) = self.min_stock {
            validate_stock_level("min stock", min)?;
        }
        if let Some(max) = self.max_stock {
            validate_stock_level("max stock", max)?;
            if let Some(min) = self.min_stock {
                if max < min {
                    return Err(ValidationError::OutOfRange {
                        field: "max stock".to_string(),
                        min,
                        max: i64::MAX,
                    });
                }
            }
        }

        Ok(())
    }
}

impl ClientInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_document_number(&self.document_number)?;

        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validate_email(email)?;
        }

        Ok(())
    }
}

impl CategoryInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

impl CreditInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_adjustment_amount(self.amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
