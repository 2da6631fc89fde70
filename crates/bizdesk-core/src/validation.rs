//! # Validation Module
//!
//! Input rules applied to user input before it reaches a draft.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: View                                                          │
//! │  ├── Input masks, min/max on number fields                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Session commands                                              │
//! │  └── THIS MODULE: quantity, price, notes, currency rules               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Draft                                                         │
//! │  └── Records what it is given; only keeps derived fields consistent    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Submission                                                    │
//! │  └── Mandatory header references (SubmissionError)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizdesk_core::validation::{validate_quantity, validate_currency_code};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_currency_code("BOB").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_DRAFT_LINES, MAX_LINE_QUANTITY, MAX_NOTES_LENGTH, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - At least 1
/// - At most [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Not negative; zero is allowed (samples, gifts)
/// - At most [`MAX_UNIT_PRICE`] minor units
///
/// ```rust
/// use bizdesk_core::{validation::validate_unit_price, Money};
///
/// assert!(validate_unit_price(Money::from_minor(0)).is_ok());
/// assert!(validate_unit_price(Money::from_minor(-100)).is_err());
/// assert!(validate_unit_price(Money::from_minor(i64::MAX / 2)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if price.minor_units() > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Keeps an advance within `[0, total]`.
///
/// The draft only clamps negatives; the upper bound is applied here, by the
/// caller, as the draft contract requires.
pub fn clamp_advance(amount: Money, total: Money) -> Money {
    amount.clamp_non_negative().min(total.clamp_non_negative())
}

// =============================================================================
// Text Validators
// =============================================================================

/// Validates free-text notes (document or line).
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LENGTH,
        });
    }

    Ok(())
}

/// Validates an ISO 4217 style currency code: three uppercase letters.
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be three uppercase letters, e.g. BOB".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in a draft.
pub fn validate_line_capacity(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_DRAFT_LINES {
        return Err(ValidationError::TooManyLines {
            max: MAX_DRAFT_LINES,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price(Money::from_minor(MAX_UNIT_PRICE)).is_ok());

        assert!(matches!(
            validate_unit_price(Money::from_minor(-1)),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_unit_price(Money::from_minor(MAX_UNIT_PRICE + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_largest_valid_draft_fits_in_money() {
        let subtotal = Money::from_minor(MAX_UNIT_PRICE)
            .checked_multiply_quantity(MAX_LINE_QUANTITY)
            .unwrap();
        assert!(subtotal
            .checked_multiply_quantity(MAX_DRAFT_LINES as i64)
            .is_some());
    }

    #[test]
    fn test_clamp_advance() {
        let total = Money::from_minor(5000);
        assert_eq!(clamp_advance(Money::from_minor(-1), total), Money::zero());
        assert_eq!(clamp_advance(Money::from_minor(2000), total).minor_units(), 2000);
        assert_eq!(clamp_advance(Money::from_minor(9000), total), total);
    }

    #[test]
    fn test_validate_notes() {
        assert!(validate_notes("").is_ok());
        assert!(validate_notes(&"ñ".repeat(MAX_NOTES_LENGTH)).is_ok());
        assert!(validate_notes(&"a".repeat(MAX_NOTES_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("BOB").is_ok());
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("bob").is_err());
        assert!(validate_currency_code("BOLIVIANO").is_err());
    }

    #[test]
    fn test_validate_line_capacity() {
        assert!(validate_line_capacity(0).is_ok());
        assert!(validate_line_capacity(MAX_DRAFT_LINES - 1).is_ok());
        assert!(validate_line_capacity(MAX_DRAFT_LINES).is_err());
    }
}
