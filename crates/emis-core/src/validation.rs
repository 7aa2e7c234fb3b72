//! # Validation Module
//!
//! Input validation for the session API.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  └── Shape: JSON parses, required fields present, types match          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Amounts finite and in range, rounded to cents                     │
//! │  ├── payment_method in {CASH, CC, FLEET, CHECK}                        │
//! │  └── Text fields trimmed, blank → absent, length limits                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign keys, OPEN-status guard on insert                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before the store is touched.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{NewTransaction, TransactionDraft};
use crate::{
    MAX_AMOUNT_CENTS, MAX_CERT_LEN, MAX_LOCATION_NAME_LEN, MAX_PLATE_LEN, MAX_VEHICLE_LEN,
    MAX_VIN_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional text field; blank becomes `None`.
fn optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<Option<String>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(Some(value.to_string()))
}

/// Validates the vehicle description (year / make / model).
///
/// ## Example
/// ```rust
/// use emis_core::validation::validate_vehicle_make;
///
/// assert_eq!(validate_vehicle_make("  2012 Honda Civic ").unwrap(), "2012 Honda Civic");
/// assert!(validate_vehicle_make("").is_err());
/// ```
pub fn validate_vehicle_make(vehicle: &str) -> ValidationResult<String> {
    require_text("vehicle_make", vehicle, MAX_VEHICLE_LEN)
}

/// Validates a (possibly partial) VIN.
///
/// ## Rules
/// - Optional; blank means not recorded
/// - At most 17 characters, letters and digits only
/// - Stored upper-case
///
/// ## Example
/// ```rust
/// use emis_core::validation::validate_vin;
///
/// assert_eq!(validate_vin(Some("1hgcm826")).unwrap().as_deref(), Some("1HGCM826"));
/// assert_eq!(validate_vin(Some("")).unwrap(), None);
/// assert!(validate_vin(Some("1HG-CM826")).is_err());
/// ```
pub fn validate_vin(vin: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(vin) = optional_text("vin", vin, MAX_VIN_LEN)? else {
        return Ok(None);
    };

    if !vin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "vin".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(Some(vin.to_ascii_uppercase()))
}

/// Validates a license plate.
///
/// ## Rules
/// - Optional; blank means not recorded
/// - At most 10 characters: letters, digits, spaces, hyphens
/// - Stored upper-case
pub fn validate_plate(plate: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(plate) = optional_text("plate", plate, MAX_PLATE_LEN)? else {
        return Ok(None);
    };

    if !plate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "plate".to_string(),
            reason: "must contain only letters, digits, spaces, and hyphens".to_string(),
        });
    }

    Ok(Some(plate.to_ascii_uppercase()))
}

/// Validates an emissions certificate or DMV number.
pub fn validate_cert_number(field: &str, number: Option<&str>) -> ValidationResult<Option<String>> {
    optional_text(field, number, MAX_CERT_LEN)
}

/// Validates a location (shop) name.
///
/// ## Example
/// ```rust
/// use emis_core::validation::validate_location_name;
///
/// assert!(validate_location_name("West Jordan").is_ok());
/// assert!(validate_location_name("   ").is_err());
/// ```
pub fn validate_location_name(name: &str) -> ValidationResult<String> {
    require_text("name", name, MAX_LOCATION_NAME_LEN)
}

// =============================================================================
// Money Validators
// =============================================================================

fn amount_range(field: &str, min_cents: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: min_cents / 100,
        max: MAX_AMOUNT_CENTS / 100,
    }
}

/// Converts a dollar amount to Money.
///
/// ## Rules
/// - Must be finite (no NaN / infinity)
/// - Rounded to the nearest cent
/// - Absolute value at most $1,000,000.00
/// - Negative values are allowed (refunds)
///
/// ## Example
/// ```rust
/// use emis_core::validation::parse_amount;
///
/// assert_eq!(parse_amount("total_amount", 40.0).unwrap().cents(), 4000);
/// assert_eq!(parse_amount("total_amount", -15.0).unwrap().cents(), -1500);
/// assert!(parse_amount("total_amount", f64::NAN).is_err());
/// assert!(parse_amount("total_amount", 5e6).is_err());
/// ```
pub fn parse_amount(field: &str, dollars: f64) -> ValidationResult<Money> {
    let money = Money::from_dollars(dollars).ok_or_else(|| {
        if dollars.is_finite() {
            amount_range(field, -MAX_AMOUNT_CENTS)
        } else {
            ValidationError::MustBeFinite {
                field: field.to_string(),
            }
        }
    })?;

    if money.abs().cents() > MAX_AMOUNT_CENTS {
        return Err(amount_range(field, -MAX_AMOUNT_CENTS));
    }

    Ok(money)
}

/// Converts a counted drawer amount (starting cash, closing cash, deposit)
/// to Money.
///
/// Same rules as [`parse_amount`], but a drawer cannot hold negative cash.
///
/// ## Example
/// ```rust
/// use emis_core::validation::parse_cash_count;
///
/// assert_eq!(parse_cash_count("starting_cash", 100.0).unwrap().cents(), 10_000);
/// assert!(parse_cash_count("starting_cash", 0.0).is_ok());
/// assert!(parse_cash_count("starting_cash", -1.0).is_err());
/// ```
pub fn parse_cash_count(field: &str, dollars: f64) -> ValidationResult<Money> {
    let money = parse_amount(field, dollars)?;

    if money.is_negative() {
        return Err(amount_range(field, 0));
    }

    Ok(money)
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a raw add-transaction submission.
///
/// ## Flow
/// ```text
/// TransactionDraft (client JSON)
///      │
///      ├── vehicle_make   → trimmed, required
///      ├── vin / plate    → normalized, upper-case, blank → None
///      ├── cert numbers   → trimmed, blank → None
///      ├── total_amount   → Money (cents)
///      └── payment_method → PaymentMethod
///      │
///      ▼
/// NewTransaction (ready for the store)
/// ```
pub fn validate_new_transaction(draft: &TransactionDraft) -> CoreResult<NewTransaction> {
    Ok(NewTransaction {
        daily_log_id: draft.daily_log_id,
        vehicle_make: validate_vehicle_make(&draft.vehicle_make)?,
        vin: validate_vin(draft.vin.as_deref())?,
        plate: validate_plate(draft.plate.as_deref())?,
        is_dmv: draft.is_dmv,
        is_tsi: draft.is_tsi,
        is_safety: draft.is_safety,
        is_renewal: draft.is_renewal,
        emis_cert_num: validate_cert_number("emis_cert_num", draft.emis_cert_num.as_deref())?,
        dmv_num: validate_cert_number("dmv_num", draft.dmv_num.as_deref())?,
        total_amount: parse_amount("total_amount", draft.total_amount)?,
        payment_method: draft.payment_method.parse()?,
    })
}

/// Validates the counted amounts submitted at close.
///
/// Returns `(closing_cash, deposit)`. A missing deposit is zero; the deposit
/// is pulled from the counted cash and cannot exceed it.
pub fn validate_close_counts(closing_cash: f64, deposit: Option<f64>) -> CoreResult<(Money, Money)> {
    let closing = parse_cash_count("closing_cash", closing_cash)?;
    let deposit = match deposit {
        Some(d) => parse_cash_count("deposit", d)?,
        None => Money::zero(),
    };

    if deposit > closing {
        return Err(CoreError::InvalidAmount {
            field: "deposit".to_string(),
            reason: format!("deposit {} exceeds closing cash {}", deposit, closing),
        });
    }

    Ok((closing, deposit))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;

    fn draft() -> TransactionDraft {
        TransactionDraft {
            daily_log_id: 7,
            vehicle_make: "Civic".to_string(),
            total_amount: 40.0,
            payment_method: "CASH".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_vehicle_make() {
        assert!(validate_vehicle_make("2015 Ford F-150").is_ok());
        assert!(validate_vehicle_make("   ").is_err());
        assert!(validate_vehicle_make(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_vin() {
        assert_eq!(validate_vin(None).unwrap(), None);
        assert_eq!(validate_vin(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_vin(Some("1hgcm82633a004352")).unwrap().as_deref(),
            Some("1HGCM82633A004352")
        );
        assert!(validate_vin(Some("1HGCM82633A0043521")).is_err());
        assert!(validate_vin(Some("ABC 123")).is_err());
    }

    #[test]
    fn test_validate_plate() {
        assert_eq!(validate_plate(Some("abc-123")).unwrap().as_deref(), Some("ABC-123"));
        assert_eq!(validate_plate(Some("")).unwrap(), None);
        assert!(validate_plate(Some("TOO-LONG-PLATE")).is_err());
        assert!(validate_plate(Some("AB#12")).is_err());
    }

    #[test]
    fn test_parse_amount_limits() {
        assert_eq!(parse_amount("total_amount", 1_000_000.0).unwrap().cents(), MAX_AMOUNT_CENTS);
        assert!(parse_amount("total_amount", 1_000_000.01).is_err());
        assert!(parse_amount("total_amount", -1_000_000.01).is_err());
        assert!(matches!(
            parse_amount("total_amount", f64::INFINITY),
            Err(ValidationError::MustBeFinite { .. })
        ));
    }

    #[test]
    fn test_validate_new_transaction() {
        let mut input = draft();
        input.vin = Some("".to_string());
        input.plate = Some("xyz 789".to_string());
        input.dmv_num = Some(" D-1001 ".to_string());
        input.is_dmv = true;
        input.payment_method = "cash".to_string();

        let tx = validate_new_transaction(&input).unwrap();
        assert_eq!(tx.daily_log_id, 7);
        assert_eq!(tx.vin, None);
        assert_eq!(tx.plate.as_deref(), Some("XYZ 789"));
        assert_eq!(tx.dmv_num.as_deref(), Some("D-1001"));
        assert_eq!(tx.emis_cert_num, None);
        assert!(tx.is_dmv && !tx.is_tsi);
        assert_eq!(tx.total_amount.cents(), 4000);
        assert_eq!(tx.payment_method, PaymentMethod::Cash);
    }

    #[test]
    fn test_unknown_payment_method_rejected() {
        let mut input = draft();
        input.payment_method = "BITCOIN".to_string();

        let err = validate_new_transaction(&input).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_missing_vehicle_rejected() {
        let mut input = draft();
        input.vehicle_make = String::new();

        assert!(matches!(
            validate_new_transaction(&input),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_validate_close_counts() {
        let (closing, deposit) = validate_close_counts(140.0, Some(100.0)).unwrap();
        assert_eq!(closing.cents(), 14_000);
        assert_eq!(deposit.cents(), 10_000);

        let (_, deposit) = validate_close_counts(140.0, None).unwrap();
        assert!(deposit.is_zero());

        assert!(validate_close_counts(-5.0, None).is_err());
        assert!(matches!(
            validate_close_counts(50.0, Some(60.0)),
            Err(CoreError::InvalidAmount { .. })
        ));
    }
}
