//! Validation utilities for the Warehouse Operations Management Platform

use rust_decimal::Decimal;

use crate::models::TemperatureRange;

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate SKU format (3-32 chars, uppercase alphanumeric with dashes)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 3 {
        return Err("SKU must be at least 3 characters");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("SKU must be uppercase alphanumeric with dashes only");
    }
    Ok(())
}

/// Validate an EAN-13 barcode with checksum
pub fn validate_ean13(barcode: &str) -> Result<(), &'static str> {
    let digits: Vec<u32> = barcode.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 13 || barcode.len() != 13 {
        return Err("Barcode must be 13 digits");
    }

    // Checksum: odd positions weighted 1, even positions weighted 3
    let mut sum = 0;
    for (i, &digit) in digits.iter().take(12).enumerate() {
        sum += digit * if i % 2 == 0 { 1 } else { 3 };
    }

    let check_digit = (10 - (sum % 10)) % 10;
    if check_digit != digits[12] {
        return Err("Invalid barcode checksum");
    }

    Ok(())
}

/// Validate warehouse code format (2-10 uppercase alphanumeric with dashes)
pub fn validate_warehouse_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 {
        return Err("Warehouse code must be at least 2 characters");
    }
    if code.len() > 10 {
        return Err("Warehouse code must be at most 10 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Warehouse code must be uppercase alphanumeric with dashes only");
    }
    Ok(())
}

// ============================================================================
// Stock & Shipment Validations
// ============================================================================

/// Validate a quantity is strictly positive
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a monetary amount is not negative
pub fn validate_money(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a temperature band (min strictly below max)
pub fn validate_temperature_range(range: &TemperatureRange) -> Result<(), &'static str> {
    if range.min_celsius >= range.max_celsius {
        return Err("Minimum temperature must be below maximum");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate business code format (3-10 uppercase alphanumeric)
pub fn validate_business_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Business code must be at least 3 characters");
    }
    if code.len() > 10 {
        return Err("Business code must be at most 10 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Business code must be uppercase alphanumeric only");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate phone number (7-15 digits, optional leading +)
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 7 || digits.len() > 15 {
        return Err("Phone number must have 7-15 digits");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("WDG-STD-001").is_ok());
        assert!(validate_sku("AB").is_err());
        assert!(validate_sku("lowercase-01").is_err());
    }

    #[test]
    fn test_validate_ean13_checksum() {
        // 4006381333931 is a known-valid EAN-13
        assert!(validate_ean13("4006381333931").is_ok());
        assert!(validate_ean13("4006381333932").is_err());
        assert!(validate_ean13("12345").is_err());
    }

    #[test]
    fn test_validate_temperature_range() {
        let ok = TemperatureRange {
            min_celsius: Decimal::from(2),
            max_celsius: Decimal::from(8),
        };
        assert!(validate_temperature_range(&ok).is_ok());

        let inverted = TemperatureRange {
            min_celsius: Decimal::from(8),
            max_celsius: Decimal::from(2),
        };
        assert!(validate_temperature_range(&inverted).is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money(Decimal::ZERO).is_ok());
        assert!(validate_money(Decimal::from_str("-0.01").unwrap()).is_err());
    }
}
