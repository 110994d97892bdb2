//! WebAssembly module for the Warehouse Operations Management Platform
//!
//! Provides client-side computation for:
//! - Onboarding wizard step validation
//! - Price/margin recalculation in the batch price dialog
//! - Shipment value previews
//! - Offline data validation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validate one onboarding wizard step against a draft (as JSON).
/// Returns null when the step is valid, otherwise the failing field name.
#[wasm_bindgen]
pub fn validate_onboarding_step(step: usize, draft_json: &str) -> Result<Option<String>, JsValue> {
    let draft: shared::wizard::StaffDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft JSON: {}", e)))?;

    match shared::wizard::validate_step(step, &draft) {
        Ok(()) => Ok(None),
        Err(e) => Ok(Some(e.field.to_string())),
    }
}

/// First wizard step that does not validate, or the step count when the
/// draft is complete
#[wasm_bindgen]
pub fn first_incomplete_onboarding_step(draft_json: &str) -> Result<usize, JsValue> {
    let draft: shared::wizard::StaffDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft JSON: {}", e)))?;

    Ok(shared::wizard::first_incomplete_step(&draft)
        .unwrap_or(shared::wizard::ONBOARDING_STEP_COUNT))
}

/// Margin percentage of a selling price over landed cost
#[wasm_bindgen]
pub fn calculate_margin_percent(unit_cost: f64, shipping_cost: f64, selling_price: f64) -> f64 {
    let margin = shared::pricing::margin_percent(
        dec(unit_cost),
        dec(shipping_cost),
        dec(selling_price),
    );
    margin.round_dp(2).to_string().parse().unwrap_or(0.0)
}

/// Selling price that yields the given margin over landed cost
#[wasm_bindgen]
pub fn calculate_selling_price(unit_cost: f64, shipping_cost: f64, margin_pct: f64) -> f64 {
    let price =
        shared::pricing::selling_price_for_margin(dec(unit_cost), dec(shipping_cost), dec(margin_pct));
    price.to_string().parse().unwrap_or(0.0)
}

/// Raise a proposed price to the minimum-margin floor if it falls below it
#[wasm_bindgen]
pub fn clamp_selling_price(
    unit_cost: f64,
    shipping_cost: f64,
    proposed_price: f64,
    min_margin_pct: f64,
) -> f64 {
    let clamped = shared::pricing::clamp_to_minimum_margin(
        dec(unit_cost),
        dec(shipping_cost),
        dec(proposed_price),
        dec(min_margin_pct),
    );
    clamped.to_string().parse().unwrap_or(0.0)
}

/// Total value of one shipment line item
#[wasm_bindgen]
pub fn calculate_line_item_total(quantity: i32, unit_price: f64) -> f64 {
    let total = shared::models::line_item_total(quantity, dec(unit_price));
    total.to_string().parse().unwrap_or(0.0)
}

/// Validate an EAN-13 barcode before printing a label
#[wasm_bindgen]
pub fn is_valid_barcode(barcode: &str) -> bool {
    shared::validation::validate_ean13(barcode).is_ok()
}

/// Days until an expiry date classified as "critical", "warning" or "info"
#[wasm_bindgen]
pub fn classify_expiry_severity(days_until_expiry: i64) -> String {
    format!("{}", shared::models::classify_expiry(days_until_expiry))
}

fn dec(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_round_trip() {
        let price = calculate_selling_price(10.0, 2.0, 25.0);
        assert!((price - 15.0).abs() < 0.001);
        let margin = calculate_margin_percent(10.0, 2.0, price);
        assert!((margin - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_selling_price() {
        let clamped = clamp_selling_price(10.0, 0.0, 10.5, 10.0);
        assert!((clamped - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_line_item_total() {
        let total = calculate_line_item_total(3, 10.5);
        assert!((total - 31.5).abs() < 0.001);
    }

    #[test]
    fn test_is_valid_barcode() {
        assert!(is_valid_barcode("4006381333931"));
        assert!(!is_valid_barcode("4006381333932"));
    }

    #[test]
    fn test_classify_expiry_severity() {
        assert_eq!(classify_expiry_severity(3), "critical");
        assert_eq!(classify_expiry_severity(10), "warning");
        assert_eq!(classify_expiry_severity(30), "info");
    }

    #[test]
    fn test_validate_onboarding_step() {
        let draft = r#"{"employee_number":"EMP-1","first_name":"A","last_name":"B"}"#;
        assert_eq!(validate_onboarding_step(0, draft).unwrap(), None);
        assert_eq!(
            validate_onboarding_step(1, draft).unwrap(),
            Some("email".to_string())
        );
    }
}
