//! # Wire Types
//!
//! JSON request and response shapes for pricing calls.
//!
//! ## Envelope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Success (promo applied):                                               │
//! │    { "success": true, "errorMessage": null, "data": { ... } }           │
//! │                                                                         │
//! │  Success (promo skipped — still a priced basket):                       │
//! │    { "success": true,                                                   │
//! │      "errorMessage": "Promo code SAVE10 has expired",                   │
//! │      "data": { ... priced without the promo ... } }                     │
//! │                                                                         │
//! │  Failure (basket rejected / store down):                                │
//! │    { "success": false, "errorMessage": "...", "data": null }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decimal Boundary
//! Inside the engine every amount is integer minor units. These DTOs are the
//! one place amounts become decimal numbers (`24.0`, `2.99`) for the JSON
//! consumer; nothing is ever computed on the f64 values.

use serde::{Deserialize, Serialize};

use sufra_core::{PricingResult, ValidatedLineItem};

use crate::engine::PricedBasket;
use crate::error::EngineError;

// =============================================================================
// Request
// =============================================================================

/// A pricing request as submitted by the caller. Untrusted.
///
/// Note what is absent: prices. The caller names dishes and quantities; every
/// amount comes from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    /// The restaurant the basket is from.
    pub restaurant_id: i64,

    /// The requested line items.
    pub items: Vec<sufra_core::LineItemRequest>,

    /// Optional promo code.
    #[serde(default)]
    pub promo_code: Option<String>,

    /// Optional delivery address, accepted and echoed for the caller's
    /// benefit; pricing does not vary by address.
    #[serde(default)]
    pub delivery_address_id: Option<i64>,
}

// =============================================================================
// Response
// =============================================================================

/// A priced line item, in decimal form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLineItemDto {
    pub dish_id: i64,
    pub dish_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub total_price: f64,
    pub is_available: bool,
}

impl From<&ValidatedLineItem> for PricedLineItemDto {
    fn from(item: &ValidatedLineItem) -> Self {
        PricedLineItemDto {
            dish_id: item.dish_id,
            dish_name: item.name.clone(),
            unit_price: item.unit_price.to_major_f64(),
            quantity: item.quantity,
            total_price: item.line_total.to_major_f64(),
            is_available: item.is_available,
        }
    }
}

/// The price breakdown, in decimal form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResultDto {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax_amount: f64,
    /// The rate as a fraction, e.g. 0.085 for 8.5%.
    pub tax_rate: f64,
    pub discount_amount: f64,
    pub grand_total: f64,
    pub free_delivery_applied: bool,
    pub promo_code_applied: Option<String>,
    pub currency: String,
    pub items: Vec<PricedLineItemDto>,
}

impl From<&PricingResult> for PricingResultDto {
    fn from(result: &PricingResult) -> Self {
        PricingResultDto {
            subtotal: result.subtotal.to_major_f64(),
            delivery_fee: result.delivery_fee.to_major_f64(),
            tax_amount: result.tax_amount.to_major_f64(),
            tax_rate: result.tax_rate.as_fraction(),
            discount_amount: result.discount_amount.to_major_f64(),
            grand_total: result.grand_total.to_major_f64(),
            free_delivery_applied: result.free_delivery_applied,
            promo_code_applied: result.promo_code_applied.clone(),
            currency: result.currency.clone(),
            items: result.items.iter().map(PricedLineItemDto::from).collect(),
        }
    }
}

/// The response envelope for a pricing call.
///
/// `success` tracks whether a priced basket was produced, NOT whether the
/// promo applied: a skipped promo still yields `success: true` with the skip
/// reason in `error_message` alongside the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuoteResponse {
    pub success: bool,
    pub error_message: Option<String>,
    pub data: Option<PricingResultDto>,
}

impl PriceQuoteResponse {
    /// Builds the envelope from a pricing outcome.
    pub fn from_outcome(outcome: &Result<PricedBasket, EngineError>) -> Self {
        match outcome {
            Ok(priced) => PriceQuoteResponse {
                success: true,
                error_message: priced.promo_note.clone(),
                data: Some(PricingResultDto::from(&priced.result)),
            },
            Err(err) => PriceQuoteResponse {
                success: false,
                error_message: Some(err.to_string()),
                data: None,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
