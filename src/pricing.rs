use serde::Serialize;

use crate::models::Listing;

/// Length of the mock stay quoted on the detail page.
pub const STAY_NIGHTS: u32 = 5;
pub const CLEANING_FEE: f64 = 85.0;
pub const SERVICE_FEE_RATE: f64 = 0.14;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub price_per_night: f64,
    pub nights: u32,
    pub currency: String,
    pub subtotal: f64,
    pub cleaning_fee: f64,
    pub service_fee: f64,
    pub total: f64,
}

impl PriceBreakdown {
    pub fn for_listing(listing: &Listing) -> Self {
        Self::quote(listing.price_per_night, &listing.currency)
    }

    pub fn quote(price_per_night: f64, currency: &str) -> Self {
        let subtotal = price_per_night * f64::from(STAY_NIGHTS);
        let service_fee = round_half_up(subtotal * SERVICE_FEE_RATE);

        Self {
            price_per_night,
            nights: STAY_NIGHTS,
            currency: currency.to_string(),
            subtotal,
            cleaning_fee: CLEANING_FEE,
            service_fee,
            total: subtotal + CLEANING_FEE + service_fee,
        }
    }
}

/// Rounds to the nearest whole unit, halves towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
