use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_superhost: bool,
    pub profile_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

/// A bookable property as shown on the results grid and the detail page.
///
/// `images[0]` is the cover image. Listings are never mutated once a
/// repository has been built from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub price_per_night: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub host: Host,
    pub property_type: String,
    pub capacity: u32,
    pub bedrooms: u32,
    pub beds: u32,
    pub baths: f64,
    /// Quoted stay total and dates when the backend priced a specific search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Listing {
    pub fn matches_location(&self, needle: &str) -> bool {
        self.location
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    pub fn currency_symbol(&self) -> &str {
        currency_symbol(&self.currency)
    }
}

pub fn currency_symbol(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

/// "1 bed", "2 beds", "2.5 baths".
pub fn pluralize(count: f64, noun: &str) -> String {
    if count == 1.0 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_listings;

    #[test]
    fn test_listing_json_uses_camel_case() {
        let listing = &seed_listings()[0];
        let value = serde_json::to_value(listing).unwrap();

        assert_eq!(value["pricePerNight"], 250.0);
        assert_eq!(value["numReviews"], 124);
        assert_eq!(value["host"]["isSuperhost"], true);
        assert_eq!(value["propertyType"], "Apartment");
        assert!(value.get("latitude").is_none());
    }

    #[test]
    fn test_listing_json_defaults() {
        let raw = r#"{
            "id": "9",
            "title": "Shed",
            "location": "Nowhere",
            "pricePerNight": 10,
            "rating": 3.5,
            "host": {"id": "h9", "name": "Pat", "profileImage": "p.jpg"},
            "propertyType": "Shed",
            "capacity": 1,
            "bedrooms": 0,
            "beds": 1,
            "baths": 0
        }"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();

        assert_eq!(listing.currency, "USD");
        assert!(listing.images.is_empty());
        assert!(!listing.host.is_superhost);
        assert_eq!(listing.total_price, None);
    }

    #[test]
    fn test_listing_json_keeps_stay_fields() {
        let mut listing = seed_listings()[1].clone();
        listing.total_price = Some(1083.0);
        listing.check_in = Some("2024-06-01".to_string());

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["totalPrice"], 1083.0);
        assert_eq!(value["checkIn"], "2024-06-01");
        assert!(value.get("checkOut").is_none());

        let back: Listing = serde_json::from_value(value).unwrap();
        assert_eq!(back, listing);
    }

    #[test]
    fn test_matches_location_is_case_insensitive_substring() {
        let listing = &seed_listings()[0];
        assert!(listing.matches_location("miami"));
        assert!(listing.matches_location("BEACH, flo"));
        assert!(!listing.matches_location("Miami Beach, Florida, USA"));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1.0, "bed"), "1 bed");
        assert_eq!(pluralize(0.0, "bedroom"), "0 bedrooms");
        assert_eq!(pluralize(2.5, "bath"), "2.5 baths");
    }

    #[test]
    fn test_currency_symbol() {
        assert_eq!(currency_symbol("USD"), "$");
        assert_eq!(currency_symbol("CHF"), "CHF");
    }
}
