use async_trait::async_trait;
use log::{debug, error};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::models::{Host, Listing, DEFAULT_CURRENCY};
use crate::repository::{ListingRepository, RepositoryError, RepositoryResult};
use crate::search_params::SearchParams;

/// Listing repository backed by the REST backend at `base_url`
/// (`GET {base}/listings/`, `GET {base}/listings/{id}/`).
#[derive(Clone)]
pub struct RemoteRepository {
    base_url: Url,
    agent: ureq::Agent,
}

impl RemoteRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            RepositoryError::Fetch(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::Fetch(format!(
                "API base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Ok(Self { base_url, agent })
    }

    pub fn listings_url(&self, params: &SearchParams) -> Url {
        let mut url = self.endpoint(&["listings", ""]);
        let encoded = params.encode();
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }
        url
    }

    pub fn listing_url(&self, id: &str) -> Url {
        self.endpoint(&["listings", id, ""])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.set_query(None);
        url
    }

    async fn fetch(&self, url: Url) -> RepositoryResult<String> {
        let agent = self.agent.clone();
        debug!("GET {}", url);

        tokio::task::spawn_blocking(move || -> Result<String, ureq::Error> {
            let mut response = agent.get(url.as_str()).call()?;
            response.body_mut().read_to_string()
        })
        .await
        .map_err(|e| RepositoryError::Fetch(format!("Request task failed: {}", e)))?
        .map_err(|e| match e {
            ureq::Error::StatusCode(404) => RepositoryError::NotFound(String::new()),
            other => {
                error!("Listing backend request failed: {}", other);
                RepositoryError::Fetch(other.to_string())
            }
        })
    }
}

#[async_trait]
impl ListingRepository for RemoteRepository {
    async fn list(&self, params: &SearchParams) -> RepositoryResult<Vec<Listing>> {
        let body = self.fetch(self.listings_url(params)).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => {
                RepositoryError::Fetch("Listings endpoint not found".to_string())
            }
            other => other,
        })?;
        decode_listing_page(&body)
    }

    async fn get(&self, id: &str) -> RepositoryResult<Listing> {
        let body = self.fetch(self.listing_url(id)).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => RepositoryError::NotFound(id.to_string()),
            other => other,
        })?;
        decode_listing(&body)
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Int(i64),
    Text(String),
}

impl RemoteId {
    fn label(&self) -> std::borrow::Cow<'_, str> {
        match self {
            RemoteId::Int(id) => id.to_string().into(),
            RemoteId::Text(id) => id.as_str().into(),
        }
    }

    fn into_string(self) -> String {
        match self {
            RemoteId::Int(id) => id.to_string(),
            RemoteId::Text(id) => id,
        }
    }
}

/// Decimal fields come back as strings ("250.00") from the backend.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteDecimal {
    Number(f64),
    Text(String),
}

impl RemoteDecimal {
    fn to_f64(&self, field: &str) -> RepositoryResult<f64> {
        match self {
            RemoteDecimal::Number(value) => Ok(*value),
            RemoteDecimal::Text(text) => text.trim().parse().map_err(|_| {
                RepositoryError::Fetch(format!("Invalid {} value '{}'", field, text))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteHost {
    id: RemoteId,
    name: String,
    #[serde(default)]
    is_superhost: bool,
    #[serde(default)]
    profile_image: String,
    response_rate: Option<f64>,
    response_time: Option<String>,
    join_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteListing {
    id: RemoteId,
    title: String,
    location: String,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    price_per_night: RemoteDecimal,
    currency: Option<String>,
    rating: f64,
    #[serde(default)]
    num_reviews: u32,
    #[serde(default)]
    description: String,
    property_type: String,
    capacity: u32,
    bedrooms: u32,
    beds: u32,
    baths: f64,
    host: RemoteHost,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    amenities: Vec<String>,
    total_price: Option<RemoteDecimal>,
    check_in: Option<String>,
    check_out: Option<String>,
}

impl RemoteListing {
    fn into_listing(self) -> RepositoryResult<Listing> {
        let price_per_night = self.price_per_night.to_f64("price_per_night")?;
        if price_per_night.is_nan() || price_per_night <= 0.0 {
            return Err(RepositoryError::Fetch(format!(
                "Listing {} has non-positive price {}",
                self.id.label(),
                price_per_night
            )));
        }
        let total_price = self
            .total_price
            .map(|total| total.to_f64("total_price"))
            .transpose()?;

        Ok(Listing {
            id: self.id.into_string(),
            title: self.title,
            location: self.location,
            address: self.address.filter(|a| !a.is_empty()),
            latitude: self.latitude,
            longitude: self.longitude,
            price_per_night,
            currency: self
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            rating: self.rating,
            num_reviews: self.num_reviews,
            images: self.images,
            description: self.description,
            amenities: self.amenities,
            host: Host {
                id: self.host.id.into_string(),
                name: self.host.name,
                is_superhost: self.host.is_superhost,
                profile_image: self.host.profile_image,
                response_rate: self.host.response_rate,
                response_time: self.host.response_time,
                join_date: self.host.join_date,
            },
            property_type: self.property_type,
            capacity: self.capacity,
            bedrooms: self.bedrooms,
            beds: self.beds,
            baths: self.baths,
            total_price,
            check_in: self.check_in,
            check_out: self.check_out,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemotePage {
    Plain(Vec<RemoteListing>),
    Paginated { results: Vec<RemoteListing> },
}

fn decode_listing_page(body: &str) -> RepositoryResult<Vec<Listing>> {
    let page: RemotePage = serde_json::from_str(body)
        .map_err(|e| RepositoryError::Fetch(format!("Malformed listings response: {}", e)))?;
    let records = match page {
        RemotePage::Plain(records) => records,
        RemotePage::Paginated { results } => results,
    };
    records.into_iter().map(RemoteListing::into_listing).collect()
}

fn decode_listing(body: &str) -> RepositoryResult<Listing> {
    let record: RemoteListing = serde_json::from_str(body)
        .map_err(|e| RepositoryError::Fetch(format!("Malformed listing response: {}", e)))?;
    record.into_listing()
}
