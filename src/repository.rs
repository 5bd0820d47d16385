use async_trait::async_trait;
use log::info;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::Listing;
use crate::search_params::SearchParams;
use crate::seed::seed_listings;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Listing with id {0} not found")]
    NotFound(String),

    #[error("Failed to fetch listings: {0}")]
    Fetch(String),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Source of listings for every view and API handler.
///
/// `list` keeps the backend's natural order and returns an empty vector
/// rather than an error when nothing matches.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn list(&self, params: &SearchParams) -> RepositoryResult<Vec<Listing>>;

    async fn get(&self, id: &str) -> RepositoryResult<Listing>;

    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    listings: Vec<Listing>,
}

impl InMemoryRepository {
    pub fn new(listings: Vec<Listing>) -> RepositoryResult<Self> {
        validate(&listings)?;
        Ok(Self { listings })
    }

    pub fn with_seed_data() -> Self {
        Self {
            listings: seed_listings(),
        }
    }

    pub fn from_json_file(path: &Path) -> RepositoryResult<Self> {
        let bytes = std::fs::read(path)?;
        let listings: Vec<Listing> = serde_json::from_slice(&bytes)?;
        info!(
            "Loaded {} listings from {}",
            listings.len(),
            path.display()
        );
        Self::new(listings)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn search(&self, params: &SearchParams) -> Vec<Listing> {
        if !params.has_location() {
            return self.listings.clone();
        }
        self.listings
            .iter()
            .filter(|listing| listing.matches_location(&params.location))
            .cloned()
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }
}

fn validate(listings: &[Listing]) -> RepositoryResult<()> {
    let mut ids = HashSet::new();
    for listing in listings {
        if !ids.insert(listing.id.as_str()) {
            return Err(RepositoryError::InvalidSeed(format!(
                "duplicate listing id {}",
                listing.id
            )));
        }
        if listing.price_per_night.is_nan() || listing.price_per_night <= 0.0 {
            return Err(RepositoryError::InvalidSeed(format!(
                "listing {} has non-positive price {}",
                listing.id, listing.price_per_night
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl ListingRepository for InMemoryRepository {
    async fn list(&self, params: &SearchParams) -> RepositoryResult<Vec<Listing>> {
        Ok(self.search(params))
    }

    async fn get(&self, id: &str) -> RepositoryResult<Listing> {
        self.find(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_location_returns_everything_in_order() {
        let repo = InMemoryRepository::with_seed_data();
        let listings = repo.list(&SearchParams::default()).await.unwrap();
        assert_eq!(ids(&listings), vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_location_filter_any_case() {
        let repo = InMemoryRepository::with_seed_data();
        for query in ["miami", "MIAMI", "MiAmI beach"] {
            let listings = repo.list(&SearchParams::for_location(query)).await.unwrap();
            assert_eq!(ids(&listings), vec!["1"], "query {}", query);
        }
    }

    #[tokio::test]
    async fn test_location_filter_partition() {
        let repo = InMemoryRepository::with_seed_data();
        let needle = "a";
        let matched = repo.list(&SearchParams::for_location(needle)).await.unwrap();

        for listing in seed_listings() {
            let included = matched.iter().any(|m| m.id == listing.id);
            assert_eq!(included, listing.location.to_lowercase().contains(needle));
        }
    }

    #[tokio::test]
    async fn test_unknown_location_is_empty_not_error() {
        let repo = InMemoryRepository::with_seed_data();
        let listings = repo
            .list(&SearchParams::for_location("nowhere"))
            .await
            .unwrap();
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = InMemoryRepository::with_seed_data();
        let listing = repo.get("4").await.unwrap();
        assert_eq!(listing.title, "Beachfront bungalow");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = InMemoryRepository::with_seed_data();
        match repo.get("42").await {
            Err(RepositoryError::NotFound(id)) => assert_eq!(id, "42"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut listings = seed_listings();
        listings[1].id = "1".to_string();
        assert!(matches!(
            InMemoryRepository::new(listings),
            Err(RepositoryError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut listings = seed_listings();
        listings[0].price_per_night = 0.0;
        assert!(InMemoryRepository::new(listings).is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut listings = seed_listings();
        listings.truncate(2);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&listings).unwrap().as_bytes())
            .unwrap();

        let repo = InMemoryRepository::from_json_file(file.path()).unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.find("2").unwrap().location, "Asheville, North Carolina");
    }

    #[test]
    fn test_from_json_file_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            InMemoryRepository::from_json_file(file.path()),
            Err(RepositoryError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = InMemoryRepository::from_json_file(Path::new("/nonexistent/seed.json"));
        assert!(matches!(result, Err(RepositoryError::Io(_))));
    }
}
