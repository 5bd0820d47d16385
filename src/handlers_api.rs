use log::debug;
use warp::{Filter, Rejection, Reply};

use crate::models::Listing;
use crate::pricing::PriceBreakdown;
use crate::repository::{ListingRepository, RepositoryResult};
use crate::search_params::SearchParams;
use crate::warp_helpers::{
    decode_path_segment, raw_query, repository_rejection, with_repository, SharedRepository,
};

pub async fn find_listings(
    repository: &dyn ListingRepository,
    query: &str,
) -> RepositoryResult<Vec<Listing>> {
    let params = SearchParams::decode(query);
    debug!("API list with location '{}'", params.location);
    repository.list(&params).await
}

pub async fn quote_listing(
    repository: &dyn ListingRepository,
    id: &str,
) -> RepositoryResult<PriceBreakdown> {
    let listing = repository.get(id).await?;
    Ok(PriceBreakdown::for_listing(&listing))
}

pub async fn list_listings(
    query: String,
    repository: SharedRepository,
) -> Result<impl Reply, Rejection> {
    let listings = find_listings(repository.as_ref(), &query)
        .await
        .map_err(repository_rejection)?;
    Ok(warp::reply::json(&listings))
}

pub async fn get_listing(id: String, repository: SharedRepository) -> Result<impl Reply, Rejection> {
    let listing = repository
        .get(&decode_path_segment(&id))
        .await
        .map_err(repository_rejection)?;
    Ok(warp::reply::json(&listing))
}

pub async fn get_listing_pricing(
    id: String,
    repository: SharedRepository,
) -> Result<impl Reply, Rejection> {
    let breakdown = quote_listing(repository.as_ref(), &decode_path_segment(&id))
        .await
        .map_err(repository_rejection)?;
    Ok(warp::reply::json(&breakdown))
}

pub fn build_api_routes(
    repository: SharedRepository,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let list = warp::path!("api" / "listings")
        .and(warp::get())
        .and(raw_query())
        .and(with_repository(repository.clone()))
        .and_then(list_listings);

    let get = warp::path!("api" / "listings" / String)
        .and(warp::get())
        .and(with_repository(repository.clone()))
        .and_then(get_listing);

    let pricing = warp::path!("api" / "listings" / String / "pricing")
        .and(warp::get())
        .and(with_repository(repository))
        .and_then(get_listing_pricing);

    list.or(pricing).or(get)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use crate::seed::seed_listings;
    use std::sync::Arc;
    use warp::http::StatusCode;

    fn repository() -> SharedRepository {
        Arc::new(InMemoryRepository::with_seed_data())
    }

    #[tokio::test]
    async fn test_find_listings_by_location() {
        let repository = InMemoryRepository::with_seed_data();
        let listings = find_listings(&repository, "location=brooklyn").await.unwrap();

        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["5"]);
    }

    #[tokio::test]
    async fn test_quote_body_fields() {
        let repository = InMemoryRepository::with_seed_data();
        let breakdown = quote_listing(&repository, "1").await.unwrap();
        let body = serde_json::to_value(&breakdown).unwrap();

        assert_eq!(body["pricePerNight"], 250.0);
        assert_eq!(body["nights"], 5);
        assert_eq!(body["subtotal"], 1250.0);
        assert_eq!(body["cleaningFee"], 85.0);
        assert_eq!(body["serviceFee"], 175.0);
        assert_eq!(body["total"], 1510.0);
        assert_eq!(body["currency"], "USD");
    }

    #[tokio::test]
    async fn test_get_missing_listing_rejects() {
        let result = get_listing("404".to_string(), repository()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_escaped_id_reaches_listing() {
        let mut listings = seed_listings();
        listings[2].id = "a b".to_string();
        let repository: SharedRepository = Arc::new(InMemoryRepository::new(listings).unwrap());

        let response = get_listing("a%20b".to_string(), repository.clone())
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_listing_pricing("a%20b".to_string(), repository)
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
