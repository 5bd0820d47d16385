use serde_json::json;
use std::convert::Infallible;
use warp::{Filter, Rejection, Reply};

use crate::search_params::SearchParams;
use crate::warp_helpers::{repository_rejection, with_repository, SharedRepository};

pub async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// Ready once the listing backend answers an unfiltered query.
pub async fn ready_check(repository: SharedRepository) -> Result<impl Reply, Rejection> {
    let listings = repository
        .list(&SearchParams::default())
        .await
        .map_err(repository_rejection)?;

    Ok(warp::reply::json(&json!({
        "status": "ready",
        "backend": repository.backend_name(),
        "listings": listings.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

pub fn build_health_routes(
    repository: SharedRepository,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let ready = warp::path("ready")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_repository(repository))
        .and_then(ready_check);

    health.or(ready)
}
