use askama::Template;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::{reject, Filter, Rejection, Reply};

use crate::repository::{ListingRepository, RepositoryError};
use crate::views::MessagePage;

pub type SharedRepository = Arc<dyn ListingRepository>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub timestamp: String,
}

#[derive(Debug)]
pub struct BackendError {
    pub message: String,
}

impl reject::Reject for BackendError {}

#[derive(Debug)]
pub struct NotFoundError {
    pub id: String,
}

impl reject::Reject for NotFoundError {}

#[derive(Debug)]
pub struct RenderError {
    pub message: String,
}

impl reject::Reject for RenderError {}

pub fn repository_rejection(err: RepositoryError) -> Rejection {
    match err {
        RepositoryError::NotFound(id) => reject::custom(NotFoundError { id }),
        other => {
            log::error!("Listing repository error: {}", other);
            reject::custom(BackendError {
                message: other.to_string(),
            })
        }
    }
}

pub fn render_rejection(err: askama::Error) -> Rejection {
    log::error!("Template rendering failed: {}", err);
    reject::custom(RenderError {
        message: err.to_string(),
    })
}

pub fn with_repository(
    repository: SharedRepository,
) -> impl Filter<Extract = (SharedRepository,), Error = Infallible> + Clone {
    warp::any().map(move || repository.clone())
}

/// Path parameters arrive still percent-encoded. Invalid UTF-8 after
/// decoding keeps the raw segment.
pub fn decode_path_segment(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            log::debug!("Keeping undecodable path segment '{}': {}", segment, e);
            segment.to_string()
        }
    }
}

fn html_page(page: MessagePage, code: StatusCode) -> warp::reply::Response {
    let html = page.render().unwrap_or_else(|_| code.to_string());
    warp::reply::with_status(warp::reply::html(html), code).into_response()
}

/// Raw query string, or empty when the request has none.
pub fn raw_query() -> impl Filter<Extract = (String,), Error = Infallible> + Clone {
    warp::query::raw()
        .or(warp::any().map(String::new))
        .unify()
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;
    let timestamp = chrono::Utc::now().to_rfc3339();

    // unknown paths and page rendering failures keep the page shell
    if err.is_not_found() {
        return Ok(html_page(MessagePage::page_not_found(), StatusCode::NOT_FOUND));
    } else if let Some(render_error) = err.find::<RenderError>() {
        log::error!("Page failed: {}", render_error.message);
        return Ok(html_page(
            MessagePage::server_error(),
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    } else if let Some(not_found) = err.find::<NotFoundError>() {
        code = StatusCode::NOT_FOUND;
        message = format!("Listing {} not found", not_found.id);
    } else if let Some(backend_error) = err.find::<BackendError>() {
        code = StatusCode::BAD_GATEWAY;
        message = backend_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload too large".to_string();
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Unsupported media type".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method not allowed".to_string();
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal server error".to_string();
    }

    let error_response = ErrorResponse {
        error: message,
        code: code.as_u16(),
        timestamp,
    };

    Ok(warp::reply::with_status(warp::reply::json(&error_response), code).into_response())
}

pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "OPTIONS"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_listing_is_404() {
        let rejection = repository_rejection(RepositoryError::NotFound("9".to_string()));
        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backend_failure_is_bad_gateway() {
        let rejection = repository_rejection(RepositoryError::Fetch("timed out".to_string()));
        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_decode_path_segment() {
        assert_eq!(decode_path_segment("a%20b"), "a b");
        assert_eq!(decode_path_segment("plain"), "plain");
        assert_eq!(decode_path_segment("%FF"), "%FF");
    }

    #[tokio::test]
    async fn test_render_failure_keeps_page_shell() {
        let rejection = reject::custom(RenderError {
            message: "boom".to_string(),
        });
        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_unknown_path_renders_html() {
        let response = handle_rejection(reject::not_found())
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
