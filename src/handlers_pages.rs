use askama::Template;
use log::{debug, error};
use url::form_urlencoded;
use warp::http::{StatusCode, Uri};
use warp::{reject, Filter, Rejection, Reply};

use crate::carousel::PageScroll;
use crate::filters::FilterSelection;
use crate::repository::{ListingRepository, RepositoryError};
use crate::search_params::{SearchForm, SearchParams};
use crate::views::{parse_peek, DetailPage, HomePage, MessagePage, ResultsPage, PHOTO_KEY};
use crate::warp_helpers::{
    decode_path_segment, raw_query, render_rejection, with_repository, RenderError,
    SharedRepository,
};

const LISTINGS_UNAVAILABLE: &str =
    "We couldn't load stays right now. Please try your search again in a moment.";

/// Rendered HTML plus the status it should be served with.
#[derive(Debug)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub html: String,
}

impl RenderedPage {
    fn new(status: StatusCode, html: String) -> Self {
        Self { status, html }
    }

    pub fn into_reply(self) -> impl Reply {
        warp::reply::with_status(warp::reply::html(self.html), self.status)
    }
}

pub fn render_home() -> Result<RenderedPage, askama::Error> {
    Ok(RenderedPage::new(StatusCode::OK, HomePage::new().render()?))
}

pub async fn render_results(
    repository: &dyn ListingRepository,
    query: &str,
) -> Result<RenderedPage, askama::Error> {
    let params = SearchParams::decode(query);
    let filters = FilterSelection::from_query(query);
    let peek = parse_peek(query);

    match repository.list(&params).await {
        Ok(listings) => {
            debug!(
                "Search '{}' matched {} listings",
                params.location,
                listings.len()
            );
            let page = ResultsPage::build(&params, &filters, peek, &listings);
            Ok(RenderedPage::new(StatusCode::OK, page.render()?))
        }
        Err(e) => {
            error!("Failed to load listings for '{}': {}", params.location, e);
            let page = ResultsPage::failed(&params, &filters, LISTINGS_UNAVAILABLE);
            Ok(RenderedPage::new(StatusCode::BAD_GATEWAY, page.render()?))
        }
    }
}

pub async fn render_detail(
    repository: &dyn ListingRepository,
    id: &str,
    query: &str,
) -> Result<RenderedPage, askama::Error> {
    match repository.get(id).await {
        Ok(listing) => {
            let scroll = PageScroll::new();
            let page = DetailPage::build(&listing, photo_index(query), &scroll);
            Ok(RenderedPage::new(StatusCode::OK, page.render()?))
        }
        Err(RepositoryError::NotFound(_)) => {
            debug!("Listing {} not found", id);
            Ok(RenderedPage::new(
                StatusCode::NOT_FOUND,
                MessagePage::listing_not_found().render()?,
            ))
        }
        Err(e) => {
            error!("Failed to load listing {}: {}", id, e);
            Ok(RenderedPage::new(
                StatusCode::BAD_GATEWAY,
                MessagePage::listing_unavailable().render()?,
            ))
        }
    }
}

fn photo_index(query: &str) -> Option<usize> {
    let (_, value) =
        form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == PHOTO_KEY)?;
    match value.parse() {
        Ok(index) => Some(index),
        Err(e) => {
            debug!("Ignoring malformed photo value '{}': {}", value, e);
            None
        }
    }
}

pub async fn home_page() -> Result<impl Reply, Rejection> {
    render_home()
        .map(RenderedPage::into_reply)
        .map_err(render_rejection)
}

pub async fn results_page(
    query: String,
    repository: SharedRepository,
) -> Result<impl Reply, Rejection> {
    render_results(repository.as_ref(), &query)
        .await
        .map(RenderedPage::into_reply)
        .map_err(render_rejection)
}

/// Turns the raw form fields into the canonical `/search?...` URL.
pub async fn submit_search(query: String) -> Result<impl Reply, Rejection> {
    let location = SearchForm::from_query(&query).into_params().search_url();
    let uri: Uri = location.parse().map_err(|e| {
        error!("Search redirect '{}' is not a valid URI: {}", location, e);
        reject::custom(RenderError {
            message: "Invalid search redirect".to_string(),
        })
    })?;
    Ok(warp::redirect::see_other(uri))
}

pub async fn detail_page(
    id: String,
    query: String,
    repository: SharedRepository,
) -> Result<impl Reply, Rejection> {
    render_detail(repository.as_ref(), &decode_path_segment(&id), &query)
        .await
        .map(RenderedPage::into_reply)
        .map_err(render_rejection)
}

pub fn build_page_routes(
    repository: SharedRepository,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let home = warp::path::end().and(warp::get()).and_then(home_page);

    let submit = warp::path!("search" / "submit")
        .and(warp::get())
        .and(raw_query())
        .and_then(submit_search);

    let results = warp::path!("search")
        .and(warp::get())
        .and(raw_query())
        .and(with_repository(repository.clone()))
        .and_then(results_page);

    let detail = warp::path!("listing" / String)
        .and(warp::get())
        .and(raw_query())
        .and(with_repository(repository))
        .and_then(detail_page);

    home.or(submit).or(results).or(detail)
}
