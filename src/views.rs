//! View models and askama templates for the HTML pages.
//!
//! Everything a template prints is computed here so the templates stay
//! free of logic beyond loops and flags.

use askama::Template;
use url::form_urlencoded;

use crate::carousel::{Carousel, PageScroll};
use crate::filters::{FilterSelection, FILTERS_KEY, FILTER_OPTIONS};
use crate::models::{currency_symbol, pluralize, Listing};
use crate::pricing::PriceBreakdown;
use crate::search_params::{with_query, SearchParams, SEARCH_PATH};

pub const PEEK_KEY: &str = "peek";
pub const PHOTO_KEY: &str = "photo";

/// Descriptions longer than this get a "Show more" toggle.
const DESCRIPTION_PREVIEW_CHARS: usize = 250;
/// Amenity lists longer than this get a "Show all" button.
const AMENITY_PREVIEW_COUNT: usize = 6;
/// Cover plus up to four thumbnails in the detail page grid.
const GALLERY_GRID_TILES: usize = 5;

pub fn format_amount(symbol: &str, amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}{:.0}", symbol, amount)
    } else {
        format!("{}{:.2}", symbol, amount)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchFormView {
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
}

impl From<&SearchParams> for SearchFormView {
    fn from(params: &SearchParams) -> Self {
        Self {
            location: params.location.clone(),
            check_in: params
                .check_in
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            check_out: params
                .check_out
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            guests: params.guests.unwrap_or(1),
        }
    }
}

pub struct Destination {
    pub name: &'static str,
    pub image: &'static str,
    pub href: String,
}

pub struct Inspiration {
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

const POPULAR_DESTINATIONS: &[(&str, &str)] = &[
    ("New York", "https://images.pexels.com/photos/802893/pexels-photo-802893.jpeg"),
    ("Miami", "https://images.pexels.com/photos/1838640/pexels-photo-1838640.jpeg"),
    ("Los Angeles", "https://images.pexels.com/photos/1394967/pexels-photo-1394967.jpeg"),
    ("San Francisco", "https://images.pexels.com/photos/208745/pexels-photo-208745.jpeg"),
    ("Chicago", "https://images.pexels.com/photos/1034662/pexels-photo-1034662.jpeg"),
    ("Austin", "https://images.pexels.com/photos/1209978/pexels-photo-1209978.jpeg"),
];

const INSPIRATIONS: &[Inspiration] = &[
    Inspiration {
        name: "Beach getaways",
        description: "Relax and unwind with the sound of waves and warm sand.",
        image: "https://images.pexels.com/photos/1174732/pexels-photo-1174732.jpeg",
    },
    Inspiration {
        name: "Mountain retreats",
        description: "Breathe fresh air and enjoy stunning views from your cabin.",
        image: "https://images.pexels.com/photos/147411/pexels-photo-147411.jpeg",
    },
    Inspiration {
        name: "Urban adventures",
        description: "Explore vibrant cities and immerse yourself in culture.",
        image: "https://images.pexels.com/photos/2129796/pexels-photo-2129796.jpeg",
    },
    Inspiration {
        name: "Unique stays",
        description: "Book one-of-a-kind places to stay and experience something new.",
        image: "https://images.pexels.com/photos/2175952/pexels-photo-2175952.jpeg",
    },
];

pub const HERO_IMAGE: &str = "https://images.pexels.com/photos/2351649/pexels-photo-2351649.jpeg";
pub const HOST_CTA_IMAGE: &str =
    "https://images.pexels.com/photos/1643384/pexels-photo-1643384.jpeg";

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub title: String,
    pub scroll_suspended: bool,
    pub form: SearchFormView,
    pub hero_image: &'static str,
    pub host_cta_image: &'static str,
    pub destinations: Vec<Destination>,
    pub inspirations: Vec<&'static Inspiration>,
}

impl HomePage {
    pub fn new() -> Self {
        Self {
            title: "Find your next adventure".to_string(),
            scroll_suspended: false,
            form: SearchFormView::default(),
            hero_image: HERO_IMAGE,
            host_cta_image: HOST_CTA_IMAGE,
            destinations: POPULAR_DESTINATIONS
                .iter()
                .map(|&(name, image)| Destination {
                    name,
                    image,
                    href: SearchParams::for_location(name).search_url(),
                })
                .collect(),
            inspirations: INSPIRATIONS.iter().collect(),
        }
    }
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds `/search?...` links that keep the current search and chip state.
#[derive(Debug, Clone)]
pub struct ResultsLinks {
    params: SearchParams,
    filters: FilterSelection,
}

impl ResultsLinks {
    pub fn new(params: SearchParams, filters: FilterSelection) -> Self {
        Self { params, filters }
    }

    pub fn href(&self, filters: &FilterSelection, peek: Option<(&str, usize)>) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.params.append_pairs(&mut serializer);
        if let Some(value) = filters.to_query_value() {
            serializer.append_pair(FILTERS_KEY, &value);
        }
        if let Some((id, index)) = peek {
            serializer.append_pair(PEEK_KEY, &format!("{}:{}", id, index));
        }
        with_query(SEARCH_PATH, &serializer.finish())
    }

    pub fn with_peek(&self, id: &str, index: usize) -> String {
        self.href(&self.filters, Some((id, index)))
    }

    pub fn with_filter_toggled(&self, id: &str) -> String {
        self.href(&self.filters.toggled(id), None)
    }
}

/// Detail page path with the id escaped as a single path segment.
pub fn listing_href(id: &str) -> String {
    format!("/listing/{}", urlencoding::encode(id))
}

/// `peek=<listing id>:<image index>`; anything malformed is ignored.
pub fn parse_peek(query: &str) -> Option<(String, usize)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let (_, value) = form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == PEEK_KEY)?;
    let (id, index) = value.rsplit_once(':')?;
    let index = index.parse().ok()?;
    Some((id.to_string(), index))
}

pub struct CardView {
    pub href: String,
    pub image: String,
    pub has_image: bool,
    pub title: String,
    pub location: String,
    pub rating: f64,
    pub property_type: String,
    pub rooms: String,
    pub price: String,
    pub has_controls: bool,
    pub prev_href: String,
    pub next_href: String,
    pub dots: Vec<&'static str>,
}

impl CardView {
    pub fn build(listing: &Listing, links: &ResultsLinks, peek: Option<usize>) -> Self {
        let mut carousel = Carousel::new(listing.images.len());
        carousel.open(peek.unwrap_or(0));
        let index = carousel.index().unwrap_or(0);
        let prev = carousel.previous_index().unwrap_or(0);
        let next = carousel.next_index().unwrap_or(0);

        Self {
            href: listing_href(&listing.id),
            image: listing.images.get(index).cloned().unwrap_or_default(),
            has_image: !listing.images.is_empty(),
            title: listing.title.clone(),
            location: listing.location.clone(),
            rating: listing.rating,
            property_type: listing.property_type.clone(),
            rooms: format!(
                "{} · {}",
                pluralize(f64::from(listing.bedrooms), "bedroom"),
                pluralize(f64::from(listing.beds), "bed")
            ),
            price: format_amount(listing.currency_symbol(), listing.price_per_night),
            has_controls: carousel.image_count() > 1,
            prev_href: links.with_peek(&listing.id, prev),
            next_href: links.with_peek(&listing.id, next),
            dots: (0..carousel.image_count())
                .map(|i| if i == index { "dot is-active" } else { "dot" })
                .collect(),
        }
    }
}

pub struct ChipView {
    pub label: &'static str,
    pub href: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsPage {
    pub title: String,
    pub scroll_suspended: bool,
    pub form: SearchFormView,
    pub chips: Vec<ChipView>,
    pub heading: String,
    pub count_label: String,
    pub cards: Vec<CardView>,
    pub error: Option<String>,
}

impl ResultsPage {
    pub fn build(
        params: &SearchParams,
        filters: &FilterSelection,
        peek: Option<(String, usize)>,
        listings: &[Listing],
    ) -> Self {
        let links = ResultsLinks::new(params.clone(), filters.clone());
        let heading = if params.has_location() {
            format!("Stays in {}", params.location)
        } else {
            "All stays".to_string()
        };

        let cards = listings
            .iter()
            .map(|listing| {
                let card_peek = peek
                    .as_ref()
                    .filter(|(id, _)| *id == listing.id)
                    .map(|(_, index)| *index);
                CardView::build(listing, &links, card_peek)
            })
            .collect();

        Self {
            title: heading.clone(),
            scroll_suspended: false,
            form: SearchFormView::from(params),
            chips: chips(filters, &links),
            heading,
            count_label: format!(
                "{} {}",
                listings.len(),
                if listings.len() == 1 { "stay" } else { "stays" }
            ),
            cards,
            error: None,
        }
    }

    /// Results page shell with the search bar intact and an error state
    /// instead of the grid.
    pub fn failed(params: &SearchParams, filters: &FilterSelection, message: &str) -> Self {
        let mut page = Self::build(params, filters, None, &[]);
        page.error = Some(message.to_string());
        page
    }
}

fn chips(filters: &FilterSelection, links: &ResultsLinks) -> Vec<ChipView> {
    FILTER_OPTIONS
        .iter()
        .map(|option| ChipView {
            label: option.label,
            href: links.with_filter_toggled(option.id),
            selected: filters.contains(option.id),
        })
        .collect()
}

pub struct GalleryTile {
    pub src: String,
    pub alt: String,
    pub href: String,
}

pub struct LightboxView {
    pub src: String,
    pub alt: String,
    pub position: String,
    pub prev_href: String,
    pub next_href: String,
    pub close_href: String,
}

pub struct PriceView {
    pub per_night: String,
    pub nights_line: String,
    pub subtotal: String,
    pub cleaning_fee: String,
    pub service_fee: String,
    pub total: String,
}

impl From<&PriceBreakdown> for PriceView {
    fn from(breakdown: &PriceBreakdown) -> Self {
        let symbol = currency_symbol(&breakdown.currency);
        Self {
            per_night: format_amount(symbol, breakdown.price_per_night),
            nights_line: format!(
                "{} x {} nights",
                format_amount(symbol, breakdown.price_per_night),
                breakdown.nights
            ),
            subtotal: format_amount(symbol, breakdown.subtotal),
            cleaning_fee: format_amount(symbol, breakdown.cleaning_fee),
            service_fee: format_amount(symbol, breakdown.service_fee),
            total: format_amount(symbol, breakdown.total),
        }
    }
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailPage {
    pub title: String,
    pub scroll_suspended: bool,
    pub rating: f64,
    pub num_reviews: u32,
    pub location: String,
    pub is_superhost: bool,
    pub host_name: String,
    pub host_image: String,
    pub host_details: Vec<String>,
    pub summary: String,
    pub facts: String,
    pub description: String,
    pub description_preview: String,
    pub long_description: bool,
    pub amenities: Vec<String>,
    pub more_amenities: Vec<String>,
    pub amenity_count: usize,
    pub amenity_overflow: bool,
    pub tiles: Vec<GalleryTile>,
    pub show_all_href: String,
    pub show_all_photos: bool,
    pub lightbox: Option<LightboxView>,
    pub price: PriceView,
}

impl DetailPage {
    /// `photo` opens the full-screen gallery on that image.
    pub fn build(listing: &Listing, photo: Option<usize>, scroll: &PageScroll) -> Self {
        let base_href = listing_href(&listing.id);
        let photo_href = |index: usize| format!("{}?{}={}", base_href, PHOTO_KEY, index);

        let mut lightbox = Carousel::lightbox(listing.images.len(), scroll);
        if let Some(index) = photo.filter(|_| !listing.images.is_empty()) {
            lightbox.open(index);
        }

        let lightbox_view = lightbox.index().map(|index| LightboxView {
            src: listing.images.get(index).cloned().unwrap_or_default(),
            alt: format!("{} - {}", listing.title, index),
            position: format!("{} / {}", index + 1, listing.images.len()),
            prev_href: photo_href(lightbox.previous_index().unwrap_or(0)),
            next_href: photo_href(lightbox.next_index().unwrap_or(0)),
            close_href: base_href.clone(),
        });

        let tiles = listing
            .images
            .iter()
            .take(GALLERY_GRID_TILES)
            .enumerate()
            .map(|(index, src)| GalleryTile {
                src: src.clone(),
                alt: if index == 0 {
                    format!("{} - main", listing.title)
                } else {
                    format!("{} - {}", listing.title, index)
                },
                href: photo_href(index),
            })
            .collect();

        let mut host_details = Vec::new();
        if let Some(rate) = listing.host.response_rate {
            host_details.push(format!("Response rate: {}%", rate));
        }
        if let Some(time) = &listing.host.response_time {
            host_details.push(format!("Responds {}", time));
        }
        if let Some(joined) = &listing.host.join_date {
            host_details.push(format!("Joined in {}", joined));
        }

        Self {
            title: listing.title.clone(),
            scroll_suspended: scroll.is_suspended(),
            rating: listing.rating,
            num_reviews: listing.num_reviews,
            location: listing.location.clone(),
            is_superhost: listing.host.is_superhost,
            host_name: listing.host.name.clone(),
            host_image: listing.host.profile_image.clone(),
            host_details,
            summary: format!(
                "{} hosted by {}",
                listing.property_type, listing.host.name
            ),
            facts: [
                pluralize(f64::from(listing.capacity), "guest"),
                pluralize(f64::from(listing.bedrooms), "bedroom"),
                pluralize(f64::from(listing.beds), "bed"),
                pluralize(listing.baths, "bath"),
            ]
            .join(" · "),
            description: listing.description.clone(),
            description_preview: listing
                .description
                .chars()
                .take(DESCRIPTION_PREVIEW_CHARS)
                .collect(),
            long_description: listing.description.chars().count() > DESCRIPTION_PREVIEW_CHARS,
            amenities: listing
                .amenities
                .iter()
                .take(AMENITY_PREVIEW_COUNT)
                .cloned()
                .collect(),
            more_amenities: listing
                .amenities
                .iter()
                .skip(AMENITY_PREVIEW_COUNT)
                .cloned()
                .collect(),
            amenity_count: listing.amenities.len(),
            amenity_overflow: listing.amenities.len() > AMENITY_PREVIEW_COUNT,
            tiles,
            show_all_href: photo_href(0),
            show_all_photos: listing.images.len() > GALLERY_GRID_TILES,
            lightbox: lightbox_view,
            price: PriceView::from(&PriceBreakdown::for_listing(listing)),
        }
    }
}

/// Empty/error state inside the normal page shell.
#[derive(Template)]
#[template(path = "message.html")]
pub struct MessagePage {
    pub title: String,
    pub scroll_suspended: bool,
    pub heading: String,
    pub message: String,
}

impl MessagePage {
    pub fn listing_not_found() -> Self {
        Self {
            title: "Listing not found".to_string(),
            scroll_suspended: false,
            heading: "Listing not found".to_string(),
            message: "The listing you're looking for doesn't exist or has been removed."
                .to_string(),
        }
    }

    pub fn listing_unavailable() -> Self {
        Self {
            title: "Listing unavailable".to_string(),
            scroll_suspended: false,
            heading: "Listing unavailable".to_string(),
            message: "We couldn't load this listing right now. Please try again in a moment."
                .to_string(),
        }
    }

    pub fn server_error() -> Self {
        Self {
            title: "Something went wrong".to_string(),
            scroll_suspended: false,
            heading: "Something went wrong".to_string(),
            message: "We couldn't show this page. Please try again in a moment.".to_string(),
        }
    }

    pub fn page_not_found() -> Self {
        Self {
            title: "Page not found".to_string(),
            scroll_suspended: false,
            heading: "Page not found".to_string(),
            message: "We can't seem to find the page you're looking for.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_listings;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("$", 250.0), "$250");
        assert_eq!(format_amount("$", 310.5), "$310.50");
    }

    #[test]
    fn test_form_view_from_params() {
        let params = SearchParams::decode("location=Maui&checkIn=2024-06-01T22:00:00.000Z");
        let form = SearchFormView::from(&params);
        assert_eq!(form.location, "Maui");
        assert_eq!(form.check_in, "2024-06-01");
        assert_eq!(form.check_out, "");
        assert_eq!(form.guests, 1);
    }

    #[test]
    fn test_results_links_keep_search_and_filters() {
        let links = ResultsLinks::new(
            SearchParams::for_location("Maui"),
            FilterSelection::from_query("filters=luxe"),
        );
        assert_eq!(links.with_peek("4", 2), "/search?location=Maui&filters=luxe&peek=4%3A2");
        assert_eq!(links.with_filter_toggled("luxe"), "/search?location=Maui");
        assert_eq!(
            links.with_filter_toggled("design"),
            "/search?location=Maui&filters=luxe%2Cdesign"
        );
    }

    #[test]
    fn test_parse_peek() {
        assert_eq!(parse_peek("peek=4%3A2"), Some(("4".to_string(), 2)));
        assert_eq!(parse_peek("?location=x&peek=a:b:1"), Some(("a:b".to_string(), 1)));
        assert_eq!(parse_peek("peek=4"), None);
        assert_eq!(parse_peek("peek=4:x"), None);
        assert_eq!(parse_peek(""), None);
    }

    #[test]
    fn test_card_wraps_peek_links() {
        let listing = &seed_listings()[0];
        let links = ResultsLinks::new(SearchParams::default(), FilterSelection::default());
        let card = CardView::build(listing, &links, Some(2));

        assert_eq!(card.image, listing.images[2]);
        assert_eq!(card.dots, vec!["dot", "dot", "dot is-active"]);
        assert_eq!(card.next_href, "/search?peek=1%3A0");
        assert_eq!(card.prev_href, "/search?peek=1%3A1");
        assert_eq!(card.rooms, "2 bedrooms · 2 beds");
        assert_eq!(card.price, "$250");
    }

    #[test]
    fn test_links_escape_listing_id() {
        let mut listing = seed_listings()[0].clone();
        listing.id = "a b".to_string();
        let links = ResultsLinks::new(SearchParams::default(), FilterSelection::default());

        let card = CardView::build(&listing, &links, None);
        assert_eq!(card.href, "/listing/a%20b");

        let scroll = PageScroll::new();
        let page = DetailPage::build(&listing, Some(1), &scroll);
        let lightbox = page.lightbox.as_ref().unwrap();
        assert_eq!(lightbox.close_href, "/listing/a%20b");
        assert_eq!(lightbox.next_href, "/listing/a%20b?photo=2");
    }

    #[test]
    fn test_card_without_images() {
        let mut listing = seed_listings()[2].clone();
        listing.images.clear();
        let links = ResultsLinks::new(SearchParams::default(), FilterSelection::default());
        let card = CardView::build(&listing, &links, Some(3));

        assert!(!card.has_image);
        assert!(!card.has_controls);
        assert!(card.dots.is_empty());
        assert_eq!(card.rooms, "1 bedroom · 1 bed");
    }

    #[test]
    fn test_results_heading_and_count() {
        let listings = seed_listings();
        let page = ResultsPage::build(
            &SearchParams::for_location("miami"),
            &FilterSelection::default(),
            None,
            &listings[..1],
        );
        assert_eq!(page.heading, "Stays in miami");
        assert_eq!(page.count_label, "1 stay");

        let page = ResultsPage::build(
            &SearchParams::default(),
            &FilterSelection::default(),
            None,
            &listings,
        );
        assert_eq!(page.heading, "All stays");
        assert_eq!(page.count_label, "5 stays");
        assert_eq!(page.chips.len(), 12);
    }

    #[test]
    fn test_detail_closed_gallery() {
        let scroll = PageScroll::new();
        let page = DetailPage::build(&seed_listings()[4], None, &scroll);

        assert!(page.lightbox.is_none());
        assert!(!page.scroll_suspended);
        assert_eq!(page.facts, "6 guests · 3 bedrooms · 3 beds · 2.5 baths");
        assert_eq!(page.summary, "Townhouse hosted by Emily");
        assert_eq!(page.tiles.len(), 3);
        assert!(!page.show_all_photos);
        assert!(page.amenity_overflow);
        assert_eq!(page.amenities.len(), 6);
        assert_eq!(page.more_amenities, vec!["TV".to_string()]);
        assert!(!page.long_description);
        assert_eq!(page.price.total, "$1653");
    }

    #[test]
    fn test_detail_open_gallery_suspends_scroll() {
        let scroll = PageScroll::new();
        let page = DetailPage::build(&seed_listings()[0], Some(0), &scroll);

        let lightbox = page.lightbox.as_ref().unwrap();
        assert!(page.scroll_suspended);
        assert_eq!(lightbox.position, "1 / 3");
        assert_eq!(lightbox.prev_href, "/listing/1?photo=2");
        assert_eq!(lightbox.next_href, "/listing/1?photo=1");
        assert_eq!(lightbox.close_href, "/listing/1");

        // the carousel is gone once the page is built
        assert!(!scroll.is_suspended());
    }

    #[test]
    fn test_detail_price_lines() {
        let scroll = PageScroll::new();
        let page = DetailPage::build(&seed_listings()[0], None, &scroll);

        assert_eq!(page.price.per_night, "$250");
        assert_eq!(page.price.nights_line, "$250 x 5 nights");
        assert_eq!(page.price.subtotal, "$1250");
        assert_eq!(page.price.cleaning_fee, "$85");
        assert_eq!(page.price.service_fee, "$175");
        assert_eq!(page.price.total, "$1510");
    }

    #[test]
    fn test_home_destinations_link_to_search() {
        let page = HomePage::new();
        assert_eq!(page.destinations.len(), 6);
        assert_eq!(page.destinations[0].href, "/search?location=New+York");
    }
}
