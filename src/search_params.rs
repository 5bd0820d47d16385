//! Search intent carried between the search form and the results page as URL
//! query parameters.
//!
//! The query string is the only handoff between the two views, so it has to
//! survive bookmarking and sharing: missing keys are fine, and malformed values
//! are dropped instead of failing the request.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::debug;
use url::form_urlencoded;

pub const LOCATION_KEY: &str = "location";
pub const CHECK_IN_KEY: &str = "checkIn";
pub const CHECK_OUT_KEY: &str = "checkOut";
pub const GUESTS_KEY: &str = "guests";

pub const SEARCH_PATH: &str = "/search";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Empty means "no location filter".
    pub location: String,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub guests: Option<u32>,
}

impl SearchParams {
    pub fn for_location(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }

    /// Form-urlencodes the present fields. Empty location and absent options
    /// are left out entirely.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.append_pairs(&mut serializer);
        serializer.finish()
    }

    pub fn append_pairs<T: form_urlencoded::Target>(
        &self,
        serializer: &mut form_urlencoded::Serializer<'_, T>,
    ) {
        if self.has_location() {
            serializer.append_pair(LOCATION_KEY, &self.location);
        }
        if let Some(check_in) = &self.check_in {
            serializer.append_pair(CHECK_IN_KEY, &format_instant(check_in));
        }
        if let Some(check_out) = &self.check_out {
            serializer.append_pair(CHECK_OUT_KEY, &format_instant(check_out));
        }
        if let Some(guests) = self.guests {
            serializer.append_pair(GUESTS_KEY, &guests.to_string());
        }
    }

    /// Inverse of [`SearchParams::encode`]. Never fails: unknown keys are
    /// ignored, and unparseable values are treated as if the key were missing.
    /// When a key repeats, the first occurrence wins.
    pub fn decode(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = SearchParams::default();
        let mut location_seen = false;
        let mut check_in_seen = false;
        let mut check_out_seen = false;
        let mut guests_seen = false;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                LOCATION_KEY if !location_seen => {
                    location_seen = true;
                    params.location = value.into_owned();
                }
                CHECK_IN_KEY if !check_in_seen => {
                    check_in_seen = true;
                    params.check_in = parse_instant(CHECK_IN_KEY, &value);
                }
                CHECK_OUT_KEY if !check_out_seen => {
                    check_out_seen = true;
                    params.check_out = parse_instant(CHECK_OUT_KEY, &value);
                }
                GUESTS_KEY if !guests_seen => {
                    guests_seen = true;
                    params.guests = parse_guests(&value);
                }
                _ => {}
            }
        }

        params
    }

    /// `/search` or `/search?{encoded}`.
    pub fn search_url(&self) -> String {
        with_query(SEARCH_PATH, &self.encode())
    }
}

/// `path`, or `path?query` when there is a query to carry.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant(key: &str, value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(instant) => Some(instant.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring malformed {} value '{}': {}", key, value, e);
            None
        }
    }
}

fn parse_guests(value: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(0) => {
            debug!("Ignoring zero guests value");
            None
        }
        Ok(guests) => Some(guests),
        Err(e) => {
            if !value.is_empty() {
                debug!("Ignoring malformed guests value '{}': {}", value, e);
            }
            None
        }
    }
}

/// Raw fields as submitted by the HTML search form. Date inputs arrive as
/// `YYYY-MM-DD`; they are pinned to midnight UTC.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub location: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guests: Option<String>,
}

impl SearchForm {
    /// Reads the form fields out of a raw query string. Repeated keys keep
    /// their first value and unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut form = SearchForm::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                LOCATION_KEY => &mut form.location,
                CHECK_IN_KEY => &mut form.check_in,
                CHECK_OUT_KEY => &mut form.check_out,
                GUESTS_KEY => &mut form.guests,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            } else {
                debug!("Ignoring repeated form field '{}'", key);
            }
        }

        form
    }

    pub fn into_params(self) -> SearchParams {
        SearchParams {
            location: self
                .location
                .map(|l| l.trim().to_string())
                .unwrap_or_default(),
            check_in: self
                .check_in
                .as_deref()
                .and_then(|v| parse_form_date(CHECK_IN_KEY, v)),
            check_out: self
                .check_out
                .as_deref()
                .and_then(|v| parse_form_date(CHECK_OUT_KEY, v)),
            guests: self.guests.as_deref().and_then(parse_guests),
        }
    }
}

fn parse_form_date(key: &str, value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(_) => parse_instant(key, value),
    }
}
