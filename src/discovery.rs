//! Composition logic for the discovery page.
//!
//! Works on candidate sets already fetched from the store in ascending
//! distance order and turns them into the three ranked sections. Everything
//! here is pure so it can be exercised without a database.

use time::{Date, Month};

use crate::error::ApiError;
use crate::models::restaurant::{DiscoveryPage, Restaurant, RestaurantSummary, Section};

/// Proximity search radius, in meters.
pub const SEARCH_RADIUS_METERS: f64 = 1500.0;
/// Maximum number of restaurants per section.
pub const PAGE_SIZE: usize = 10;
/// A restaurant counts as "new" for this many calendar months after launch.
pub const NEW_WINDOW_MONTHS: u32 = 4;

pub const POPULAR_SECTION_TITLE: &str = "Popular Restaurants";
pub const NEW_SECTION_TITLE: &str = "New Restaurants";
pub const NEARBY_SECTION_TITLE: &str = "Nearby Restaurants";

/// A validated customer location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Parses raw `lat`/`lon` request parameters. Missing, non-numeric,
    /// non-finite, and out-of-range values all collapse into the same
    /// client-facing `InvalidRequest`.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, ApiError> {
        let lat = parse_finite(lat)?;
        let lon = parse_finite(lon)?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ApiError::InvalidRequest);
        }

        Ok(Self { lat, lon })
    }
}

fn parse_finite(raw: Option<&str>) -> Result<f64, ApiError> {
    raw.and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or(ApiError::InvalidRequest)
}

/// Builds the full discovery page from the two candidate sets, both expected
/// in ascending distance order as delivered by the proximity query. `today`
/// anchors the new-restaurant window.
pub fn compose_page(online: &[Restaurant], offline: &[Restaurant], today: Date) -> DiscoveryPage {
    let popular = select_with_fallback(&by_popularity(online), &by_popularity(offline), PAGE_SIZE);

    let threshold = months_before(today, NEW_WINDOW_MONTHS);
    let new = select_with_fallback(
        &launched_since(online, threshold),
        &launched_since(offline, threshold),
        PAGE_SIZE,
    );

    let nearby = select_with_fallback(online, offline, PAGE_SIZE);

    DiscoveryPage {
        sections: vec![
            section(POPULAR_SECTION_TITLE, popular),
            section(NEW_SECTION_TITLE, new),
            section(NEARBY_SECTION_TITLE, nearby),
        ],
    }
}

/// Takes the first `limit` items of `primary`, falling back to `secondary`
/// for the shortfall. In the fallback branch all of `primary` is kept, so a
/// page only comes up short when both sets combined are smaller than
/// `limit`. This mirrors the behavior the service has always had.
pub fn select_with_fallback<T: Clone>(primary: &[T], secondary: &[T], limit: usize) -> Vec<T> {
    if primary.len() >= limit {
        return primary[..limit].to_vec();
    }

    let remainder = limit - primary.len();
    let mut page = primary.to_vec();
    if remainder >= secondary.len() {
        page.extend_from_slice(secondary);
    } else {
        page.extend_from_slice(&secondary[..remainder]);
    }
    page
}

/// Re-sorts by popularity descending. The sort is stable, so equally popular
/// restaurants keep their distance order.
fn by_popularity(restaurants: &[Restaurant]) -> Vec<Restaurant> {
    let mut ranked = restaurants.to_vec();
    ranked.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    ranked
}

/// Keeps restaurants launched on or after `threshold`, newest first.
/// Restaurants outside the window are excluded outright, never backfilled.
fn launched_since(restaurants: &[Restaurant], threshold: Date) -> Vec<Restaurant> {
    let mut recent: Vec<Restaurant> = restaurants
        .iter()
        .filter(|restaurant| restaurant.launch_date >= threshold)
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.launch_date.cmp(&a.launch_date));
    recent
}

/// Steps back `months` calendar months, clamping the day to the target
/// month's length the way relative-date arithmetic conventionally does
/// (e.g. Oct 31 minus 4 months is Jun 30).
fn months_before(date: Date, months: u32) -> Date {
    let total_months = date.year() * 12 + i32::from(date.month() as u8) - 1 - months as i32;
    let year = total_months.div_euclid(12);
    let month = Month::try_from((total_months.rem_euclid(12) + 1) as u8).unwrap();
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap()
}

fn section(title: &str, restaurants: Vec<Restaurant>) -> Section {
    Section {
        title: title.to_string(),
        restaurants: restaurants.iter().map(RestaurantSummary::from).collect(),
    }
}
