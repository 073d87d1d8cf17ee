use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::discovery::{compose_page, Coordinates, SEARCH_RADIUS_METERS};
use crate::error::ApiError;
use crate::repositories::GeoStore;

pub fn router(store: Arc<dyn GeoStore>) -> Router {
    Router::new()
        .route("/discovery", get(get_discovery))
        .route_layer(Extension(store))
}

/// Raw request parameters, parsed leniently so missing and malformed values
/// reach [`Coordinates::parse`] and come back as the fixed 400 message
/// instead of the extractor's own rejection.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct DiscoveryParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

pub async fn get_discovery(
    Extension(store): Extension<Arc<dyn GeoStore>>,
    Query(params): Query<DiscoveryParams>,
) -> impl IntoResponse {
    let origin = match Coordinates::parse(params.lat.as_deref(), params.lon.as_deref()) {
        Ok(origin) => origin,
        Err(e) => return e.into_response(),
    };

    // Both candidate sets come back nearest-first; the two lookups are
    // independent, so run them concurrently.
    let candidates = futures::try_join!(
        store.restaurants_within(origin, SEARCH_RADIUS_METERS, true),
        store.restaurants_within(origin, SEARCH_RADIUS_METERS, false),
    );

    match candidates {
        Ok((online, offline)) => {
            let today = OffsetDateTime::now_utc().date();
            let page = compose_page(&online, &offline, today);
            (StatusCode::OK, Json(page)).into_response()
        }
        Err(e) => {
            warn!("Something went wrong querying nearby restaurants due to: {}", e);
            ApiError::StoreUnavailable.into_response()
        }
    }
}
