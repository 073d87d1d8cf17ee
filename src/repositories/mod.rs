use async_trait::async_trait;

use crate::discovery::Coordinates;
use crate::models::restaurant::Restaurant;

pub mod postgres_repo;

/// Read side of the restaurant store. The one query the discovery page needs:
/// restaurants with a given availability state within `radius_meters` of
/// `origin`, ordered nearest to farthest.
#[async_trait]
pub trait GeoStore: Send + Sync + 'static {
    async fn restaurants_within(
        &self,
        origin: Coordinates,
        radius_meters: f64,
        online: bool,
    ) -> anyhow::Result<Vec<Restaurant>>;
}
