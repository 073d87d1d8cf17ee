use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(launch_date_format, Date, "[year]-[month]-[day]");

/// A restaurant row as fetched from the store. The `id` stays internal and
/// never reaches a client; responses go through [`RestaurantSummary`].
#[derive(Clone, Debug)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub blurhash: String,
    pub location: Location,
    pub launch_date: Date,
    pub online: bool,
    pub popularity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

/// Client-facing projection of a restaurant: no `id`, launch date rendered
/// as `YYYY-MM-DD`, location as a `[lon, lat]` pair.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RestaurantSummary {
    pub name: String,
    pub blurhash: String,
    pub location: [f64; 2],
    #[serde(with = "launch_date_format")]
    pub launch_date: Date,
    pub online: bool,
    pub popularity: f64,
}

impl From<&Restaurant> for RestaurantSummary {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            name: restaurant.name.clone(),
            blurhash: restaurant.blurhash.clone(),
            location: [restaurant.location.lon, restaurant.location.lat],
            launch_date: restaurant.launch_date,
            online: restaurant.online,
            popularity: restaurant.popularity,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Section {
    pub title: String,
    pub restaurants: Vec<RestaurantSummary>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct DiscoveryPage {
    pub sections: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn summary_drops_id_and_renders_dates_and_coordinates() {
        let restaurant = Restaurant {
            id: 42,
            name: "Charming Cherry House".to_string(),
            blurhash: "UDCZt?oJ00Rj%MWBM{WB00WB~qWB9FofWBof".to_string(),
            location: Location {
                lon: 24.938082,
                lat: 60.17012143,
            },
            launch_date: date!(2020 - 09 - 03),
            online: false,
            popularity: 0.665,
        };

        let summary = RestaurantSummary::from(&restaurant);
        let json = serde_json::to_value(&summary).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["launch_date"], "2020-09-03");
        assert_eq!(json["location"][0], 24.938082);
        assert_eq!(json["location"][1], 60.17012143);
        assert_eq!(json["online"], false);
        assert_eq!(json["popularity"], 0.665);
    }
}
