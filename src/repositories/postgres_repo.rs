use anyhow::{anyhow, Context};
use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use serde::Deserialize;
use time::macros::format_description;
use time::Date;
use tracing::{info, warn};

use crate::discovery::Coordinates;
use crate::models::restaurant::{Location, Restaurant};
use crate::repositories::GeoStore;

pub const RETRY_LIMIT: usize = 5;

/// Restaurant store backed by Postgres with the `cube`/`earthdistance`
/// extensions providing the proximity index.
pub struct PostgresGeoStore {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresGeoStore {
    pub fn new(postgres_connection: Pool<PostgresConnectionManager<NoTls>>) -> Self {
        Self {
            postgres_connection,
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"))
    }

    /// Creates the extensions, table and geospatial index. Runs once at boot,
    /// before the listener accepts traffic.
    pub async fn initialize_schema(&self) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        conn.batch_execute(
            "CREATE EXTENSION IF NOT EXISTS cube; \
             CREATE EXTENSION IF NOT EXISTS earthdistance; \
             CREATE TABLE IF NOT EXISTS restaurants ( \
                 id BIGSERIAL PRIMARY KEY, \
                 name TEXT NOT NULL, \
                 blurhash TEXT NOT NULL, \
                 lon DOUBLE PRECISION NOT NULL, \
                 lat DOUBLE PRECISION NOT NULL, \
                 launch_date DATE NOT NULL, \
                 online BOOLEAN NOT NULL, \
                 popularity DOUBLE PRECISION NOT NULL \
             ); \
             CREATE INDEX IF NOT EXISTS restaurants_earth_idx \
                 ON restaurants USING gist (ll_to_earth(lat, lon));",
        )
        .await
        .context("Error initializing the restaurants schema")
    }

    /// Drops whatever is in the table and repopulates it from the seed file,
    /// so repeated boots never accumulate duplicate entries.
    pub async fn seed_from_file(&self, path: &str) -> anyhow::Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading the seed file at: {}", path))?;
        let seed: SeedFile = serde_json::from_str(&raw)
            .with_context(|| format!("Error parsing the seed file at: {}", path))?;

        let conn = self.get_postgres_connection().await?;
        conn.execute("TRUNCATE restaurants;", &[]).await?;

        if seed.restaurants.is_empty() {
            warn!("Seed file at: {} contains no restaurants", path);
            return Ok(());
        }

        let date_format = format_description!("[year]-[month]-[day]");
        let mut stmt = String::from(
            "INSERT INTO restaurants \
             (name, blurhash, lon, lat, launch_date, online, popularity) \
             VALUES ",
        );
        for entry in &seed.restaurants {
            let item = format!(
                "('{}', '{}', {}, {}, '{}', {}, {}),",
                entry.name.replace('\'', "''"),
                entry.blurhash,
                entry.location[0],
                entry.location[1],
                entry.launch_date.format(&date_format)?,
                entry.online,
                entry.popularity,
            );
            stmt.push_str(&item);
        }
        stmt.remove(stmt.len() - 1);
        stmt.push(';');

        conn.execute(&stmt, &[])
            .await
            .context("Error seeding the restaurants table")?;

        info!("Seeded {} restaurants from: {}", seed.restaurants.len(), path);
        Ok(())
    }
}

#[async_trait]
impl GeoStore for PostgresGeoStore {
    async fn restaurants_within(
        &self,
        origin: Coordinates,
        radius_meters: f64,
        online: bool,
    ) -> anyhow::Result<Vec<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT id, name, blurhash, lon, lat, launch_date, online, popularity, \
                    earth_distance(ll_to_earth({lat}, {lon}), ll_to_earth(lat, lon)) AS distance \
             FROM restaurants \
             WHERE online = {online} \
               AND earth_distance(ll_to_earth({lat}, {lon}), ll_to_earth(lat, lon)) <= {radius} \
             ORDER BY distance ASC;",
            lat = origin.lat,
            lon = origin.lon,
            online = online,
            radius = radius_meters,
        );

        let rows = conn
            .query(&stmt, &[])
            .await
            .context("Error running the restaurant proximity query")?;

        Ok(rows.into_iter().map(parse_row_into_restaurant).collect())
    }
}

fn parse_row_into_restaurant(row: Row) -> Restaurant {
    Restaurant {
        id: row.get("id"),
        name: row.get("name"),
        blurhash: row.get("blurhash"),
        location: Location {
            lon: row.get("lon"),
            lat: row.get("lat"),
        },
        launch_date: row.get("launch_date"),
        online: row.get("online"),
        popularity: row.get("popularity"),
    }
}

time::serde::format_description!(seed_date_format, Date, "[year]-[month]-[day]");

/// Shape of the seed JSON file: `{"restaurants": [...]}`.
#[derive(Deserialize)]
struct SeedFile {
    restaurants: Vec<SeedRestaurant>,
}

#[derive(Deserialize)]
struct SeedRestaurant {
    name: String,
    blurhash: String,
    /// `[lon, lat]`, matching the wire format served back to clients.
    location: [f64; 2],
    #[serde(with = "seed_date_format")]
    launch_date: Date,
    online: bool,
    popularity: f64,
}
