use std::sync::Arc;

use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use clap::Parser;
use dotenv::dotenv;

use restaurant_discovery_backend::config::Config;
use restaurant_discovery_backend::controller;
use restaurant_discovery_backend::repositories::postgres_repo::PostgresGeoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let manager = PostgresConnectionManager::new_from_stringlike(&config.database_url, NoTls)?;
    let postgres_connection = Pool::builder().build(manager).await?;

    // The store is populated once here and read-only from then on.
    let store = PostgresGeoStore::new(postgres_connection);
    store.initialize_schema().await?;
    store.seed_from_file(&config.seed_file).await?;

    controller::serve(Arc::new(store), &config).await
}
