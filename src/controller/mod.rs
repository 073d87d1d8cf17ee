use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::GeoStore;

pub mod discovery_controller;
pub mod greeting;

pub async fn serve(store: Arc<dyn GeoStore>, config: &Config) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(|s| s.parse().unwrap())
        .collect::<Vec<HeaderValue>>();

    let application = router_endpoints(store)
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_origin(origins)
                    .allow_headers([CONTENT_TYPE]),
            ),
        )
        .fallback(page_not_found_handler);

    let port = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Discovery server listening on port: {}", port);
    axum::Server::bind(&port)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(store: Arc<dyn GeoStore>) -> Router {
    greeting::router().merge(discovery_controller::router(store))
}
