use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;

/// CORS для фронтенда: список origins берётся из конфигурации окружения.
pub fn cors_layer(app: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = app
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
