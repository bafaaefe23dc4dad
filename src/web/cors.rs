use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::warn;

/// Allows the monitoring frontend at `monitoring_url` to call the API with credentials.
/// Methods and headers are mirrored from the preflight request.
pub fn create_cors_layer(monitoring_url: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let Some(url) = monitoring_url else {
        warn!("MONITORING_URL is not set; cross-origin requests will be refused.");
        return cors;
    };

    // Browsers send the origin without a trailing slash.
    match HeaderValue::from_str(url.trim().trim_end_matches('/')) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!(monitoring_url = %url, error = %e, "MONITORING_URL is not a valid origin; cross-origin requests will be refused.");
            cors
        }
    }
}
