use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer for the configured origins.
///
/// An empty list yields a permissive layer, meant for local development only.
/// Any origin that is not a valid header value is an `InvalidInput` error.
pub fn cors_layer(allowed_origins: &[String]) -> io::Result<CorsLayer> {
    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGIN not set, using permissive CORS");
        return Ok(CorsLayer::permissive());
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
            )
        })?;

    tracing::info!("CORS configured with allowed origins: {}", allowed_origins.join(","));

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_origins_are_permissive() {
        assert!(cors_layer(&[]).is_ok());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let err = cors_layer(&["http://bad\norigin".to_string()]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
