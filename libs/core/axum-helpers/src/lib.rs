//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! - **[`server`]**: router assembly with OpenAPI docs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: UUID path and validated JSON extractors
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig, FromEnv};
//!
//! let config = ServerConfig::from_env()?;
//! let router = create_router::<ApiDoc>(api_routes, &config)?
//!     .merge(health_router(app_info!()));
//! create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};
