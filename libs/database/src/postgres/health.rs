use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

/// Pings the pool with `SELECT 1`; backs the `/ready` probe.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    db.query_one_raw(Statement::from_string(DatabaseBackend::Postgres, "SELECT 1"))
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
