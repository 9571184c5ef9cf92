use async_trait::async_trait;

use crate::GeosqlError;

/// The execution transport behind the rewriter, e.g. a driver cursor.
/// It receives statements that are already in the engine's dialect.
#[async_trait(?Send)]
pub trait QueryTransport: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<(), GeosqlError>;
}
