use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use farescout_core::repository::HealthCheck;
use farescout_core::search::TravelSearch;
use farescout_core::CoreResult;

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub search: TravelSearch,
    pub health: Arc<dyn HealthCheck>,
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(search: TravelSearch, health: Arc<dyn HealthCheck>, query_timeout: Duration) -> Self {
        Self { search, health, query_timeout }
    }

    /// Runs a store-backed operation under the per-request deadline.
    /// On expiry the operation is dropped, cancelling the in-flight query.
    pub async fn within_deadline<T, F>(&self, operation: F) -> Result<T, AppError>
    where
        F: Future<Output = CoreResult<T>>,
    {
        match tokio::time::timeout(self.query_timeout, operation).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout(format!(
                "store did not answer within {} ms",
                self.query_timeout.as_millis()
            ))),
        }
    }
}
