use std::future::Future;
use std::time::Duration;

use rolekeeper_core::{AppError, AppResult};

/// Caller-imposed upper bound on one collaborator call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallTimeout(Option<Duration>);

impl CallTimeout {
    /// Calls are awaited without a bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self(None)
    }

    /// Calls fail as unavailable once the duration elapses.
    #[must_use]
    pub fn after(duration: Duration) -> Self {
        Self(Some(duration))
    }

    /// Runs one collaborator call under the bound.
    pub async fn run<T, F>(&self, operation: &str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let Some(duration) = self.0 else {
            return call.await;
        };

        tokio::time::timeout(duration, call).await.map_err(|_| {
            AppError::Unavailable(format!(
                "{operation} did not complete within {}ms",
                duration.as_millis()
            ))
        })?
    }
}
