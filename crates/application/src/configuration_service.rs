use std::sync::Arc;
use std::time::Duration;

use rolekeeper_core::{AppError, AppResult, CommunityId};
use rolekeeper_domain::ConfigDiagnostic;
use serde::Serialize;
use tracing::warn;

use crate::CallTimeout;
use crate::role_ports::DirectoryStore;

/// Rendered configuration of one community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSummary {
    /// Community the summary describes.
    pub community_id: CommunityId,
    /// One-line description with misconfigurations flagged inline.
    pub summary: String,
    /// Every misconfiguration found.
    pub diagnostics: Vec<ConfigDiagnostic>,
}

/// Application service reporting on community configuration.
#[derive(Clone)]
pub struct ConfigurationService {
    directory: Arc<dyn DirectoryStore>,
    call_timeout: CallTimeout,
}

impl ConfigurationService {
    /// Creates a configuration service.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self {
            directory,
            call_timeout: CallTimeout::unbounded(),
        }
    }

    /// Bounds the configuration lookup.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = CallTimeout::after(timeout);
        self
    }

    /// Summarizes a community configuration; misconfigurations are logged as
    /// warnings and never fail the call.
    pub async fn summarize(&self, community_id: &CommunityId) -> AppResult<ConfigurationSummary> {
        let config = self
            .call_timeout
            .run(
                "community configuration lookup",
                self.directory.find_community_config(community_id),
            )
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("community '{community_id}' has no configuration"))
            })?;

        let diagnostics = config.diagnostics();
        for diagnostic in &diagnostics {
            warn!(
                community_id = %community_id,
                diagnostic = ?diagnostic,
                "{}",
                diagnostic.message()
            );
        }

        Ok(ConfigurationSummary {
            community_id: community_id.clone(),
            summary: config.summary(),
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rolekeeper_core::AppError;
    use rolekeeper_domain::{CommunityConfig, ConfigDiagnostic};

    use crate::fakes::{FakeDirectoryStore, community_id, role_id};

    use super::ConfigurationService;

    #[tokio::test]
    async fn summary_flags_half_configured_veteran_pairing() {
        let mut config = CommunityConfig::new(community_id("1"));
        config.veteran_rank = Some(250);
        config.base_role = Some(role_id("7"));
        let mut directory = FakeDirectoryStore::default();
        directory.insert_config(config);
        let service = ConfigurationService::new(Arc::new(directory));

        let summary = service
            .summarize(&community_id("1"))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            summary.diagnostics,
            vec![ConfigDiagnostic::VeteranRankWithoutRole]
        );
        assert!(summary.summary.starts_with("Server: "));
        assert!(summary.summary.contains("{BaseRole: `7`}"));
    }

    #[tokio::test]
    async fn unknown_community_is_not_found() {
        let service = ConfigurationService::new(Arc::new(FakeDirectoryStore::default()));

        let result = service.summarize(&community_id("404")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn slow_directory_is_unavailable_under_a_timeout() {
        let mut directory = FakeDirectoryStore {
            config_delay: Some(Duration::from_millis(200)),
            ..FakeDirectoryStore::default()
        };
        directory.insert_config(CommunityConfig::new(community_id("1")));
        let service = ConfigurationService::new(Arc::new(directory))
            .with_call_timeout(Duration::from_millis(5));

        let result = service.summarize(&community_id("1")).await;

        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }
}
