//! Container list refresh and caching.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entities::ContainerInfo;
use crate::domain::repositories::ContainerProvider;
use crate::error::AppError;

/// Result of a forced refresh.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RefreshOutcome {
    pub container_count: usize,
    pub timestamp: i64,
    pub formatted_time: String,
}

/// Holds the last successful container listing and refreshes it on demand.
pub struct ContainerRefreshService {
    provider: Arc<dyn ContainerProvider>,
    cached: RwLock<Option<(Vec<ContainerInfo>, DateTime<Utc>)>>,
}

impl ContainerRefreshService {
    pub fn new(provider: Arc<dyn ContainerProvider>) -> Self {
        Self {
            provider,
            cached: RwLock::new(None),
        }
    }

    /// Queries the runtime and replaces the cached listing.
    ///
    /// # Errors
    ///
    /// Propagates provider failures; the previous listing is kept so the
    /// config page can still render.
    pub async fn refresh(&self) -> Result<RefreshOutcome, AppError> {
        let containers = self.provider.list_containers().await?;
        let now = Utc::now();
        let count = containers.len();

        *self.cached.write().await = Some((containers, now));
        metrics::counter!("container_refreshes_total").increment(1);
        tracing::info!("Container list refreshed: {count} container(s)");

        Ok(RefreshOutcome {
            container_count: count,
            timestamp: now.timestamp(),
            formatted_time: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
    }

    /// Last successful listing, if any.
    pub async fn current(&self) -> Option<(Vec<ContainerInfo>, DateTime<Utc>)> {
        self.cached.read().await.clone()
    }

    /// Cached listing, refreshing first when empty or when forced.
    ///
    /// Provider failures degrade to the stale listing (or an empty one) so
    /// page rendering never depends on a live docker daemon.
    pub async fn listing_for_page(&self, force_refresh: bool) -> Vec<ContainerInfo> {
        if force_refresh || self.cached.read().await.is_none() {
            if let Err(e) = self.refresh().await {
                tracing::warn!("Container refresh failed, using cached listing: {e}");
            }
        }
        self.cached
            .read()
            .await
            .as_ref()
            .map(|(containers, _)| containers.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockContainerProvider;
    use serde_json::json;

    fn container(name: &str) -> ContainerInfo {
        ContainerInfo {
            id: "id".to_string(),
            name: name.to_string(),
            image: "img".to_string(),
            state: "running".to_string(),
            status: "Up".to_string(),
        }
    }

    #[tokio::test]
    async fn test_refresh_caches_listing() {
        let mut provider = MockContainerProvider::new();
        provider
            .expect_list_containers()
            .times(1)
            .returning(|| Ok(vec![container("minecraft"), container("valheim")]));

        let service = ContainerRefreshService::new(Arc::new(provider));
        let outcome = service.refresh().await.unwrap();

        assert_eq!(outcome.container_count, 2);
        assert!(outcome.formatted_time.ends_with("UTC"));

        let (cached, _) = service.current().await.unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_listing() {
        let mut provider = MockContainerProvider::new();
        let mut first = true;
        provider.expect_list_containers().returning(move || {
            if first {
                first = false;
                Ok(vec![container("minecraft")])
            } else {
                Err(AppError::service_unavailable("daemon down", json!({})))
            }
        });

        let service = ContainerRefreshService::new(Arc::new(provider));
        service.refresh().await.unwrap();
        assert!(service.refresh().await.is_err());

        let (cached, _) = service.current().await.unwrap();
        assert_eq!(cached[0].name, "minecraft");
    }

    #[tokio::test]
    async fn test_listing_for_page_degrades_to_empty() {
        let mut provider = MockContainerProvider::new();
        provider
            .expect_list_containers()
            .returning(|| Err(AppError::service_unavailable("daemon down", json!({}))));

        let service = ContainerRefreshService::new(Arc::new(provider));
        let listing = service.listing_for_page(false).await;
        assert!(listing.is_empty());
    }

    #[tokio::test]
    async fn test_listing_for_page_uses_cache_unless_forced() {
        let mut provider = MockContainerProvider::new();
        provider
            .expect_list_containers()
            .times(2)
            .returning(|| Ok(vec![container("minecraft")]));

        let service = ContainerRefreshService::new(Arc::new(provider));
        service.listing_for_page(false).await; // fills cache
        service.listing_for_page(false).await; // served from cache
        service.listing_for_page(true).await; // forced refresh
    }
}
