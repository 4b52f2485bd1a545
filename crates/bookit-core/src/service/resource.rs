// ── ResourceService ──

use tracing::{debug, warn};

use bookit_api::models::CreateResourceRequest;

use super::ServiceContext;
use crate::config::RefreshPolicy;
use crate::error::CoreError;
use crate::model::{AvailabilityInfo, Resource};
use crate::store::ResourceFilter;

/// Resource listing, local search/filter/pagination, availability.
#[derive(Clone)]
pub struct ResourceService {
    ctx: ServiceContext,
}

impl ResourceService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Replace the store's resource list with the backend's full list.
    pub async fn load_resources(&self) -> Result<Vec<Resource>, CoreError> {
        match self.ctx.api.search_resources("", false).await {
            Ok(list) => {
                let list: Vec<Resource> = list.into_iter().map(Resource::from).collect();
                debug!(count = list.len(), "resources loaded");
                self.ctx.store.set_resources(list.clone());
                Ok(list)
            }
            Err(e) => {
                let e = CoreError::from(e);
                warn!(error = %e, "failed to load resources");
                self.ctx
                    .notifier
                    .error(format!("Failed to load resources: {e}"));
                Err(e)
            }
        }
    }

    /// Ask the backend directly; the store is left alone.
    pub async fn search_remote(
        &self,
        query: &str,
        available_only: bool,
    ) -> Result<Vec<Resource>, CoreError> {
        let list = self.ctx.api.search_resources(query, available_only).await?;
        Ok(list.into_iter().map(Resource::from).collect())
    }

    /// Narrow the stored list by name/tag. Resets to page 1.
    pub fn search(&self, query: &str) {
        self.ctx.store.set_search_query(query);
    }

    pub fn set_filter(&self, filter: ResourceFilter) {
        self.ctx.store.set_filter(filter);
    }

    pub fn set_page(&self, page: usize) {
        self.ctx.store.set_page(page);
    }

    pub fn next_page(&self) {
        let page = self.ctx.store.state().current_page;
        self.ctx.store.set_page(page + 1);
    }

    pub fn previous_page(&self) {
        let page = self.ctx.store.state().current_page;
        self.ctx.store.set_page(page.saturating_sub(1));
    }

    pub async fn availability(&self, id: i64) -> Result<AvailabilityInfo, CoreError> {
        Ok(AvailabilityInfo::from(
            self.ctx.api.resource_availability(id).await?,
        ))
    }

    /// Create a resource (admin only on the backend side).
    pub async fn create_resource(
        &self,
        name: &str,
        tags: Vec<String>,
        available: bool,
    ) -> Result<Resource, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("Resource name must not be empty"));
        }

        let request = CreateResourceRequest {
            name: name.to_owned(),
            tags,
            available,
        };
        let result = async {
            let created = Resource::from(self.ctx.api.create_resource(&request).await?);
            match self.ctx.refresh_policy {
                RefreshPolicy::Refetch => {
                    self.load_resources().await?;
                }
                RefreshPolicy::OptimisticMerge => {
                    let merged = created.clone();
                    self.ctx.store.update_resources(|list| {
                        list.retain(|r| r.id != merged.id);
                        list.push(merged);
                    });
                }
            }
            Ok::<_, CoreError>(created)
        }
        .await;

        match result {
            Ok(created) => {
                self.ctx
                    .notifier
                    .success(format!("Resource {} created", created.name));
                Ok(created)
            }
            Err(e) => {
                warn!(name, error = %e, "failed to create resource");
                self.ctx
                    .notifier
                    .error(format!("Failed to create resource: {e}"));
                Err(e)
            }
        }
    }
}
