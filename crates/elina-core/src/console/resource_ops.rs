//! Resource allocation endpoints.

use log::info;

use super::Console;
use crate::{
    error::{ConsoleError, Result},
    models::{
        AllocationRequest, CostBreakdown, CostSummary, ResourceAllocation, ResourceKind,
        ResourceOption, TimelineItem,
    },
    params::{CostQuery, Id, ResourceSearch},
    transport::ApiRequest,
};

impl Console {
    pub async fn allocations(
        &self,
        kind: ResourceKind,
        wbs: &Id,
    ) -> Result<Vec<ResourceAllocation>> {
        self.client
            .fetch(ApiRequest::get(format!("/api/resources/{kind}/wbs/{}", wbs.id)))
            .await
    }

    /// Books a resource. The payload never carries a cost; the backend
    /// derives it.
    pub async fn create_allocation(&self, request: &AllocationRequest) -> Result<ResourceAllocation> {
        request.validate()?;
        let api_request =
            ApiRequest::post(format!("/api/resources/{}", request.kind)).json(&request.to_payload())?;
        let allocation: ResourceAllocation = self.client.fetch(api_request).await?;
        info!(
            "Allocated {} {} to WBS {}",
            request.kind, request.resource_id, request.wbs_id
        );
        Ok(allocation)
    }

    pub async fn update_allocation(
        &self,
        allocation: &Id,
        request: &AllocationRequest,
    ) -> Result<ResourceAllocation> {
        request.validate()?;
        let api_request = ApiRequest::put(format!(
            "/api/resources/{}/{}",
            request.kind, allocation.id
        ))
        .json(&request.to_payload())?;
        let updated: ResourceAllocation = self.client.fetch(api_request).await?;
        info!("Updated {} allocation {}", request.kind, allocation.id);
        Ok(updated)
    }

    pub async fn delete_allocation(&self, kind: ResourceKind, allocation: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!(
                "/api/resources/{kind}/{}",
                allocation.id
            )))
            .await?;
        info!("Deleted {kind} allocation {}", allocation.id);
        Ok(())
    }

    /// Employees or equipment matching an optional search term.
    pub async fn resource_options(&self, params: &ResourceSearch) -> Result<Vec<ResourceOption>> {
        let mut request = ApiRequest::get(format!("/api/resources/{}/options", params.kind));
        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.query("search", search);
        }
        self.client.fetch(request).await
    }

    pub async fn allocation_timeline(&self, wbs: &Id) -> Result<Vec<TimelineItem>> {
        self.client
            .fetch(ApiRequest::get(format!("/api/resources/timeline/wbs/{}", wbs.id)))
            .await
    }

    pub async fn cost_summary(&self, wbs: &Id) -> Result<CostSummary> {
        self.client
            .fetch(ApiRequest::get(format!("/api/resources/cost/wbs/{}", wbs.id)))
            .await
    }

    /// Server-computed cost of booking one resource over a range.
    pub async fn cost_preview(&self, query: &CostQuery) -> Result<CostBreakdown> {
        if query.end_date < query.start_date {
            return Err(ConsoleError::validation("endDate")
                .with_reason("End date must be on or after start date"));
        }
        let request = ApiRequest::get(format!(
            "/api/resources/cost/{}/{}",
            query.kind, query.resource_id
        ))
        .query("startDate", query.start_date)
        .query("endDate", query.end_date);
        self.client.fetch(request).await
    }
}
