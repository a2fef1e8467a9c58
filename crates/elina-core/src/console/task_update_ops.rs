//! Day-wise progress endpoints.

use log::info;

use super::Console;
use crate::{
    error::{ConsoleError, Result},
    models::{DailySummary, DayWiseBatch, DayWiseUpdateRow, TaskUpdate, TaskUpdateDraft},
    params::{Id, TaskSummary},
    transport::ApiRequest,
};

impl Console {
    /// Day-wise rows of a task, one per planned date.
    pub async fn day_wise_rows(&self, task: &Id) -> Result<Vec<DayWiseUpdateRow>> {
        self.client
            .fetch(ApiRequest::get(format!("/api/task-updates/task/{}", task.id)))
            .await
    }

    /// Submits a batch of day-wise entries. The backend accepts or rejects
    /// the batch as a whole.
    pub async fn save_day_wise(&self, batch: &DayWiseBatch) -> Result<()> {
        if batch.updates.is_empty() {
            return Err(ConsoleError::validation("updates").with_reason("No updates to save"));
        }
        let request =
            ApiRequest::post(format!("/api/task-updates/task/{}", batch.task_id)).json(batch)?;
        self.client.execute(request).await?;
        info!(
            "Saved {} day-wise update(s) for task {}",
            batch.updates.len(),
            batch.task_id
        );
        Ok(())
    }

    /// Creates or replaces the update for a single date.
    pub async fn save_task_update(&self, draft: &TaskUpdateDraft) -> Result<TaskUpdate> {
        draft.validate()?;
        let update: TaskUpdate = self
            .client
            .fetch(ApiRequest::post("/api/task-updates").json(draft)?)
            .await?;
        info!(
            "Saved update {} for task {} on {}",
            update.update_id, update.task_id, update.update_date
        );
        Ok(update)
    }

    /// Plan, actual and variance per date of the active plan within
    /// `params.from..=params.to`.
    pub async fn task_update_summary(&self, params: &TaskSummary) -> Result<Vec<DailySummary>> {
        if params.to < params.from {
            return Err(ConsoleError::validation("to")
                .with_reason("End date must be on or after start date"));
        }
        self.client
            .fetch(
                ApiRequest::get(format!("/api/task-updates/task/{}/summary", params.task_id))
                    .query("from", params.from)
                    .query("to", params.to),
            )
            .await
    }

    /// Deletes one stored update by its ID.
    pub async fn delete_task_update(&self, update: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/api/task-updates/{}", update.id)))
            .await?;
        info!("Deleted task update {}", update.id);
        Ok(())
    }
}
