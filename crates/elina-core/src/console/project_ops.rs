//! Projects, WBS nodes and tasks.

use log::info;
use serde::Deserialize;

use super::Console;
use crate::{
    error::{ConsoleError, Result},
    models::{Project, ProjectDraft, Task, TaskDraft, Wbs, WbsDraft},
    params::{Id, ListProjects},
    transport::ApiRequest,
};

/// List endpoints answer either with a bare array or a page wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Page { content: Vec<T> },
    Items(Vec<T>),
}

impl<T> From<Listing<T>> for Vec<T> {
    fn from(listing: Listing<T>) -> Self {
        match listing {
            Listing::Page { content } => content,
            Listing::Items(items) => items,
        }
    }
}

impl Console {
    pub async fn list_projects(&self, params: &ListProjects) -> Result<Vec<Project>> {
        let mut request = ApiRequest::get("/api/projects");
        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.query("search", search);
        }
        let listing: Listing<Project> = self.client.fetch(request).await?;
        Ok(listing.into())
    }

    pub async fn get_project(&self, params: &Id) -> Result<Project> {
        self.client
            .fetch(ApiRequest::get(format!("/api/projects/{}", params.id)))
            .await
    }

    /// Root WBS nodes of a project with their children nested.
    pub async fn wbs_hierarchy(&self, project: &Id) -> Result<Vec<Wbs>> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/api/wbs/project/{}/hierarchy",
                project.id
            )))
            .await
    }

    pub async fn get_wbs(&self, params: &Id) -> Result<Wbs> {
        self.client
            .fetch(ApiRequest::get(format!("/api/wbs/{}", params.id)))
            .await
    }

    pub async fn list_tasks(&self, wbs: &Id) -> Result<Vec<Task>> {
        let listing: Listing<Task> = self
            .client
            .fetch(ApiRequest::get(format!("/api/tasks/wbs/{}", wbs.id)))
            .await?;
        Ok(listing.into())
    }

    pub async fn get_task(&self, params: &Id) -> Result<Task> {
        self.client
            .fetch(ApiRequest::get(format!("/api/tasks/{}", params.id)))
            .await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        draft.validate()?;
        let project: Project = self
            .client
            .fetch(ApiRequest::post("/api/projects").json(draft)?)
            .await?;
        info!("Created project {}", project.project_id);
        Ok(project)
    }

    pub async fn update_project(&self, project: &Id, draft: &ProjectDraft) -> Result<Project> {
        draft.validate()?;
        let updated: Project = self
            .client
            .fetch(ApiRequest::put(format!("/api/projects/{}", project.id)).json(draft)?)
            .await?;
        info!("Updated project {}", updated.project_id);
        Ok(updated)
    }

    /// Deletes a project. The backend cascades to its WBS nodes and tasks.
    pub async fn delete_project(&self, project: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/api/projects/{}", project.id)))
            .await?;
        info!("Deleted project {}", project.id);
        Ok(())
    }

    pub async fn create_wbs(&self, draft: &WbsDraft) -> Result<Wbs> {
        draft.validate()?;
        let wbs: Wbs = self
            .client
            .fetch(ApiRequest::post("/api/wbs").json(draft)?)
            .await?;
        info!("Created WBS {} in project {}", wbs.wbs_id, draft.project_id);
        Ok(wbs)
    }

    pub async fn update_wbs(&self, wbs: &Id, draft: &WbsDraft) -> Result<Wbs> {
        draft.validate()?;
        if draft.parent_wbs_id == Some(wbs.id) {
            return Err(ConsoleError::validation("parentWbsId")
                .with_reason("A WBS node cannot be its own parent"));
        }
        let updated: Wbs = self
            .client
            .fetch(ApiRequest::put(format!("/api/wbs/{}", wbs.id)).json(draft)?)
            .await?;
        info!("Updated WBS {}", updated.wbs_id);
        Ok(updated)
    }

    /// Deletes a WBS node together with its children and tasks.
    pub async fn delete_wbs(&self, wbs: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/api/wbs/{}", wbs.id)))
            .await?;
        info!("Deleted WBS {}", wbs.id);
        Ok(())
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task: Task = self
            .client
            .fetch(ApiRequest::post("/api/tasks").json(draft)?)
            .await?;
        info!("Created task {} under WBS {}", task.task_id, draft.wbs_id);
        Ok(task)
    }

    pub async fn update_task(&self, task: &Id, draft: &TaskDraft) -> Result<Task> {
        draft.validate()?;
        let updated: Task = self
            .client
            .fetch(ApiRequest::put(format!("/api/tasks/{}", task.id)).json(draft)?)
            .await?;
        info!("Updated task {}", updated.task_id);
        Ok(updated)
    }

    /// Deletes a task with its updates and confirmations.
    pub async fn delete_task(&self, task: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/api/tasks/{}", task.id)))
            .await?;
        info!("Deleted task {}", task.id);
        Ok(())
    }
}
