//! Plan versions of one task.
//!
//! Every mutation is followed by a full refetch of the version list (and of
//! the task after a revert). Which versions the backend deactivated is never
//! inferred locally.

use std::fmt;

use log::warn;

use crate::{
    console::Console,
    error::Result,
    models::{PlanLine, PlanVersion, Task, VersionComparison},
    params::{CompareVersions, CreatePlan, Id},
};

/// Version list view model.
#[derive(Debug, Clone)]
pub struct PlanVersions {
    task_id: u64,
    task: Option<Task>,
    versions: Vec<PlanVersion>,
    lines: Option<(u64, Vec<PlanLine>)>,
}

impl PlanVersions {
    pub fn new(task_id: u64) -> Self {
        Self {
            task_id,
            task: None,
            versions: Vec::new(),
            lines: None,
        }
    }

    pub fn task_id(&self) -> u64 {
        self.task_id
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn versions(&self) -> &[PlanVersion] {
        &self.versions
    }

    /// Lines of the version last opened with [`show_lines`](Self::show_lines).
    pub fn lines(&self) -> Option<(u64, &[PlanLine])> {
        self.lines.as_ref().map(|(id, lines)| (*id, lines.as_slice()))
    }

    pub fn active(&self) -> Option<&PlanVersion> {
        self.versions.iter().find(|v| v.is_active)
    }

    pub fn active_count(&self) -> usize {
        self.versions.iter().filter(|v| v.is_active).count()
    }

    /// Fetches the task and its versions.
    pub async fn load(&mut self, console: &Console) -> Result<()> {
        let task = Id { id: self.task_id };
        self.task = Some(console.get_task(&task).await?);
        self.refresh_versions(console).await
    }

    async fn refresh_versions(&mut self, console: &Console) -> Result<()> {
        self.versions = console.list_versions(&Id { id: self.task_id }).await?;
        if self.active_count() > 1 {
            warn!(
                "Task {} reports {} active plan versions",
                self.task_id,
                self.active_count()
            );
        }
        Ok(())
    }

    pub async fn create(&mut self, console: &Console, params: &CreatePlan) -> Result<PlanVersion> {
        let version = console.create_version(params).await?;
        self.refresh_versions(console).await?;
        Ok(version)
    }

    /// Activates `version_id` and refetches the list.
    pub async fn activate(&mut self, console: &Console, version_id: u64) -> Result<()> {
        console.activate_version(&Id { id: version_id }).await?;
        self.refresh_versions(console).await?;
        if self.active().map(|v| v.version_id) != Some(version_id) {
            warn!("Version {version_id} is not active after activation");
        }
        Ok(())
    }

    /// Reverts to `version_id`, then refetches the task and the list.
    pub async fn revert(&mut self, console: &Console, version_id: u64) -> Result<()> {
        console.revert_to_version(&Id { id: version_id }).await?;
        self.lines = None;
        self.load(console).await
    }

    pub async fn show_lines(&mut self, console: &Console, version_id: u64) -> Result<&[PlanLine]> {
        let lines = console.version_lines(&Id { id: version_id }).await?;
        let (_, lines) = self.lines.insert((version_id, lines));
        Ok(lines)
    }

    /// Server-computed diff, returned as is.
    pub async fn compare(
        &self,
        console: &Console,
        from_version: u64,
        to_version: u64,
    ) -> Result<VersionComparison> {
        console
            .compare_versions(&CompareVersions {
                from_version,
                to_version,
            })
            .await
    }
}

impl fmt::Display for PlanVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.task {
            Some(task) => writeln!(f, "# Plan versions: {}", task.task_name)?,
            None => writeln!(f, "# Plan versions: task {}", self.task_id)?,
        }
        writeln!(f)?;
        if self.versions.is_empty() {
            writeln!(f, "No plan versions.")?;
        }
        for version in &self.versions {
            writeln!(f, "- {version}")?;
        }
        if let Some((version_id, lines)) = &self.lines {
            writeln!(f)?;
            writeln!(f, "## Lines of version {version_id}")?;
            writeln!(f)?;
            writeln!(f, "| Date | Planned | Description |")?;
            writeln!(f, "|------|---------|-------------|")?;
            for line in lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
