//! Command handlers.
//!
//! Each invocation is one short session: handlers that drive a stateful view
//! (grid, plan versions, confirmation, import) load it, apply the requested
//! change and submit in a single pass. Violations published by the backend
//! are rendered once, by the mounted [`GlobalViolationListener`].

use std::{fmt::Display, process::ExitCode};

use anyhow::{bail, Result};
use elina_core::{
    bulk_import::{BulkImport, ImportFile, TEMPLATE_CSV},
    confirmation::ConfirmationWorkflow,
    display::{
        Allocations, CreateResult, DailySummaries, DeleteResult, MasterCodes, OperationStatus,
        Projects, ResourceOptions, Rules, Tasks, Timeline, UpdateResult, WbsTree,
    },
    error::ACCESS_DENIED_MESSAGE,
    grid::{CellEdit, DayWiseGrid, SubmitOutcome},
    models::{
        BusinessRule, BusinessRuleViolation, CostPreview, MasterCode, Project,
        ResourceAllocation, Task, Wbs,
    },
    params::{CreatePlan, Id, ListRules, Login, TaskSummary},
    plan_lifecycle::PlanVersions,
    staged::CommitOutcome,
    violation::ViolationDisplay,
    Console, ConsoleError, GlobalViolationListener,
};
use log::{debug, info};

use crate::{
    args::{
        cost_query, resource_search, AllocCommands, Commands, ConfirmCommands, GridCommands,
        MasterDataCommands, PlanCommands, ProjectCommands, RuleCommands, TaskCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    console: Console,
    renderer: TerminalRenderer,
    listener: GlobalViolationListener,
}

impl Cli {
    /// Creates the handler and mounts the violation listener.
    pub fn new(console: Console, renderer: TerminalRenderer) -> Self {
        let listener = GlobalViolationListener::mount(console.violations());
        Self {
            console,
            renderer,
            listener,
        }
    }

    /// Runs one command and renders any rule violation it produced.
    ///
    /// A violation is a normal (if unsuccessful) outcome: it is shown with
    /// its rule and hint and the process exits with a failure code. Every
    /// other error is returned to `main`.
    pub async fn run(mut self, command: Commands) -> Result<ExitCode> {
        let result = self.dispatch(command).await;

        if self.listener.poll() {
            self.renderer
                .render_error(&self.listener.display().to_string())?;
            self.listener.dismiss();
        }

        let Err(e) = result else {
            return Ok(ExitCode::SUCCESS);
        };
        let violation = e
            .downcast_ref::<ConsoleError>()
            .and_then(ConsoleError::violation)
            .cloned();
        match violation {
            Some(violation) => {
                // backend violations were already shown by the listener
                if violation.is_local() {
                    let mut display = ViolationDisplay::new();
                    display.show(violation);
                    self.renderer.render_error(&display.to_string())?;
                }
                Ok(ExitCode::FAILURE)
            }
            None => Err(e),
        }
    }

    async fn dispatch(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Login(args) => self.login(&args.into()).await,
            Commands::Logout => self.logout().await,
            Commands::Whoami => self.whoami().await,
            Commands::Project { command } => self.handle_project_command(command).await,
            Commands::Task { command } => self.handle_task_command(command).await,
            Commands::Grid { command } => self.handle_grid_command(command).await,
            Commands::Plan { command } => self.handle_plan_command(command).await,
            Commands::Confirm { command } => self.handle_confirm_command(command).await,
            Commands::Alloc { command } => self.handle_alloc_command(command).await,
            Commands::Rules { command } => self.handle_rule_command(command).await,
            Commands::MasterData { command } => self.handle_master_data_command(command).await,
        }
    }

    fn show(&self, value: impl Display) -> Result<()> {
        self.renderer.render(&value.to_string())
    }

    fn status(&self, message: impl Into<String>) -> Result<()> {
        self.show(OperationStatus::success(message))
    }

    /// Asks before a destructive step unless `--yes` was given.
    fn confirmed(&self, skip_prompt: bool, question: &str) -> Result<bool> {
        if skip_prompt || self.renderer.confirm(question)? {
            return Ok(true);
        }
        self.show(OperationStatus::failure("Cancelled"))?;
        Ok(false)
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    async fn login(&self, params: &Login) -> Result<()> {
        let session = self.console.login(params).await?;
        self.status(format!("Logged in as {}", params.email))?;
        self.show(session)
    }

    async fn logout(&self) -> Result<()> {
        self.console.logout().await?;
        self.status("Logged out")
    }

    async fn whoami(&self) -> Result<()> {
        self.show(self.console.current_session().await?)
    }

    // ------------------------------------------------------------------
    // Projects and tasks
    // ------------------------------------------------------------------

    async fn handle_project_command(&self, command: ProjectCommands) -> Result<()> {
        match command {
            ProjectCommands::List(args) => {
                let projects = self.console.list_projects(&args.into()).await?;
                self.show(Projects(projects))
            }
            ProjectCommands::Show(args) => {
                let project = self.console.get_project(&args.into()).await?;
                self.show(Projects(vec![project]))
            }
            ProjectCommands::Wbs(args) => {
                let roots = self.console.wbs_hierarchy(&args.into()).await?;
                self.show(WbsTree(roots))
            }
            ProjectCommands::Create(args) => {
                let project = self.console.create_project(&args.into()).await?;
                self.show(CreateResult::new(project))
            }
            ProjectCommands::Update {
                project_id,
                project,
            } => {
                let project = self
                    .console
                    .update_project(&Id { id: project_id }, &project.into())
                    .await?;
                self.show(UpdateResult::new(project))
            }
            ProjectCommands::Delete(args) => {
                let question = format!(
                    "Delete project {} with its WBS nodes and tasks?",
                    args.id
                );
                if !self.confirmed(args.yes, &question)? {
                    return Ok(());
                }
                self.console.delete_project(&Id { id: args.id }).await?;
                self.show(DeleteResult::of::<Project>(args.id))
            }
            ProjectCommands::WbsCreate(args) => {
                let wbs = self.console.create_wbs(&args.into()).await?;
                self.show(CreateResult::new(wbs))
            }
            ProjectCommands::WbsUpdate { wbs_id, wbs } => {
                let wbs = self
                    .console
                    .update_wbs(&Id { id: wbs_id }, &wbs.into())
                    .await?;
                self.show(UpdateResult::new(wbs))
            }
            ProjectCommands::WbsDelete(args) => {
                let question = format!("Delete WBS {} with its children and tasks?", args.id);
                if !self.confirmed(args.yes, &question)? {
                    return Ok(());
                }
                self.console.delete_wbs(&Id { id: args.id }).await?;
                self.show(DeleteResult::of::<Wbs>(args.id))
            }
        }
    }

    async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::List { wbs_id } => {
                let tasks = self.console.list_tasks(&Id { id: wbs_id }).await?;
                self.show(Tasks(tasks))
            }
            TaskCommands::Show(args) => self.show(self.console.get_task(&args.into()).await?),
            TaskCommands::Create(args) => {
                let task = self.console.create_task(&args.into()).await?;
                self.show(CreateResult::new(task))
            }
            TaskCommands::Update { task_id, task } => {
                let task = self
                    .console
                    .update_task(&Id { id: task_id }, &task.into())
                    .await?;
                self.show(UpdateResult::new(task))
            }
            TaskCommands::Delete(args) => {
                let question = format!(
                    "Delete task {} with its updates and confirmations?",
                    args.id
                );
                if !self.confirmed(args.yes, &question)? {
                    return Ok(());
                }
                self.console.delete_task(&Id { id: args.id }).await?;
                self.show(DeleteResult::of::<Task>(args.id))
            }
            TaskCommands::Progress(args) => {
                let update = self.console.save_task_update(&args.into()).await?;
                self.show(CreateResult::new(update))
            }
            TaskCommands::Summary { task_id, from, to } => {
                let summary = self
                    .console
                    .task_update_summary(&TaskSummary { task_id, from, to })
                    .await?;
                self.show(DailySummaries(summary))
            }
        }
    }

    // ------------------------------------------------------------------
    // Day-wise grid
    // ------------------------------------------------------------------

    async fn load_grid(&self, task_id: u64) -> Result<DayWiseGrid> {
        let mut grid = DayWiseGrid::new(task_id);
        grid.load(&self.console).await?;
        Ok(grid)
    }

    async fn submit_grid(&self, grid: &mut DayWiseGrid) -> Result<()> {
        match grid.submit(&self.console).await? {
            SubmitOutcome::Saved { entries } => {
                self.status(format!("Saved {entries} day-wise update(s)"))?;
                self.show(&*grid)
            }
            SubmitOutcome::Violation(violation) => Err(violation_error(violation)),
        }
    }

    async fn handle_grid_command(&self, command: GridCommands) -> Result<()> {
        match command {
            GridCommands::Show { task_id } => self.show(self.load_grid(task_id).await?),
            GridCommands::Set(args) => {
                let mut grid = self.load_grid(args.task_id).await?;
                let Some(index) = grid.rows().iter().position(|row| row.date() == args.date)
                else {
                    bail!("Task {} has no planned row on {}", args.task_id, args.date);
                };
                if !grid.edit_cell(index, CellEdit::ActualQty(args.actual))? {
                    bail!("The row on {} is locked or restricted", args.date);
                }
                if let Some(remarks) = args.remarks {
                    grid.edit_cell(index, CellEdit::Remarks(Some(remarks)))?;
                }
                self.submit_grid(&mut grid).await
            }
            GridCommands::Bulk(args) => {
                if args.to < args.from {
                    return Err(ConsoleError::validation("to")
                        .with_reason("End date must be on or after start date")
                        .into());
                }
                let mut grid = self.load_grid(args.task_id).await?;
                let indices: Vec<usize> = grid
                    .rows()
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| (args.from..=args.to).contains(&row.date()))
                    .map(|(index, _)| index)
                    .collect();
                let applied = grid.bulk_apply(&indices, args.actual)?;
                debug!("Bulk update touched {applied} of {} row(s)", indices.len());
                if applied == 0 {
                    bail!(
                        "No editable rows between {} and {}",
                        args.from,
                        args.to
                    );
                }
                self.submit_grid(&mut grid).await
            }
            GridCommands::Delete(args) => {
                let mut grid = self.load_grid(args.task_id).await?;
                let Some(pending) = grid.request_delete(args.update_id) else {
                    bail!(
                        "Task {} has no stored update with ID {}",
                        args.task_id,
                        args.update_id
                    );
                };
                let question = format!("Delete day-wise update {}?", pending.update_id());
                if !self.confirmed(args.yes, &question)? {
                    return Ok(());
                }
                match grid.confirm_delete(&self.console, pending).await? {
                    None => {
                        self.show(DeleteResult::new("day-wise update", args.update_id))?;
                        self.show(&grid)
                    }
                    Some(violation) => Err(violation_error(violation)),
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Plan versions
    // ------------------------------------------------------------------

    async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::List { task_id } => {
                let mut versions = PlanVersions::new(task_id);
                versions.load(&self.console).await?;
                self.show(versions)
            }
            PlanCommands::Lines {
                task_id,
                version_id,
            } => {
                let mut versions = PlanVersions::new(task_id);
                versions.load(&self.console).await?;
                versions.show_lines(&self.console, version_id).await?;
                self.show(versions)
            }
            PlanCommands::Create { mode } => {
                let params = CreatePlan::from(mode);
                let mut versions = PlanVersions::new(params.task_id);
                let version = versions.create(&self.console, &params).await?;
                info!(
                    "Created plan version {} using {:?}",
                    version.version_id,
                    params.creation.mode()
                );
                self.show(CreateResult::new(version))
            }
            PlanCommands::Activate {
                task_id,
                version_id,
            } => {
                let mut versions = PlanVersions::new(task_id);
                versions.activate(&self.console, version_id).await?;
                self.status(format!("Activated plan version {version_id}"))?;
                self.show(versions)
            }
            PlanCommands::Revert {
                task_id,
                version_id,
            } => {
                let mut versions = PlanVersions::new(task_id);
                versions.revert(&self.console, version_id).await?;
                self.status(format!("Reverted to plan version {version_id}"))?;
                self.show(versions)
            }
            PlanCommands::Compare { task_id, versions } => {
                let comparison = PlanVersions::new(task_id)
                    .compare(&self.console, versions.from_version, versions.to_version)
                    .await?;
                self.show(comparison)
            }
        }
    }

    // ------------------------------------------------------------------
    // Confirmations
    // ------------------------------------------------------------------

    async fn load_workflow(&self, wbs_id: u64) -> Result<ConfirmationWorkflow> {
        let mut workflow = ConfirmationWorkflow::new(wbs_id, self.console.today());
        workflow.load(&self.console).await?;
        Ok(workflow)
    }

    async fn handle_confirm_command(&self, command: ConfirmCommands) -> Result<()> {
        match command {
            ConfirmCommands::Summary { wbs_id } => self.show(self.load_workflow(wbs_id).await?),
            ConfirmCommands::Preview { wbs_id, date } => {
                let mut workflow = ConfirmationWorkflow::new(wbs_id, self.console.today());
                let preview = workflow.select_date(&self.console, date, None).await?;
                self.show(preview)
            }
            ConfirmCommands::Commit(args) => {
                let mut workflow = self.load_workflow(args.wbs_id).await?;
                if !workflow.can_confirm(&self.console).await? {
                    return Err(ConsoleError::AuthorizationDenied {
                        message: ACCESS_DENIED_MESSAGE.to_string(),
                    }
                    .into());
                }
                let preview = workflow
                    .select_date(&self.console, args.date, args.remarks)
                    .await?;
                self.show(preview)?;

                let prompt = workflow.arm()?;
                if !self.confirmed(args.yes, &prompt.to_string())? {
                    workflow.cancel();
                    return Ok(());
                }
                match workflow.commit(&self.console).await? {
                    CommitOutcome::Committed(confirmation) => {
                        self.show(CreateResult::new(confirmation))?;
                        self.show(workflow)
                    }
                    CommitOutcome::Violation(violation) => Err(violation_error(violation)),
                }
            }
            ConfirmCommands::Undo {
                wbs_id,
                confirmation_id,
                yes,
            } => {
                let mut workflow = self.load_workflow(wbs_id).await?;
                let question = format!("Undo confirmation {confirmation_id}?");
                if !self.confirmed(yes, &question)? {
                    return Ok(());
                }
                workflow.undo(&self.console, confirmation_id).await?;
                self.status(format!("Undid confirmation {confirmation_id}"))?;
                self.show(workflow)
            }
        }
    }

    // ------------------------------------------------------------------
    // Resource allocations
    // ------------------------------------------------------------------

    async fn handle_alloc_command(&self, command: AllocCommands) -> Result<()> {
        match command {
            AllocCommands::List { kind, wbs_id } => {
                let allocations = self
                    .console
                    .allocations(kind.into(), &Id { id: wbs_id })
                    .await?;
                self.show(Allocations(allocations))
            }
            AllocCommands::Create(args) => {
                let allocation = self.console.create_allocation(&args.into()).await?;
                self.show(CreateResult::new(allocation))
            }
            AllocCommands::Update {
                allocation_id,
                allocation,
            } => {
                let allocation = self
                    .console
                    .update_allocation(&Id { id: allocation_id }, &allocation.into())
                    .await?;
                self.show(UpdateResult::new(allocation))
            }
            AllocCommands::Delete {
                kind,
                allocation_id,
            } => {
                self.console
                    .delete_allocation(kind.into(), &Id { id: allocation_id })
                    .await?;
                self.show(DeleteResult::of::<ResourceAllocation>(allocation_id))
            }
            AllocCommands::Preview {
                kind,
                resource_id,
                start,
                end,
            } => {
                let breakdown = self
                    .console
                    .cost_preview(&cost_query(kind, resource_id, start, end))
                    .await?;
                self.show(breakdown)
            }
            AllocCommands::Estimate { start, end, rate } => {
                self.show(CostPreview::estimate(start, end, rate)?)
            }
            AllocCommands::Options { kind, search } => {
                let options = self
                    .console
                    .resource_options(&resource_search(kind, search))
                    .await?;
                self.show(ResourceOptions(options))
            }
            AllocCommands::Timeline { wbs_id } => {
                let items = self.console.allocation_timeline(&Id { id: wbs_id }).await?;
                self.show(Timeline(items))
            }
            AllocCommands::Cost { wbs_id } => {
                self.show(self.console.cost_summary(&Id { id: wbs_id }).await?)
            }
        }
    }

    // ------------------------------------------------------------------
    // Business rules
    // ------------------------------------------------------------------

    async fn handle_rule_command(&self, command: RuleCommands) -> Result<()> {
        match command {
            RuleCommands::List { active } => {
                let rules = self.console.list_rules(&ListRules { active_only: active }).await?;
                self.show(Rules(rules))
            }
            RuleCommands::Show { rule_number } => {
                let rule = self.console.rule_by_number(rule_number).await?;
                self.show(Rules(vec![rule]))
            }
            RuleCommands::ControlPoints => {
                let points = self.console.control_points().await?;
                self.renderer
                    .render(&bullet_list(&points, "No control points found."))
            }
            RuleCommands::Create(args) => {
                let rule = self.console.create_rule(&args.into()).await?;
                self.show(CreateResult::new(rule))
            }
            RuleCommands::Update { rule_id, rule } => {
                let rule = self
                    .console
                    .update_rule(&Id { id: rule_id }, &rule.into())
                    .await?;
                self.show(UpdateResult::new(rule))
            }
            RuleCommands::Toggle(args) => {
                let id = Id::from(args);
                self.console.toggle_rule(&id).await?;
                self.status(format!("Toggled business rule {}", id.id))
            }
            RuleCommands::Delete(args) => {
                let id = Id::from(args);
                self.console.delete_rule(&id).await?;
                self.show(DeleteResult::of::<BusinessRule>(id.id))
            }
        }
    }

    // ------------------------------------------------------------------
    // Master data
    // ------------------------------------------------------------------

    async fn handle_master_data_command(&self, command: MasterDataCommands) -> Result<()> {
        match command {
            MasterDataCommands::Types => {
                let types = self.console.code_types().await?;
                self.renderer
                    .render(&bullet_list(&types, "No code types found."))
            }
            MasterDataCommands::List { code_type } => {
                let codes = self.console.master_codes(&code_type).await?;
                self.show(MasterCodes(codes))
            }
            MasterDataCommands::Create(args) => {
                let code = self.console.create_master_code(&args.into()).await?;
                self.show(CreateResult::new(code))
            }
            MasterDataCommands::Update { code_id, code } => {
                let code = self
                    .console
                    .update_master_code(&Id { id: code_id }, &code.into())
                    .await?;
                self.show(UpdateResult::new(code))
            }
            MasterDataCommands::Delete(args) => {
                let id = Id::from(args);
                self.console.delete_master_code(&id).await?;
                self.show(DeleteResult::of::<MasterCode>(id.id))
            }
            MasterDataCommands::Import { path, commit, yes } => {
                self.import_master_codes(ImportFile::load(&path)?, commit, yes)
                    .await
            }
            MasterDataCommands::Template => {
                // raw CSV, never rendered as markdown
                print!("{TEMPLATE_CSV}");
                Ok(())
            }
        }
    }

    async fn import_master_codes(&self, file: ImportFile, commit: bool, yes: bool) -> Result<()> {
        let mut import = BulkImport::master_codes();
        let preview = import.stage(&self.console, file).await?;
        self.show(preview)?;

        if !import.is_committable() {
            bail!("Fix the invalid rows before importing");
        }
        if !commit {
            return self.status("Validation passed. Re-run with --commit to import");
        }

        let total = import.arm()?.total_rows;
        if !self.confirmed(yes, &format!("Import {total} row(s)?"))? {
            import.disarm();
            return Ok(());
        }
        match import.commit(&self.console).await? {
            CommitOutcome::Committed(result) => self.show(result),
            CommitOutcome::Violation(violation) => Err(violation_error(violation)),
        }
    }
}

fn violation_error(violation: BusinessRuleViolation) -> anyhow::Error {
    ConsoleError::RuleViolation(violation).into()
}

fn bullet_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("{empty}\n");
    }
    items.iter().map(|item| format!("- {item}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_list() {
        assert_eq!(bullet_list(&[], "Nothing."), "Nothing.\n");
        assert_eq!(
            bullet_list(&["TASK_UPDATE".to_string(), "CONFIRMATION".to_string()], "Nothing."),
            "- TASK_UPDATE\n- CONFIRMATION\n"
        );
    }

    #[test]
    fn test_violation_error_downcasts() {
        let error = violation_error(BusinessRuleViolation::actual_exceeds_planned(2));
        let violation = error
            .downcast_ref::<ConsoleError>()
            .and_then(ConsoleError::violation)
            .expect("violation survives anyhow");
        assert!(violation.is_local());
    }
}
