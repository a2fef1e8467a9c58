//! Command-line argument definitions.
//!
//! Clap structs live here and convert into the interface-free parameter
//! types of `elina_core::params` (or core models) with `From`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Console
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use elina_core::{
    models::{
        AllocationRequest, BusinessRuleDraft, DailyLine, DateRangeSplit, MasterCodeDraft,
        PlanCreation, ProjectDraft, ResourceKind, SplitType, TaskDraft, TaskUpdateDraft,
        WbsDraft,
    },
    params::{CompareVersions, CostQuery, CreatePlan, Id, ListProjects, Login, ResourceSearch},
};
use jiff::civil::Date;
use rust_decimal::Decimal;

/// Command-line console for the Elina project-management backend
///
/// Reads projects and tasks, records day-wise progress, manages plan
/// versions, confirms (freezes) WBS progress, books resources and
/// administers business rules and master data. Every rule is enforced by
/// the backend; violations are shown exactly as the backend reports them.
#[derive(Parser)]
#[command(version, about, name = "elina")]
pub struct Args {
    /// Backend base URL. Defaults to $ELINA_API_BASE_URL, then
    /// http://localhost:8080
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to the session database. Defaults to
    /// $XDG_DATA_HOME/elina/session.db
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Browse projects and their WBS
    #[command(alias = "p")]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Browse tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Day-wise planned/actual grid of a task
    #[command(alias = "g")]
    Grid {
        #[command(subcommand)]
        command: GridCommands,
    },
    /// Plan versions of a task
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// WBS confirmations (freezes)
    #[command(alias = "c")]
    Confirm {
        #[command(subcommand)]
        command: ConfirmCommands,
    },
    /// Manpower and equipment allocations
    #[command(alias = "a")]
    Alloc {
        #[command(subcommand)]
        command: AllocCommands,
    },
    /// Business-rule administration
    Rules {
        #[command(subcommand)]
        command: RuleCommands,
    },
    /// Master-code administration
    #[command(alias = "md")]
    MasterData {
        #[command(subcommand)]
        command: MasterDataCommands,
    },
}

// ============================================================================
// Authentication
// ============================================================================

#[derive(ClapArgs)]
pub struct LoginArgs {
    #[arg(short, long, help = "Tenant code")]
    pub tenant: String,
    #[arg(short, long, help = "Account email")]
    pub email: String,
    #[arg(short, long, help = "Account password")]
    pub password: String,
}

impl From<LoginArgs> for Login {
    fn from(val: LoginArgs) -> Self {
        Login {
            tenant_code: val.tenant,
            email: val.email,
            password: val.password,
        }
    }
}

/// A bare numeric identifier.
#[derive(ClapArgs)]
pub struct IdArgs {
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

// ============================================================================
// Projects and tasks
// ============================================================================

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    #[command(alias = "l")]
    List(ListProjectsArgs),
    /// Show one project
    #[command(alias = "s")]
    Show(IdArgs),
    /// Show the WBS hierarchy of a project
    Wbs(IdArgs),
    /// Create a project
    #[command(alias = "c")]
    Create(ProjectArgs),
    /// Replace a project
    #[command(alias = "u")]
    Update {
        project_id: u64,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Delete a project with its WBS nodes and tasks
    #[command(aliases = ["d", "rm"])]
    Delete(ConfirmedIdArgs),
    /// Create a WBS node
    WbsCreate(WbsArgs),
    /// Replace a WBS node
    WbsUpdate {
        wbs_id: u64,
        #[command(flatten)]
        wbs: WbsArgs,
    },
    /// Delete a WBS node with its children and tasks
    WbsDelete(ConfirmedIdArgs),
}

/// An identifier of something destructive to act on.
#[derive(ClapArgs)]
pub struct ConfirmedIdArgs {
    pub id: u64,
    #[arg(short, long, help = "Do not ask for confirmation")]
    pub yes: bool,
}

#[derive(ClapArgs)]
pub struct ProjectArgs {
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long, help = "Start date (YYYY-MM-DD)")]
    pub start: Option<Date>,
    #[arg(long, help = "End date (YYYY-MM-DD)")]
    pub end: Option<Date>,
    #[arg(long, default_value = "ACTIVE")]
    pub status: String,
    #[arg(long, help = "Create the project switched off")]
    pub inactive: bool,
}

impl From<ProjectArgs> for ProjectDraft {
    fn from(val: ProjectArgs) -> Self {
        ProjectDraft {
            project_code: val.code,
            project_name: val.name,
            description: val.description,
            start_date: val.start,
            end_date: val.end,
            status: Some(val.status),
            active: !val.inactive,
        }
    }
}

#[derive(ClapArgs)]
pub struct WbsArgs {
    #[arg(long)]
    pub project: u64,
    #[arg(long, help = "Parent WBS node; omit for a root node")]
    pub parent: Option<u64>,
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long, help = "Start date (YYYY-MM-DD)")]
    pub start: Option<Date>,
    #[arg(long, help = "End date (YYYY-MM-DD)")]
    pub end: Option<Date>,
    #[arg(long)]
    pub planned: Option<Decimal>,
}

impl From<WbsArgs> for WbsDraft {
    fn from(val: WbsArgs) -> Self {
        WbsDraft {
            project_id: val.project,
            parent_wbs_id: val.parent,
            wbs_code: val.code,
            wbs_name: val.name,
            description: val.description,
            start_date: val.start,
            end_date: val.end,
            planned_qty: val.planned,
        }
    }
}

#[derive(ClapArgs)]
pub struct ListProjectsArgs {
    #[arg(short, long, help = "Filter by name or code")]
    pub search: Option<String>,
}

impl From<ListProjectsArgs> for ListProjects {
    fn from(val: ListProjectsArgs) -> Self {
        ListProjects { search: val.search }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List the tasks of a WBS node
    #[command(alias = "l")]
    List {
        #[arg(help = "WBS identifier")]
        wbs_id: u64,
    },
    /// Show one task
    #[command(alias = "s")]
    Show(IdArgs),
    /// Create a task under a WBS node
    #[command(alias = "c")]
    Create(TaskArgs),
    /// Replace a task
    #[command(alias = "u")]
    Update {
        task_id: u64,
        #[command(flatten)]
        task: TaskArgs,
    },
    /// Delete a task with its updates and confirmations
    #[command(aliases = ["d", "rm"])]
    Delete(ConfirmedIdArgs),
    /// Record the actual quantity of one date
    Progress(ProgressArgs),
    /// Planned against actual per date over a range
    Summary {
        task_id: u64,
        #[arg(long, help = "First date (YYYY-MM-DD)")]
        from: Date,
        #[arg(long, help = "Last date (YYYY-MM-DD)")]
        to: Date,
    },
}

#[derive(ClapArgs)]
pub struct TaskArgs {
    #[arg(long)]
    pub project: u64,
    #[arg(long)]
    pub wbs: u64,
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long, help = "Start date (YYYY-MM-DD)")]
    pub start: Option<Date>,
    #[arg(long, help = "End date (YYYY-MM-DD)")]
    pub end: Option<Date>,
    #[arg(long)]
    pub planned: Option<Decimal>,
    #[arg(long)]
    pub unit: Option<String>,
}

impl From<TaskArgs> for TaskDraft {
    fn from(val: TaskArgs) -> Self {
        TaskDraft {
            project_id: val.project,
            wbs_id: val.wbs,
            task_code: val.code,
            task_name: val.name,
            description: val.description,
            start_date: val.start,
            end_date: val.end,
            planned_qty: val.planned,
            unit: val.unit,
        }
    }
}

#[derive(ClapArgs)]
pub struct ProgressArgs {
    pub task_id: u64,
    #[arg(help = "Date of the update (YYYY-MM-DD)")]
    pub date: Date,
    #[arg(help = "Actual quantity")]
    pub actual: Decimal,
    #[arg(long, help = "Increment achieved on this date")]
    pub daily: Option<Decimal>,
    #[arg(short, long)]
    pub remarks: Option<String>,
}

impl From<ProgressArgs> for TaskUpdateDraft {
    fn from(val: ProgressArgs) -> Self {
        TaskUpdateDraft {
            task_id: val.task_id,
            update_date: val.date,
            planned_qty: None,
            actual_qty: val.actual,
            daily_update_qty: val.daily,
            remarks: val.remarks,
        }
    }
}

// ============================================================================
// Day-wise grid
// ============================================================================

#[derive(Subcommand)]
pub enum GridCommands {
    /// Show the grid
    #[command(alias = "s")]
    Show {
        task_id: u64,
    },
    /// Set the actual quantity (and remarks) of one date, then submit
    Set(GridSetArgs),
    /// Apply one actual quantity to every editable date in a range, then
    /// submit
    Bulk(GridBulkArgs),
    /// Delete a stored day-wise update
    #[command(aliases = ["d", "rm"])]
    Delete(GridDeleteArgs),
}

#[derive(ClapArgs)]
pub struct GridSetArgs {
    pub task_id: u64,
    #[arg(help = "Date of the row (YYYY-MM-DD)")]
    pub date: Date,
    #[arg(help = "Actual quantity")]
    pub actual: Decimal,
    #[arg(short, long, help = "Remarks for the row")]
    pub remarks: Option<String>,
}

#[derive(ClapArgs)]
pub struct GridBulkArgs {
    pub task_id: u64,
    #[arg(long, help = "First date of the range")]
    pub from: Date,
    #[arg(long, help = "Last date of the range")]
    pub to: Date,
    #[arg(help = "Actual quantity applied to every selected row")]
    pub actual: Decimal,
}

#[derive(ClapArgs)]
pub struct GridDeleteArgs {
    pub task_id: u64,
    #[arg(help = "Identifier of the stored update")]
    pub update_id: u64,
    #[arg(short, long, help = "Do not ask for confirmation")]
    pub yes: bool,
}

// ============================================================================
// Plan versions
// ============================================================================

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List versions of a task
    #[command(alias = "l")]
    List {
        task_id: u64,
    },
    /// Show the lines of one version
    Lines {
        task_id: u64,
        version_id: u64,
    },
    /// Create a new version
    #[command(alias = "c")]
    Create {
        #[command(subcommand)]
        mode: CreatePlanMode,
    },
    /// Make a version the active one
    Activate {
        task_id: u64,
        version_id: u64,
    },
    /// Reactivate an earlier version
    Revert {
        task_id: u64,
        version_id: u64,
    },
    /// Compare two versions
    Compare {
        task_id: u64,
        #[command(flatten)]
        versions: CompareArgs,
    },
}

#[derive(ClapArgs)]
pub struct CompareArgs {
    pub from_version: u64,
    pub to_version: u64,
}

impl From<CompareArgs> for CompareVersions {
    fn from(val: CompareArgs) -> Self {
        CompareVersions {
            from_version: val.from_version,
            to_version: val.to_version,
        }
    }
}

/// Options shared by every creation mode.
#[derive(ClapArgs)]
pub struct PlanHeaderArgs {
    pub task_id: u64,
    #[arg(long, help = "Version date (YYYY-MM-DD)")]
    pub version_date: Date,
    #[arg(short, long, help = "Version description")]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum CreatePlanMode {
    /// Enter lines one date at a time
    Daily {
        #[command(flatten)]
        header: PlanHeaderArgs,
        #[arg(
            long = "line",
            value_parser = parse_daily_line,
            required = true,
            help = "Planned line as DATE=QTY, repeatable"
        )]
        lines: Vec<DailyLine>,
    },
    /// Let the backend split a total over a date range
    Split {
        #[command(flatten)]
        header: PlanHeaderArgs,
        #[command(flatten)]
        split: SplitArgs,
    },
    /// A single planned line
    Single {
        #[command(flatten)]
        header: PlanHeaderArgs,
        #[arg(long, help = "Planned date")]
        date: Date,
        #[arg(long, help = "Planned quantity")]
        qty: Decimal,
    },
}

impl From<CreatePlanMode> for CreatePlan {
    fn from(val: CreatePlanMode) -> Self {
        let (header, creation) = match val {
            CreatePlanMode::Daily { header, lines } => (header, PlanCreation::DailyEntry(lines)),
            CreatePlanMode::Split { header, split } => {
                (header, PlanCreation::DateRangeSplit(split.into()))
            }
            CreatePlanMode::Single { header, date, qty } => (
                header,
                PlanCreation::SingleLineQuick(DailyLine {
                    planned_date: date,
                    planned_qty: qty,
                    description: None,
                }),
            ),
        };
        CreatePlan {
            task_id: header.task_id,
            version_date: header.version_date,
            description: header.description,
            creation,
        }
    }
}

#[derive(ClapArgs)]
pub struct SplitArgs {
    #[arg(long, help = "First date of the range")]
    pub start: Date,
    #[arg(long, help = "Last date of the range")]
    pub end: Date,
    #[arg(long, help = "Total quantity to split")]
    pub total: Decimal,
    #[arg(long, value_enum, default_value_t = SplitArg::Equal)]
    pub split: SplitArg,
    #[arg(long, help = "Number of periods (custom split)")]
    pub count: Option<u32>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Quantity per period as comma-separated list (custom split)"
    )]
    pub quantities: Vec<Decimal>,
}

impl From<SplitArgs> for DateRangeSplit {
    fn from(val: SplitArgs) -> Self {
        DateRangeSplit {
            start_date: val.start,
            end_date: val.end,
            total_qty: val.total,
            split_type: val.split.into(),
            split_count: val.count,
            custom_quantities: (!val.quantities.is_empty()).then_some(val.quantities),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    Equal,
    Weekly,
    Monthly,
    Custom,
}

impl From<SplitArg> for SplitType {
    fn from(val: SplitArg) -> Self {
        match val {
            SplitArg::Equal => SplitType::EqualSplit,
            SplitArg::Weekly => SplitType::WeeklySplit,
            SplitArg::Monthly => SplitType::MonthlySplit,
            SplitArg::Custom => SplitType::CustomSplit,
        }
    }
}

fn parse_daily_line(raw: &str) -> Result<DailyLine, String> {
    let (date, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DATE=QTY, got '{raw}'"))?;
    Ok(DailyLine {
        planned_date: date.trim().parse().map_err(|e| format!("invalid date: {e}"))?,
        planned_qty: qty.trim().parse().map_err(|e| format!("invalid quantity: {e}"))?,
        description: None,
    })
}

// ============================================================================
// Confirmations
// ============================================================================

#[derive(Subcommand)]
pub enum ConfirmCommands {
    /// Show totals, lock date and history of a WBS
    #[command(alias = "s")]
    Summary {
        wbs_id: u64,
    },
    /// Preview what confirming on a date would freeze. Creates nothing.
    Preview {
        wbs_id: u64,
        date: Date,
    },
    /// Confirm (freeze) a WBS up to a date
    Commit(ConfirmCommitArgs),
    /// Undo the most recent confirmation
    Undo {
        wbs_id: u64,
        confirmation_id: u64,
        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(ClapArgs)]
pub struct ConfirmCommitArgs {
    pub wbs_id: u64,
    pub date: Date,
    #[arg(short, long)]
    pub remarks: Option<String>,
    #[arg(short, long, help = "Do not ask for confirmation")]
    pub yes: bool,
}

// ============================================================================
// Resource allocations
// ============================================================================

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Manpower,
    Equipment,
}

impl From<KindArg> for ResourceKind {
    fn from(val: KindArg) -> Self {
        match val {
            KindArg::Manpower => ResourceKind::Manpower,
            KindArg::Equipment => ResourceKind::Equipment,
        }
    }
}

#[derive(Subcommand)]
pub enum AllocCommands {
    /// List allocations of a WBS
    #[command(alias = "l")]
    List {
        #[arg(value_enum)]
        kind: KindArg,
        wbs_id: u64,
    },
    /// Book a resource
    #[command(alias = "c")]
    Create(AllocationArgs),
    /// Change an allocation
    #[command(alias = "u")]
    Update {
        allocation_id: u64,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Delete an allocation
    #[command(aliases = ["d", "rm"])]
    Delete {
        #[arg(value_enum)]
        kind: KindArg,
        allocation_id: u64,
    },
    /// Server-side cost preview for a prospective allocation
    Preview {
        #[arg(value_enum)]
        kind: KindArg,
        resource_id: u64,
        start: Date,
        end: Date,
    },
    /// Local display-only estimate: inclusive days times a daily rate
    Estimate {
        start: Date,
        end: Date,
        rate: Decimal,
    },
    /// Search bookable employees or equipment
    Options {
        #[arg(value_enum)]
        kind: KindArg,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Allocation timeline of a WBS
    Timeline {
        wbs_id: u64,
    },
    /// Cost totals of a WBS
    Cost {
        wbs_id: u64,
    },
}

#[derive(ClapArgs)]
pub struct AllocationArgs {
    #[arg(value_enum)]
    pub kind: KindArg,
    #[arg(long)]
    pub wbs: u64,
    #[arg(long, help = "Employee or equipment identifier")]
    pub resource: u64,
    #[arg(long)]
    pub start: Date,
    #[arg(long)]
    pub end: Date,
    #[arg(long)]
    pub hours_per_day: Option<Decimal>,
    #[arg(short, long)]
    pub remarks: Option<String>,
}

impl From<AllocationArgs> for AllocationRequest {
    fn from(val: AllocationArgs) -> Self {
        AllocationRequest {
            kind: val.kind.into(),
            wbs_id: val.wbs,
            resource_id: val.resource,
            start_date: val.start,
            end_date: val.end,
            hours_per_day: val.hours_per_day,
            remarks: val.remarks,
        }
    }
}

/// Builds the cost query of `alloc preview`.
pub fn cost_query(kind: KindArg, resource_id: u64, start: Date, end: Date) -> CostQuery {
    CostQuery {
        kind: kind.into(),
        resource_id,
        start_date: start,
        end_date: end,
    }
}

/// Builds the search of `alloc options`.
pub fn resource_search(kind: KindArg, search: Option<String>) -> ResourceSearch {
    ResourceSearch {
        kind: kind.into(),
        search,
    }
}

// ============================================================================
// Business rules
// ============================================================================

#[derive(Subcommand)]
pub enum RuleCommands {
    /// List rules
    #[command(alias = "l")]
    List {
        #[arg(long, help = "Only active rules")]
        active: bool,
    },
    /// Show a rule by its number
    #[command(alias = "s")]
    Show {
        rule_number: i32,
    },
    /// List the control points rules can attach to
    ControlPoints,
    /// Create a rule
    #[command(alias = "c")]
    Create(RuleArgs),
    /// Replace a rule
    #[command(alias = "u")]
    Update {
        rule_id: u64,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Activate or deactivate a rule
    Toggle(IdArgs),
    /// Delete a rule
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

#[derive(ClapArgs)]
pub struct RuleArgs {
    #[arg(long)]
    pub number: i32,
    #[arg(long)]
    pub control_point: String,
    #[arg(long)]
    pub applicability: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long, help = "Create the rule switched off")]
    pub inactive: bool,
}

impl From<RuleArgs> for BusinessRuleDraft {
    fn from(val: RuleArgs) -> Self {
        BusinessRuleDraft {
            rule_number: val.number,
            control_point: val.control_point,
            applicability: val.applicability,
            rule_value: val.value,
            description: val.description,
            active: !val.inactive,
        }
    }
}

// ============================================================================
// Master data
// ============================================================================

#[derive(Subcommand)]
pub enum MasterDataCommands {
    /// List code types
    Types,
    /// List codes of one type
    #[command(alias = "l")]
    List {
        code_type: String,
    },
    /// Create a code
    #[command(alias = "c")]
    Create(MasterCodeArgs),
    /// Replace a code
    #[command(alias = "u")]
    Update {
        code_id: u64,
        #[command(flatten)]
        code: MasterCodeArgs,
    },
    /// Delete a code
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// Validate a spreadsheet, and import it with --commit
    Import {
        path: PathBuf,
        #[arg(long, help = "Import after a clean dry run")]
        commit: bool,
        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
    },
    /// Print a CSV template
    Template,
}

#[derive(ClapArgs)]
pub struct MasterCodeArgs {
    #[arg(long = "type")]
    pub code_type: String,
    #[arg(long = "value")]
    pub code_value: String,
    #[arg(long)]
    pub short_description: Option<String>,
    #[arg(long)]
    pub long_description: Option<String>,
    #[arg(long)]
    pub inactive: bool,
}

impl From<MasterCodeArgs> for MasterCodeDraft {
    fn from(val: MasterCodeArgs) -> Self {
        MasterCodeDraft {
            code_type: val.code_type,
            code_value: val.code_value,
            short_description: val.short_description,
            long_description: val.long_description,
            active: !val.inactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_daily_line() {
        let line = parse_daily_line("2025-11-03=12.5").expect("valid line");
        assert_eq!(line.planned_date, date(2025, 11, 3));
        assert_eq!(line.planned_qty, Decimal::new(125, 1));
        assert!(parse_daily_line("2025-11-03").is_err());
        assert!(parse_daily_line("tomorrow=1").is_err());
    }

    #[test]
    fn test_custom_split_conversion() {
        let args = Args::parse_from([
            "elina", "plan", "create", "split", "42", "--version-date", "2025-11-01", "--start",
            "2025-11-01", "--end", "2025-11-30", "--total", "100", "--split", "custom", "--count",
            "3", "--quantities", "40,60",
        ]);
        let Commands::Plan {
            command: PlanCommands::Create { mode },
        } = args.command
        else {
            panic!("expected plan create");
        };
        let params = CreatePlan::from(mode);
        let PlanCreation::DateRangeSplit(split) = params.creation else {
            panic!("expected a range split");
        };
        assert_eq!(split.split_type, SplitType::CustomSplit);
        assert_eq!(split.split_count, Some(3));
        assert_eq!(split.custom_quantities.map(|q| q.len()), Some(2));
    }
}
