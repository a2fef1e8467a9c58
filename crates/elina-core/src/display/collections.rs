//! Newtype wrappers that render collections as markdown tables.
//!
//! Each wrapper writes its header and then one row per item, or a short
//! message when the collection is empty.

use std::fmt;

use crate::models::{
    BusinessRule, DailySummary, MasterCode, Project, ResourceAllocation, ResourceOption, Task,
    TimelineItem, Wbs,
};

/// Defines a table newtype over `Vec<$item>`.
///
/// The row body receives the formatter and one item; when omitted the item's
/// own `Display` is used as the row.
macro_rules! table {
    (@row $fmt:ident, $item:ident) => {
        write!($fmt, "{}", $item)?
    };
    (@row $fmt:ident, $item:ident, |$f:ident, $row:ident| $body:block) => {{
        let $f = &mut *$fmt;
        let $row = $item;
        let written: fmt::Result = $body;
        written?
    }};
    (
        $(#[$meta:meta])*
        $name:ident($item:ty), empty: $empty:literal, columns: [$($column:literal),+ $(,)?]
        $(, row: |$f:ident, $row:ident| $body:block)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    return writeln!(f, $empty);
                }
                let columns = [$($column),+];
                writeln!(f, "| {} |", columns.join(" | "))?;
                writeln!(f, "|{}", "---|".repeat(columns.len()))?;
                for item in &self.0 {
                    table!(@row f, item $(, |$f, $row| $body)?);
                    writeln!(f)?;
                }
                Ok(())
            }
        }
    };
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

table!(
    /// Projects visible to the current user.
    Projects(Project),
    empty: "No projects found.",
    columns: ["ID", "Project", "Dates", "Status"]
);

table!(
    Tasks(Task),
    empty: "No tasks found.",
    columns: ["ID", "Code", "Task", "Planned", "Actual", "Unit"],
    row: |f, task| {
        write!(
            f,
            "| {} | {} | {} | {} | {} | {} |",
            task.task_id,
            or_dash(task.task_code.as_deref()),
            task.task_name,
            task.planned_qty.map_or_else(|| "-".to_string(), |q| format!("{q:.2}")),
            task.actual_qty.map_or_else(|| "-".to_string(), |q| format!("{q:.2}")),
            or_dash(task.unit.as_deref())
        )
    }
);

table!(
    /// Plan against actual per date, as summarized by the backend.
    DailySummaries(DailySummary),
    empty: "No updates in this range.",
    columns: ["Date", "Planned", "Actual", "Variance"]
);

table!(
    Rules(BusinessRule),
    empty: "No business rules found.",
    columns: ["Rule", "Control point", "Value", "Description", "Status"]
);

table!(
    MasterCodes(MasterCode),
    empty: "No master codes found.",
    columns: ["Type", "Value", "Description", "Status"]
);

table!(
    /// Allocations of one resource kind on a WBS node. Costs are as reported
    /// by the backend.
    Allocations(ResourceAllocation),
    empty: "No allocations found.",
    columns: ["ID", "Resource", "Start", "End", "Rate/day", "Total cost"]
);

table!(
    ResourceOptions(ResourceOption),
    empty: "No resources found.",
    columns: ["ID", "Name", "Category", "Rate/day"],
    row: |f, option| {
        write!(
            f,
            "| {} | {} | {} | {:.2} |",
            option.id,
            option.name,
            or_dash(option.category.as_deref()),
            option.rate_per_day
        )
    }
);

table!(
    Timeline(TimelineItem),
    empty: "No allocations scheduled.",
    columns: ["Resource", "Type", "Start", "End", "Days"],
    row: |f, item| {
        write!(
            f,
            "| {} | {} | {} | {} | {} |",
            item.resource_name,
            item.resource_type,
            item.start_date,
            item.end_date,
            item.duration_days.map_or_else(|| "-".to_string(), |d| d.to_string())
        )
    }
);

/// The WBS hierarchy of a project as an indented list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WbsTree(pub Vec<Wbs>);

impl From<Vec<Wbs>> for WbsTree {
    fn from(roots: Vec<Wbs>) -> Self {
        Self(roots)
    }
}

impl fmt::Display for WbsTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No WBS nodes found.");
        }
        for root in &self.0 {
            write!(f, "{root}")?;
        }
        Ok(())
    }
}
