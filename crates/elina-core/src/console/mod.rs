//! High-level console API over the project-management backend.
//!
//! [`Console`] is the single entry point interfaces talk to. Each group of
//! operations lives in its own submodule as an `impl Console` block:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  *_ops modules  │    │    ApiClient    │    │   HttpBackend   │
//! │ (auth, plans,   │───▶│ (session, 401,  │───▶│                 │
//! │  confirmations) │    │  violations)    │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!    Local checks          Cross-cutting          Wire
//! ```
//!
//! Stateful views (the day-wise grid, plan versions, the confirmation
//! workflow, bulk import) are built on top of these operations in their own
//! modules and borrow the console for each step.
//!
//! ```rust,no_run
//! use elina_core::{params::Login, ConsoleBuilder};
//!
//! # async fn example() -> elina_core::Result<()> {
//! let console = ConsoleBuilder::new()
//!     .with_base_url(Some("http://localhost:8080"))
//!     .build()
//!     .await?;
//!
//! console
//!     .login(&Login {
//!         tenant_code: "ACME".to_string(),
//!         email: "site@acme.test".to_string(),
//!         password: "secret".to_string(),
//!     })
//!     .await?;
//! let projects = console.list_projects(&Default::default()).await?;
//! # Ok(())
//! # }
//! ```

use jiff::civil::Date;

use crate::{session::SessionStore, transport::ApiClient, violation::ViolationChannel};

pub mod builder;

mod auth_ops;
mod confirmation_ops;
mod master_data_ops;
mod plan_ops;
mod project_ops;
mod resource_ops;
mod rule_ops;
mod task_update_ops;

pub use builder::ConsoleBuilder;
pub use confirmation_ops::{PERMISSION_CONFIRM, PERMISSION_UNDO_CONFIRMATION};

/// Main console interface.
#[derive(Debug, Clone)]
pub struct Console {
    pub(crate) client: ApiClient,
    today: Option<Date>,
}

impl Console {
    pub(crate) fn new(client: ApiClient, today: Option<Date>) -> Self {
        Self { client, today }
    }

    /// Calendar date used for lock and preview decisions. Fixed when the
    /// builder was given one, otherwise the local date.
    pub fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| jiff::Zoned::now().date())
    }

    pub fn session_store(&self) -> &SessionStore {
        self.client.session()
    }

    /// Channel every backend rule violation is published on.
    pub fn violations(&self) -> &ViolationChannel {
        self.client.violations()
    }
}
