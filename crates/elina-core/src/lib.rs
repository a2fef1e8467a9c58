//! Client core for the Elina project-management backend.
//!
//! The backend owns every business rule: lock dates, backdate windows,
//! permissions, plan activation and cost. This crate is the client side of
//! that contract. It sends requests, keeps the session, surfaces rule
//! violations exactly as the backend phrased them, and holds the interactive
//! state of the screens that edit data (the day-wise grid, plan versions,
//! the confirmation workflow, master-code import).
//!
//! # Layers
//!
//! - **Transport** ([`transport`]): one request pipeline that attaches the
//!   token, refreshes it at most once per request, classifies failures and
//!   publishes violations on the [`violation::ViolationChannel`].
//! - **Console** ([`console`]): typed operations per backend area, each
//!   running its local structural checks before any request is sent.
//! - **Views** ([`grid`], [`plan_lifecycle`], [`confirmation`],
//!   [`bulk_import`]): stateful models driven by a [`Console`].
//! - **Display** ([`models`], [`display`]): everything renders as markdown.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use elina_core::{grid::DayWiseGrid, params::Login, ConsoleBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let console = ConsoleBuilder::new().build().await?;
//! console
//!     .login(&Login {
//!         tenant_code: "ACME".to_string(),
//!         email: "site@acme.test".to_string(),
//!         password: "secret".to_string(),
//!     })
//!     .await?;
//!
//! let mut grid = DayWiseGrid::new(42);
//! grid.load(&console).await?;
//! println!("{grid}");
//! # Ok(())
//! # }
//! ```

pub mod bulk_import;
pub mod confirmation;
pub mod console;
pub mod display;
pub mod error;
pub mod grid;
pub mod models;
pub mod params;
pub mod plan_lifecycle;
pub mod session;
pub mod staged;
pub mod transport;
pub mod violation;

// Re-export commonly used types
pub use console::{Console, ConsoleBuilder};
pub use error::{ConsoleError, Result};
pub use violation::{GlobalViolationListener, ViolationChannel};
