//! Display formatting for collections and operation results.
//!
//! Domain models implement [`std::fmt::Display`] themselves, either as a
//! markdown card or as a single table row. This module adds what a single
//! model cannot know about: table headers, empty-collection messages and the
//! wording around create, update and delete results.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Collections &   │    │    Markdown     │
//! │ (rows & cards)  │───▶│  Result Types   │───▶│    (terminal)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ```rust
//! use elina_core::display::{OperationStatus, Rules};
//!
//! let rules = Rules(Vec::new());
//! assert!(rules.to_string().contains("No business rules found."));
//!
//! let status = OperationStatus::success("Logged out");
//! assert_eq!(status.to_string(), "Success: Logged out\n");
//! ```

pub mod collections;
pub mod results;
pub mod status;

pub use collections::{
    Allocations, DailySummaries, MasterCodes, Projects, ResourceOptions, Rules, Tasks, Timeline,
    WbsTree,
};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
