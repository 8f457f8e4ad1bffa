//! Dispatch and Batch Execution
//!
//! ## Pipeline Overview
//!
//! ```text
//! CorpusImage / source path
//!       │
//!       ▼
//! ┌─────────────┐
//! │  dispatch / │  Decode, timed transform per backend
//! │    batch    │
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  aggregate  │  Per-backend means (shadebench-report)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`dispatch`] - Single-image dispatch with surface write-back
//! - [`batch`] - Sequential corpus runner with per-image failure isolation
//! - [`formatting`] - Human-readable output
//! - [`metadata`] - Report metadata collection

mod batch;
mod dispatch;
mod formatting;
mod metadata;

pub use batch::run_batch;
pub use dispatch::{BackendResult, DispatchError, run_one};
pub use formatting::format_human_output;
pub use metadata::build_report_meta;
