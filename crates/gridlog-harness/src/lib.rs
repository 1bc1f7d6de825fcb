#![forbid(unsafe_code)]

//! gridlog Harness
//!
//! An in-memory workbook plus a JSON script runner for exercising the
//! history and macro engine without a real spreadsheet host.
//!
//! # Key Components
//!
//! - [`MemoryWorkbook`] - `DocumentApi` + `ViewResolver` over plain vectors,
//!   with one-shot fault injection and deferred activation
//! - [`Script`] / [`ScriptStep`] - Serializable editing sessions
//! - [`ScriptRunner`] - Runs steps through an `EditSession` and reports the result
//! - [`fixtures`] - Canned scripts
//!
//! # Role in gridlog
//! Tests in `gridlog-runtime` use [`MemoryWorkbook`] as their host. The
//! `gridlog-harness` binary runs scripts from the command line and prints
//! a JSON report of the final sheets, history, and macros.

pub mod cli;
pub mod error;
pub mod fixtures;
pub mod script;
pub mod workbook;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
pub use script::{Script, ScriptReport, ScriptRunner, ScriptStep, run_script};
pub use workbook::{ActivationMode, FailPoint, MemoryWorkbook, WorkbookState};
