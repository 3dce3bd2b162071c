#![forbid(unsafe_code)]

//! Cucumber report converter: turns flat cucumber JSON reports into a
//! hierarchical run model.
//!
//! Pipeline:
//! 1. **Report decoding** - every report, file or in-memory JSON, is decoded into source features
//! 2. **Reconstruction** - backgrounds are paired with scenarios, steps and hooks rebuilt
//! 3. **Aggregation** - scenarios roll up into features (optionally merged by name) and a run
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use cuke_report_converter::prelude::*;
//!
//! # fn main() -> cuke_report_converter::core::errors::Result<()> {
//! let run = Converter::new(Config::load(None)?)
//!     .convert_files(&["target/cucumber-report.json".into()])?;
//! println!("{} scenarios", run.num_of_scenarios());
//! # Ok(())
//! # }
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use cuke_report_converter::core::config::Config;
//! use cuke_report_converter::report::reader::{ReportReader, ReportSource};
//! ```

pub mod prelude;

pub mod convert;
pub mod core;
pub mod model;
pub mod report;
