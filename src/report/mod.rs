//! Source report: the decoded cucumber JSON shape and the report reader.

pub mod reader;
pub mod source;
