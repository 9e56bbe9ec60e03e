//! JSON exports consumed by plotting sinks.

use codonopt_core::{AdaptivenessTable, CodonUsageTable, ScoreReport};

use crate::ParseError;

pub fn table_to_json(table: &AdaptivenessTable) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(table)?)
}

pub fn table_from_json(input: &str) -> Result<AdaptivenessTable, ParseError> {
    Ok(serde_json::from_str(input)?)
}

pub fn usage_to_json(usage: &CodonUsageTable) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(usage)?)
}

pub fn report_to_json(report: &ScoreReport) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(report)?)
}
