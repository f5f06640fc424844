//! JSON export files and their import.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ExportError, ExportResult};
use super::table::ResultSheet;
use crate::competition::Competition;
use crate::constants::{APP_VERSION, EXPORT_VERSION};

/// Descriptive fields of an export file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_competitions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<usize>,
}

/// Export file layout
///
/// A full export carries `competitions` (the history) and the current
/// competition; a single-competition export carries `competition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    pub export_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_competition: Option<Competition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitions: Option<Vec<Competition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition: Option<Competition>,
    #[serde(default)]
    pub metadata: ExportMetadata,
}

impl ExportData {
    /// Full export of the history plus the current competition
    pub fn all(current: Option<&Competition>, history: &[Competition]) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: Utc::now(),
            current_competition: current.cloned(),
            competitions: Some(history.to_vec()),
            competition: None,
            metadata: ExportMetadata {
                total_competitions: Some(history.len()),
                app_version: Some(APP_VERSION.to_string()),
                ..Default::default()
            },
        }
    }

    /// Export of one competition
    pub fn single(competition: &Competition) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: Utc::now(),
            current_competition: None,
            competitions: None,
            competition: Some(competition.clone()),
            metadata: ExportMetadata {
                competition_name: Some(competition.name.clone()),
                competition_date: Some(competition.date),
                participant_count: Some(competition.participants.len()),
                ..Default::default()
            },
        }
    }

    /// Competitions an import of this file adds to the history
    pub fn competitions_to_import(&self) -> Vec<&Competition> {
        match (&self.competitions, &self.competition) {
            (Some(competitions), _) => competitions.iter().collect(),
            (None, Some(competition)) => vec![competition],
            (None, None) => Vec::new(),
        }
    }

    pub fn to_json_pretty(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

const COMPETITION_TYPES: [&str; 2] = ["20", "50"];
const COMPETITION_STATUSES: [&str; 3] = ["created", "inProgress", "finished"];

/// Check the shape of an import payload before it is deserialized
pub fn validate_import(value: &Value) -> ExportResult<()> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("payload is not an object"))?;

    for field in ["version", "exportDate"] {
        if !is_present(object.get(field)) {
            return Err(invalid(format!("missing {field}")));
        }
    }

    if let Some(competitions) = object.get("competitions").and_then(Value::as_array) {
        for (index, competition) in competitions.iter().enumerate() {
            validate_competition(competition)
                .map_err(|reason| invalid(format!("competitions[{index}]: {reason}")))?;
        }
        return Ok(());
    }

    if let Some(competition) = object.get("competition").filter(|c| !c.is_null()) {
        return validate_competition(competition)
            .map_err(|reason| invalid(format!("competition: {reason}")));
    }

    Err(invalid("neither competitions nor competition present"))
}

fn validate_competition(competition: &Value) -> Result<(), String> {
    for field in ["id", "name", "date"] {
        if !is_present(competition.get(field)) {
            return Err(format!("missing {field}"));
        }
    }

    let kind = competition.get("type").and_then(Value::as_str);
    if !kind.is_some_and(|k| COMPETITION_TYPES.contains(&k)) {
        return Err(format!("invalid type {kind:?}"));
    }

    let status = competition.get("status").and_then(Value::as_str);
    if !status.is_some_and(|s| COMPETITION_STATUSES.contains(&s)) {
        return Err(format!("invalid status {status:?}"));
    }

    Ok(())
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn invalid(reason: impl Into<String>) -> ExportError {
    ExportError::InvalidFormat(reason.into())
}

/// Parse and validate an export file
///
/// # Errors
///
/// * `ExportError::Serialization` - Not JSON at all
/// * `ExportError::InvalidFormat` - JSON without the export layout
pub fn parse_import(json: &str) -> ExportResult<ExportData> {
    let value: Value = serde_json::from_str(json)?;
    validate_import(&value)?;
    serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
}

/// Read and validate an export file from disk
pub async fn read_import(path: impl AsRef<Path>) -> ExportResult<ExportData> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await?;
    let data = parse_import(&json)?;
    info!(
        "Read import file {} with {} competitions",
        path.display(),
        data.competitions_to_import().len()
    );
    Ok(data)
}

/// Write an export file as pretty-printed JSON
pub async fn write_export(path: impl AsRef<Path>, data: &ExportData) -> ExportResult<()> {
    let path = path.as_ref();
    let json = data.to_json_pretty()?;
    tokio::fs::write(path, json).await?;
    debug!("Wrote export file {}", path.display());
    Ok(())
}

/// Write a result sheet as CSV
pub async fn write_csv(path: impl AsRef<Path>, sheet: &ResultSheet) -> ExportResult<()> {
    let path = path.as_ref();
    tokio::fs::write(path, sheet.to_csv()).await?;
    debug!("Wrote CSV file {}", path.display());
    Ok(())
}

/// `ritsuzen-all-data-YYYY-MM-DD.json`
pub fn all_data_file_name(date: NaiveDate) -> String {
    format!("ritsuzen-all-data-{}.json", date.format("%Y-%m-%d"))
}

/// `{name}-{date}.json`
pub fn competition_file_name(competition: &Competition) -> String {
    format!(
        "{}-{}.json",
        sanitize_file_stem(&competition.name),
        competition.date.format("%Y-%m-%d")
    )
}

/// `立禅の会YYYYMMDD.csv`
pub fn csv_file_name(competition: &Competition) -> String {
    format!("立禅の会{}.csv", competition.date.format("%Y%m%d"))
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
