use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Formats a diff can be exported to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    JsonPatch,
    Csv,
    UnifiedDiff,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::JsonPatch, Self::Csv, Self::UnifiedDiff, Self::Html];

    /// MIME type used when the export is downloaded or served.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::JsonPatch => "application/json",
            Self::Csv => "text/csv",
            Self::UnifiedDiff => "text/plain",
            Self::Html => "text/html",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::JsonPatch => "json",
            Self::Csv => "csv",
            Self::UnifiedDiff => "diff",
            Self::Html => "html",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonPatch => "json-patch",
            Self::Csv => "csv",
            Self::UnifiedDiff => "unified-diff",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json-patch" | "patch" => Ok(Self::JsonPatch),
            "csv" => Ok(Self::Csv),
            "unified-diff" | "unified" | "diff" => Ok(Self::UnifiedDiff),
            "html" => Ok(Self::Html),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}
