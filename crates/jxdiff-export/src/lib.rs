//! Exporters turning diff results into shareable text formats.
//!
//! Every exporter is a pure function of its inputs.
//!
//! # Key Types
//!
//! - [`ExportFormat`] -- Supported formats with MIME type and file extension
//! - [`to_json_patch`] -- RFC 6902 patch document
//! - [`to_csv`] -- One row per change
//! - [`to_unified_diff`] -- Line-oriented `---`/`+++` diff of the raw inputs
//! - [`to_html_report`] -- Standalone HTML page with stats and a change table

pub mod csv;
pub mod error;
pub mod format;
pub mod html;
pub mod json_patch;
pub mod unified;

pub use csv::to_csv;
pub use error::{ExportError, ExportResult};
pub use format::ExportFormat;
pub use html::to_html_report;
pub use json_patch::to_json_patch;
pub use unified::to_unified_diff;

use serde_json::{Number, Value};

/// Text form of a change value: empty when absent, pretty JSON for
/// containers, the raw text for strings.
pub(crate) fn display_value(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => display_number(n),
        Some(v @ (Value::Array(_) | Value::Object(_))) => format!("{v:#}"),
        Some(v) => v.to_string(),
    }
}

/// Integral floats print without a fractional part, so `1.0` reads `1`.
fn display_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}
