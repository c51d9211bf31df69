//! Input-boundary error taxonomy.
//!
//! Only schema errors (missing columns) and value errors (unparseable
//! dates) are fatal; both abort the whole operation and carry the exact
//! offending names or raw values. Lookup misses and empty scopes are
//! ordinary values elsewhere in the crate, never errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    /// A required column is absent from a table header.
    #[error("{table}: missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<String>,
    },

    /// Date cells that failed every accepted format, in input order.
    #[error("{table}: unparseable dates (tried YYYY-MM-DD and YYYY/MM/DD): {}", .values.join(", "))]
    UnparseableDates {
        table: &'static str,
        values: Vec<String>,
    },

    /// A file whose bytes fit none of the accepted text encodings, in
    /// the order they were tried.
    #[error("{path}: could not decode file (tried {})", .encodings.join(", "))]
    UndecodableText { path: String, encodings: Vec<String> },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A present-but-unparseable config file. A missing config file is
    /// not an error; defaults apply.
    #[error("failed to parse {path}: {detail}")]
    MalformedConfig { path: String, detail: String },
}

impl InputError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        InputError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<String>, source: std::io::Error) -> Self {
        InputError::Write {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_names_every_column() {
        let err = InputError::MissingColumns {
            table: "events",
            columns: vec!["date".to_string(), "risk_level".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("events"));
        assert!(msg.contains("date"));
        assert!(msg.contains("risk_level"));
    }

    #[test]
    fn test_undecodable_text_names_attempted_encodings() {
        let err = InputError::UndecodableText {
            path: "events.csv".to_string(),
            encodings: vec!["utf-8".to_string(), "shift_jis (cp932)".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("events.csv"));
        assert!(msg.contains("utf-8"));
        assert!(msg.contains("shift_jis"));
    }

    #[test]
    fn test_unparseable_dates_lists_raw_values() {
        let err = InputError::UnparseableDates {
            table: "events",
            values: vec!["2024-13-40".to_string(), "soon".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-13-40"));
        assert!(msg.contains("soon"));
        assert!(msg.contains("YYYY-MM-DD"));
    }
}
