//! Grid cells and their status tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for absent demographic data.
pub const PLACEHOLDER: &str = "-";

/// Shown when a record exists but a punch time is missing.
pub const NO_MARK: &str = "S/M";

/// Presentation tag attached to a cell. Renderers map each tag to a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// A punch time was recorded.
    Worked,
    OnTime,
    /// Late, but within the tolerance margin.
    Tolerated,
    Late,
    EarlyDeparture,
    /// Remote-work day presentation.
    Remote,
    /// Record present, punch missing.
    Missing,
    Attention,
    Ok,
}

impl Status {
    pub const ALL: [Status; 9] = [
        Self::Worked,
        Self::OnTime,
        Self::Tolerated,
        Self::Late,
        Self::EarlyDeparture,
        Self::Remote,
        Self::Missing,
        Self::Attention,
        Self::Ok,
    ];
}

/// Cell content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(i64),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One grid cell: a value plus an optional status tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub value: CellValue,
    pub status: Option<Status>,
}

impl Cell {
    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
            status: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            status: None,
        }
    }

    pub fn number(value: i64) -> Self {
        Self {
            value: CellValue::Number(value),
            status: None,
        }
    }

    /// Text cell falling back to [`PLACEHOLDER`] when absent or blank.
    pub fn text_or_placeholder(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => Self::text(v),
            None => Self::text(PLACEHOLDER),
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.value == CellValue::Empty
    }
}
