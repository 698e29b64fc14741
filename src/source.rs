//! Attendance batch intake: request envelopes, local files and the upstream service.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::{Employee, lenient};
use crate::report::DateRange;
use crate::report::format::output_file_name;

/// Keys under which an envelope carries the employee list.
const BATCH_KEYS: [&str; 3] = ["employees", "empleados_data", "empleados"];

/// Keys that identify a lone employee object.
const IDENTITY_KEYS: [&str; 3] = ["emp_code", "code", "employee_code"];

/// A report request: the raw employee batch plus the requested range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRequest {
    #[serde(alias = "empleados_data", alias = "empleados")]
    pub employees: Value,
    #[serde(default, alias = "fecha_inicio", deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    #[serde(default, alias = "fecha_fin", deserialize_with = "lenient::string")]
    pub end_date: Option<String>,
}

impl ReportRequest {
    /// Read a request from JSON.
    ///
    /// An object carrying `employees`, `empleados_data` or `empleados` is an
    /// envelope; anything else is taken as the batch itself.
    pub fn from_value(value: Value) -> Result<Self> {
        let is_envelope = value
            .as_object()
            .is_some_and(|map| BATCH_KEYS.iter().any(|key| map.contains_key(*key)));

        if is_envelope {
            serde_json::from_value(value).map_err(|e| AppError::invalid_batch(format!("malformed request: {e}")))
        } else {
            Ok(Self {
                employees: value,
                start_date: None,
                end_date: None,
            })
        }
    }

    /// Override requested bounds with any that are given.
    pub fn with_range(mut self, start: Option<String>, end: Option<String>) -> Self {
        if start.is_some() {
            self.start_date = start;
        }
        if end.is_some() {
            self.end_date = end;
        }
        self
    }

    /// Resolved range, or `None` for the default calendar.
    pub fn range(&self) -> Option<DateRange> {
        DateRange::from_request(self.start_date.as_deref(), self.end_date.as_deref())
    }

    /// Suggested output file name for this request.
    pub fn file_name(&self, default_name: &str) -> String {
        output_file_name(self.start_date.as_deref(), self.end_date.as_deref(), default_name)
    }
}

/// Validate the batch shape and parse its employees.
///
/// A list wrapped in an envelope key is unwrapped, and a lone employee object
/// (one carrying an identity key) is accepted as a one-item batch. Entries
/// that are malformed or lack an identity code are dropped.
pub fn parse_batch(batch: &Value) -> Result<Vec<Employee>> {
    let items: Vec<&Value> = match batch {
        Value::Array(items) if items.is_empty() => return Err(AppError::EmptyBatch),
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) if map.is_empty() => return Err(AppError::EmptyBatch),
        Value::Object(map) => {
            if let Some(inner) = BATCH_KEYS.iter().find_map(|key| map.get(*key)) {
                return parse_batch(inner);
            }
            if !IDENTITY_KEYS.iter().any(|key| map.contains_key(*key)) {
                return Err(AppError::invalid_batch(
                    "object is neither an employee nor a list envelope",
                ));
            }
            vec![batch]
        }
        Value::Null => return Err(AppError::EmptyBatch),
        other => {
            return Err(AppError::invalid_batch(format!(
                "expected a list of employees, got {}",
                json_kind(other)
            )));
        }
    };

    let total = items.len();
    let employees: Vec<Employee> = items.into_iter().filter_map(Employee::from_value).collect();

    let skipped = total.saturating_sub(employees.len());
    if skipped > 0 {
        warn!("Skipped {skipped} invalid employee entries");
    }
    info!("Processing attendance for {} employees", employees.len());

    Ok(employees)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Load a JSON request or batch from a file.
pub fn load_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&content)?;
    debug!("Loaded {} bytes from {}", content.len(), path.display());
    Ok(value)
}

/// HTTP client for the upstream attendance service.
pub struct BatchClient {
    client: Client,
    base_url: String,
}

impl BatchClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Endpoint returning the employee batch as JSON
    /// * `timeout_secs` - Request timeout
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download the employee batch, optionally narrowed to a date range.
    pub async fn fetch(&self, range: Option<&DateRange>) -> Result<Value> {
        let mut request = self.client.get(&self.base_url);
        if let Some(range) = range {
            request = request.query(&[
                ("start_date", range.start().format("%Y-%m-%d").to_string()),
                ("end_date", range.end().format("%Y-%m-%d").to_string()),
            ]);
        }

        let response = request.send().await?.error_for_status()?;
        let value = response.json::<Value>().await?;

        info!("Fetched attendance batch from {}", self.base_url);
        Ok(value)
    }
}

/// Fetch from upstream, substituting the local fixture if the fetch fails.
pub async fn fetch_with_fallback(client: &BatchClient, range: Option<&DateRange>, fallback: &Path) -> Result<Value> {
    match client.fetch(range).await {
        Ok(value) => Ok(value),
        Err(fetch_err) => {
            warn!("Upstream fetch failed: {fetch_err}");
            match load_file(fallback) {
                Ok(value) => {
                    info!("Using fallback data from {}", fallback.display());
                    Ok(value)
                }
                Err(fallback_err) => Err(AppError::upstream(format!(
                    "{fetch_err}; fallback {path} unusable: {fallback_err}",
                    path = fallback.display()
                ))),
            }
        }
    }
}
