//! Wire format of job records coming from the remote feed and the snapshot file.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::mapping::{join_location, join_requirements};
use crate::domain::ports::RemoteJob;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationValue {
    Text(String),
    Parts {
        #[serde(default)]
        city: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        country: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequirementsValue {
    Text(String),
    List(Vec<String>),
}

/// One job record as found on the wire. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteJobRecord {
    #[serde(default)]
    pub id: Option<IdValue>,
    #[serde(default, alias = "title")]
    pub job_title: Option<String>,
    #[serde(default, alias = "company")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<LocationValue>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<RequirementsValue>,
    #[serde(default, alias = "url", alias = "apply_link")]
    pub apply_url: Option<String>,
}

impl From<RemoteJobRecord> for RemoteJob {
    fn from(r: RemoteJobRecord) -> Self {
        Self {
            id: r.id.map(|id| match id {
                IdValue::Text(s) => s,
                IdValue::Number(n) => n.to_string(),
            }),
            title: r.job_title,
            company: r.company_name,
            location: r.location.and_then(|l| match l {
                LocationValue::Text(s) => Some(s),
                LocationValue::Parts {
                    city,
                    state,
                    country,
                } => join_location(city, state, country),
            }),
            description: r.description,
            requirements: r.requirements.and_then(|r| match r {
                RequirementsValue::Text(s) => Some(s),
                RequirementsValue::List(items) => join_requirements(items),
            }),
            apply_url: r.apply_url,
        }
    }
}

/// Keys under which a wrapped feed may carry its record array.
const WRAPPER_KEYS: [&str; 3] = ["jobs", "data", "results"];

/// Parse a remote feed body: either a JSON array of records or an object
/// holding the array under `jobs`, `data` or `results`.
/// Records that are not objects of the expected shape are skipped with a warning.
pub fn parse_jobs_payload(body: &[u8]) -> Result<Vec<RemoteJob>, String> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| format!("body is not valid JSON: {e}"))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| "object body has no jobs, data or results array".to_string())?,
        other => return Err(format!("unexpected body type: {}", json_kind(&other))),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RemoteJobRecord>(item) {
            Ok(record) => records.push(record.into()),
            Err(e) => warn!(index, error = %e, "skipping malformed job record"),
        }
    }
    Ok(records)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
