//! Rules turning source records into stored jobs.

use std::collections::HashSet;

use tracing::warn;

use crate::contract::model::Job;
use crate::domain::ports::RemoteJob;

pub const DEFAULT_TITLE: &str = "Untitled Position";
pub const DEFAULT_COMPANY: &str = "Unknown Company";
pub const DEFAULT_LOCATION: &str = "Location not specified";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_REQUIREMENTS: &str = "No specific requirements listed";

/// `Some` only for values carrying non-whitespace text.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Join the non-blank parts of a structured location as `city, state, country`.
pub fn join_location(
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
) -> Option<String> {
    let parts: Vec<String> = [city, state, country]
        .into_iter()
        .filter_map(non_blank)
        .map(|p| p.trim().to_string())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Join a list of requirement lines, skipping blank entries.
pub fn join_requirements(items: Vec<String>) -> Option<String> {
    let parts: Vec<String> = items
        .into_iter()
        .filter_map(|i| non_blank(Some(i)))
        .map(|i| i.trim().to_string())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Map one source record, filling defaults. Records without an id yield `None`.
pub fn to_job(remote: RemoteJob, apply_url_base: &str) -> Option<Job> {
    let id = non_blank(remote.id)?.trim().to_string();
    let apply_url = non_blank(remote.apply_url)
        .unwrap_or_else(|| format!("{}/{}", apply_url_base.trim_end_matches('/'), id));

    Some(Job {
        title: non_blank(remote.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        company: non_blank(remote.company).unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
        location: non_blank(remote.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        description: non_blank(remote.description)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        requirements: non_blank(remote.requirements)
            .unwrap_or_else(|| DEFAULT_REQUIREMENTS.to_string()),
        apply_url,
        id,
    })
}

/// Map a whole batch, preserving order. Records without an id are skipped and
/// only the first record of each id is kept.
pub fn map_jobs(records: Vec<RemoteJob>, apply_url_base: &str) -> Vec<Job> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let Some(job) = to_job(record, apply_url_base) else {
            warn!(index, "skipping job record without id");
            continue;
        };
        if !seen.insert(job.id.clone()) {
            warn!(index, job_id = %job.id, "skipping duplicate job id");
            continue;
        }
        jobs.push(job);
    }

    jobs
}
