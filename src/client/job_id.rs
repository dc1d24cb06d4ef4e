//! Run id to job id mapping for the task endpoints.

/// Literal prefix carried by crawl job identifiers.
pub const JOB_ID_PREFIX: &str = "crawl_";

/// Turn a run id into the job id the cancel endpoint expects.
///
/// Ids that already carry [`JOB_ID_PREFIX`] are returned unchanged, so
/// `normalize_job_id(&normalize_job_id(x)) == normalize_job_id(x)`.
pub fn normalize_job_id(id: &str) -> String {
    if id.starts_with(JOB_ID_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", JOB_ID_PREFIX, id)
    }
}
