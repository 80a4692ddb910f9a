use serde::{Deserialize, Serialize};

/// Query parameters for `GET /fetchCompany`
#[derive(Deserialize)]
pub struct FetchCompanyQuery {
    pub siren: String,
}

/// Response for `GET /fetchCompany`
///
/// Returned regardless of the lookup's outcome; the job id is the only
/// handle the caller gets, and status is observable via `/jobsInProgress`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchCompanyResponse {
    pub job_id: String,
}

/// Response for `GET /jobsInProgress`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsInProgressResponse {
    pub jobs_in_progress: Vec<String>,
}
