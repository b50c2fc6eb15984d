use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::pipeline::UrlOutcome;
use crate::prompt::Category;

#[derive(Deserialize)]
pub struct RewriteRequest {
    /// One of: food, travel, medical, finance, general.
    pub category: String,
    /// Article URLs, one per line.
    pub urls: String,
}

/// Per-URL breakdown returned when a run produces no archive.
#[derive(Serialize)]
pub struct RunSummary {
    pub category: Category,
    pub total: usize,
    pub succeeded: usize,
    pub results: Vec<UrlOutcome>,
    pub finished_at: DateTime<Utc>,
}
