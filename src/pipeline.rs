use serde::Serialize;
use tracing::info;

use crate::archive::ArchiveBuilder;
use crate::error::Result;
use crate::extract::ArticleSource;
use crate::llm::Rewriter;
use crate::prompt::Category;

/// What happened to a single submitted URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Rewritten,
    ExtractionFailed,
    RewriteFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlOutcome {
    pub url: String,
    pub outcome: Outcome,
}

/// Result of one batch run. `archive` is present iff at least one article
/// was rewritten.
pub struct RunReport {
    pub total: usize,
    pub succeeded: usize,
    pub outcomes: Vec<UrlOutcome>,
    pub archive: Option<Vec<u8>>,
}

/// Processes `urls` strictly in input order, one at a time: extract,
/// rewrite, append to the archive. A URL failing either stage is skipped
/// without affecting the rest of the batch. `progress` is invoked after
/// each URL with (done, total) so callers can surface partial progress
/// without the core knowing about any UI.
pub async fn run<S, R, F>(
    source: &S,
    rewriter: &R,
    category: Category,
    urls: &[String],
    mut progress: F,
) -> Result<RunReport>
where
    S: ArticleSource,
    R: Rewriter,
    F: FnMut(usize, usize),
{
    let total = urls.len();
    let mut archive = ArchiveBuilder::new();
    let mut outcomes = Vec::with_capacity(total);

    for (index, url) in urls.iter().enumerate() {
        let index = index + 1;
        info!(%url, index, total, %category, "Processing article");

        let outcome = match source.fetch(url).await {
            None => Outcome::ExtractionFailed,
            Some(doc) => match rewriter.rewrite(&doc.text, category).await {
                None => Outcome::RewriteFailed,
                Some(rewritten) => {
                    archive.add_article(&doc.title, url, index, &rewritten)?;
                    Outcome::Rewritten
                }
            },
        };

        outcomes.push(UrlOutcome {
            url: url.clone(),
            outcome,
        });
        progress(index, total);
    }

    let succeeded = archive.len();
    let archive = if archive.is_empty() {
        None
    } else {
        Some(archive.finish()?)
    };

    Ok(RunReport {
        total,
        succeeded,
        outcomes,
        archive,
    })
}
