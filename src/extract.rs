use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error};

use crate::error::Result;

/// Title used when a page offers no usable <title> or <h1>.
const FALLBACK_TITLE: &str = "article";

// Create a static client to reuse connections. Extraction carries no
// request timeout; the run blocks for as long as the fetch takes.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

// Create static selectors to avoid recompiling them each time
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1").expect("Failed to parse h1 selector")
});

static ARTICLE_P_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article p").expect("Failed to parse article p selector")
});

static P_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse p selector")
});

/// The main text and title pulled out of a fetched page.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub title: String,
}

/// Where extracted articles come from. Absence is the only failure signal
/// that crosses this boundary.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<Document>;
}

/// Production source: fetches the page over HTTP and parses out the
/// article content.
pub struct HttpArticleSource;

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch(&self, url: &str) -> Option<Document> {
        let html = match fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                error!(%url, "Failed to fetch page: {}", e);
                return None;
            }
        };

        match extract_document(&html) {
            Some(doc) => {
                debug!(%url, chars = doc.text.len(), title = %doc.title, "Extracted article");
                Some(doc)
            }
            None => {
                error!(%url, "No article text found in page");
                None
            }
        }
    }
}

pub async fn fetch_html(url: &str) -> Result<String> {
    let response = CLIENT.get(url).send().await?;
    let html = response.text().await?;
    Ok(html)
}

/// Pulls the title and main text out of an HTML page. Returns None when no
/// paragraph text survives extraction; a missing title falls back rather
/// than failing.
pub fn extract_document(html: &str) -> Option<Document> {
    let page = Html::parse_document(html);

    let title = page
        .select(&TITLE_SELECTOR)
        .next()
        .or_else(|| page.select(&H1_SELECTOR).next())
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    // Prefer paragraphs inside an <article> element, fall back to the
    // whole page
    let mut paragraphs: Vec<String> = page
        .select(&ARTICLE_P_SELECTOR)
        .map(element_text)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        paragraphs = page
            .select(&P_SELECTOR)
            .map(element_text)
            .filter(|p| !p.is_empty())
            .collect();
    }

    let text = paragraphs.join("\n\n");
    if text.is_empty() {
        return None;
    }

    Some(Document { text, title })
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
