use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use url::Url;

use crate::db;
use crate::error::ImportError;
use crate::fetch::PageFetcher;
use crate::parser;
use crate::parser::extract::{ExtractMode, ExtractedData};

/// Envelope handed back to callers: `data` on success, `error` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtractedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResult {
    pub fn ok(data: ExtractedData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: &ImportError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<ExtractedData, ImportError>> for ImportResult {
    fn from(r: Result<ExtractedData, ImportError>) -> Self {
        match r {
            Ok(data) => ImportResult::ok(data),
            Err(e) => ImportResult::err(&e),
        }
    }
}

pub fn validate_url(raw: &str) -> Result<Url, ImportError> {
    Url::parse(raw.trim()).map_err(|e| ImportError::InvalidUrl(format!("{} ({})", raw, e)))
}

/// URL → fetch → parse → extract. One attempt per call, nothing shared between
/// calls.
pub struct ImportService<F> {
    fetcher: F,
}

impl<F: PageFetcher> ImportService<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub async fn import(&self, raw_url: &str, mode: ExtractMode) -> ImportResult {
        let result = self.try_import(raw_url, mode).await;
        if let Err(e) = &result {
            warn!("Import failed for {}: {}", raw_url, e);
        }
        result.into()
    }

    pub async fn try_import(
        &self,
        raw_url: &str,
        mode: ExtractMode,
    ) -> Result<ExtractedData, ImportError> {
        let url = validate_url(raw_url)?;
        let start = Instant::now();
        let html = self.fetcher.fetch(&url).await?;
        let data = parser::process_page(&html, &url, mode);
        info!(
            "Imported {} ({} bytes, {}ms)",
            url,
            html.len(),
            start.elapsed().as_millis()
        );
        Ok(data)
    }
}

/// Extract from HTML already on hand; `raw_url` is only used to resolve links.
pub fn import_html(html: &str, raw_url: &str, mode: ExtractMode) -> ImportResult {
    validate_url(raw_url)
        .map(|url| parser::process_page(html, &url, mode))
        .into()
}

// ── Batch ──

pub struct BatchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
    /// Results that could not be written to the DB.
    pub unsaved: usize,
}

/// Import many URLs concurrently, saving each result to the DB as it arrives.
/// Duplicate URLs are imported again; the store keeps the latest.
pub async fn run_batch<F: PageFetcher + 'static>(
    conn: &Connection,
    service: Arc<ImportService<F>>,
    urls: Vec<String>,
    mode: ExtractMode,
    concurrency: usize,
) -> Result<BatchStats> {
    let total = urls.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<(String, ImportResult)>(concurrency.max(1) * 2);

    for url in urls {
        let service = Arc::clone(&service);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let result = service.import(&url, mode).await;
            let _ = tx.send((url, result)).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut ok = 0usize;
    let mut errors = 0usize;
    let mut unsaved = 0usize;

    while let Some((url, result)) = rx.recv().await {
        let stored = match (&result.data, &result.error) {
            (Some(data), _) => {
                ok += 1;
                db::save_recipe(conn, &url, mode, data).map(|_| ())
            }
            (None, error) => {
                errors += 1;
                db::log_failure(conn, &url, error.as_deref().unwrap_or("unknown error"))
            }
        };
        if let Err(e) = stored {
            warn!("Failed to store result for {}: {:#}", url, e);
            unsaved += 1;
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Imported {} pages ({} ok, {} errors, {} unsaved)",
        total, ok, errors, unsaved
    );

    Ok(BatchStats {
        total,
        ok,
        errors,
        unsaved,
    })
}
