//! Layout analysis of a local document, split into page windows for PDFs.
//!
//! Windows are submitted one after another from a single open file handle.
//! Only the text content survives a multi-window run: page, table and
//! paragraph indices returned per window are window-local and are dropped.

use std::io::SeekFrom;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info};

use crate::document::SourceDocument;
use crate::document_intelligence::{
    AnalyzeOptions, AnalyzeResult, ContentFormat, DocumentIntelligenceClient, LAYOUT_MODEL,
    PageRange,
};
use crate::error::ToolError;

/// Pages submitted per remote call
pub const PAGES_PER_WINDOW: u32 = 2;

/// Consecutive, non-overlapping page ranges covering `1..=total_pages`
pub fn page_windows(total_pages: u32) -> impl Iterator<Item = PageRange> {
    (0..total_pages)
        .step_by(PAGES_PER_WINDOW as usize)
        .map(move |start| PageRange::new(start + 1, (start + PAGES_PER_WINDOW).min(total_pages)))
}

/// Analyze `document` with the layout model.
///
/// PDFs are analyzed one window at a time and the window contents joined with
/// newlines; anything else is a single call over the whole file. The first
/// failing call aborts the run.
pub async fn analyze_document(
    client: &DocumentIntelligenceClient,
    document: &SourceDocument,
    total_pages: u32,
    content_format: ContentFormat,
) -> Result<AnalyzeResult, ToolError> {
    let mut file = File::open(&document.path).await?;
    let content_type = document.kind.mime_type();

    if !document.kind.is_paged() {
        let body = read_from_start(&mut file).await?;
        let options = AnalyzeOptions {
            pages: None,
            content_format,
        };
        let result = client
            .analyze(LAYOUT_MODEL, body, content_type, &options)
            .await?;
        metrics::counter!("docintel_analysis_requests_total").increment(1);
        info!(path = %document.path.display(), "Document analyzed");
        return Ok(result);
    }

    let mut contents = Vec::new();
    for window in page_windows(total_pages) {
        let body = read_from_start(&mut file).await?;
        let options = AnalyzeOptions {
            pages: Some(window),
            content_format,
        };

        debug!(
            pages = %window,
            count = window.page_count(),
            total_pages,
            "Analyzing page window"
        );
        let result = client
            .analyze(LAYOUT_MODEL, body, content_type, &options)
            .await?;
        metrics::counter!("docintel_analysis_requests_total").increment(1);

        contents.push(result.content);
    }

    info!(
        path = %document.path.display(),
        total_pages,
        windows = contents.len(),
        "PDF analyzed in page windows"
    );

    Ok(AnalyzeResult::from_content(contents.join("\n")))
}

/// Rewind the shared handle and read the whole file
async fn read_from_start(file: &mut File) -> std::io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0)).await?;
    let mut body = Vec::new();
    file.read_to_end(&mut body).await?;
    Ok(body)
}
