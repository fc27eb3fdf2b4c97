//! Azure Document Intelligence REST API integration.
//!
//! Only the pieces the layout tool needs: resource info (used to verify
//! credentials) and submit-then-poll analysis against a prebuilt model.

mod client;
mod error;
mod models;
mod options;

pub use client::{DocumentIntelligenceClient, LAYOUT_MODEL};
pub use error::DocumentIntelligenceError;
pub use models::{
    AnalyzeResult, DocumentPage, DocumentParagraph, DocumentSpan, DocumentTable,
    DocumentTableCell,
};
pub use options::{AnalyzeOptions, ContentFormat, PageRange};
