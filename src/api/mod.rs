// Gateway module for the remote document service
// All external access must go through this gateway

mod client;
mod reconcile;
mod traits;
mod types;

pub use client::HttpDocumentService;
pub use reconcile::{extract_fields, reconcile_upload, UploadFields};
pub use traits::{DocumentLookup, DocumentService};
pub use types::{extract_detail, ChatRequest, UploadResult, UploadSettings};
