pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod upload;
pub mod utils;

pub use api::{DocumentService, HttpDocumentService, UploadResult};
pub use app::{load_config, Config};
pub use runtime::ChatController;
pub use session::Session;
pub use tui::run_ui;
pub use utils::ChatError;
