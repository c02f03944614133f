/// Runtime orchestrator module - Gateway

mod controller;
mod non_interactive;
mod orchestrator;

pub use controller::{upload_notice, ChatController};
pub use non_interactive::{ExecutionMetadata, NonInteractiveResult, NonInteractiveRunner};
pub use orchestrator::{build_controller, is_interactive, resolve_config, Orchestrator};
