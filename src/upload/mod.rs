// Gateway module for upload preparation

mod filetype;
mod staging;

pub use filetype::{accepted_extensions, DocumentKind};
pub use staging::StagedUpload;
