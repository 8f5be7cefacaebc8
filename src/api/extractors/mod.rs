//! Custom request extractors.

mod upload;
mod validated_json;

pub use upload::FileUpload;
pub use validated_json::ValidatedJson;
