mod document;
mod extraction;
mod filesystem;
mod internal;
mod usage;
mod value;

pub use document::DocumentError;
pub use extraction::ExtractionError;
pub use filesystem::FilesystemError;
pub use internal::InternalError;
pub use usage::UsageError;
pub use value::ValueError;
