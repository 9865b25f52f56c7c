// Adapters layer: concrete implementations for external systems (document format, archives, sources, local files).

pub mod archive;
pub mod json_document;
pub mod local_storage;
pub mod source;
