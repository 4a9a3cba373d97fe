//! Standalone replay documents.

mod artifact;

pub use artifact::{
    export_artifact, extract_config, extract_payload, extract_runtime_wasm, ExportOptions,
    ReplayRuntime,
};
