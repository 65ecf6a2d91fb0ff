//! vidprompt - structured prompt documents for AI video generation.
//!
//! A form-style draft is turned into one canonical document that can be
//! exported three ways from the same value:
//!
//! - **JSON**: the machine-readable key/value tree
//! - **YAML**: block-text markup with literal blocks for long text
//! - **Text**: a human-readable report with uppercase section headers
//!
//! With the `upload` feature (on by default) reference images and videos
//! can be posted to a configured chain of hosting providers. Upload is
//! native only; on `wasm32` the feature compiles to nothing, so
//! `--target wasm32-unknown-unknown --features wasm` builds with the
//! default features left on.
//!
//! # Example
//!
//! ```rust
//! use vidprompt::{ChoiceField, FormStore, OutputFormat, RenderedPrompt, TextField};
//!
//! let mut store = FormStore::new();
//! store.set_text(TextField::Scene, "A quiet street at dawn");
//! store.set_choices(ChoiceField::Camera, ["wide shot", "slow dolly"]);
//!
//! // The document is rebuilt from the draft on every read
//! let document = store.document();
//! assert_eq!(document.camera, "wide shot, slow dolly");
//!
//! // All formats come from the same document
//! let rendered = RenderedPrompt::from_document(&document).unwrap();
//! assert!(rendered.get(OutputFormat::Text).starts_with("SCENE:\n"));
//! ```

pub mod error;

// Prompt module
pub mod prompt;

// Re-exports for convenience
pub use error::{PromptError, PromptResult, ProviderKind, UploadError};
pub use prompt::{
    build, ActionStep, ChoiceField, Choices, Document, Draft, DraftPatch, FormProgress, FormStore,
    MediaField, MediaKind, OutputFormat, ReferenceMedia, RenderedPrompt, StepField, TextField,
};

#[cfg(feature = "wasm")]
pub use prompt::JsFormStore;

// Upload module (only compiled when upload feature enabled). The streamed
// request body needs a native reqwest client, so wasm32 builds skip it.
#[cfg(all(feature = "upload", not(target_arch = "wasm32")))]
pub mod upload;

#[cfg(all(feature = "upload", not(target_arch = "wasm32")))]
pub use upload::{UploadConfig, UploadFile, UploadProgress, UploadResult, Uploader};

#[cfg(test)]
mod tests {
    const NATIVE_ONLY: &str = "[target.'cfg(not(target_arch = \"wasm32\"))'.dependencies]";

    #[test]
    fn test_http_client_is_native_only() {
        let manifest = include_str!("../Cargo.toml");
        let (shared, native) = manifest
            .split_once(NATIVE_ONLY)
            .expect("native-only dependency table");
        assert!(!shared.contains("\nreqwest ="));
        let native_table = native.split("\n[").next().unwrap_or_default();
        assert!(native_table.contains("\nreqwest ="));
    }
}
