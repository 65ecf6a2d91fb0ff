//! Prompt document module.
//!
//! Form state, the draft -> document builder, and the three export formats.

pub mod builder;
pub mod model;
pub mod presets;
pub mod progress;
pub mod render;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use builder::build;
pub use model::{
    ActionStep, Audio, ChoiceField, Choices, Document, Draft, DraftPatch, MediaField, MediaKind,
    ReferenceMedia, StepField, TextField, Transitions, Visuals,
};
pub use progress::FormProgress;
pub use render::{OutputFormat, RenderedPrompt};
pub use store::FormStore;

#[cfg(feature = "wasm")]
pub use wasm::JsFormStore;
