//! WASM bindings for the prompt module.
//!
//! Wraps `FormStore` so the browser form can keep its state in Rust and
//! render all export formats from one document.

use js_sys::Array;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use super::model::{ChoiceField, Choices, MediaField, MediaKind, StepField, TextField};
use super::presets;
use super::render::{OutputFormat, RenderedPrompt};
use super::store::FormStore;
use crate::error::PromptError;

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<PromptError> for JsValue {
    fn from(err: PromptError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: PromptError| JsValue::from(e))
    };
}

fn unknown(what: &str, name: &str) -> JsValue {
    JsValue::from_str(&format!("Unknown {}: {}", what, name))
}

// Field names follow the draft's camelCase keys.
fn text_field(name: &str) -> Result<TextField, JsValue> {
    match name {
        "initialPrompt" => Ok(TextField::InitialPrompt),
        "scene" => Ok(TextField::Scene),
        "character" => Ok(TextField::Character),
        "dialogue" => Ok(TextField::Dialogue),
        _ => Err(unknown("text field", name)),
    }
}

fn choice_field(name: &str) -> Result<ChoiceField, JsValue> {
    match name {
        "camera" => Ok(ChoiceField::Camera),
        "lighting" => Ok(ChoiceField::Lighting),
        "style" => Ok(ChoiceField::Style),
        "soundEffects" => Ok(ChoiceField::SoundEffects),
        "backgroundMusic" => Ok(ChoiceField::BackgroundMusic),
        "negativePrompt" => Ok(ChoiceField::NegativePrompt),
        "overallTransitionStyle" => Ok(ChoiceField::OverallTransitionStyle),
        "transitionRhythm" => Ok(ChoiceField::TransitionRhythm),
        _ => Err(unknown("choice field", name)),
    }
}

fn media_kind(name: &str) -> Result<MediaKind, JsValue> {
    match name {
        "image" | "images" | "referenceImages" => Ok(MediaKind::Image),
        "video" | "videos" | "referenceVideos" => Ok(MediaKind::Video),
        _ => Err(unknown("media kind", name)),
    }
}

fn media_field(name: &str) -> Result<MediaField, JsValue> {
    match name {
        "url" => Ok(MediaField::Url),
        "description" => Ok(MediaField::Description),
        _ => Err(unknown("media field", name)),
    }
}

fn step_field(name: &str) -> Result<StepField, JsValue> {
    match name {
        "description" => Ok(StepField::Description),
        "transition" => Ok(StepField::Transition),
        "duration" => Ok(StepField::Duration),
        _ => Err(unknown("step field", name)),
    }
}

fn output_format(name: &str) -> Result<OutputFormat, JsValue> {
    Ok(js_result!(name.parse::<OutputFormat>())?)
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around FormStore.
#[wasm_bindgen]
pub struct JsFormStore {
    inner: FormStore,
}

#[wasm_bindgen]
impl JsFormStore {
    /// Creates a store with the default scaffolding.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const store = new JsFormStore();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsFormStore {
        JsFormStore {
            inner: FormStore::new(),
        }
    }

    /// Loads a store from draft JSON (e.g. restored from localStorage).
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<JsFormStore, JsValue> {
        let inner = js_result!(FormStore::from_json(json))?;
        Ok(JsFormStore { inner })
    }

    /// Serializes the draft to JSON.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        Ok(js_result!(self.inner.draft().to_json())?)
    }

    /// Gets the draft as a JavaScript object.
    #[wasm_bindgen(js_name = getDraft)]
    pub fn get_draft(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.draft())?)
    }

    /// Restores the default scaffolding.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

// =============================================================================
// FIELD METHODS
// =============================================================================

#[wasm_bindgen]
impl JsFormStore {
    /// Sets a free-text field.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// store.setText('scene', 'A quiet street at dawn');
    /// ```
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, field: &str, value: &str) -> Result<(), JsValue> {
        self.inner.set_text(text_field(field)?, value);
        Ok(())
    }

    /// Sets a multi-select field from a string or an array of strings.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// store.setChoices('camera', ['wide shot', 'slow dolly']);
    /// ```
    #[wasm_bindgen(js_name = setChoices)]
    pub fn set_choices(&mut self, field: &str, value: JsValue) -> Result<(), JsValue> {
        let choices: Choices = from_value(value)?;
        self.inner.set_choices(choice_field(field)?, choices);
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleChoice)]
    pub fn toggle_choice(&mut self, field: &str, value: &str) -> Result<(), JsValue> {
        self.inner.toggle_choice(choice_field(field)?, value);
        Ok(())
    }

    #[wasm_bindgen(js_name = addReference)]
    pub fn add_reference(&mut self, kind: &str) -> Result<(), JsValue> {
        self.inner.add_reference(media_kind(kind)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeReference)]
    pub fn remove_reference(&mut self, kind: &str, index: usize) -> Result<(), JsValue> {
        js_result!(self.inner.remove_reference(media_kind(kind)?, index))?;
        Ok(())
    }

    /// Updates `url` or `description` of a reference entry.
    #[wasm_bindgen(js_name = updateReference)]
    pub fn update_reference(
        &mut self,
        kind: &str,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), JsValue> {
        js_result!(self
            .inner
            .update_reference(media_kind(kind)?, index, media_field(field)?, value))
    }

    #[wasm_bindgen(js_name = addActionStep)]
    pub fn add_action_step(&mut self) {
        self.inner.add_action_step();
    }

    /// Removes a step; the remaining steps are renumbered from 1.
    #[wasm_bindgen(js_name = removeActionStep)]
    pub fn remove_action_step(&mut self, index: usize) -> Result<(), JsValue> {
        js_result!(self.inner.remove_action_step(index))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = updateActionStep)]
    pub fn update_action_step(
        &mut self,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), JsValue> {
        js_result!(self.inner.update_action_step(index, step_field(field)?, value))
    }
}

// =============================================================================
// PRESETS
// =============================================================================

#[wasm_bindgen]
impl JsFormStore {
    /// Applies keyword suggestions for the draft's initial prompt.
    #[wasm_bindgen(js_name = applySuggestions)]
    pub fn apply_suggestions(&mut self) {
        let patch = presets::suggest(&self.inner.draft().initial_prompt);
        self.inner.apply_patch(&patch);
    }

    /// Applies a template by id. Returns false if the id is unknown.
    #[wasm_bindgen(js_name = applyTemplate)]
    pub fn apply_template(&mut self, id: &str) -> bool {
        match presets::template(id) {
            Some(t) => {
                self.inner.apply_patch(&t.patch());
                true
            }
            None => false,
        }
    }

    /// Replaces the draft with a magic-prompt expansion.
    #[wasm_bindgen(js_name = applyMagicPrompt)]
    pub fn apply_magic_prompt(&mut self, prompt: &str) {
        self.inner.replace(presets::magic_prompt(prompt));
    }

    /// Lists the template catalog.
    #[wasm_bindgen(js_name = listTemplates)]
    pub fn list_templates() -> Result<JsValue, JsValue> {
        Ok(to_js_value(&presets::TEMPLATES)?)
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

#[wasm_bindgen]
impl JsFormStore {
    /// Gets the output document as a JavaScript object.
    #[wasm_bindgen(js_name = getDocument)]
    pub fn get_document(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.document())?)
    }

    /// Renders the document as `json`, `yaml` or `text`.
    pub fn render(&self, format: &str) -> Result<String, JsValue> {
        let format = output_format(format)?;
        js_result!(self.inner.document().render(format))
    }

    /// Renders all three formats from one document: `[json, yaml, text]`.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const [json, yaml, text] = store.renderAll();
    /// ```
    #[wasm_bindgen(js_name = renderAll)]
    pub fn render_all(&self) -> Result<Array, JsValue> {
        let rendered = js_result!(RenderedPrompt::from_document(&self.inner.document()))?;
        let array = Array::new();
        for format in OutputFormat::ALL {
            array.push(&JsValue::from_str(rendered.get(format)));
        }
        Ok(array)
    }

    /// Download file name for a format, e.g. `video-prompt.yaml`.
    #[wasm_bindgen(js_name = fileName)]
    pub fn file_name(format: &str) -> Result<String, JsValue> {
        Ok(output_format(format)?.file_name())
    }

    /// Completeness report: `{ percentage, entries }`.
    pub fn progress(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.progress())?)
    }
}

impl Default for JsFormStore {
    fn default() -> Self {
        Self::new()
    }
}
