//! Form state store.
//!
//! `FormStore` owns the draft and exposes the named mutations the form uses.
//! The output document is never cached: every `document()` call rebuilds it
//! from the current draft.

use tracing::debug;

use super::builder::build;
use super::model::{
    ActionStep, ChoiceField, Choices, Document, Draft, DraftPatch, MediaField, MediaKind,
    ReferenceMedia, StepField, TextField,
};
use super::progress::FormProgress;
use crate::error::{PromptError, PromptResult};

/// Holds the live draft for one form session.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    draft: Draft,
}

impl FormStore {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a store with the default scaffolding.
    pub fn new() -> Self {
        Self {
            draft: Draft::new(),
        }
    }

    /// Creates a store around an existing draft.
    pub fn from_draft(draft: Draft) -> Self {
        Self { draft }
    }

    /// Loads a store from draft JSON.
    pub fn from_json(json: &str) -> PromptResult<Self> {
        Ok(Self::from_draft(Draft::from_json(json)?))
    }

    /// Returns the current draft.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Consumes the store, returning the draft.
    pub fn into_draft(self) -> Draft {
        self.draft
    }

    // =========================================================================
    // SCALAR FIELDS
    // =========================================================================

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        *self.draft.text_mut(field) = value.into();
    }

    pub fn set_choices(&mut self, field: ChoiceField, value: impl Into<Choices>) {
        *self.draft.choices_mut(field) = value.into();
    }

    /// Toggles one value of a multi-select field.
    pub fn toggle_choice(&mut self, field: ChoiceField, value: &str) {
        let choices = self.draft.choices_mut(field);
        if choices.as_slice().iter().any(|v| v == value) {
            choices.deselect(value);
        } else {
            choices.select(value);
        }
    }

    // =========================================================================
    // REFERENCE MEDIA
    // =========================================================================

    /// Appends a blank reference entry.
    pub fn add_reference(&mut self, kind: MediaKind) {
        self.draft.references_mut(kind).push(ReferenceMedia::default());
    }

    /// Appends a filled-in reference entry, e.g. after an upload completes.
    pub fn push_reference(&mut self, kind: MediaKind, media: ReferenceMedia) {
        debug!(kind = kind.noun(), url = %media.url, "Adding reference media");
        self.draft.references_mut(kind).push(media);
    }

    pub fn remove_reference(&mut self, kind: MediaKind, index: usize) -> PromptResult<ReferenceMedia> {
        let list = self.draft.references_mut(kind);
        if index >= list.len() {
            return Err(PromptError::index_out_of_bounds(index, list.len()));
        }
        Ok(list.remove(index))
    }

    pub fn update_reference(
        &mut self,
        kind: MediaKind,
        index: usize,
        field: MediaField,
        value: impl Into<String>,
    ) -> PromptResult<()> {
        let list = self.draft.references_mut(kind);
        let length = list.len();
        let media = list
            .get_mut(index)
            .ok_or_else(|| PromptError::index_out_of_bounds(index, length))?;
        match field {
            MediaField::Url => media.url = value.into(),
            MediaField::Description => media.description = value.into(),
        }
        Ok(())
    }

    // =========================================================================
    // ACTION STEPS
    // =========================================================================

    /// Appends a blank step numbered `len + 1`.
    pub fn add_action_step(&mut self) {
        let next = self.draft.action_steps.len() as u32 + 1;
        self.draft.action_steps.push(ActionStep::new(next, ""));
    }

    /// Removes a step and renumbers the rest to `1..len`.
    pub fn remove_action_step(&mut self, index: usize) -> PromptResult<ActionStep> {
        let steps = &mut self.draft.action_steps;
        if index >= steps.len() {
            return Err(PromptError::index_out_of_bounds(index, steps.len()));
        }
        let removed = steps.remove(index);
        for (i, step) in steps.iter_mut().enumerate() {
            step.step = i as u32 + 1;
        }
        Ok(removed)
    }

    pub fn update_action_step(
        &mut self,
        index: usize,
        field: StepField,
        value: impl Into<String>,
    ) -> PromptResult<()> {
        let steps = &mut self.draft.action_steps;
        let length = steps.len();
        let step = steps
            .get_mut(index)
            .ok_or_else(|| PromptError::index_out_of_bounds(index, length))?;
        match field {
            StepField::Description => step.description = value.into(),
            StepField::Transition => step.transition = Some(value.into()),
            StepField::Duration => step.duration = Some(value.into()),
        }
        Ok(())
    }

    // =========================================================================
    // BULK OPERATIONS
    // =========================================================================

    /// Applies suggestion or template values onto the draft.
    pub fn apply_patch(&mut self, patch: &DraftPatch) {
        patch.apply_to(&mut self.draft);
    }

    /// Replaces the whole draft (e.g. with a magic-prompt expansion).
    pub fn replace(&mut self, draft: Draft) {
        self.draft = draft;
    }

    /// Restores the default scaffolding.
    pub fn reset(&mut self) {
        self.draft = Draft::new();
    }

    // =========================================================================
    // DERIVED VIEWS
    // =========================================================================

    /// Builds the output document from the current draft.
    pub fn document(&self) -> Document {
        build(&self.draft)
    }

    /// Completeness report for the current draft.
    pub fn progress(&self) -> FormProgress {
        FormProgress::evaluate(&self.draft)
    }
}
