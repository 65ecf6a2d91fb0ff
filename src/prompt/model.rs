//! Data models for the prompt builder.
//!
//! `Draft` is the live form state, `Document` is the derived output that gets
//! serialized and exported.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

// =============================================================================
// CHOICES
// =============================================================================

/// A multi-select field value, always held as an ordered sequence.
///
/// Older drafts stored these fields as a single string. Deserialization still
/// accepts that shape: an empty string becomes an empty sequence and any other
/// string becomes a one-element sequence. `null` is an empty selection.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Choices(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum ChoicesRepr {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for Choices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<ChoicesRepr>::deserialize(deserializer)? {
            None => Choices::new(),
            Some(ChoicesRepr::One(value)) => Choices::from(value),
            Some(ChoicesRepr::Many(values)) => Choices(values),
        })
    }
}

impl Choices {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the selection with `", "`. An empty selection yields `""`.
    pub fn flatten(&self) -> String {
        self.0.join(", ")
    }

    /// Returns the selected values.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of selected values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Appends a value unless it is already selected.
    pub fn select(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !self.0.contains(&value) {
            self.0.push(value);
        }
    }

    /// Removes a value if selected.
    pub fn deselect(&mut self, value: &str) {
        self.0.retain(|v| v != value);
    }
}

impl From<String> for Choices {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self(Vec::new())
        } else {
            Self(vec![value])
        }
    }
}

impl From<&str> for Choices {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Vec<String>> for Choices {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<&[&str]> for Choices {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Choices {
    fn from(values: [&str; N]) -> Self {
        Self::from(&values[..])
    }
}

// =============================================================================
// REFERENCE MEDIA / ACTION STEPS
// =============================================================================

/// Which reference-media collection (and which upload validation kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Lowercase noun used in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// MIME type prefix files of this kind must carry.
    pub fn mime_prefix(&self) -> &'static str {
        match self {
            Self::Image => "image/",
            Self::Video => "video/",
        }
    }

    /// Classifies a MIME type by its prefix.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("image/") {
            Some(Self::Image)
        } else if mime_type.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// A visual reference: a URL plus a free-text description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReferenceMedia {
    pub url: String,
    pub description: String,
}

impl ReferenceMedia {
    /// Creates a reference from a URL and a description.
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
        }
    }

    /// True when the URL has content after trimming.
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Editable fields of a reference-media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaField {
    Url,
    Description,
}

/// One numbered beat of the action sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionStep {
    /// 1-based position in the draft.
    pub step: u32,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl ActionStep {
    /// Creates a step with a description and no transition/duration.
    pub fn new(step: u32, description: impl Into<String>) -> Self {
        Self {
            step,
            description: description.into(),
            transition: None,
            duration: None,
        }
    }

    /// Builder: Set transition.
    pub fn with_transition(mut self, transition: impl Into<String>) -> Self {
        self.transition = Some(transition.into());
        self
    }

    /// Builder: Set duration.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// True when the description has content after trimming.
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Editable text fields of an action step. `step` itself is managed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Description,
    Transition,
    Duration,
}

// =============================================================================
// DRAFT
// =============================================================================

/// Free-text draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    InitialPrompt,
    Scene,
    Character,
    Dialogue,
}

/// Multi-select draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceField {
    Camera,
    Lighting,
    Style,
    SoundEffects,
    BackgroundMusic,
    NegativePrompt,
    OverallTransitionStyle,
    TransitionRhythm,
}

/// The in-progress form state.
///
/// Keys follow the form's camelCase naming so drafts saved by the browser
/// front end load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Draft {
    pub initial_prompt: String,
    pub scene: String,
    pub character: String,
    pub camera: Choices,
    pub lighting: Choices,
    pub style: Choices,
    pub dialogue: String,
    pub sound_effects: Choices,
    pub background_music: Choices,
    pub reference_images: Vec<ReferenceMedia>,
    pub reference_videos: Vec<ReferenceMedia>,
    pub negative_prompt: Choices,
    pub action_steps: Vec<ActionStep>,
    pub overall_transition_style: Choices,
    pub transition_rhythm: Choices,
}

impl Draft {
    /// Creates the default scaffolding: every field empty, one blank step.
    pub fn new() -> Self {
        Self {
            initial_prompt: String::new(),
            scene: String::new(),
            character: String::new(),
            camera: Choices::new(),
            lighting: Choices::new(),
            style: Choices::new(),
            dialogue: String::new(),
            sound_effects: Choices::new(),
            background_music: Choices::new(),
            reference_images: Vec::new(),
            reference_videos: Vec::new(),
            negative_prompt: Choices::new(),
            action_steps: vec![ActionStep::new(1, "")],
            overall_transition_style: Choices::new(),
            transition_rhythm: Choices::new(),
        }
    }

    /// Parses a draft from JSON.
    pub fn from_json(json: &str) -> crate::PromptResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the draft to pretty JSON.
    pub fn to_json(&self) -> crate::PromptResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::InitialPrompt => &self.initial_prompt,
            TextField::Scene => &self.scene,
            TextField::Character => &self.character,
            TextField::Dialogue => &self.dialogue,
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::InitialPrompt => &mut self.initial_prompt,
            TextField::Scene => &mut self.scene,
            TextField::Character => &mut self.character,
            TextField::Dialogue => &mut self.dialogue,
        }
    }

    pub fn choices(&self, field: ChoiceField) -> &Choices {
        match field {
            ChoiceField::Camera => &self.camera,
            ChoiceField::Lighting => &self.lighting,
            ChoiceField::Style => &self.style,
            ChoiceField::SoundEffects => &self.sound_effects,
            ChoiceField::BackgroundMusic => &self.background_music,
            ChoiceField::NegativePrompt => &self.negative_prompt,
            ChoiceField::OverallTransitionStyle => &self.overall_transition_style,
            ChoiceField::TransitionRhythm => &self.transition_rhythm,
        }
    }

    pub fn choices_mut(&mut self, field: ChoiceField) -> &mut Choices {
        match field {
            ChoiceField::Camera => &mut self.camera,
            ChoiceField::Lighting => &mut self.lighting,
            ChoiceField::Style => &mut self.style,
            ChoiceField::SoundEffects => &mut self.sound_effects,
            ChoiceField::BackgroundMusic => &mut self.background_music,
            ChoiceField::NegativePrompt => &mut self.negative_prompt,
            ChoiceField::OverallTransitionStyle => &mut self.overall_transition_style,
            ChoiceField::TransitionRhythm => &mut self.transition_rhythm,
        }
    }

    /// Returns the reference collection for a media kind.
    pub fn references(&self, kind: MediaKind) -> &Vec<ReferenceMedia> {
        match kind {
            MediaKind::Image => &self.reference_images,
            MediaKind::Video => &self.reference_videos,
        }
    }

    pub fn references_mut(&mut self, kind: MediaKind) -> &mut Vec<ReferenceMedia> {
        match kind {
            MediaKind::Image => &mut self.reference_images,
            MediaKind::Video => &mut self.reference_videos,
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// DRAFT PATCH
// =============================================================================

/// A partial draft produced by suggestions and templates.
///
/// Text values only apply when non-empty. Sequence values apply whenever
/// present, including empty ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Choices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<Choices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Choices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_effects: Option<Choices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_music: Option<Choices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<Choices>,
}

impl DraftPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the patch's values into a draft.
    pub fn apply_to(&self, draft: &mut Draft) {
        fn apply_text(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                if !v.is_empty() {
                    *target = v.clone();
                }
            }
        }
        fn apply_choices(target: &mut Choices, value: &Option<Choices>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        apply_text(&mut draft.scene, &self.scene);
        apply_text(&mut draft.character, &self.character);
        apply_text(&mut draft.dialogue, &self.dialogue);
        apply_choices(&mut draft.camera, &self.camera);
        apply_choices(&mut draft.lighting, &self.lighting);
        apply_choices(&mut draft.style, &self.style);
        apply_choices(&mut draft.sound_effects, &self.sound_effects);
        apply_choices(&mut draft.background_music, &self.background_music);
        apply_choices(&mut draft.negative_prompt, &self.negative_prompt);
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Audio section of the output document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Audio {
    pub dialogue: String,
    pub sound_effects: String,
    pub background_music: String,
}

/// Reference media that survived filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Visuals {
    pub reference_images: Vec<ReferenceMedia>,
    pub reference_videos: Vec<ReferenceMedia>,
}

/// Transition settings, only present when at least one is non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Transitions {
    pub between_scenes: String,
    pub overall_rhythm: String,
}

/// The canonical output document handed to the video generation service.
///
/// Field order here is the key order of the structured output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Document {
    pub scene: String,
    pub character: String,
    pub camera: String,
    pub lighting: String,
    pub style: String,
    pub audio: Audio,
    pub visuals: Visuals,
    pub negative_prompt: String,
    pub action_sequence: Vec<ActionStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Transitions>,
}
