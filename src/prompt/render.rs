//! Output formats for a built document.
//!
//! Every format renders from the same `Document`, so one generate action
//! always yields consistent JSON, block-text and plain-text output.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::{ActionStep, Document, ReferenceMedia};
use crate::error::{PromptError, PromptResult};

// =============================================================================
// OUTPUT FORMAT
// =============================================================================

/// The three export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Structured key/value tree, 2-space indented JSON.
    Json,
    /// Line-oriented block-text markup (YAML literal blocks).
    Yaml,
    /// Human-readable report with uppercase section headers.
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Json, Self::Yaml, Self::Text];

    /// File extension used for downloads.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Text => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
            Self::Text => "text/plain",
        }
    }

    /// Default download file name, e.g. `video-prompt.json`.
    pub fn file_name(&self) -> String {
        format!("video-prompt.{}", self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "text" | "txt" => Ok(Self::Text),
            other => Err(PromptError::serialization(format!(
                "Unknown output format: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// DOCUMENT RENDERING
// =============================================================================

impl Document {
    /// Renders the document in one format.
    pub fn render(&self, format: OutputFormat) -> PromptResult<String> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Yaml => Ok(render_yaml(self)),
            OutputFormat::Text => Ok(render_text(self)),
        }
    }

    /// Parses a document from structured JSON output.
    pub fn from_json(json: &str) -> PromptResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a document from block-text output.
    pub fn from_yaml(yaml: &str) -> PromptResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a document in a machine-readable format. The text report is
    /// display-only and cannot be read back.
    pub fn parse(input: &str, format: OutputFormat) -> PromptResult<Self> {
        match format {
            OutputFormat::Json => Self::from_json(input),
            OutputFormat::Yaml => Self::from_yaml(input),
            OutputFormat::Text => Err(PromptError::serialization(
                "Text reports cannot be parsed back into a document",
            )),
        }
    }
}

/// All three renderings of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub json: String,
    pub yaml: String,
    pub text: String,
}

impl RenderedPrompt {
    pub fn from_document(document: &Document) -> PromptResult<Self> {
        Ok(Self {
            json: render_json(document)?,
            yaml: render_yaml(document),
            text: render_text(document),
        })
    }

    pub fn get(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Json => &self.json,
            OutputFormat::Yaml => &self.yaml,
            OutputFormat::Text => &self.text,
        }
    }
}

/// Structured output. serde_json's pretty printer indents with two spaces.
pub fn render_json(document: &Document) -> PromptResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

// =============================================================================
// BLOCK TEXT
// =============================================================================

/// True for characters a literal block cannot carry verbatim: carriage
/// returns, control characters, the extra YAML line breaks and the
/// non-characters U+FEFF, U+FFFE and U+FFFF.
fn breaks_literal_block(c: char) -> bool {
    match c {
        '\n' | '\t' => false,
        '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}' => true,
        c => c.is_control(),
    }
}

/// Double-quoted scalar with every non-printable character escaped.
fn quoted_scalar(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if breaks_literal_block(c) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Writes `key: |-` followed by the value as an indented literal block.
///
/// Chomping keeps the value exact: `|+` when it ends in a newline, `|-`
/// otherwise. An explicit indentation indicator is added when the first
/// non-empty line starts with a space. Values a literal block cannot hold
/// are written as one double-quoted scalar instead.
fn write_block(out: &mut String, indent: usize, key: &str, value: &str) {
    let pad = " ".repeat(indent);
    if value.chars().any(breaks_literal_block) {
        let _ = writeln!(out, "{pad}{key}: {}", quoted_scalar(value));
        return;
    }
    let leading_space = value
        .split('\n')
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with(' '));
    let indicator = if leading_space { "2" } else { "" };
    let (chomp, body) = match value.strip_suffix('\n') {
        Some(body) => ("+", body),
        None => ("-", value),
    };

    let _ = writeln!(out, "{pad}{key}: |{indicator}{chomp}");
    if value.is_empty() {
        return;
    }
    for line in body.split('\n') {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{pad}  {line}");
        }
    }
}

fn write_media_list(out: &mut String, indent: usize, key: &str, items: &[ReferenceMedia]) {
    let pad = " ".repeat(indent);
    let _ = writeln!(out, "{pad}{key}:");
    for item in items {
        // The first field shares the list marker line.
        let mut entry = String::new();
        write_block(&mut entry, indent + 4, "url", &item.url);
        write_block(&mut entry, indent + 4, "description", &item.description);
        out.push_str(&list_marker(&entry, indent + 2));
    }
}

fn write_step(out: &mut String, indent: usize, step: &ActionStep) {
    let mut entry = String::new();
    let field_pad = " ".repeat(indent + 2);
    let _ = writeln!(entry, "{field_pad}step: {}", step.step);
    write_block(&mut entry, indent + 2, "description", &step.description);
    if let Some(transition) = &step.transition {
        write_block(&mut entry, indent + 2, "transition", transition);
    }
    if let Some(duration) = &step.duration {
        write_block(&mut entry, indent + 2, "duration", duration);
    }
    out.push_str(&list_marker(&entry, indent));
}

/// Replaces the leading padding of an entry's first line with `- `.
fn list_marker(entry: &str, indent: usize) -> String {
    let prefix = format!("{}- ", " ".repeat(indent));
    match entry.get(indent + 2..) {
        Some(rest) => format!("{prefix}{rest}"),
        None => entry.to_string(),
    }
}

/// Block-text markup: every text field as a labeled literal block,
/// collections as list items with nested labeled blocks.
pub fn render_yaml(document: &Document) -> String {
    let mut out = String::new();

    write_block(&mut out, 0, "scene", &document.scene);
    write_block(&mut out, 0, "character", &document.character);
    write_block(&mut out, 0, "camera", &document.camera);
    write_block(&mut out, 0, "lighting", &document.lighting);
    write_block(&mut out, 0, "style", &document.style);

    out.push_str("audio:\n");
    write_block(&mut out, 2, "dialogue", &document.audio.dialogue);
    write_block(&mut out, 2, "sound_effects", &document.audio.sound_effects);
    write_block(&mut out, 2, "background_music", &document.audio.background_music);

    let visuals = &document.visuals;
    if !visuals.reference_images.is_empty() || !visuals.reference_videos.is_empty() {
        out.push_str("visuals:\n");
        if !visuals.reference_images.is_empty() {
            write_media_list(&mut out, 2, "reference_images", &visuals.reference_images);
        }
        if !visuals.reference_videos.is_empty() {
            write_media_list(&mut out, 2, "reference_videos", &visuals.reference_videos);
        }
    }

    write_block(&mut out, 0, "negative_prompt", &document.negative_prompt);

    if document.action_sequence.is_empty() {
        out.push_str("action_sequence: []\n");
    } else {
        out.push_str("action_sequence:\n");
        for step in &document.action_sequence {
            write_step(&mut out, 2, step);
        }
    }

    if let Some(transitions) = &document.transitions {
        out.push_str("transitions:\n");
        write_block(&mut out, 2, "between_scenes", &transitions.between_scenes);
        write_block(&mut out, 2, "overall_rhythm", &transitions.overall_rhythm);
    }

    out
}

// =============================================================================
// PLAIN TEXT
// =============================================================================

/// Human-readable report. Sections without content are left out.
pub fn render_text(document: &Document) -> String {
    let mut sections: Vec<String> = Vec::new();

    let mut scalar = |title: &str, value: &str| {
        if !value.trim().is_empty() {
            sections.push(format!("{title}:\n{value}"));
        }
    };
    scalar("SCENE", &document.scene);
    scalar("CHARACTER", &document.character);
    scalar("CAMERA", &document.camera);
    scalar("LIGHTING", &document.lighting);
    scalar("STYLE", &document.style);

    let audio = labeled_lines(&[
        ("Dialogue", &document.audio.dialogue),
        ("Sound Effects", &document.audio.sound_effects),
        ("Background Music", &document.audio.background_music),
    ]);
    if !audio.is_empty() {
        sections.push(format!("AUDIO:\n{audio}"));
    }

    for (title, items) in [
        ("REFERENCE IMAGES", &document.visuals.reference_images),
        ("REFERENCE VIDEOS", &document.visuals.reference_videos),
    ] {
        if items.is_empty() {
            continue;
        }
        let mut body = String::new();
        for (i, item) in items.iter().enumerate() {
            let _ = writeln!(body, "{}. {}", i + 1, item.url);
            if !item.description.trim().is_empty() {
                let _ = writeln!(body, "   Description: {}", item.description);
            }
        }
        sections.push(format!("{title}:\n{}", body.trim_end()));
    }

    if !document.negative_prompt.trim().is_empty() {
        sections.push(format!("NEGATIVE PROMPT:\n{}", document.negative_prompt));
    }

    if !document.action_sequence.is_empty() {
        let mut body = String::new();
        for (i, step) in document.action_sequence.iter().enumerate() {
            let _ = writeln!(body, "{}. {}", i + 1, step.description);
            if let Some(t) = step.transition.as_deref().filter(|t| !t.trim().is_empty()) {
                let _ = writeln!(body, "   Transition: {t}");
            }
            if let Some(d) = step.duration.as_deref().filter(|d| !d.trim().is_empty()) {
                let _ = writeln!(body, "   Duration: {d}");
            }
        }
        sections.push(format!("ACTION SEQUENCE:\n{}", body.trim_end()));
    }

    if let Some(transitions) = &document.transitions {
        let body = labeled_lines(&[
            ("Between Scenes", &transitions.between_scenes),
            ("Overall Rhythm", &transitions.overall_rhythm),
        ]);
        sections.push(format!("TRANSITIONS:\n{body}"));
    }

    if sections.is_empty() {
        return String::new();
    }
    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

fn labeled_lines(entries: &[(&str, &String)]) -> String {
    entries
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::model::{Choices, Draft, Transitions};

    fn sample_document() -> Document {
        let mut draft = Draft::new();
        draft.scene = "A quiet street at dawn".to_string();
        draft.character = "A courier on a bicycle".to_string();
        draft.camera = Choices::from(["wide shot", "slow dolly"]);
        draft.dialogue = "\"Morning.\"\nShe waves.".to_string();
        draft.background_music = Choices::from(["soft piano"]);
        draft.reference_images = vec![
            ReferenceMedia::new("https://img/1.png", "mood board"),
            ReferenceMedia::new("", "dropped"),
        ];
        draft.action_steps = vec![
            ActionStep::new(1, "Courier turns the corner")
                .with_transition("cut")
                .with_duration("3 seconds"),
            ActionStep::new(2, ""),
            ActionStep::new(3, "Stops at a door"),
        ];
        draft.transition_rhythm = Choices::from(["slow"]);
        draft.to_document()
    }

    #[test]
    fn test_format_extensions() {
        let exts: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.extension()).collect();
        assert_eq!(exts, vec!["json", "yaml", "txt"]);
        assert_eq!(OutputFormat::Text.file_name(), "video-prompt.txt");
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_uses_two_space_indent() {
        let json = render_json(&sample_document()).unwrap();
        assert!(json.starts_with("{\n  \"scene\": \"A quiet street at dawn\","));
        assert!(!json.contains("\"transitions\": null"));
    }

    #[test]
    fn test_json_parses_back() {
        let doc = sample_document();
        let json = render_json(&doc).unwrap();
        assert_eq!(Document::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_yaml_layout() {
        let yaml = render_yaml(&sample_document());
        let expected = "\
scene: |-
  A quiet street at dawn
character: |-
  A courier on a bicycle
camera: |-
  wide shot, slow dolly
lighting: |-
style: |-
audio:
  dialogue: |-
    \"Morning.\"
    She waves.
  sound_effects: |-
  background_music: |-
    soft piano
visuals:
  reference_images:
    - url: |-
        https://img/1.png
      description: |-
        mood board
negative_prompt: |-
action_sequence:
  - step: 1
    description: |-
      Courier turns the corner
    transition: |-
      cut
    duration: |-
      3 seconds
  - step: 3
    description: |-
      Stops at a door
transitions:
  between_scenes: |-
  overall_rhythm: |-
    slow
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_yaml_parses_back_to_same_document() {
        let doc = sample_document();
        let yaml = render_yaml(&doc);
        assert_eq!(Document::from_yaml(&yaml).unwrap(), doc);
    }

    #[test]
    fn test_yaml_preserves_awkward_text() {
        let mut doc = Document::default();
        doc.scene = "  indented first line\nsecond".to_string();
        doc.character = "ends with newline\n".to_string();
        doc.style = "key: value # not a comment".to_string();
        doc.transitions = Some(Transitions {
            between_scenes: "a\n\nb".to_string(),
            overall_rhythm: String::new(),
        });
        let parsed = Document::from_yaml(&render_yaml(&doc)).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_yaml_quotes_text_a_literal_block_cannot_hold() {
        let values = [
            "line one\r\nline two",
            "ding\u{7}",
            "a\u{85}b",
            "x\u{2028}y\u{2029}z",
            "esc\u{1b}[0m \"quoted\" back\\slash\ttab",
            "\u{feff}bom and \u{7f} delete",
        ];
        for value in values {
            let mut doc = Document::default();
            doc.scene = value.to_string();
            doc.audio.dialogue = format!("{value}\n");
            doc.action_sequence = vec![ActionStep::new(1, value).with_transition(value)];
            let yaml = render_yaml(&doc);
            assert!(yaml.starts_with("scene: \""), "{yaml}");
            let parsed = Document::from_yaml(&yaml).unwrap();
            assert_eq!(parsed, doc, "{value:?}");
        }
    }

    #[test]
    fn test_yaml_keeps_tabs_in_literal_blocks() {
        let mut doc = Document::default();
        doc.scene = "col\tcol\nnext".to_string();
        let yaml = render_yaml(&doc);
        assert!(yaml.starts_with("scene: |-\n"));
        assert_eq!(Document::from_yaml(&yaml).unwrap(), doc);
    }

    #[test]
    fn test_yaml_empty_document() {
        let yaml = render_yaml(&Document::default());
        assert!(yaml.contains("action_sequence: []\n"));
        assert!(!yaml.contains("visuals:"));
        assert!(!yaml.contains("transitions:"));
        assert_eq!(Document::from_yaml(&yaml).unwrap(), Document::default());
    }

    #[test]
    fn test_text_report() {
        let text = render_text(&sample_document());
        let expected = "\
SCENE:
A quiet street at dawn

CHARACTER:
A courier on a bicycle

CAMERA:
wide shot, slow dolly

AUDIO:
Dialogue: \"Morning.\"
She waves.
Background Music: soft piano

REFERENCE IMAGES:
1. https://img/1.png
   Description: mood board

ACTION SEQUENCE:
1. Courier turns the corner
   Transition: cut
   Duration: 3 seconds
2. Stops at a door

TRANSITIONS:
Overall Rhythm: slow
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_text_omits_empty_sections() {
        let text = render_text(&Document::default());
        assert_eq!(text, "");

        let doc = Document {
            negative_prompt: "blurry".to_string(),
            ..Document::default()
        };
        assert_eq!(render_text(&doc), "NEGATIVE PROMPT:\nblurry\n");
    }

    #[test]
    fn test_rendered_prompt_matches_individual_renders() {
        let doc = sample_document();
        let rendered = RenderedPrompt::from_document(&doc).unwrap();
        for format in OutputFormat::ALL {
            assert_eq!(rendered.get(format), doc.render(format).unwrap());
        }
    }

    #[test]
    fn test_text_cannot_be_parsed() {
        assert!(Document::parse("SCENE:\nx\n", OutputFormat::Text).is_err());
    }
}
