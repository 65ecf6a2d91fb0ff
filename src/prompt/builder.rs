//! Draft -> Document transformation.
//!
//! `build` is pure and total: it never fails and never touches the draft.
//! Multi-select fields are flattened with `", "`, reference media without a
//! URL and action steps without a description are dropped, and the
//! `transitions` section only appears when it has content.

use super::model::{Audio, Document, Draft, Transitions, Visuals};

/// Builds the canonical output document for a draft.
pub fn build(draft: &Draft) -> Document {
    let between_scenes = draft.overall_transition_style.flatten();
    let overall_rhythm = draft.transition_rhythm.flatten();
    let transitions = if between_scenes.is_empty() && overall_rhythm.is_empty() {
        None
    } else {
        Some(Transitions {
            between_scenes,
            overall_rhythm,
        })
    };

    Document {
        scene: draft.scene.clone(),
        character: draft.character.clone(),
        camera: draft.camera.flatten(),
        lighting: draft.lighting.flatten(),
        style: draft.style.flatten(),
        audio: Audio {
            dialogue: draft.dialogue.clone(),
            sound_effects: draft.sound_effects.flatten(),
            background_music: draft.background_music.flatten(),
        },
        visuals: Visuals {
            reference_images: draft
                .reference_images
                .iter()
                .filter(|m| m.has_url())
                .cloned()
                .collect(),
            reference_videos: draft
                .reference_videos
                .iter()
                .filter(|m| m.has_url())
                .cloned()
                .collect(),
        },
        negative_prompt: draft.negative_prompt.flatten(),
        // Step numbers are kept as-is, gaps included.
        action_sequence: draft
            .action_steps
            .iter()
            .filter(|s| s.has_description())
            .cloned()
            .collect(),
        transitions,
    }
}

impl Draft {
    /// Builds the output document for this draft. See [`build`].
    pub fn to_document(&self) -> Document {
        build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::model::{ActionStep, Choices, ReferenceMedia};

    #[test]
    fn test_minimal_draft() {
        let mut draft = Draft::new();
        draft.scene = "A quiet street at dawn".to_string();

        let doc = build(&draft);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "scene": "A quiet street at dawn",
                "character": "",
                "camera": "",
                "lighting": "",
                "style": "",
                "audio": {"dialogue": "", "sound_effects": "", "background_music": ""},
                "visuals": {"reference_images": [], "reference_videos": []},
                "negative_prompt": "",
                "action_sequence": []
            })
        );
    }

    #[test]
    fn test_camera_flattened_and_blank_step_dropped() {
        let mut draft = Draft::new();
        draft.scene = "A".to_string();
        draft.camera = Choices::from(["x", "y"]);

        let doc = build(&draft);
        assert_eq!(doc.camera, "x, y");
        assert!(doc.action_sequence.is_empty());
    }

    #[test]
    fn test_scalar_and_sequence_inputs_flatten_alike() {
        let mut from_seq = Draft::new();
        from_seq.lighting = Choices::from(["soft", "warm"]);
        from_seq.sound_effects = Choices::from(["rain"]);

        let from_scalar = Draft::from_json(
            r#"{"lighting": "soft, warm", "soundEffects": "rain"}"#,
        )
        .unwrap();

        let a = build(&from_seq);
        let b = build(&from_scalar);
        assert_eq!(a.lighting, b.lighting);
        assert_eq!(a.audio.sound_effects, b.audio.sound_effects);
    }

    #[test]
    fn test_blank_urls_filtered() {
        let mut draft = Draft::new();
        draft.reference_images = vec![
            ReferenceMedia::new("https://img/1.png", "first"),
            ReferenceMedia::new("   ", "whitespace"),
            ReferenceMedia::new("", "empty"),
        ];
        draft.reference_videos = vec![ReferenceMedia::new("\t", "tab")];

        let doc = build(&draft);
        assert_eq!(doc.visuals.reference_images.len(), 1);
        assert_eq!(doc.visuals.reference_images[0].description, "first");
        assert!(doc.visuals.reference_videos.is_empty());
        // Draft untouched
        assert_eq!(draft.reference_images.len(), 3);
    }

    #[test]
    fn test_surviving_steps_keep_original_numbers() {
        let mut draft = Draft::new();
        draft.action_steps = vec![
            ActionStep::new(1, "opens door"),
            ActionStep::new(2, "  "),
            ActionStep::new(3, "walks out").with_transition("fade"),
        ];

        let doc = build(&draft);
        let steps: Vec<u32> = doc.action_sequence.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 3]);
        assert_eq!(doc.action_sequence[1].transition.as_deref(), Some("fade"));
    }

    #[test]
    fn test_transitions_absent_when_empty() {
        let draft = Draft::new();
        let doc = build(&draft);
        assert!(doc.transitions.is_none());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("transitions").is_none());
    }

    #[test]
    fn test_transitions_present_when_one_side_set() {
        let mut draft = Draft::new();
        draft.transition_rhythm = Choices::from(["fast-paced"]);

        let doc = build(&draft);
        let transitions = doc.transitions.unwrap();
        assert_eq!(transitions.between_scenes, "");
        assert_eq!(transitions.overall_rhythm, "fast-paced");
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut draft = Draft::new();
        draft.style = Choices::from(["noir"]);
        draft.action_steps.push(ActionStep::new(2, "runs"));
        assert_eq!(build(&draft), build(&draft));
        assert_eq!(draft.to_document(), build(&draft));
    }
}
