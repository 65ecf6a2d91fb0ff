//! Weighted completeness checklist for a draft.

use serde::Serialize;

use super::model::Draft;

struct ProgressItem {
    label: &'static str,
    weight: u32,
    is_complete: fn(&Draft) -> bool,
}

const PROGRESS_ITEMS: &[ProgressItem] = &[
    ProgressItem {
        label: "Initial Prompt",
        weight: 1,
        is_complete: |d| !d.initial_prompt.trim().is_empty(),
    },
    ProgressItem {
        label: "Scene Description",
        weight: 1,
        is_complete: |d| !d.scene.trim().is_empty(),
    },
    ProgressItem {
        label: "Character Description",
        weight: 1,
        is_complete: |d| !d.character.trim().is_empty(),
    },
    ProgressItem {
        label: "Camera Settings",
        weight: 1,
        is_complete: |d| !d.camera.is_empty(),
    },
    ProgressItem {
        label: "Lighting Setup",
        weight: 1,
        is_complete: |d| !d.lighting.is_empty(),
    },
    ProgressItem {
        label: "Visual Style",
        weight: 1,
        is_complete: |d| !d.style.is_empty(),
    },
    ProgressItem {
        label: "Action Sequence",
        weight: 2,
        is_complete: |d| d.action_steps.iter().any(|s| s.has_description()),
    },
    ProgressItem {
        label: "Reference Media",
        weight: 1,
        is_complete: |d| !d.reference_images.is_empty() || !d.reference_videos.is_empty(),
    },
];

/// One checklist line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProgressEntry {
    pub label: &'static str,
    pub complete: bool,
}

/// Completeness report for a draft.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FormProgress {
    /// Completed weight over total weight, rounded to a whole percent.
    pub percentage: u32,
    pub entries: Vec<ProgressEntry>,
}

impl FormProgress {
    pub fn evaluate(draft: &Draft) -> Self {
        let total: u32 = PROGRESS_ITEMS.iter().map(|i| i.weight).sum();
        let mut done = 0;
        let entries = PROGRESS_ITEMS
            .iter()
            .map(|item| {
                let complete = (item.is_complete)(draft);
                if complete {
                    done += item.weight;
                }
                ProgressEntry {
                    label: item.label,
                    complete,
                }
            })
            .collect();
        let percentage = (f64::from(done) / f64::from(total) * 100.0).round() as u32;
        Self {
            percentage,
            entries,
        }
    }

    /// Short status line for the percentage.
    pub fn status(&self) -> &'static str {
        match self.percentage {
            0..=29 => "Getting Started",
            30..=59 => "Good Progress",
            60..=89 => "Almost There",
            _ => "Ready to Generate!",
        }
    }

    pub fn is_ready(&self) -> bool {
        self.percentage >= 90
    }
}
