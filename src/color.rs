use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Difficulty, ProblemCollection};

// ---------------------------------------------------------------------------
// Difficulty badges
// ---------------------------------------------------------------------------

pub const EASY_COLOR: Color32 = Color32::from_rgb(74, 222, 128);
pub const MEDIUM_COLOR: Color32 = Color32::from_rgb(250, 204, 21);
pub const HARD_COLOR: Color32 = Color32::from_rgb(248, 113, 113);
pub const UNKNOWN_COLOR: Color32 = Color32::from_rgb(156, 163, 175);

/// Badge colour for a stored difficulty string. Unrecognised values are grey.
pub fn difficulty_color(raw: &str) -> Color32 {
    match Difficulty::from_label(raw) {
        Some(Difficulty::Easy) => EASY_COLOR,
        Some(Difficulty::Medium) => MEDIUM_COLOR,
        Some(Difficulty::Hard) => HARD_COLOR,
        None => UNKNOWN_COLOR,
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.70);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Topic chips: topic name → Color32
// ---------------------------------------------------------------------------

/// Maps every topic of a collection to a distinct colour.
#[derive(Debug, Clone, Default)]
pub struct TopicColors {
    mapping: BTreeMap<String, Color32>,
}

impl TopicColors {
    /// Build the map from the topics present in `collection`.
    pub fn new(collection: &ProblemCollection) -> Self {
        let topics: BTreeSet<&str> = collection
            .iter()
            .flat_map(|p| p.topic_list())
            .collect();
        let palette = generate_palette(topics.len());
        let mapping = topics
            .into_iter()
            .zip(palette)
            .map(|(t, c)| (t.to_string(), c))
            .collect();

        TopicColors { mapping }
    }

    /// Colour for a topic; unknown topics are grey.
    pub fn color_for(&self, topic: &str) -> Color32 {
        self.mapping.get(topic).copied().unwrap_or(UNKNOWN_COLOR)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
