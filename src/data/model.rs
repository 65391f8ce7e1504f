use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Problem difficulty. Stored upper-case in the snapshots, compared
/// case-insensitively everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Canonical storage spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    /// Title-case label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Case-insensitive lookup; unknown spellings yield `None`.
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
    }

    /// Whether a raw stored difficulty string names this level.
    pub fn matches(&self, raw: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(raw)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Time windows and snapshots
// ---------------------------------------------------------------------------

/// The physical snapshots shipped with the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Snapshot {
    ThirtyDays,
    ThreeMonths,
    SixMonths,
}

impl Snapshot {
    pub const ALL: [Snapshot; 3] = [
        Snapshot::ThirtyDays,
        Snapshot::ThreeMonths,
        Snapshot::SixMonths,
    ];

    /// File name without extension, e.g. `30days` → `30days.json`.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Snapshot::ThirtyDays => "30days",
            Snapshot::ThreeMonths => "3months",
            Snapshot::SixMonths => "6months",
        }
    }
}

/// Lookback window requested by the user.
///
/// Parsing never fails: anything other than `30`, `90` or `180` is kept
/// verbatim as [`TimeWindow::Other`] and served from the largest snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    #[default]
    Days30,
    Days90,
    Days180,
    Other(String),
}

impl TimeWindow {
    /// Windows offered by the selector, in display order.
    pub const SELECTABLE: [TimeWindow; 3] =
        [TimeWindow::Days30, TimeWindow::Days90, TimeWindow::Days180];

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "30" => TimeWindow::Days30,
            "90" => TimeWindow::Days90,
            "180" => TimeWindow::Days180,
            other => TimeWindow::Other(other.to_string()),
        }
    }

    /// The identifier as requested (`"30"`, `"9999"`, ...).
    pub fn id(&self) -> &str {
        match self {
            TimeWindow::Days30 => "30",
            TimeWindow::Days90 => "90",
            TimeWindow::Days180 => "180",
            TimeWindow::Other(raw) => raw,
        }
    }

    /// Snapshot that serves this window. Unrecognised windows fall back to
    /// the six-month snapshot.
    pub fn snapshot(&self) -> Snapshot {
        match self {
            TimeWindow::Days30 => Snapshot::ThirtyDays,
            TimeWindow::Days90 => Snapshot::ThreeMonths,
            TimeWindow::Days180 | TimeWindow::Other(_) => Snapshot::SixMonths,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Days30 => "30 Days",
            TimeWindow::Days90 => "3 Months",
            TimeWindow::Days180 => "6 Months",
            TimeWindow::Other(_) => "All Problems",
        }
    }
}

impl From<&str> for TimeWindow {
    fn from(raw: &str) -> Self {
        TimeWindow::parse(raw)
    }
}

impl From<u32> for TimeWindow {
    fn from(days: u32) -> Self {
        TimeWindow::parse(&days.to_string())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// ProblemRecord – one row of a snapshot
// ---------------------------------------------------------------------------

/// A single practice problem as stored in a snapshot.
///
/// Snapshots are trusted but not schema-validated: a missing or `null`
/// field deserializes to an empty string (text) or `0.0` (numbers), and
/// numeric fields also accept numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    #[serde(rename = "Title", default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(rename = "Difficulty", default, deserialize_with = "lenient_text")]
    pub difficulty: String,
    #[serde(rename = "Frequency", default, deserialize_with = "lenient_number")]
    pub frequency: f64,
    /// Fraction in `[0, 1]`.
    #[serde(rename = "Acceptance Rate", default, deserialize_with = "lenient_number")]
    pub acceptance_rate: f64,
    /// Comma-and-space delimited tags, e.g. `"Array, Hash Table"`.
    #[serde(rename = "Topics", default, deserialize_with = "lenient_text")]
    pub topics: String,
    #[serde(rename = "Link", default, deserialize_with = "lenient_text")]
    pub link: String,
}

impl ProblemRecord {
    /// Topic tags in stored order. An empty `topics` string has no tags.
    pub fn topic_list(&self) -> Vec<&str> {
        if self.topics.is_empty() {
            return Vec::new();
        }
        self.topics.split(", ").collect()
    }

    pub fn difficulty_level(&self) -> Option<Difficulty> {
        Difficulty::from_label(&self.difficulty)
    }

    /// Acceptance rate as a percentage with one decimal, e.g. `"49.0%"`.
    pub fn acceptance_percent(&self) -> String {
        format!("{:.1}%", self.acceptance_rate * 100.0)
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
            d.deserialize_any(TextVisitor)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number, numeric string or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(v.trim().parse().unwrap_or(0.0))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<f64, D::Error> {
            d.deserialize_any(NumberVisitor)
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

// ---------------------------------------------------------------------------
// ProblemCollection – one loaded snapshot
// ---------------------------------------------------------------------------

/// The records of one snapshot, tagged with the window that requested it.
/// Never mutated after construction; a new window replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemCollection {
    window: TimeWindow,
    problems: Vec<ProblemRecord>,
}

impl ProblemCollection {
    pub fn new(window: TimeWindow, problems: Vec<ProblemRecord>) -> Self {
        ProblemCollection { window, problems }
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn problems(&self) -> &[ProblemRecord] {
        &self.problems
    }

    /// Number of problems.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProblemRecord> {
        self.problems.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_window_falls_back_to_six_months() {
        let w = TimeWindow::parse("9999");
        assert_eq!(w, TimeWindow::Other("9999".into()));
        assert_eq!(w.snapshot(), Snapshot::SixMonths);
        assert_eq!(w.to_string(), "9999");
        assert_eq!(w.label(), "All Problems");
    }

    #[test]
    fn known_windows_map_to_their_snapshot() {
        assert_eq!(TimeWindow::from(30).snapshot(), Snapshot::ThirtyDays);
        assert_eq!(TimeWindow::from("90").snapshot(), Snapshot::ThreeMonths);
        assert_eq!(TimeWindow::parse(" 180 ").snapshot(), Snapshot::SixMonths);
        assert_eq!(Snapshot::ThreeMonths.file_stem(), "3months");
    }

    #[test]
    fn difficulty_is_case_insensitive() {
        assert_eq!(Difficulty::from_label("medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("Extreme"), None);
        assert!(Difficulty::Easy.matches("Easy"));
        assert!(!Difficulty::Easy.matches("EASY "));
    }

    #[test]
    fn record_uses_external_field_names() {
        let json = r#"{
            "Title": "Two Sum",
            "Difficulty": "EASY",
            "Frequency": 80,
            "Acceptance Rate": 0.49,
            "Topics": "Array, Hash Table",
            "Link": "https://leetcode.com/problems/two-sum"
        }"#;
        let rec: ProblemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.title, "Two Sum");
        assert_eq!(rec.frequency, 80.0);
        assert_eq!(rec.topic_list(), vec!["Array", "Hash Table"]);
        assert_eq!(rec.acceptance_percent(), "49.0%");
        assert_eq!(rec.difficulty_level(), Some(Difficulty::Easy));
    }

    #[test]
    fn missing_and_null_fields_become_defaults() {
        let rec: ProblemRecord =
            serde_json::from_str(r#"{ "Title": null, "Frequency": "12.5" }"#).unwrap();
        assert_eq!(rec.title, "");
        assert_eq!(rec.difficulty, "");
        assert_eq!(rec.topics, "");
        assert_eq!(rec.frequency, 12.5);
        assert_eq!(rec.acceptance_rate, 0.0);
        assert!(rec.topic_list().is_empty());
    }
}
