use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::model::{Difficulty, ProblemCollection, ProblemRecord, TimeWindow};

// ---------------------------------------------------------------------------
// Query parameters: the explicit view state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub const CHOICES: [DifficultyFilter; 4] = [
        DifficultyFilter::All,
        DifficultyFilter::Only(Difficulty::Easy),
        DifficultyFilter::Only(Difficulty::Medium),
        DifficultyFilter::Only(Difficulty::Hard),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyFilter::All => "All Difficulties",
            DifficultyFilter::Only(d) => d.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Frequency,
    Acceptance,
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Frequency, SortKey::Acceptance, SortKey::Title];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Frequency => "Frequency",
            SortKey::Acceptance => "Acceptance Rate",
            SortKey::Title => "Title",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow glyph for the toggle button.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Everything the user controls about the visible list.
///
/// `time_window` selects which collection is loaded; the remaining fields
/// are applied to that collection by [`run_query`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    pub time_window: TimeWindow,
    pub search_text: String,
    pub difficulty_filter: DifficultyFilter,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Case-insensitive substring match on title or the raw topics string.
/// `needle` must already be lower-cased; an empty needle matches everything.
fn search_matches(problem: &ProblemRecord, needle: &str) -> bool {
    needle.is_empty()
        || problem.title.to_lowercase().contains(needle)
        || problem.topics.to_lowercase().contains(needle)
}

fn difficulty_matches(problem: &ProblemRecord, filter: DifficultyFilter) -> bool {
    match filter {
        DifficultyFilter::All => true,
        DifficultyFilter::Only(d) => d.matches(&problem.difficulty),
    }
}

/// Natural (ascending) order of two records under `key`.
fn compare_by_key(a: &ProblemRecord, b: &ProblemRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Frequency => a.frequency.total_cmp(&b.frequency),
        SortKey::Acceptance => a.acceptance_rate.total_cmp(&b.acceptance_rate),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

// ---------------------------------------------------------------------------
// Query result
// ---------------------------------------------------------------------------

/// Ordered indices into the queried collection, plus its size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub indices: Vec<usize>,
    /// Size of the whole collection, for "N of M" summaries.
    pub total: usize,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// A valid query with zero matches. Not an error.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the indices against the collection they were computed from.
    pub fn records<'a>(
        &'a self,
        collection: &'a ProblemCollection,
    ) -> impl Iterator<Item = &'a ProblemRecord> + 'a {
        let problems = collection.problems();
        self.indices.iter().filter_map(move |&i| problems.get(i))
    }

    pub fn summary(&self, collection: &ProblemCollection) -> QuerySummary {
        let mut by_difficulty = BTreeMap::new();
        for problem in self.records(collection) {
            if let Some(d) = problem.difficulty_level() {
                *by_difficulty.entry(d).or_insert(0) += 1;
            }
        }
        QuerySummary {
            shown: self.len(),
            total: self.total,
            by_difficulty,
        }
    }
}

/// Counts shown alongside the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySummary {
    pub shown: usize,
    pub total: usize,
    /// Shown records per recognised difficulty; unknown spellings are not counted.
    pub by_difficulty: BTreeMap<Difficulty, usize>,
}

impl QuerySummary {
    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.by_difficulty.get(&difficulty).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Compute the visible ordering of `collection` under `params`.
///
/// Stages run in a fixed order: search, difficulty, sort. The sort is
/// stable and the direction only reverses the key comparison, so records
/// with equal keys keep their collection order in both directions.
/// Missing text fields are empty strings and simply fail to match a
/// non-empty search.
pub fn run_query(collection: &ProblemCollection, params: &QueryParameters) -> QueryResult {
    let needle = params.search_text.to_lowercase();
    let problems = collection.problems();

    let mut indices: Vec<usize> = problems
        .iter()
        .enumerate()
        .filter(|(_, p)| search_matches(p, &needle))
        .filter(|(_, p)| difficulty_matches(p, params.difficulty_filter))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| {
        let ord = compare_by_key(&problems[a], &problems[b], params.sort_key);
        match params.sort_direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    QueryResult {
        indices,
        total: problems.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(
        title: &str,
        difficulty: &str,
        frequency: f64,
        acceptance: f64,
        topics: &str,
    ) -> ProblemRecord {
        ProblemRecord {
            title: title.into(),
            difficulty: difficulty.into(),
            frequency,
            acceptance_rate: acceptance,
            topics: topics.into(),
            link: String::new(),
        }
    }

    fn collection() -> ProblemCollection {
        ProblemCollection::new(
            TimeWindow::Days30,
            vec![
                problem("Two Sum", "EASY", 80.0, 0.49, "Array, Hash Table"),
                problem("Merge Intervals", "MEDIUM", 55.0, 0.46, "Array, Sorting"),
                problem("Trapping Rain Water", "HARD", 55.0, 0.61, "Array, Two Pointers, Stack"),
                problem("valid anagram", "easy", 30.0, 0.63, "Hash Table, String, Sorting"),
            ],
        )
    }

    fn titles(c: &ProblemCollection, r: &QueryResult) -> Vec<String> {
        r.records(c).map(|p| p.title.clone()).collect()
    }

    #[test]
    fn default_params_sort_by_frequency_descending() {
        let c = collection();
        let r = run_query(&c, &QueryParameters::default());
        assert_eq!(r.len(), 4);
        assert_eq!(r.total, 4);
        // Merge Intervals and Trapping Rain Water tie at 55: collection order kept.
        assert_eq!(
            titles(&c, &r),
            vec!["Two Sum", "Merge Intervals", "Trapping Rain Water", "valid anagram"]
        );
    }

    #[test]
    fn ties_keep_collection_order_when_ascending() {
        let c = collection();
        let params = QueryParameters {
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        assert_eq!(
            titles(&c, &run_query(&c, &params)),
            vec!["valid anagram", "Merge Intervals", "Trapping Rain Water", "Two Sum"]
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_topics() {
        let c = collection();
        let params = QueryParameters {
            search_text: "HASH".into(),
            ..Default::default()
        };
        assert_eq!(titles(&c, &run_query(&c, &params)), vec!["Two Sum", "valid anagram"]);

        let params = QueryParameters {
            search_text: "rain".into(),
            ..Default::default()
        };
        assert_eq!(titles(&c, &run_query(&c, &params)), vec!["Trapping Rain Water"]);
    }

    #[test]
    fn difficulty_filter_ignores_case() {
        let c = collection();
        let params = QueryParameters {
            difficulty_filter: DifficultyFilter::Only(Difficulty::Easy),
            ..Default::default()
        };
        assert_eq!(titles(&c, &run_query(&c, &params)), vec!["Two Sum", "valid anagram"]);
    }

    #[test]
    fn search_applies_before_difficulty() {
        let c = collection();
        let params = QueryParameters {
            search_text: "sorting".into(),
            difficulty_filter: DifficultyFilter::Only(Difficulty::Medium),
            ..Default::default()
        };
        assert_eq!(titles(&c, &run_query(&c, &params)), vec!["Merge Intervals"]);
    }

    #[test]
    fn title_sort_is_case_insensitive() {
        let c = collection();
        let params = QueryParameters {
            sort_key: SortKey::Title,
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        assert_eq!(
            titles(&c, &run_query(&c, &params)),
            vec!["Merge Intervals", "Trapping Rain Water", "Two Sum", "valid anagram"]
        );
    }

    #[test]
    fn reversing_direction_reverses_distinct_keys() {
        let c = collection();
        let mut params = QueryParameters {
            sort_key: SortKey::Acceptance,
            ..Default::default()
        };
        let desc = titles(&c, &run_query(&c, &params));
        params.sort_direction = params.sort_direction.reversed();
        let mut asc = titles(&c, &run_query(&c, &params));
        asc.reverse();
        assert_eq!(desc, asc);
    }

    #[test]
    fn query_is_repeatable() {
        let c = collection();
        let params = QueryParameters {
            search_text: "array".into(),
            sort_key: SortKey::Frequency,
            ..Default::default()
        };
        assert_eq!(run_query(&c, &params), run_query(&c, &params));
    }

    #[test]
    fn records_missing_text_fields_do_not_break_the_pipeline() {
        let c = ProblemCollection::new(
            TimeWindow::Days30,
            vec![
                ProblemRecord::default(),
                problem("Two Sum", "EASY", 80.0, 0.49, "Array"),
            ],
        );
        let params = QueryParameters {
            search_text: "two".into(),
            sort_key: SortKey::Title,
            ..Default::default()
        };
        assert_eq!(titles(&c, &run_query(&c, &params)), vec!["Two Sum"]);

        let params = QueryParameters {
            difficulty_filter: DifficultyFilter::Only(Difficulty::Hard),
            ..Default::default()
        };
        assert!(run_query(&c, &params).is_empty());
    }

    #[test]
    fn summary_counts_shown_by_difficulty() {
        let c = collection();
        let params = QueryParameters {
            search_text: "array".into(),
            ..Default::default()
        };
        let summary = run_query(&c, &params).summary(&c);
        assert_eq!(summary.shown, 3);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(Difficulty::Easy), 1);
        assert_eq!(summary.count(Difficulty::Medium), 1);
        assert_eq!(summary.count(Difficulty::Hard), 1);
    }
}
