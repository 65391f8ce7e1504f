use crate::color::TopicColors;
use crate::data::model::{ProblemCollection, TimeWindow};
use crate::data::query::{
    DifficultyFilter, QueryParameters, QueryResult, QuerySummary, SortDirection, SortKey, run_query,
};
use crate::data::worker::{LoadCompletion, LoadTicket};

// ---------------------------------------------------------------------------
// Load state machine
// ---------------------------------------------------------------------------

/// `Idle → Loading → {Loaded | Error}`; any new selection re-enters `Loading`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        window: TimeWindow,
        seq: u64,
    },
    Loaded(ProblemCollection),
    Error(String),
}

/// What the rendering layer should show right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Idle,
    Loading { window: &'a TimeWindow },
    Error { message: &'a str },
    NoResults { collection: &'a ProblemCollection },
    Results {
        collection: &'a ProblemCollection,
        result: &'a QueryResult,
    },
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    params: QueryParameters,
    load: LoadState,

    /// Query output for the loaded collection (cached).
    visible: QueryResult,

    /// Topic chip colours for the loaded collection.
    pub topic_colors: TopicColors,

    /// Sequence number of the most recently issued fetch.
    latest_seq: u64,
}

impl AppState {
    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn visible(&self) -> &QueryResult {
        &self.visible
    }

    pub fn collection(&self) -> Option<&ProblemCollection> {
        match &self.load {
            LoadState::Loaded(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }

    pub fn summary(&self) -> Option<QuerySummary> {
        self.collection().map(|c| self.visible.summary(c))
    }

    pub fn view(&self) -> View<'_> {
        match &self.load {
            LoadState::Idle => View::Idle,
            LoadState::Loading { window, .. } => View::Loading { window },
            LoadState::Error(message) => View::Error { message },
            LoadState::Loaded(collection) if self.visible.is_empty() => {
                View::NoResults { collection }
            }
            LoadState::Loaded(collection) => View::Results {
                collection,
                result: &self.visible,
            },
        }
    }

    // -- Window selection and loading --

    /// Select a time window. Returns a ticket when a fetch must be issued;
    /// `None` when that window is already loading or loaded.
    pub fn select_window(&mut self, window: TimeWindow) -> Option<LoadTicket> {
        let redundant = match &self.load {
            LoadState::Loading { window: w, .. } => *w == window,
            LoadState::Loaded(c) => *c.window() == window,
            LoadState::Idle | LoadState::Error(_) => false,
        };
        self.params.time_window = window;
        if redundant {
            log::debug!("Window {} already current, no fetch", self.params.time_window);
            return None;
        }
        Some(self.begin_load())
    }

    /// Fetch the current window again regardless of state.
    pub fn reload(&mut self) -> LoadTicket {
        self.begin_load()
    }

    fn begin_load(&mut self) -> LoadTicket {
        self.latest_seq += 1;
        let window = self.params.time_window.clone();
        self.load = LoadState::Loading {
            window: window.clone(),
            seq: self.latest_seq,
        };
        self.visible = QueryResult::default();
        LoadTicket {
            seq: self.latest_seq,
            window,
        }
    }

    /// Apply a finished fetch. Only the completion for the most recently
    /// issued ticket is committed; older ones are dropped. Returns whether
    /// the completion was committed.
    pub fn complete_load(&mut self, completion: LoadCompletion) -> bool {
        let LoadCompletion { seq, window, result } = completion;
        if seq != self.latest_seq {
            log::debug!(
                "Discarding stale load #{seq} for window {window} (latest #{})",
                self.latest_seq
            );
            return false;
        }

        match result {
            Ok(collection) => {
                log::info!("Loaded {} problems for window {window}", collection.len());
                self.topic_colors = TopicColors::new(&collection);
                self.visible = run_query(&collection, &self.params);
                self.load = LoadState::Loaded(collection);
            }
            Err(e) => {
                log::error!("Load for window {} failed: {e:#}", e.window());
                self.topic_colors = TopicColors::default();
                self.visible = QueryResult::default();
                self.load = LoadState::Error(e.to_string());
            }
        }
        true
    }

    // -- Query parameters --

    /// Recompute `visible` after a parameter change. Never fetches.
    pub fn requery(&mut self) {
        if let LoadState::Loaded(collection) = &self.load {
            self.visible = run_query(collection, &self.params);
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.params.search_text {
            self.params.search_text = text;
            self.requery();
        }
    }

    pub fn set_difficulty_filter(&mut self, filter: DifficultyFilter) {
        if filter != self.params.difficulty_filter {
            self.params.difficulty_filter = filter;
            self.requery();
        }
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        if key != self.params.sort_key {
            self.params.sort_key = key;
            self.requery();
        }
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        if direction != self.params.sort_direction {
            self.params.sort_direction = direction;
            self.requery();
        }
    }

    pub fn toggle_sort_direction(&mut self) {
        self.set_sort_direction(self.params.sort_direction.reversed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::LoadError;
    use crate::data::model::{Difficulty, ProblemRecord};
    use assert_matches::assert_matches;

    fn record(title: &str, difficulty: &str, frequency: f64) -> ProblemRecord {
        ProblemRecord {
            title: title.into(),
            difficulty: difficulty.into(),
            frequency,
            ..Default::default()
        }
    }

    fn loaded(ticket: &LoadTicket, problems: Vec<ProblemRecord>) -> LoadCompletion {
        LoadCompletion {
            seq: ticket.seq,
            window: ticket.window.clone(),
            result: Ok(ProblemCollection::new(ticket.window.clone(), problems)),
        }
    }

    #[test]
    fn first_selection_leaves_idle() {
        let mut state = AppState::default();
        assert_matches!(state.view(), View::Idle);

        let ticket = state.select_window(TimeWindow::Days30).expect("fetch");
        assert_eq!(ticket.seq, 1);
        assert_matches!(state.view(), View::Loading { window: TimeWindow::Days30 });

        assert!(state.complete_load(loaded(&ticket, vec![record("Two Sum", "EASY", 80.0)])));
        assert_matches!(state.view(), View::Results { .. });
        assert_eq!(state.visible().len(), 1);
    }

    #[test]
    fn same_window_does_not_refetch() {
        let mut state = AppState::default();
        let ticket = state.select_window(TimeWindow::Days90).expect("fetch");
        assert!(state.select_window(TimeWindow::Days90).is_none());

        state.complete_load(loaded(&ticket, vec![]));
        assert!(state.select_window(TimeWindow::Days90).is_none());
        assert!(state.select_window(TimeWindow::Days30).is_some());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut state = AppState::default();
        let a = state.select_window(TimeWindow::Days30).expect("fetch A");
        let b = state.select_window(TimeWindow::Days180).expect("fetch B");

        assert!(state.complete_load(loaded(&b, vec![record("B", "HARD", 1.0)])));
        assert!(!state.complete_load(loaded(&a, vec![record("A", "EASY", 1.0)])));

        let collection = state.collection().expect("loaded");
        assert_eq!(collection.window(), &TimeWindow::Days180);
        assert_eq!(collection.problems()[0].title, "B");
    }

    #[test]
    fn error_replaces_previous_collection_until_reselected() {
        let mut state = AppState::default();
        let first = state.select_window(TimeWindow::Days30).expect("fetch");
        let two_sum = ProblemRecord {
            topics: "Array, Hash Table".into(),
            ..record("Two Sum", "EASY", 80.0)
        };
        state.complete_load(loaded(&first, vec![two_sum]));
        assert_eq!(state.topic_colors.len(), 2);

        let failing = state.select_window(TimeWindow::Days90).expect("fetch");
        state.complete_load(LoadCompletion {
            seq: failing.seq,
            window: failing.window.clone(),
            result: Err(LoadError::Unreadable {
                window: failing.window.clone(),
                source: anyhow::anyhow!("disk on fire"),
            }),
        });

        assert_matches!(
            state.view(),
            View::Error { message } if message == "Failed to load 90 data: disk on fire"
        );
        assert!(state.collection().is_none());
        assert!(state.topic_colors.is_empty());

        // Re-selecting the failed window retries.
        let retry = state.select_window(TimeWindow::Days90).expect("retry");
        assert_eq!(retry.seq, failing.seq + 1);
    }

    #[test]
    fn parameter_changes_requery_without_fetching() {
        let mut state = AppState::default();
        let ticket = state.select_window(TimeWindow::Days30).expect("fetch");
        state.complete_load(loaded(
            &ticket,
            vec![record("Two Sum", "EASY", 80.0), record("Merge Intervals", "MEDIUM", 55.0)],
        ));

        state.set_difficulty_filter(DifficultyFilter::Only(Difficulty::Hard));
        assert_matches!(state.view(), View::NoResults { .. });
        assert_matches!(state.load_state(), LoadState::Loaded(_));

        state.set_difficulty_filter(DifficultyFilter::All);
        state.set_sort_key(SortKey::Title);
        state.toggle_sort_direction();
        assert_eq!(state.params().sort_direction, SortDirection::Ascending);

        let collection = state.collection().unwrap();
        let titles: Vec<_> = state
            .visible()
            .records(collection)
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Merge Intervals", "Two Sum"]);
    }

    #[test]
    fn parameters_set_while_loading_apply_on_commit() {
        let mut state = AppState::default();
        let ticket = state.select_window(TimeWindow::Days30).expect("fetch");
        state.set_search_text("merge");
        assert!(state.visible().is_empty());

        state.complete_load(loaded(
            &ticket,
            vec![record("Two Sum", "EASY", 80.0), record("Merge Intervals", "MEDIUM", 55.0)],
        ));
        let summary = state.summary().expect("summary");
        assert_eq!(summary.shown, 1);
        assert_eq!(summary.total, 2);
    }
}
