//! Browser state and the reducer that drives it.
//!
//! `BrowserState` is a plain value. Every UI event goes through [`reduce`],
//! which returns the next state; the filtered and grouped views are derived
//! from it on demand and never cached.

use crate::countries::{filter_countries, group_countries, Country, FilterMode, Group, GroupKey};
use crate::selection::{Selection, DEFAULT_SELECTION_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Knobs fixed for the lifetime of the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserOptions {
    pub filter_mode: FilterMode,
    pub default_selection_limit: usize,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Name,
            default_selection_limit: DEFAULT_SELECTION_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    SetSearch(String),
    SetGroup(GroupKey),
    CycleGroup,
    CycleGroupBack,
    /// Toggle the given code (a click on its row)
    Select(String),
    LoadStarted,
    Loaded(Vec<Country>),
    LoadFailed(String),
}

/// One rendered line of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Header(String),
    Country(Country),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserState {
    countries: Vec<Country>,
    search: String,
    group_key: GroupKey,
    selection: Selection,
    load: LoadState,
    options: BrowserOptions,
}

impl BrowserState {
    pub fn new(options: BrowserOptions) -> Self {
        Self {
            countries: Vec::new(),
            search: String::new(),
            group_key: GroupKey::None,
            selection: Selection::default(),
            load: LoadState::Loading,
            options,
        }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn group_key(&self) -> GroupKey {
        self.group_key
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn load(&self) -> &LoadState {
        &self.load
    }

    pub fn filtered(&self) -> Vec<Country> {
        filter_countries(
            &self.countries,
            &self.search,
            self.group_key,
            self.options.filter_mode,
        )
    }

    pub fn grouped(&self) -> Option<Vec<Group>> {
        group_countries(&self.filtered(), self.group_key)
    }

    /// Flat list, or bucket headers each followed by their countries
    pub fn rows(&self) -> Vec<Row> {
        match self.grouped() {
            None => self.filtered().into_iter().map(Row::Country).collect(),
            Some(groups) => groups
                .into_iter()
                .flat_map(|g| {
                    std::iter::once(Row::Header(g.key))
                        .chain(g.countries.into_iter().map(Row::Country))
                })
                .collect(),
        }
    }

    fn filtered_codes(&self) -> Vec<String> {
        self.filtered().into_iter().map(|c| c.code).collect()
    }
}

/// Apply one event. When the filtered list differs afterwards, the default
/// selection rule runs and replaces whatever was selected.
pub fn reduce(state: BrowserState, event: Event) -> BrowserState {
    let before = state.filtered_codes();
    let mut next = apply(state, event);

    if next.filtered_codes() != before {
        let filtered = next.filtered();
        next.selection = next
            .selection
            .select_default(&filtered, next.options.default_selection_limit);
    }
    next
}

fn apply(mut state: BrowserState, event: Event) -> BrowserState {
    match event {
        Event::SearchInput(c) => state.search.push(c),
        Event::SearchBackspace => {
            state.search.pop();
        }
        Event::SearchClear => state.search.clear(),
        Event::SetSearch(text) => state.search = text,
        Event::SetGroup(key) => state.group_key = key,
        Event::CycleGroup => state.group_key = state.group_key.next(),
        Event::CycleGroupBack => state.group_key = state.group_key.prev(),
        Event::Select(code) => {
            // Only rows currently on screen can be selected
            if state.filtered().iter().any(|c| c.code == code) {
                state.selection = state.selection.toggle(&code);
            }
        }
        Event::LoadStarted => state.load = LoadState::Loading,
        Event::Loaded(countries) => {
            state.countries = countries;
            state.load = LoadState::Loaded;
        }
        Event::LoadFailed(message) => state.load = LoadState::Failed(message),
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::sample;

    fn alphabet(n: usize) -> Vec<Country> {
        (0..n)
            .map(|i| {
                let letter = (b'A' + i as u8) as char;
                Country::new(format!("{}{}", letter, letter), format!("Land {}", letter))
            })
            .collect()
    }

    fn loaded(countries: Vec<Country>) -> BrowserState {
        reduce(BrowserState::new(BrowserOptions::default()), Event::Loaded(countries))
    }

    fn type_text(state: BrowserState, text: &str) -> BrowserState {
        text.chars().fold(state, |s, c| reduce(s, Event::SearchInput(c)))
    }

    #[test]
    fn test_initial_state() {
        let state = BrowserState::new(BrowserOptions::default());
        assert_eq!(state.load(), &LoadState::Loading);
        assert!(state.rows().is_empty());
        assert_eq!(state.selection().code(), None);
    }

    #[test]
    fn test_load_of_fifteen_selects_tenth() {
        let state = loaded(alphabet(15));
        assert_eq!(state.load(), &LoadState::Loaded);
        assert_eq!(state.filtered().len(), 15);
        assert_eq!(state.selection().code(), Some("JJ"));
    }

    #[test]
    fn test_load_of_three_selects_last() {
        let state = loaded(alphabet(3));
        assert_eq!(state.selection().code(), Some("CC"));
    }

    #[test]
    fn test_search_reselects_default() {
        let raw = sample(&[
            ("CA", "Canada"),
            ("CN", "China"),
            ("CU", "Cuba"),
            ("TR", "Turkey"),
        ]);
        let state = loaded(raw);
        assert_eq!(state.selection().code(), Some("TR"));

        let state = type_text(state, "c");
        assert_eq!(state.selection().code(), Some("CU"));

        let state = type_text(state, "hi");
        assert_eq!(state.filtered(), vec![Country::new("CN", "China")]);
        assert_eq!(state.selection().code(), Some("CN"));
    }

    #[test]
    fn test_search_without_matches_clears_selection() {
        let state = type_text(loaded(alphabet(4)), "zzz");
        assert!(state.filtered().is_empty());
        assert_eq!(state.selection().code(), None);
    }

    #[test]
    fn test_manual_toggle_then_toggle_off() {
        let raw = sample(&[("DE", "Germany"), ("US", "United States"), ("ZA", "South Africa")]);
        let state = loaded(raw);
        assert_eq!(state.selection().code(), Some("ZA"));
        assert_eq!(state.selection().color_index(), 0);

        let state = reduce(state, Event::Select("US".into()));
        assert_eq!(state.selection().code(), Some("US"));
        assert_eq!(state.selection().color_index(), 1);

        let state = reduce(state, Event::Select("US".into()));
        assert_eq!(state.selection().code(), None);
        assert_eq!(state.selection().color_index(), 1);
    }

    #[test]
    fn test_selecting_filtered_out_code_is_ignored() {
        let raw = sample(&[("DE", "Germany"), ("US", "United States")]);
        let state = type_text(loaded(raw), "germ");
        let before = state.clone();
        let state = reduce(state, Event::Select("US".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn test_filter_change_overrides_manual_selection() {
        let raw = sample(&[
            ("CA", "Canada"),
            ("CN", "China"),
            ("US", "United States"),
            ("TR", "Turkey"),
        ]);
        let state = reduce(loaded(raw), Event::Select("CA".into()));
        assert_eq!(state.selection().code(), Some("CA"));
        assert_eq!(state.selection().color_index(), 1);

        let state = type_text(state, "a");
        assert_eq!(state.filtered().len(), 3);
        assert_eq!(state.selection().code(), Some("US"));

        let state = type_text(state, "n");
        assert_eq!(state.filtered(), vec![Country::new("CA", "Canada")]);
        assert_eq!(state.selection().code(), Some("CA"));
        // default selection leaves the color alone
        assert_eq!(state.selection().color_index(), 1);
    }

    #[test]
    fn test_manual_selection_survives_grouping_change() {
        // Grouping by name never changes the filtered list in name mode
        let state = loaded(alphabet(5));
        let state = reduce(state, Event::Select("AA".into()));
        let state = reduce(state, Event::SetGroup(GroupKey::Name));
        assert_eq!(state.selection().code(), Some("AA"));
    }

    #[test]
    fn test_group_change_refilters_in_group_field_mode() {
        let options = BrowserOptions {
            filter_mode: FilterMode::GroupField,
            ..Default::default()
        };
        let raw = sample(&[("DE", "Germany"), ("SE", "Sweden"), ("NO", "Norway")]);
        let state = reduce(BrowserState::new(options), Event::Loaded(raw));
        let state = type_text(state, "de");
        // name match only: "Sweden"
        assert_eq!(state.filtered(), vec![Country::new("SE", "Sweden")]);

        let state = reduce(state, Event::SetGroup(GroupKey::Code));
        assert_eq!(state.filtered(), vec![Country::new("DE", "Germany")]);
        assert_eq!(state.selection().code(), Some("DE"));
    }

    #[test]
    fn test_rows_flat_and_grouped() {
        let raw = sample(&[("AA", "Alpha"), ("BB", "Bravo"), ("AA", "Another")]);
        let state = loaded(raw.clone());
        assert_eq!(state.rows().len(), 3);

        let state = reduce(state, Event::SetGroup(GroupKey::Code));
        assert_eq!(
            state.rows(),
            vec![
                Row::Header("AA".into()),
                Row::Country(raw[0].clone()),
                Row::Country(raw[2].clone()),
                Row::Header("BB".into()),
                Row::Country(raw[1].clone()),
            ]
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_list() {
        let state = loaded(alphabet(3));
        let state = reduce(state, Event::LoadStarted);
        let state = reduce(state, Event::LoadFailed("timed out".into()));
        assert_eq!(state.load(), &LoadState::Failed("timed out".into()));
        assert_eq!(state.countries().len(), 3);
        assert_eq!(state.selection().code(), Some("CC"));
    }

    #[test]
    fn test_reload_replaces_list() {
        let state = loaded(alphabet(3));
        let state = reduce(state, Event::Loaded(sample(&[("TR", "Turkey")])));
        assert_eq!(state.countries(), &[Country::new("TR", "Turkey")]);
        assert_eq!(state.selection().code(), Some("TR"));
    }

    #[test]
    fn test_group_cycle_and_search_editing() {
        let state = loaded(alphabet(3));
        let state = reduce(state, Event::CycleGroup);
        assert_eq!(state.group_key(), GroupKey::Code);
        let state = reduce(state, Event::CycleGroupBack);
        assert_eq!(state.group_key(), GroupKey::None);

        let state = type_text(state, "lax");
        let state = reduce(state, Event::SearchBackspace);
        assert_eq!(state.search(), "la");
        let state = reduce(state, Event::SetSearch("land b".into()));
        assert_eq!(state.filtered(), vec![Country::new("BB", "Land B")]);
        let state = reduce(state, Event::SearchClear);
        assert_eq!(state.search(), "");
        assert_eq!(state.filtered().len(), 3);
    }
}
