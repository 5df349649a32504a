//! Category filtering and sorting of the mod list.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use crate::menu::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Alphabetical,
    EnabledFirst,
    DisabledFirst,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [
        SortMode::Alphabetical,
        SortMode::EnabledFirst,
        SortMode::DisabledFirst,
    ];

    /// Next mode in [`SortMode::ALL`], wrapping.
    pub fn cycled(self) -> Self {
        let pos = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    fn compare(self, a: &Item, b: &Item) -> Ordering {
        let by_name = a.name().cmp(b.name());
        match self {
            SortMode::Alphabetical => by_name,
            // false sorts before true
            SortMode::EnabledFirst => (!a.enabled).cmp(&!b.enabled).then(by_name),
            SortMode::DisabledFirst => a.enabled.cmp(&b.enabled).then(by_name),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortMode::Alphabetical => "Alphabetical",
            SortMode::EnabledFirst => "Enabled first",
            SortMode::DisabledFirst => "Disabled first",
        };
        f.write_str(label)
    }
}

/// Active category selection and sort order. No selection means every category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    selected: Vec<String>,
    pub sort: SortMode,
    pub descending: bool,
}

impl FilterState {
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.selected.iter().any(|c| c == category)
    }

    /// Flips one category and returns whether it is now selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|c| c == category) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(category.to_string());
            true
        }
    }

    pub fn select_only(&mut self, category: &str) {
        self.selected = vec![category.to_string()];
    }

    pub fn clear_categories(&mut self) {
        self.selected.clear();
    }

    fn matches(&self, item: &Item) -> bool {
        self.selected.is_empty() || self.is_selected(&item.category)
    }
}

/// What to do when the selected categories match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFilterPolicy {
    /// Show every item instead (checkbox filter)
    FallbackToAll,
    /// Show nothing and tell the user (single category cycling)
    ExplicitNotice,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutcome {
    /// Indices into the item list, in display order
    pub order: Vec<usize>,
    pub notice: Option<String>,
}

pub struct CategoryFilter;

impl CategoryFilter {
    pub fn apply(items: &[Item], filter: &FilterState, policy: EmptyFilterPolicy) -> FilterOutcome {
        let mut order: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| filter.matches(item))
            .map(|(i, _)| i)
            .collect();
        let mut notice = None;

        if order.is_empty() && !filter.selected.is_empty() {
            match policy {
                EmptyFilterPolicy::FallbackToAll => {
                    debug!(
                        "No items in {:?}, falling back to the full list",
                        filter.selected
                    );
                    order = (0..items.len()).collect();
                }
                EmptyFilterPolicy::ExplicitNotice => {
                    notice = Some(format!(
                        "No mods found in category {}",
                        filter.selected.join(", ")
                    ));
                }
            }
        }

        order.sort_by(|a, b| filter.sort.compare(&items[*a], &items[*b]));
        if filter.descending {
            order.reverse();
        }

        FilterOutcome { order, notice }
    }
}

/// Single-select category cycling, "All" first.
#[derive(Debug, Clone)]
pub struct CategoryCycler {
    categories: Vec<String>,
    position: usize,
}

pub const ALL_CATEGORIES: &str = "All";

impl CategoryCycler {
    pub fn new(categories: &[String]) -> Self {
        let mut all = vec![ALL_CATEGORIES.to_string()];
        all.extend(
            categories
                .iter()
                .filter(|c| c.as_str() != ALL_CATEGORIES)
                .cloned(),
        );
        Self {
            categories: all,
            position: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.categories[self.position]
    }

    /// Moves one step and rewrites `filter` to match.
    pub fn cycle(&mut self, forward: bool, filter: &mut FilterState) -> &str {
        let len = self.categories.len();
        self.position = if forward {
            (self.position + 1) % len
        } else {
            (self.position + len - 1) % len
        };

        if self.position == 0 {
            filter.clear_categories();
        } else {
            filter.select_only(&self.categories[self.position]);
        }
        self.current()
    }

    /// Forget the cycling position, e.g. after the checkbox filter took over.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<Item> {
        vec![
            Item::new(0, "beta", "Fighter").enabled(true),
            Item::new(1, "Alpha", "Stage"),
            Item::new(2, "alpha", "Fighter"),
            Item::new(3, "Gamma", "Music").enabled(true),
        ]
    }

    fn names(items: &[Item], outcome: &FilterOutcome) -> Vec<String> {
        outcome
            .order
            .iter()
            .map(|i| items[*i].display_name.clone())
            .collect()
    }

    #[test]
    fn empty_selection_keeps_everything_sorted_case_sensitive() {
        let items = items();
        let outcome = CategoryFilter::apply(
            &items,
            &FilterState::default(),
            EmptyFilterPolicy::FallbackToAll,
        );
        assert_eq!(names(&items, &outcome), ["Alpha", "Gamma", "alpha", "beta"]);
        assert_eq!(outcome.notice, None);
    }

    #[test]
    fn selected_categories_only() {
        let items = items();
        let mut filter = FilterState::default();
        filter.toggle_category("Fighter");
        let outcome = CategoryFilter::apply(&items, &filter, EmptyFilterPolicy::FallbackToAll);
        assert_eq!(names(&items, &outcome), ["alpha", "beta"]);
    }

    #[test]
    fn empty_result_falls_back_to_all() {
        let items = items();
        let mut filter = FilterState::default();
        filter.toggle_category("UI");
        let outcome = CategoryFilter::apply(&items, &filter, EmptyFilterPolicy::FallbackToAll);
        assert_eq!(outcome.order.len(), items.len());
        assert_eq!(outcome.notice, None);
    }

    #[test]
    fn empty_result_with_notice_names_the_category() {
        let items = items();
        let mut filter = FilterState::default();
        filter.select_only("Effects");
        let outcome = CategoryFilter::apply(&items, &filter, EmptyFilterPolicy::ExplicitNotice);
        assert!(outcome.order.is_empty());
        assert!(outcome.notice.unwrap().contains("Effects"));
    }

    #[test]
    fn enabled_first_breaks_ties_alphabetically() {
        let items = items();
        let filter = FilterState {
            sort: SortMode::EnabledFirst,
            ..Default::default()
        };
        let outcome = CategoryFilter::apply(&items, &filter, EmptyFilterPolicy::FallbackToAll);
        assert_eq!(names(&items, &outcome), ["Gamma", "beta", "Alpha", "alpha"]);
    }

    #[test]
    fn disabled_first_descending() {
        let items = items();
        let filter = FilterState {
            sort: SortMode::DisabledFirst,
            descending: true,
            ..Default::default()
        };
        let outcome = CategoryFilter::apply(&items, &filter, EmptyFilterPolicy::FallbackToAll);
        assert_eq!(names(&items, &outcome), ["beta", "Gamma", "alpha", "Alpha"]);
    }

    #[test]
    fn toggling_a_category_twice_clears_it() {
        let mut filter = FilterState::default();
        assert!(filter.toggle_category("Stage"));
        assert!(!filter.toggle_category("Stage"));
        assert!(filter.selected().is_empty());
    }

    #[test]
    fn cycler_wraps_through_all() {
        let categories = vec!["Fighter".to_string(), "Stage".to_string()];
        let mut cycler = CategoryCycler::new(&categories);
        let mut filter = FilterState::default();

        assert_eq!(cycler.cycle(true, &mut filter), "Fighter");
        assert_eq!(filter.selected(), ["Fighter"]);
        assert_eq!(cycler.cycle(true, &mut filter), "Stage");
        assert_eq!(cycler.cycle(true, &mut filter), "All");
        assert!(filter.selected().is_empty());
        assert_eq!(cycler.cycle(false, &mut filter), "Stage");
    }

    #[test]
    fn sort_modes_cycle() {
        assert_eq!(SortMode::Alphabetical.cycled(), SortMode::EnabledFirst);
        assert_eq!(SortMode::DisabledFirst.cycled(), SortMode::Alphabetical);
    }
}
