//! Event-table aggregates for the dashboard panel.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::event::TrackedEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub total_events: usize,
    pub unique_views: usize,
    pub unique_actions: usize,
    pub events_per_view: Vec<NamedCount>,
    pub events_by_type: Vec<NamedCount>,
}

/// Classify an event by the shape of its name, falling back to the click
/// column when the name carries no recognizable verb.
fn event_type(event: &TrackedEvent) -> &'static str {
    if event.event_name.contains(":click:") {
        "click"
    } else if event.event_name.contains(":submit") {
        "submit"
    } else if event.event_name.contains(":change") {
        "change"
    } else if event.click.is_empty() {
        "view"
    } else {
        "interaction"
    }
}

#[must_use]
pub fn compute(events: &[TrackedEvent]) -> TableStats {
    let mut per_view: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut actions: HashSet<&str> = HashSet::new();

    for event in events {
        *per_view.entry(&event.view).or_default() += 1;
        *by_type.entry(event_type(event)).or_default() += 1;
        actions.insert(&event.action);
    }

    TableStats {
        total_events: events.len(),
        unique_views: per_view.len(),
        unique_actions: actions.len(),
        events_per_view: to_counts(per_view),
        events_by_type: to_counts(by_type),
    }
}

fn to_counts(map: BTreeMap<&str, usize>) -> Vec<NamedCount> {
    map.into_iter()
        .map(|(name, count)| NamedCount { name: name.to_string(), count })
        .collect()
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
