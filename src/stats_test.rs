use super::*;
use uuid::Uuid;

fn event(view: &str, click: &str, event_name: &str, action: &str) -> TrackedEvent {
    TrackedEvent {
        id: Uuid::new_v4(),
        action: action.into(),
        view: view.into(),
        click: click.into(),
        event_name: event_name.into(),
        event_properties: String::new(),
    }
}

#[test]
fn empty_table_is_all_zero() {
    let stats = compute(&[]);
    assert_eq!(stats.total_events, 0);
    assert_eq!(stats.unique_views, 0);
    assert_eq!(stats.unique_actions, 0);
    assert!(stats.events_per_view.is_empty());
    assert!(stats.events_by_type.is_empty());
}

#[test]
fn totals_and_uniques() {
    let events = vec![
        event("view:home", "click:cta", "view:home:click:cta", "Click CTA"),
        event("view:home", "", "view:home", "View home"),
        event("view:pricing", "click:cta", "view:pricing:click:cta", "Click CTA"),
    ];
    let stats = compute(&events);
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.unique_views, 2);
    assert_eq!(stats.unique_actions, 2);
}

#[test]
fn per_view_counts_sorted_by_name() {
    let events = vec![
        event("view:pricing", "", "view:pricing", "a"),
        event("view:home", "", "view:home", "b"),
        event("view:home", "", "view:home", "c"),
    ];
    let stats = compute(&events);
    assert_eq!(stats.events_per_view.len(), 2);
    assert_eq!(stats.events_per_view[0].name, "view:home");
    assert_eq!(stats.events_per_view[0].count, 2);
    assert_eq!(stats.events_per_view[1].name, "view:pricing");
    assert_eq!(stats.events_per_view[1].count, 1);
}

#[test]
fn type_heuristic_classifies_by_name_shape() {
    let events = vec![
        event("view:a", "click:x", "view:a:click:x", "1"),
        event("view:b", "", "view:b", "2"),
        event("view:c", "submit-form", "view:c:submit", "3"),
        event("view:d", "change-plan", "view:d:change", "4"),
        event("view:e", "hover-card", "view:e:hover", "5"),
    ];
    let stats = compute(&events);
    let get = |name: &str| {
        stats
            .events_by_type
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.count)
    };
    assert_eq!(get("click"), Some(1));
    assert_eq!(get("view"), Some(1));
    assert_eq!(get("submit"), Some(1));
    assert_eq!(get("change"), Some(1));
    assert_eq!(get("interaction"), Some(1));
}
