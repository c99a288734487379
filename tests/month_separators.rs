// Tests for month separator insertion in ascending and descending lists.
use chrono::NaiveDate;
use runcal::model::{Event, EventId, EventKind, TimeRange};
use runcal::store::EventStore;
use runcal::temporal::{add_month_separators, add_month_separators_descending};

fn event_on(store: &mut EventStore, name: &str, date: Option<(i32, u32, u32)>) -> EventId {
    let mut e = Event::new(EventKind::Event, name);
    if let Some((y, m, d)) = date {
        e.time = TimeRange::single(NaiveDate::from_ymd_opt(y, m, d).unwrap());
    }
    store.insert(e)
}

fn labels(store: &EventStore, ids: &[EventId]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            let e = &store[*id];
            if e.is_separator() {
                format!("# {}", e.name.orig)
            } else {
                e.name.orig.clone()
            }
        })
        .collect()
}

#[test]
fn test_one_separator_per_month_including_gaps() {
    let mut store = EventStore::new();
    let ids = vec![
        event_on(&mut store, "a", Some((2025, 1, 15))),
        event_on(&mut store, "b", Some((2025, 1, 20))),
        event_on(&mut store, "c", Some((2025, 4, 2))),
    ];
    let result = add_month_separators(&mut store, &ids);
    assert_eq!(
        labels(&store, &result),
        vec!["# Januar 2025", "a", "b", "# Februar 2025", "# März 2025", "# April 2025", "c"]
    );
}

#[test]
fn test_year_boundary() {
    let mut store = EventStore::new();
    let ids = vec![
        event_on(&mut store, "silvester", Some((2024, 12, 31))),
        event_on(&mut store, "neujahr", Some((2025, 1, 1))),
    ];
    let result = add_month_separators(&mut store, &ids);
    assert_eq!(
        labels(&store, &result),
        vec!["# Dezember 2024", "silvester", "# Januar 2025", "neujahr"]
    );
}

#[test]
fn test_undated_events_get_no_separator() {
    let mut store = EventStore::new();
    let ids = vec![
        event_on(&mut store, "irgendwann", None),
        event_on(&mut store, "mai", Some((2025, 5, 1))),
        event_on(&mut store, "auch irgendwann", None),
    ];
    let result = add_month_separators(&mut store, &ids);
    assert_eq!(
        labels(&store, &result),
        vec!["irgendwann", "# Mai 2025", "mai", "auch irgendwann"]
    );
    assert_eq!(store.non_separators(&result), 3);
}

#[test]
fn test_empty_list() {
    let mut store = EventStore::new();
    assert!(add_month_separators(&mut store, &[]).is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_descending_walks_back_in_time() {
    let mut store = EventStore::new();
    let ids = vec![
        event_on(&mut store, "maerz", Some((2025, 3, 10))),
        event_on(&mut store, "maerz2", Some((2025, 3, 1))),
        event_on(&mut store, "dezember", Some((2024, 12, 5))),
    ];
    let result = add_month_separators_descending(&mut store, &ids);
    assert_eq!(
        labels(&store, &result),
        vec![
            "# März 2025",
            "maerz",
            "maerz2",
            "# Februar 2025",
            "# Januar 2025",
            "# Dezember 2024",
            "dezember"
        ]
    );
}

#[test]
fn test_separator_precedes_first_event_of_each_month() {
    let mut store = EventStore::new();
    let ids: Vec<EventId> = [(2025, 2, 3), (2025, 2, 28), (2025, 3, 1), (2025, 6, 30)]
        .iter()
        .enumerate()
        .map(|(i, d)| event_on(&mut store, &format!("e{}", i), Some(*d)))
        .collect();
    let result = add_month_separators(&mut store, &ids);

    let separators = result.iter().filter(|id| store[**id].is_separator()).count();
    assert_eq!(separators, 5); // Feb..Jun
    for (i, id) in result.iter().enumerate() {
        if store[*id].is_separator() {
            continue;
        }
        if i > 0 && store[result[i - 1]].is_separator() {
            let label = &store[result[i - 1]].name.orig;
            let date = store[*id].time.from.unwrap();
            assert!(label.ends_with(&date.format("%Y").to_string()));
        }
    }
}
