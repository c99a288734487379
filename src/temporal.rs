// File: ./src/temporal.rs
//! Ordering passes over event lists: old/new split, month separators,
//! sibling families and prev/next chains. None of these fail; anomalies are
//! logged and tolerated.
use crate::model::link::REGISTRATION_WITH_RESULTS;
use crate::model::name::is_similar_name;
use crate::model::time_range::month_str;
use crate::model::{Event, EventId};
use crate::store::EventStore;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    fn of(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
        }
    }

    fn succ(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { month: self.month + 1, ..self }
        }
    }

    fn pred(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { month: self.month - 1, ..self }
        }
    }

    fn separator(self) -> Event {
        Event::separator(&format!("{} {}", month_str(self.month), self.year))
    }
}

/// Past events from the remaining ones, by the flag computed at load time.
pub fn split_events(store: &EventStore, ids: &[EventId]) -> (Vec<EventId>, Vec<EventId>) {
    ids.iter().partition(|id| !store[**id].old)
}

pub fn split_obsolete(store: &EventStore, ids: &[EventId]) -> (Vec<EventId>, Vec<EventId>) {
    ids.iter().partition(|id| !store[**id].obsolete)
}

fn add_separators(
    store: &mut EventStore,
    ids: &[EventId],
    descending: bool,
) -> Vec<EventId> {
    let mut result = Vec::with_capacity(ids.len());
    let mut last: Option<YearMonth> = None;

    for &id in ids {
        if let Some(d) = store[id].time.from {
            let ym = YearMonth::of(d);
            match last {
                None => {
                    result.push(store.insert(ym.separator()));
                    last = Some(ym);
                }
                Some(mut cur) => {
                    let advances = if descending { ym < cur } else { ym > cur };
                    if advances {
                        while cur != ym {
                            cur = if descending { cur.pred() } else { cur.succ() };
                            result.push(store.insert(cur.separator()));
                        }
                        last = Some(cur);
                    }
                }
            }
        }
        result.push(id);
    }
    result
}

/// Inserts one separator per calendar month into a chronologically sorted
/// list, including months without any event. Undated events get none.
pub fn add_month_separators(store: &mut EventStore, ids: &[EventId]) -> Vec<EventId> {
    add_separators(store, ids, false)
}

/// Same as [`add_month_separators`] for most-recent-first lists.
pub fn add_month_separators_descending(store: &mut EventStore, ids: &[EventId]) -> Vec<EventId> {
    add_separators(store, ids, true)
}

/// Warns about the first event whose start lies before its predecessor's.
/// Returns whether the order is fine.
pub fn validate_date_order(store: &EventStore, ids: &[EventId]) -> bool {
    let mut last: Option<&Event> = None;
    for event in store.resolve(ids) {
        if let Some(prev) = last
            && !prev.time.is_zero()
        {
            if event.time.is_zero() {
                log::warn!("event '{}' has no date", event.name.orig);
                return false;
            }
            if event.time.is_before_range(&prev.time) {
                log::warn!(
                    "event '{}' has date '{}' before date of previous event '{}'",
                    event.name.orig,
                    event.time.formatted,
                    prev.time.formatted
                );
                return false;
            }
        }
        last = Some(event);
    }
    true
}

/// Warns about every pair that is not strictly increasing by slug.
pub fn validate_name_order(store: &EventStore, ids: &[EventId]) -> bool {
    let mut ok = true;
    for pair in ids.windows(2) {
        let (a, b) = (&store[pair[0]].name.sanitized, &store[pair[1]].name.sanitized);
        if a >= b {
            log::warn!("bad order: {} ... {}", a, b);
            ok = false;
        }
    }
    ok
}

/// Links each event to the latest earlier event with a similar name.
pub fn find_prev_next(store: &mut EventStore, ids: &[EventId]) {
    for (i, &id) in ids.iter().enumerate() {
        let name = &store[id].name.sanitized;
        let prev = ids[..i]
            .iter()
            .rev()
            .find(|other| is_similar_name(&store[**other].name.sanitized, name))
            .copied();
        if let Some(prev) = prev {
            store[prev].next = Some(id);
            store[id].prev = Some(prev);
        }
    }
}

/// Groups events by base name into families (most recent first) and marks
/// one current instance per family: walking back from the most recent, the
/// oldest instance that did not start more than `grace_days` before `today`.
pub fn find_siblings(store: &mut EventStore, ids: &[EventId], today: NaiveDate, grace_days: i64) {
    let limit = today - Duration::days(grace_days);
    let mut collected: HashSet<EventId> = HashSet::new();

    for (i, &start) in ids.iter().enumerate() {
        let base = store[start].meta.base_name.sanitized.clone();
        if base.is_empty() || collected.contains(&start) {
            continue;
        }

        let mut siblings: Vec<EventId> = ids[i..]
            .iter()
            .copied()
            .filter(|id| !collected.contains(id) && store[*id].meta.base_name.sanitized == base)
            .collect();
        collected.extend(siblings.iter().copied());
        siblings.reverse();

        let mut current = siblings[0];
        for &sibling in &siblings[1..] {
            // An undated instance cannot be fresh.
            if store[sibling].time.from.is_none_or(|from| from < limit) {
                break;
            }
            current = sibling;
        }

        for &id in &siblings {
            let meta = &mut store[id].meta;
            meta.siblings = siblings.clone();
            meta.current = id == current;
        }
    }
}

/// Registration links of past events pointing at sites that also publish
/// results get relabeled.
pub fn change_registration_links(store: &mut EventStore, ids: &[EventId], result_sites: &[String]) {
    for &id in ids {
        for link in store[id].links.iter_mut() {
            if link.is_registration() && result_sites.iter().any(|s| link.url.contains(s.as_str())) {
                link.name = REGISTRATION_WITH_RESULTS.to_string();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OldEvents {
    pub year: String,
    pub events: Vec<EventId>,
}

/// Past events per year, newest year first, each with its own descending
/// separators. Expects a most-recent-first list.
pub fn group_old_by_year(store: &mut EventStore, ids: &[EventId]) -> Vec<OldEvents> {
    let mut by_year: BTreeMap<i32, Vec<EventId>> = BTreeMap::new();
    for &id in ids {
        if let Some(year) = store[id].time.year()
            && !store[id].is_separator()
        {
            by_year.entry(year).or_default().push(id);
        }
    }
    by_year
        .into_iter()
        .rev()
        .map(|(year, events)| OldEvents {
            year: year.to_string(),
            events: add_month_separators_descending(store, &events),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, TimeRange};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_year_month_steps() {
        let dec = YearMonth { year: 2024, month: 12 };
        assert_eq!(dec.succ(), YearMonth { year: 2025, month: 1 });
        assert_eq!(dec.succ().pred(), dec);
    }

    #[test]
    fn test_validate_orders() {
        let mut store = EventStore::new();
        let mut a = Event::new(EventKind::Event, "A");
        a.time = TimeRange::single(d(2025, 3, 1));
        let mut b = Event::new(EventKind::Event, "B");
        b.time = TimeRange::single(d(2025, 2, 1));
        let ids = store.insert_all(vec![a, b]);
        assert!(!validate_date_order(&store, &ids));
        assert!(validate_name_order(&store, &ids));
        assert!(!validate_name_order(&store, &[ids[1], ids[0]]));
    }
}
