// File: ./src/xref.rs
//! Tag and series indexes with back references into the event store.
use crate::model::name::sanitize_name;
use crate::model::{Backlinks, EventId, Serie, SerieId, Tag, TagId};
use crate::store::EventStore;
use crate::temporal::{add_month_separators, add_month_separators_descending};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::HashMap;

/// Event lists to resolve, labelled for error messages.
pub type NamedLists<'a> = [(&'a str, &'a [EventId])];

#[derive(Debug, Default, Serialize)]
pub struct TagIndex {
    pub arena: Vec<Tag>,
    /// Every tag, by slug.
    pub sorted: Vec<TagId>,
}

impl TagIndex {
    pub fn get(&self, id: TagId) -> &Tag {
        &self.arena[id.0]
    }

    pub fn sorted(&self) -> impl Iterator<Item = &Tag> {
        self.sorted.iter().map(|id| self.get(*id))
    }
}

#[derive(Debug, Default, Serialize)]
pub struct SeriesIndex {
    pub arena: Vec<Serie>,
    /// Series with upcoming events, groups or shops, by slug.
    pub active: Vec<SerieId>,
    pub old: Vec<SerieId>,
}

impl SeriesIndex {
    pub fn get(&self, id: SerieId) -> &Serie {
        &self.arena[id.0]
    }
}

fn seed<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> (Vec<T>, HashMap<String, usize>) {
    let mut arena = Vec::with_capacity(items.len());
    let mut by_name = HashMap::new();
    for item in items {
        let k = key(&item);
        if by_name.contains_key(&k) {
            log::warn!("duplicate entry '{}' ignored", k);
            continue;
        }
        by_name.insert(k, arena.len());
        arena.push(item);
    }
    (arena, by_name)
}

fn add_separators(store: &mut EventStore, backlinks: &mut Backlinks) {
    backlinks.events = add_month_separators(store, &backlinks.events);
    backlinks.events_old = add_month_separators_descending(store, &backlinks.events_old);
}

/// Resolves the raw tags of every listed event. Tags missing from `seed` are
/// created on the fly. Resolving an event twice is an error.
pub fn collect_tags(store: &mut EventStore, seed_tags: Vec<Tag>, lists: &NamedLists) -> Result<TagIndex> {
    let (mut arena, mut by_name) = seed(seed_tags, |t: &Tag| t.name.sanitized.clone());

    for (list, ids) in lists {
        for &id in ids.iter() {
            let event = &store[id];
            if event.is_separator() {
                continue;
            }
            if event.tags.is_some() {
                bail!("collecting tags for {}: expecting unresolved tags for '{}'", list, event.name.orig);
            }
            let (kind, old) = (event.kind, event.old);
            let mut resolved = Vec::with_capacity(event.raw_tags.len());
            for raw in &event.raw_tags {
                let idx = *by_name.entry(raw.clone()).or_insert_with(|| {
                    arena.push(Tag::new(raw));
                    arena.len() - 1
                });
                arena[idx]
                    .backlinks
                    .bucket_mut(kind, old)
                    .with_context(|| format!("collecting tags for {}: '{}'", list, event.name.orig))?
                    .push(id);
                resolved.push(TagId(idx));
            }
            store[id].tags = Some(resolved);
        }
    }

    for tag in arena.iter_mut() {
        add_separators(store, &mut tag.backlinks);
    }
    let mut sorted: Vec<TagId> = (0..arena.len()).map(TagId).collect();
    sorted.sort_by(|a, b| arena[a.0].name.sanitized.cmp(&arena[b.0].name.sanitized));

    Ok(TagIndex { arena, sorted })
}

/// Like [`collect_tags`] for series. Unknown series get a placeholder and a
/// warning. The result is split into active and old series.
pub fn collect_series(
    store: &mut EventStore,
    seed_series: Vec<Serie>,
    lists: &NamedLists,
) -> Result<SeriesIndex> {
    let (mut arena, mut by_name) = seed(seed_series, |s: &Serie| s.name.sanitized.clone());

    for (list, ids) in lists {
        for &id in ids.iter() {
            let event = &store[id];
            if event.is_separator() {
                continue;
            }
            if event.series.is_some() {
                bail!("collecting series for {}: expecting unresolved series for '{}'", list, event.name.orig);
            }
            let (kind, old) = (event.kind, event.old);
            let mut resolved = Vec::with_capacity(event.raw_series.len());
            for raw in &event.raw_series {
                let key = sanitize_name(raw);
                let idx = match by_name.get(&key).copied() {
                    Some(idx) => idx,
                    None => {
                        log::warn!("Event: {} has unknown series tag: {}", event.name.orig, raw);
                        arena.push(Serie::placeholder(&key, raw));
                        by_name.insert(key, arena.len() - 1);
                        arena.len() - 1
                    }
                };
                arena[idx]
                    .backlinks
                    .bucket_mut(kind, old)
                    .with_context(|| format!("collecting series for {}: '{}'", list, event.name.orig))?
                    .push(id);
                resolved.push(SerieId(idx));
            }
            store[id].series = Some(resolved);
        }
    }

    for serie in arena.iter_mut() {
        add_separators(store, &mut serie.backlinks);
    }
    let (mut active, mut old): (Vec<SerieId>, Vec<SerieId>) =
        (0..arena.len()).map(SerieId).partition(|id| !arena[id.0].is_old());
    let by_slug = |a: &SerieId, b: &SerieId| arena[a.0].name.sanitized.cmp(&arena[b.0].name.sanitized);
    active.sort_by(by_slug);
    old.sort_by(by_slug);

    Ok(SeriesIndex { arena, active, old })
}
