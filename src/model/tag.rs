// File: ./src/model/tag.rs
//! Tags and series: accumulators of back-references to events, groups and shops.
use crate::model::event::{EventId, EventKind};
use crate::model::link::Link;
use crate::model::name::Name;
use crate::store::EventStore;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerieId(pub usize);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlinks {
    pub events: Vec<EventId>,
    pub events_old: Vec<EventId>,
    pub groups: Vec<EventId>,
    pub shops: Vec<EventId>,
}

impl Backlinks {
    /// The list an event of the given kind/age belongs to.
    pub fn bucket_mut(&mut self, kind: EventKind, old: bool) -> Result<&mut Vec<EventId>> {
        Ok(match kind {
            EventKind::Event if old => &mut self.events_old,
            EventKind::Event => &mut self.events,
            EventKind::Group => &mut self.groups,
            EventKind::Shop => &mut self.shops,
            EventKind::Separator => bail!("unexpected event kind: {}", kind),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
            && self.events_old.is_empty()
            && self.groups.is_empty()
            && self.shops.is_empty()
    }

    pub fn num_events(&self, store: &EventStore) -> usize {
        store.non_separators(&self.events)
    }

    pub fn num_old_events(&self, store: &EventStore) -> usize {
        store.non_separators(&self.events_old)
    }

    pub fn num_groups(&self, store: &EventStore) -> usize {
        store.non_separators(&self.groups)
    }

    pub fn num_shops(&self, store: &EventStore) -> usize {
        store.non_separators(&self.shops)
    }

    /// Live entries over all four lists.
    pub fn total(&self, store: &EventStore) -> usize {
        self.num_events(store) + self.num_old_events(store) + self.num_groups(store) + self.num_shops(store)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: Name,
    pub description: String,
    pub backlinks: Backlinks,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Self {
            name: Name::new(name),
            ..Default::default()
        }
    }

    pub fn slug(&self) -> String {
        format!("tag/{}.html", self.name.sanitized)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Serie {
    pub name: Name,
    pub description: String,
    pub links: Vec<Link>,
    pub backlinks: Backlinks,
}

impl Serie {
    pub fn new(name: &str) -> Self {
        Self {
            name: Name::new(name),
            ..Default::default()
        }
    }

    /// Placeholder for a series referenced by an event but missing from the
    /// series table.
    pub fn placeholder(id: &str, name: &str) -> Self {
        Self {
            name: Name::with_id(name, id),
            ..Default::default()
        }
    }

    /// No upcoming events, groups or shops.
    pub fn is_old(&self) -> bool {
        self.backlinks.events.is_empty()
            && self.backlinks.groups.is_empty()
            && self.backlinks.shops.is_empty()
    }

    pub fn slug(&self) -> String {
        format!("serie/{}.html", self.name.sanitized)
    }
}
