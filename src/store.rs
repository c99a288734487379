// File: src/store.rs
//! Arena owning every event of one pipeline run. Cross references between
//! events, tags and series are stored as ids into this arena.
use crate::model::{Event, EventId};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: Event) -> EventId {
        self.events.push(event);
        EventId(self.events.len() - 1)
    }

    pub fn insert_all(&mut self, events: Vec<Event>) -> Vec<EventId> {
        events.into_iter().map(|e| self.insert(e)).collect()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Resolves a list of ids, in order.
    pub fn resolve<'a>(&'a self, ids: &'a [EventId]) -> impl Iterator<Item = &'a Event> + 'a {
        ids.iter().filter_map(|id| self.get(*id))
    }

    pub fn non_separators(&self, ids: &[EventId]) -> usize {
        self.resolve(ids).filter(|e| !e.is_separator()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventId, &Event)> {
        self.events.iter().enumerate().map(|(i, e)| (EventId(i), e))
    }
}

impl Index<EventId> for EventStore {
    type Output = Event;

    fn index(&self, id: EventId) -> &Event {
        &self.events[id.0]
    }
}

impl IndexMut<EventId> for EventStore {
    fn index_mut(&mut self, id: EventId) -> &mut Event {
        &mut self.events[id.0]
    }
}
