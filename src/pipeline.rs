// File: ./src/pipeline.rs
//! One run from raw tables to the finished, cross-referenced graph.
use crate::config::Config;
use crate::linkcheck::{CheckUrl, LinkReport, UrlCheck, check_links, collect_check_urls};
use crate::model::{Event, EventId, ParkrunEvent, Serie, Tag};
use crate::proximity::find_upcoming_near;
use crate::sheets::load_sheets;
use crate::source::RecordSource;
use crate::store::EventStore;
use crate::temporal::{self, OldEvents};
use crate::xref::{SeriesIndex, TagIndex, collect_series, collect_tags};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// The derived graph. Lists hold ids into `store`; separators are stored
/// there as well.
#[derive(Debug, Default, Serialize)]
pub struct Data {
    pub store: EventStore,
    pub events: Vec<EventId>,
    /// Most recent first.
    pub events_old: Vec<EventId>,
    pub old_events: Vec<OldEvents>,
    pub events_obsolete: Vec<EventId>,
    pub groups: Vec<EventId>,
    pub groups_obsolete: Vec<EventId>,
    pub shops: Vec<EventId>,
    pub shops_obsolete: Vec<EventId>,
    pub tags: TagIndex,
    pub series: SeriesIndex,
    pub parkrun_events: Vec<ParkrunEvent>,
}

impl Data {
    pub fn event(&self, id: EventId) -> &Event {
        &self.store[id]
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.sorted()
    }

    pub fn series(&self) -> impl Iterator<Item = &Serie> {
        self.series.active.iter().map(|id| self.series.get(*id))
    }

    pub fn series_old(&self) -> impl Iterator<Item = &Serie> {
        self.series.old.iter().map(|id| self.series.get(*id))
    }

    /// Links of the upcoming events.
    pub fn check_urls(&self) -> Vec<CheckUrl> {
        collect_check_urls(&self.store, &self.events)
    }

    pub async fn check_links<C: UrlCheck + 'static>(&self, checker: Arc<C>, per_domain_limit: usize) -> LinkReport {
        check_links(self.check_urls(), checker, per_domain_limit).await
    }
}

pub fn fetch_data(source: &dyn RecordSource, config: &Config, today: NaiveDate) -> Result<Data> {
    let sheets = load_sheets(source, config, today)?;

    let mut data = Data {
        parkrun_events: sheets.parkrun,
        ..Default::default()
    };
    let store = &mut data.store;
    let events = store.insert_all(sheets.events);
    let groups = store.insert_all(sheets.groups);
    let shops = store.insert_all(sheets.shops);

    temporal::validate_date_order(store, &events);
    temporal::validate_name_order(store, &groups);
    temporal::validate_name_order(store, &shops);

    let (events, events_obsolete) = temporal::split_obsolete(store, &events);
    (data.groups, data.groups_obsolete) = temporal::split_obsolete(store, &groups);
    (data.shops, data.shops_obsolete) = temporal::split_obsolete(store, &shops);
    data.events_obsolete = events_obsolete;

    temporal::find_prev_next(store, &events);
    temporal::find_siblings(store, &events, today, config.sibling_grace_days);

    let (events, mut events_old) = temporal::split_events(store, &events);
    data.events = temporal::add_month_separators(store, &events);
    find_upcoming_near(store, &data.events, &data.events, config.near_distance_km, config.near_count);
    find_upcoming_near(store, &events_old, &data.events, config.near_distance_km, config.near_count);

    events_old.reverse();
    data.events_old = temporal::add_month_separators_descending(store, &events_old);
    temporal::change_registration_links(store, &events_old, &config.registration_result_sites);

    let lists = [
        ("events", data.events.as_slice()),
        ("events_old", data.events_old.as_slice()),
        ("groups", data.groups.as_slice()),
        ("shops", data.shops.as_slice()),
    ];
    data.tags = collect_tags(store, sheets.tags, &lists)?;
    data.series = collect_series(store, sheets.series, &lists)?;

    data.old_events = temporal::group_old_by_year(store, &data.events_old);
    Ok(data)
}
