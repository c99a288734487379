// File: ./src/model/event.rs
use crate::model::link::Link;
use crate::model::location::Location;
use crate::model::name::Name;
use crate::model::time_range::TimeRange;
use crate::model::{SerieId, TagId};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Stable handle of an event inside an [`crate::store::EventStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Event,
    Group,
    Shop,
    /// Synthetic month header; carries only a label.
    Separator,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMeta {
    pub current: bool,
    pub base_name: Name,
    pub seo_title: String,
    pub siblings: Vec<EventId>,
}

/// Filled in by calendar renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarExport {
    pub slug: String,
    pub data_ics: String,
    pub google: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub name: Name,
    pub name_old: Name,
    pub time: TimeRange,
    pub old: bool,
    pub status: String,
    pub cancelled: bool,
    pub obsolete: bool,
    pub special: bool,
    pub location: Location,
    pub details: String,
    pub details2: String,
    pub main_link: Option<Link>,
    pub links: Vec<Link>,
    pub raw_tags: Vec<String>,
    /// `None` until the cross-reference pass resolved the raw tags.
    pub tags: Option<Vec<TagId>>,
    pub raw_series: Vec<String>,
    pub series: Option<Vec<SerieId>>,
    pub calendar: CalendarExport,
    pub prev: Option<EventId>,
    pub next: Option<EventId>,
    pub upcoming_near: Vec<EventId>,
    pub meta: EventMeta,
}

impl Event {
    pub fn new(kind: EventKind, name: &str) -> Self {
        Self {
            kind,
            name: Name::new(name),
            name_old: Name::default(),
            time: TimeRange::default(),
            old: false,
            status: String::new(),
            cancelled: false,
            obsolete: false,
            special: false,
            location: Location::default(),
            details: String::new(),
            details2: String::new(),
            main_link: None,
            links: Vec::new(),
            raw_tags: Vec::new(),
            tags: None,
            raw_series: Vec::new(),
            series: None,
            calendar: CalendarExport::default(),
            prev: None,
            next: None,
            upcoming_near: Vec::new(),
            meta: EventMeta::default(),
        }
    }

    pub fn separator(label: &str) -> Self {
        Self::new(EventKind::Separator, label)
    }

    pub fn is_separator(&self) -> bool {
        self.kind == EventKind::Separator
    }

    fn slug_with(&self, name: &Name, kind: &str, ext: &str) -> String {
        match self.time.year() {
            Some(year) => format!("{}/{}-{}.{}", kind, year, name.sanitized, ext),
            None => format!("{}/{}.{}", kind, name.sanitized, ext),
        }
    }

    fn uses_base_slug(&self) -> bool {
        self.kind == EventKind::Event && !self.meta.base_name.sanitized.is_empty() && self.meta.current
    }

    /// Public URL path of the event page.
    pub fn slug(&self) -> String {
        if self.uses_base_slug() {
            return format!("event/{}/", self.meta.base_name.sanitized);
        }
        self.slug_no_base()
    }

    /// Output file of the event page.
    pub fn slug_file(&self) -> String {
        if self.uses_base_slug() {
            return format!("event/{}/index.html", self.meta.base_name.sanitized);
        }
        self.slug_no_base()
    }

    pub fn slug_no_base(&self) -> String {
        self.slug_with(&self.name, &self.kind.to_string(), "html")
    }

    /// Redirect source for events that were renamed; empty without a legacy name.
    pub fn slug_old(&self) -> String {
        if self.name_old.is_empty() {
            return String::new();
        }
        // parkrun pages used to live under event/
        let kind = if self.name_old.orig.contains("parkrun") {
            EventKind::Event.to_string()
        } else {
            self.kind.to_string()
        };
        self.slug_with(&self.name_old, &kind, "html")
    }

    pub fn calendar_slug(&self) -> String {
        self.slug_with(&self.name, &self.kind.to_string(), "ics")
    }

    /// Deterministic UID derived from the slug.
    pub fn uuid(&self) -> Result<Uuid> {
        if self.is_separator() {
            bail!("cannot create UUID for separator");
        }
        let hash = Sha256::digest(self.slug().as_bytes());
        Ok(Uuid::from_slice(&hash[..16])?)
    }

    pub fn link_title(&self) -> &'static str {
        let email = self.main_link.as_ref().is_some_and(Link::is_email);
        match self.kind {
            EventKind::Event if email => "Mail an Veranstalter",
            EventKind::Group if email => "Mail an Organisator",
            EventKind::Group => "Zum Lauftreff",
            EventKind::Shop => "Zum Lauf-Shop",
            _ => "Zur Veranstaltung",
        }
    }

    pub fn nice_type(&self) -> &'static str {
        if self.old {
            return "vergangene Veranstaltung";
        }
        match self.kind {
            EventKind::Group => "Lauftreff",
            EventKind::Shop => "Lauf-Shop",
            _ => "Veranstaltung",
        }
    }

    /// SEO description; short texts are padded with the given tag names.
    pub fn description<'a>(&self, tag_names: impl IntoIterator<Item = &'a str>) -> String {
        const MIN: usize = 110;
        const MAX: usize = 160;

        let location = match self.location.name_no_flag() {
            l if l.is_empty() => String::new(),
            l => format!(" in '{}'", l),
        };
        let time = match self.time.original.as_str() {
            "" => String::new(),
            "Verschiedene Termine" => ", verschiedene Termine".to_string(),
            t => format!(" am {}", t),
        };

        let mut description = match self.kind {
            EventKind::Event => format!(
                "Informationen zur Laufveranstaltung '{}'{}{}",
                self.name.orig, location, time
            ),
            EventKind::Group => format!(
                "Informationen zur Laufgruppe / zum Lauftreff '{}'{}{}",
                self.name.orig, location, time
            ),
            EventKind::Shop => format!("Informationen zum Lauf-Shop '{}'{}", self.name.orig, location),
            EventKind::Separator => return String::new(),
        };
        if description.len() >= MIN {
            return description;
        }

        for (i, tag) in tag_names.into_iter().enumerate() {
            if description.len() >= MAX {
                break;
            }
            description.push_str(if i == 0 { "; " } else { ", " });
            description.push_str(tag);
        }
        description
    }
}
