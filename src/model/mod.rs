// File: ./src/model/mod.rs
pub mod event;
pub mod link;
pub mod location;
pub mod name;
pub mod parkrun;
pub mod tag;
pub mod time_range;

pub use event::{Event, EventId, EventKind, EventMeta};
pub use link::{Link, LinkKind};
pub use location::{Country, GeoPoint, Location};
pub use name::Name;
pub use parkrun::ParkrunEvent;
pub use tag::{Backlinks, Serie, SerieId, Tag, TagId};
pub use time_range::TimeRange;
