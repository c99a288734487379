// File: ./src/proximity.rs
use crate::geo::distance_bearing;
use crate::model::EventId;
use crate::store::EventStore;

/// For every event in `ids` with coordinates, collects up to `count` other
/// non-cancelled events from `candidates` within `max_km`.
///
/// Matches keep the order of `candidates`; they are not sorted by distance.
pub fn find_upcoming_near(
    store: &mut EventStore,
    ids: &[EventId],
    candidates: &[EventId],
    max_km: f64,
    count: usize,
) {
    for &id in ids {
        let Some(origin) = store[id].location.point else {
            continue;
        };
        let mut near = Vec::with_capacity(count);
        for &candidate in candidates {
            if near.len() >= count {
                break;
            }
            let other = &store[candidate];
            if candidate == id || other.cancelled {
                continue;
            }
            let Some(p) = other.location.point else {
                continue;
            };
            let (km, _) = distance_bearing(origin.lat, origin.lon, p.lat, p.lon);
            if km <= max_km {
                near.push(candidate);
            }
        }
        store[id].upcoming_near = near;
    }
}
