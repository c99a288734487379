// File: ./src/model/parkrun.rs
use serde::{Deserialize, Serialize};

/// One week of the local parkrun. Not part of the cross-reference graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkrunEvent {
    pub current_week: bool,
    pub index: String,
    pub date: String,
    pub runners: String,
    pub temperature: String,
    pub special: String,
    pub cafe: String,
    pub results: String,
    pub report: String,
    pub author: String,
    pub photos: String,
}
