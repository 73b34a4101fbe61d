//! Fleet entities as delivered by the Launch REST API.
//!
//! These records are owned by the backend; the reporting code only reads
//! them. Optional or malformed fields deserialize to `None` so a partial
//! record still contributes to the tallies it can.

mod dates;
pub mod import;

pub use dates::{parse_calendar_date, parse_timestamp};
pub use import::{FleetCsvImporter, FleetImportError};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Status discriminants that can be tallied into fixed, ordered buckets.
pub trait StatusKind: Copy + Ord + Serialize + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    Inactive,
    #[serde(alias = "on-leave")]
    OnLeave,
    Terminated,
    #[serde(alias = "in-training")]
    InTraining,
}

impl StatusKind for DriverStatus {
    const ALL: &'static [Self] = &[
        Self::Active,
        Self::Inactive,
        Self::OnLeave,
        Self::Terminated,
        Self::InTraining,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::OnLeave => "On Leave",
            Self::Terminated => "Terminated",
            Self::InTraining => "In Training",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckStatus {
    Available,
    #[serde(alias = "in-use", alias = "in_use")]
    Assigned,
    Maintenance,
    #[serde(alias = "out-of-service")]
    OutOfService,
}

impl StatusKind for TruckStatus {
    const ALL: &'static [Self] = &[
        Self::Available,
        Self::Assigned,
        Self::Maintenance,
        Self::OutOfService,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Assigned => "Assigned",
            Self::Maintenance => "Maintenance",
            Self::OutOfService => "Out of Service",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailerStatus {
    #[serde(alias = "at_terminal")]
    AtTerminal,
    #[serde(alias = "in_transit")]
    InTransit,
    #[serde(alias = "out_of_service")]
    OutOfService,
    Dedicated,
}

impl StatusKind for TrailerStatus {
    const ALL: &'static [Self] = &[
        Self::AtTerminal,
        Self::InTransit,
        Self::OutOfService,
        Self::Dedicated,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::AtTerminal => "At Terminal",
            Self::InTransit => "In Transit",
            Self::OutOfService => "Out of Service",
            Self::Dedicated => "Dedicated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStatus {
    Pending,
    Assigned,
    #[serde(alias = "picked_up")]
    PickedUp,
    #[serde(alias = "in_transit")]
    InTransit,
    Delivering,
    Delivered,
    Cancelled,
}

impl StatusKind for LoadStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Assigned,
        Self::PickedUp,
        Self::InTransit,
        Self::Delivering,
        Self::Delivered,
        Self::Cancelled,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::PickedUp => "Picked Up",
            Self::InTransit => "In Transit",
            Self::Delivering => "Delivering",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadEventType {
    Spill,
    Contamination,
    Ncr,
    Accident,
    Delay,
    Damage,
    Inspection,
    Other,
}

impl LoadEventType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spill => "Spill",
            Self::Contamination => "Contamination",
            Self::Ncr => "Non-Conformance Report",
            Self::Accident => "Accident",
            Self::Delay => "Delay",
            Self::Damage => "Damage",
            Self::Inspection => "Inspection",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EventSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    pub fn is_serious(self) -> bool {
        self >= Self::High
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Location {
    /// "City, ST" as shown on the report; blank parts are dropped.
    pub fn short_label(&self) -> String {
        [self.city.trim(), self.state.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub status: DriverStatus,
    #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
    pub license_expiry: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub assigned_truck_id: Option<String>,
}

impl Driver {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "dates::deserialize_lenient_u16")]
    pub year: Option<u16>,
    #[serde(default)]
    pub license_plate: String,
    pub status: TruckStatus,
    #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
    pub next_maintenance_due: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
    pub registration_expiry: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
    pub insurance_expiry: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub assigned_driver_id: Option<String>,
}

impl Truck {
    pub fn identifier(&self) -> String {
        vehicle_identifier(&self.id, self.year, &self.make, &self.model, &self.license_plate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub id: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "dates::deserialize_lenient_u16")]
    pub year: Option<u16>,
    #[serde(default)]
    pub license_plate: String,
    pub status: TrailerStatus,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub assigned_truck_id: Option<String>,
}

impl Trailer {
    pub fn identifier(&self) -> String {
        vehicle_identifier(&self.id, self.year, &self.make, &self.model, &self.license_plate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub id: String,
    #[serde(default)]
    pub load_number: String,
    pub status: LoadStatus,
    #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_lenient_f64")]
    pub rate: Option<f64>,
    #[serde(default)]
    pub pickup_location: Option<Location>,
    #[serde(default)]
    pub delivery_location: Option<Location>,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub assigned_driver_id: Option<String>,
}

impl Load {
    /// Rate in dollars; a missing or non-finite rate counts as zero.
    pub fn rate_or_zero(&self) -> f64 {
        self.rate.filter(|rate| rate.is_finite()).unwrap_or(0.0)
    }

    pub fn pickup_label(&self) -> String {
        self.pickup_location
            .as_ref()
            .map(Location::short_label)
            .unwrap_or_default()
    }

    pub fn delivery_label(&self) -> String {
        self.delivery_location
            .as_ref()
            .map(Location::short_label)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadEvent {
    pub id: String,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub load_id: Option<String>,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub driver_id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: LoadEventType,
    #[serde(default)]
    pub description: String,
    pub severity: EventSeverity,
    #[serde(default, deserialize_with = "dates::deserialize_optional_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub resolved: bool,
}

impl LoadEvent {
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}

/// Point-in-time copy of every collection the daily report reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetSnapshot {
    pub drivers: Vec<Driver>,
    pub trucks: Vec<Truck>,
    pub trailers: Vec<Trailer>,
    pub loads: Vec<Load>,
    pub events: Vec<LoadEvent>,
}

impl FleetSnapshot {
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
            && self.trucks.is_empty()
            && self.trailers.is_empty()
            && self.loads.is_empty()
            && self.events.is_empty()
    }
}

fn vehicle_identifier(id: &str, year: Option<u16>, make: &str, model: &str, plate: &str) -> String {
    let description = [
        year.map(|year| year.to_string()).unwrap_or_default(),
        make.trim().to_string(),
        model.trim().to_string(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    match (description.is_empty(), plate.trim()) {
        (true, "") => id.to_string(),
        (true, plate) => plate.to_string(),
        (false, "") => description,
        (false, plate) => format!("{description} - {plate}"),
    }
}
