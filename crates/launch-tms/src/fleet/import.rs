//! CSV import for the fleet spreadsheets exported from the onboarding templates.

use super::dates::{empty_string_as_none, parse_calendar_date};
use super::{Driver, DriverStatus, Load, LoadStatus, Location};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FleetImportError {
    #[error("failed to read fleet export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid fleet CSV header: {0}")]
    Header(#[source] csv::Error),
    #[error("invalid fleet CSV data in row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

pub struct FleetCsvImporter;

impl FleetCsvImporter {
    pub fn loads_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Load>, FleetImportError> {
        let file = std::fs::File::open(path)?;
        Self::loads_from_reader(file)
    }

    pub fn loads_from_reader<R: Read>(reader: R) -> Result<Vec<Load>, FleetImportError> {
        let rows: Vec<LoadRow> = read_rows(reader)?;
        Ok(rows.into_iter().map(LoadRow::into_load).collect())
    }

    pub fn drivers_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Driver>, FleetImportError> {
        let file = std::fs::File::open(path)?;
        Self::drivers_from_reader(file)
    }

    pub fn drivers_from_reader<R: Read>(reader: R) -> Result<Vec<Driver>, FleetImportError> {
        let rows: Vec<DriverRow> = read_rows(reader)?;
        Ok(rows.into_iter().map(DriverRow::into_driver).collect())
    }
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, FleetImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Template headers mark required columns with a trailing '*'.
    let headers: csv::StringRecord = csv_reader
        .headers()
        .map_err(FleetImportError::Header)?
        .iter()
        .map(|header| header.trim().trim_end_matches('*').trim())
        .collect();
    csv_reader.set_headers(headers);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<T>().enumerate() {
        let row = record.map_err(|source| FleetImportError::Row {
            row: index + 1,
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct LoadRow {
    #[serde(rename = "Load ID")]
    id: String,
    #[serde(rename = "Load Number", default)]
    load_number: String,
    #[serde(rename = "Status")]
    status: LoadStatus,
    #[serde(rename = "Pickup City", default)]
    pickup_city: String,
    #[serde(rename = "Pickup State", default)]
    pickup_state: String,
    #[serde(rename = "Delivery City", default)]
    delivery_city: String,
    #[serde(rename = "Delivery State", default)]
    delivery_state: String,
    #[serde(rename = "Pickup Date", default)]
    pickup_date: String,
    #[serde(rename = "Delivery Date", default)]
    delivery_date: String,
    #[serde(rename = "Rate", default)]
    rate: Option<f64>,
    #[serde(
        rename = "Assigned Driver ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    assigned_driver_id: Option<String>,
}

impl LoadRow {
    fn into_load(self) -> Load {
        Load {
            pickup_date: parse_calendar_date(&self.pickup_date),
            delivery_date: parse_calendar_date(&self.delivery_date),
            pickup_location: location(self.pickup_city, self.pickup_state),
            delivery_location: location(self.delivery_city, self.delivery_state),
            id: self.id,
            load_number: self.load_number,
            status: self.status,
            rate: self.rate,
            assigned_driver_id: self.assigned_driver_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DriverRow {
    #[serde(rename = "Driver ID")]
    id: String,
    #[serde(rename = "First Name", default)]
    first_name: String,
    #[serde(rename = "Last Name", default)]
    last_name: String,
    #[serde(rename = "License Expiry", default)]
    license_expiry: String,
    #[serde(rename = "Status")]
    status: DriverStatus,
    #[serde(
        rename = "Assigned Truck ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    assigned_truck_id: Option<String>,
}

impl DriverRow {
    fn into_driver(self) -> Driver {
        Driver {
            license_expiry: parse_calendar_date(&self.license_expiry),
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            status: self.status,
            assigned_truck_id: self.assigned_truck_id,
        }
    }
}

fn location(city: String, state: String) -> Option<Location> {
    if city.is_empty() && state.is_empty() {
        return None;
    }

    Some(Location {
        city,
        state,
        ..Location::default()
    })
}
