//! Reading and Parameter Types

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six monitored water parameters.
///
/// Declaration order is the fixed evaluation, message, and alert order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Ph,
    Temperature,
    Ammonia,
    Nitrite,
    Nitrate,
    DissolvedOxygen,
}

impl Parameter {
    /// All parameters in evaluation order
    pub const ALL: [Parameter; 6] = [
        Parameter::Ph,
        Parameter::Temperature,
        Parameter::Ammonia,
        Parameter::Nitrite,
        Parameter::Nitrate,
        Parameter::DissolvedOxygen,
    ];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Temperature => "Temperature",
            Parameter::Ammonia => "Ammonia",
            Parameter::Nitrite => "Nitrite",
            Parameter::Nitrate => "Nitrate",
            Parameter::DissolvedOxygen => "Dissolved oxygen",
        }
    }

    /// Column name used by the history file
    pub fn column(self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Temperature => "Temperature",
            Parameter::Ammonia => "Ammonia",
            Parameter::Nitrite => "Nitrite",
            Parameter::Nitrate => "Nitrate",
            Parameter::DissolvedOxygen => "Oxygen",
        }
    }

    /// Measurement unit, empty for pH
    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Ph => "",
            Parameter::Temperature => "°C",
            Parameter::Ammonia | Parameter::Nitrite | Parameter::Nitrate => "ppm",
            Parameter::DissolvedOxygen => "mg/L",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six measured values of a submission, without a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    /// pH (0-14)
    pub ph: f64,
    /// Water temperature (°C)
    pub temperature: f64,
    /// Ammonia, NH3 (ppm)
    pub ammonia: f64,
    /// Nitrite, NO2 (ppm)
    pub nitrite: f64,
    /// Nitrate, NO3 (ppm)
    pub nitrate: f64,
    /// Dissolved oxygen (mg/L)
    pub dissolved_oxygen: f64,
}

impl WaterSample {
    /// Value of a single parameter
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::Temperature => self.temperature,
            Parameter::Ammonia => self.ammonia,
            Parameter::Nitrite => self.nitrite,
            Parameter::Nitrate => self.nitrate,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
        }
    }

    /// Values paired with their parameter, in evaluation order
    pub fn values(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        Parameter::ALL.into_iter().map(move |p| (p, self.value(p)))
    }
}

/// A persisted, timestamped water-quality snapshot.
///
/// Immutable once built; the timestamp carries whole seconds only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(flatten)]
    pub sample: WaterSample,
    pub timestamp: NaiveDateTime,
}

impl Reading {
    /// Build a reading, dropping sub-second precision from `timestamp`
    pub fn new(sample: WaterSample, timestamp: NaiveDateTime) -> Self {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self { sample, timestamp }
    }

    pub fn value(&self, parameter: Parameter) -> f64 {
        self.sample.value(parameter)
    }
}
