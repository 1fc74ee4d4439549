//! Reading History

use serde::Serialize;
use water_quality::Reading;

/// Ordered readings, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    readings: Vec<Reading>,
}

impl History {
    /// Stored column set, in file order
    pub const COLUMNS: [&'static str; 7] = [
        "pH",
        "Temperature",
        "Ammonia",
        "Nitrite",
        "Nitrate",
        "Oxygen",
        "Date",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &Self::COLUMNS
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }
}

impl From<Vec<Reading>> for History {
    fn from(readings: Vec<Reading>) -> Self {
        Self { readings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use water_quality::Parameter;

    #[test]
    fn test_columns_match_parameters() {
        let history = History::new();
        assert!(history.is_empty());
        let params: Vec<_> = Parameter::ALL.iter().map(|p| p.column()).collect();
        assert_eq!(&history.columns()[..6], params.as_slice());
        assert_eq!(history.columns()[6], "Date");
    }
}
