//! Measurable-Domain Checks for Submitted Samples

use crate::error::ValidationError;
use crate::model::{Parameter, WaterSample};

/// Measurable domain of a parameter, inclusive
pub fn domain(parameter: Parameter) -> (f64, f64) {
    match parameter {
        Parameter::Ph => (0.0, 14.0),
        Parameter::Temperature => (f64::MIN, f64::MAX),
        Parameter::Ammonia
        | Parameter::Nitrite
        | Parameter::Nitrate
        | Parameter::DissolvedOxygen => (0.0, f64::MAX),
    }
}

/// Validate a single value against a range
pub fn validate_range(
    field: &'static str,
    value: f64,
    range: (f64, f64),
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < range.0 || value > range.1 {
        Err(ValidationError::OutOfDomain {
            field,
            value,
            min: range.0,
            max: range.1,
        })
    } else {
        Ok(())
    }
}

/// Check that every value of `sample` is a plausible measurement.
///
/// Reports the first offending parameter in evaluation order.
pub fn validate_sample(sample: &WaterSample) -> Result<(), ValidationError> {
    for (parameter, value) in sample.values() {
        validate_range(parameter.column(), value, domain(parameter))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WaterSample {
        WaterSample {
            ph: 7.0,
            temperature: 25.0,
            ammonia: 0.5,
            nitrite: 0.5,
            nitrate: 10.0,
            dissolved_oxygen: 5.0,
        }
    }

    #[test]
    fn test_valid_sample() {
        assert!(validate_sample(&sample()).is_ok());
    }

    #[test]
    fn test_ph_domain() {
        let mut s = sample();
        s.ph = 14.0;
        assert!(validate_sample(&s).is_ok());
        s.ph = 14.5;
        assert_eq!(
            validate_sample(&s),
            Err(ValidationError::OutOfDomain {
                field: "pH",
                value: 14.5,
                min: 0.0,
                max: 14.0,
            })
        );
    }

    #[test]
    fn test_negative_concentration_rejected() {
        let mut s = sample();
        s.nitrite = -0.1;
        let err = validate_sample(&s).unwrap_err();
        assert!(err.to_string().starts_with("Nitrite value -0.1"));
    }

    #[test]
    fn test_out_of_ideal_range_is_not_an_error() {
        let s = WaterSample {
            ph: 5.5,
            temperature: 35.0,
            ammonia: 1.0,
            nitrite: 0.6,
            nitrate: 50.0,
            dissolved_oxygen: 3.0,
        };
        assert!(validate_sample(&s).is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut s = sample();
        s.temperature = f64::INFINITY;
        assert_eq!(
            validate_sample(&s),
            Err(ValidationError::NotFinite {
                field: "Temperature"
            })
        );
    }
}
