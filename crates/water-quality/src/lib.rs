//! Water-Quality Evaluation
//!
//! Reading model, fixed-threshold evaluation, and measurable-domain checks
//! for aquaponics water samples.

mod error;
mod evaluator;
mod model;
mod validator;

pub use error::ValidationError;
pub use evaluator::{
    rule, EvaluationResult, Evaluator, IdealRange, ParameterCheck, ParameterRule, Verdict,
    NOMINAL_SUMMARY,
};
pub use model::{Parameter, Reading, WaterSample};
pub use validator::{domain, validate_range, validate_sample};
