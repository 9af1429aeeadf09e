//! Covenant definitions, reading lookups, and compliance assessment

mod data;
mod evaluator;
mod index;

pub use data::{
    validate_inputs, ComplianceStatus, CovenantDefinition, CovenantReading, Operator,
    ReportingFrequency, ValueFormat,
};
pub use evaluator::{
    assess, assess_all, breaches, headroom, headroom_label, CovenantAssessment, Trend,
};
pub use index::ReadingIndex;
