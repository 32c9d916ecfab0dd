//! Grading controls: sliders, color effects, automatic balance, and gamma curves.

pub mod auto_balance;
pub mod curves;
pub mod effects;
pub mod sliders;
