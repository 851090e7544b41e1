//! Configuration models for admission passes.

pub mod pass;

pub use pass::AdmissionConfig;
