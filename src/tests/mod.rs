//! Test suite for the pipeline builder
//!
//! Tests are grouped by concern: identity and the block store, config
//! values, pre-flight validation, full runs, and store properties.

#[cfg(test)]
mod mock_services;
#[cfg(test)]
mod core_tests;
#[cfg(test)]
mod validation_tests;
#[cfg(test)]
mod property_tests;
