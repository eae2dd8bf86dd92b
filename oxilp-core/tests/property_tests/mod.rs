//! Property-based tests for oxilp-core
//!
//! Random small programs are solved with both scalar types and every
//! returned certificate is checked independently.

mod certificate_properties;
mod simplex_properties;
