//! Core data types for Adaptune

pub mod parameters;
