//! Lab Tutor Library
//!
//! Biology lab calculators, course content and answer grading.

pub mod build_info;
pub mod calc;
pub mod config;
pub mod error;
pub mod grading;
pub mod mcp;
pub mod models;
pub mod tools;
