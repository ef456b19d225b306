#![allow(dead_code)]
#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: fixture interfaces and exception classes built with the class writer
//! - `assertions`: structural checks on generated class files

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_object_constructor, assert_throwing_body, parse_class};
pub use fixtures::{fixture_class_path, FixtureMethod};
