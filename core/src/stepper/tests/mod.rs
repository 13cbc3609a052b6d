//! Tests for the continuation-stack machine
//!
//! Organized by feature area

mod helpers;

mod error_tests;
