//! Tests for the execution tree
//!
//! Organized by feature area

mod helpers;

mod pause_tests;
