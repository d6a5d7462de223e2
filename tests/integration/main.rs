//! Integration tests for Formscout
//!
//! `run_tests` drive whole runs against a scripted feed and renderer with
//! in-memory storage; `http_tests` run against wiremock servers and the
//! real filesystem.

mod http_tests;
mod run_tests;
mod support;
