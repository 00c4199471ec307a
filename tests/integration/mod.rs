//! Integration test suite for tend.
//!
//! These tests exercise the full hook path from raw JSON input lines to
//! the committed task line and executed tracker commands. They run the
//! real action pipeline against an in-memory task store, so no tracker
//! binary is involved.
//!
//! # Test Categories
//!
//! - `pipeline_e2e`: full transition processing and the process contract
//! - `reconcile`: dependency-count reconciliation across the store
//! - `gateway_cli`: the subprocess gateway against a scripted tracker

mod fixtures;

mod reconcile;
