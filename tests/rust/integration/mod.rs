//! Integration tests - Tests that run statements through an engine with hooks
//!
//! These tests verify that the lint hook, the registry and an executor work
//! together without changing what the executor returns.
