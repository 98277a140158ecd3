//! Cartesian Lint - cartesian product detection for SQL queries
//!
//! This crate warns when a query's FROM elements are not all joined together,
//! which would make the database combine them as a full cross product:
//! - In-memory query representation with source identity
//! - FROM-element graph construction from join conditions and WHERE predicates
//! - Reachability analysis from a chosen starting element
//! - A before-execute hook that surfaces findings as log warnings

pub mod config;
pub mod hooks;
pub mod linter;
pub mod query;
