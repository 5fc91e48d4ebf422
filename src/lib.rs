//! Stagehand - deployment CLI output parsing and result normalization
//!
//! Turns the free-form text of a deployment CLI run into a strongly-typed,
//! operation-specific result record.
//!
//! This library provides:
//! - [`model`]: canonical operation result shapes
//! - [`parse`]: line patterns and per-operation scanners
//! - [`stage`]: stage name derivation from version-control context
//! - [`truncate`]: captured-output truncation policy
//! - [`normalize`]: the dispatch and canonicalization boundary

pub mod model;
pub mod normalize;
pub mod parse;
pub mod stage;
pub mod truncate;
