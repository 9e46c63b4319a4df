//! Use-case services composed from repositories.
//!
//! # Responsibility
//! - Apply the caller-side rules the repositories leave to their callers
//!   (duplicate-application check, audit row per status change).
//! - Keep presentation layers decoupled from storage details.

pub mod application_service;
