//! Minispace Core - Shared types and the layout renderer.
//!
//! This crate provides the types used across all Minispace components:
//! - `site` - Public tenant-facing renderer
//! - `dashboard` - Authenticated management surface
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. The [`layout`] module is the one
//! non-trivial resident: it turns a tenant's appearance settings plus a
//! body into a self-contained HTML document, deterministically.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, usernames, slugs, emails, colors
//! - [`layout`] - Layout/theme enumerations and the document renderer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod layout;
pub mod types;

pub use types::*;
