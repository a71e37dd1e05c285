//! Common utilities for the Quokka layout engine.
//!
//! This crate provides shared infrastructure used by every engine component:
//! - **Warning System** - deduplicated diagnostics routed through the `log` facade
//! - **Image Contract** - the provider trait layout calls for intrinsic image sizes

pub mod image;
pub mod warning;
