//! Ancestry trees of container image layers.
//!
//! Layers are fetched as flat records, linked into an arena-backed forest
//! ([`domain::LayerTree`]) and rendered from their heads.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
