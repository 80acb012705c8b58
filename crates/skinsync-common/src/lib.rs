//! Common types for skinsync.
//!
//! This crate provides the foundational types shared by all skinsync crates:
//!
//! - [`FormKey`] / [`ModKey`] - Record identity within a load order
//! - [`Rgb`] - 8-bit color value used by tint presets and texture lighting

mod color;
mod error;
mod form_key;

pub use color::Rgb;
pub use error::{Error, Result};
pub use form_key::{FormKey, ModKey, ModType};
