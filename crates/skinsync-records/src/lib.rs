//! In-memory record model for skinsync.
//!
//! The crate holds the slice of Skyrim game data that skin tinting needs:
//! races with their tint masks, color forms, and NPCs with their tint layers
//! and texture lighting. It provides:
//!
//! - **Records** ([`Race`], [`ColorRecord`], [`Npc`], ...): plain data types
//! - **Read side** ([`RecordSource`]): reference resolution to winning records
//! - **Store** ([`RecordStore`]): a load order with precomputed winning overrides
//! - **Write side** ([`PatchMod`]): get-or-add overrides for an output plugin
//! - **Snapshots** (`json` feature): JSON load order input and patch output
//!
//! Decoding the game's binary plugin format is out of scope; hosts hand the
//! records over through [`RecordStoreBuilder`] or a JSON snapshot.

mod builder;
mod error;
mod patch;
mod source;
mod store;
mod types;

#[cfg(feature = "json")]
mod json;

pub use builder::{PluginHandle, RecordStoreBuilder};
pub use error::{Error, Result};
pub use patch::PatchMod;
pub use source::RecordSource;
pub use store::{Plugin, RecordCounts, RecordStore};
pub use types::{
    ColorRecord, HeadData, HeadDataSex, Npc, NpcConfiguration, NpcFlags, Race, Sex, TintAssets,
    TintLayer, TintMaskType, TintPreset,
};

#[cfg(feature = "json")]
pub use json::LoadOrderSnapshot;
