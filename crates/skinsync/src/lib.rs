//! Skinsync - Skyrim NPC skin color patcher.
//!
//! This crate provides a unified interface to the skinsync crates.
//!
//! # Crates
//!
//! - [`skinsync_common`] - Form keys, mod keys and RGB colors
//! - [`skinsync_records`] - Record model, load order store and patch plugin
//! - [`skinsync_tint`] - Skin profiles, vampire normalization and texture lighting
//!
//! # Example
//!
//! ```no_run
//! use skinsync::prelude::*;
//!
//! let store = RecordStore::open("load_order.json")?;
//! let settings = Settings::load("settings.json")?;
//!
//! let mut patcher = Patcher::new(&store, "SkinColorPatch.esp".parse()?);
//! let report = patcher.run(&settings)?;
//! println!("Overrides: {}", report.overrides);
//!
//! patcher.into_patch().write_json("SkinColorPatch.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use skinsync_common as common;
pub use skinsync_records as records;
pub use skinsync_tint as tint;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use skinsync_common::{FormKey, ModKey, Rgb};
    pub use skinsync_records::{Npc, PatchMod, Race, RecordSource, RecordStore, RecordStoreBuilder, TintLayer};
    pub use skinsync_tint::{
        run_patch, CharacterSkinContext, Pass, PatchReport, Patcher, RaceProfileCache, ResolvedColor, Settings,
        SkinProfile,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
