//! Skin tint resolution and patch passes for skinsync.
//!
//! Skyrim NPCs get their skin color from a chain of optional records: the
//! NPC's race, the race's head data for the NPC's sex, the skin tone tint
//! mask, its presets and their color forms, and finally the NPC's own tint
//! layer on the skin channel. This crate resolves that chain and runs two
//! passes over a load order:
//!
//! 1. **Vampire normalization** - default-skinned vampires get an explicit
//!    skin layer with their base race's default color
//! 2. **Texture lighting** - every NPC's texture lighting is set to its
//!    resolved skin color where the two differ
//!
//! # Example
//!
//! ```no_run
//! use skinsync_records::RecordStore;
//! use skinsync_tint::{run_patch, Settings};
//!
//! let store = RecordStore::open("load_order.json")?;
//! let patch = run_patch(&store, &Settings::default())?;
//! println!("{} NPCs patched", patch.len());
//! patch.write_json("SkinColorPatch.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Resolution
//!
//! Every lookup step returns `Option`; a missing link means "no profile" and
//! the NPC is skipped. Only a failed override write aborts a run.

mod cache;
mod character;
mod color;
mod error;
mod lighting;
mod patcher;
mod profile;
mod settings;
mod vampire;

pub use cache::{CacheStats, RaceProfile, RaceProfileCache};
pub use character::{CharacterSkinContext, ResolvedColor};
pub use color::{interpolate, SkinColor};
pub use error::{Error, Result};
pub use patcher::{run_patch, Pass, PassStats, PatchReport, Patcher, DEFAULT_PATCH_NAME};
pub use profile::SkinProfile;
pub use settings::Settings;
pub use vampire::VampireRaces;
