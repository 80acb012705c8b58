//! JSON load order snapshots.
//!
//! A snapshot is the host's hand-off format: plugins in load order, each with
//! the races, color forms and NPCs it contributes. Patch output uses the same
//! plugin shape.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use skinsync_common::ModKey;

use crate::patch::PatchMod;
use crate::store::{Plugin, RecordStore};
use crate::types::{ColorRecord, Npc, Race};
use crate::Result;

/// Serialized form of a load order.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LoadOrderSnapshot {
    pub plugins: Vec<Plugin>,
}

impl RecordStore {
    /// Load a snapshot file (memory-mapped).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the map is read-only and dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_json_slice(&mmap)
    }

    /// Parse a snapshot from bytes.
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        let snapshot: LoadOrderSnapshot = serde_json::from_slice(data)?;
        Self::from_plugins(snapshot.plugins)
    }

    /// Clone the load order back into snapshot form.
    pub fn to_snapshot(&self) -> LoadOrderSnapshot {
        LoadOrderSnapshot {
            plugins: self.plugins().to_vec(),
        }
    }
}

/// Borrowed [`Plugin`] shape of a patch.
#[derive(serde::Serialize)]
struct PatchPlugin<'a> {
    mod_key: &'a ModKey,
    races: &'a [Race],
    colors: &'a [ColorRecord],
    npcs: Vec<&'a Npc>,
}

impl PatchMod {
    /// Serialize the patch as a pretty-printed plugin.
    pub fn to_json(&self) -> Result<String> {
        let plugin = PatchPlugin {
            mod_key: self.mod_key(),
            races: &[],
            colors: &[],
            npcs: self.npcs().collect(),
        };
        Ok(serde_json::to_string_pretty(&plugin)?)
    }

    /// Write the patch to a file.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
