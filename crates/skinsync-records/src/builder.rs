//! Builder for assembling a load order in memory.
//!
//! Hosts that already have records decoded, and tests, use this instead of
//! writing a snapshot file.
//!
//! ```
//! use skinsync_common::Rgb;
//! use skinsync_records::{Npc, RecordSource, RecordStoreBuilder, TintAssets, TintPreset};
//!
//! let mut builder = RecordStoreBuilder::new();
//! let skyrim = builder.add_plugin("Skyrim.esm")?;
//!
//! let tan = builder.add_color(skyrim, 0x0A01, Rgb::new(200, 150, 100))?;
//! let race = builder.add_race(
//!     skyrim,
//!     0x013746,
//!     vec![TintAssets::skin_tone(3, tan.clone(), vec![TintPreset::new(0, tan, 1.0)])],
//! )?;
//! let npc = builder.form_key(skyrim, 0x0800)?;
//! builder.add_npc(skyrim, Npc::new(npc.clone(), race))?;
//!
//! let store = builder.build()?;
//! assert!(store.npc(&npc).is_some());
//! # Ok::<(), skinsync_records::Error>(())
//! ```

use skinsync_common::{FormKey, ModKey, Rgb};

use crate::store::{Plugin, RecordStore};
use crate::types::{ColorRecord, Npc, Race, TintAssets};
use crate::{Error, Result};

/// Handle to a plugin in the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginHandle(usize);

/// Builder for [`RecordStore`].
#[derive(Debug, Default)]
pub struct RecordStoreBuilder {
    plugins: Vec<Plugin>,
}

impl RecordStoreBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin at the top of the load order.
    pub fn add_plugin(&mut self, file_name: &str) -> Result<PluginHandle> {
        let mod_key = ModKey::new(file_name)?;
        self.plugins.push(Plugin::new(mod_key));
        Ok(PluginHandle(self.plugins.len() - 1))
    }

    fn plugin_mut(&mut self, plugin: PluginHandle) -> Result<&mut Plugin> {
        self.plugins
            .get_mut(plugin.0)
            .ok_or(Error::UnknownPlugin(plugin.0))
    }

    /// Form key for a local id in a plugin.
    pub fn form_key(&self, plugin: PluginHandle, id: u32) -> Result<FormKey> {
        let mod_key = &self
            .plugins
            .get(plugin.0)
            .ok_or(Error::UnknownPlugin(plugin.0))?
            .mod_key;
        Ok(FormKey::new(id, mod_key.clone())?)
    }

    /// Add a color form and return its key.
    pub fn add_color(&mut self, plugin: PluginHandle, id: u32, color: Rgb) -> Result<FormKey> {
        let form_key = self.form_key(plugin, id)?;
        self.plugin_mut(plugin)?
            .colors
            .push(ColorRecord::new(form_key.clone(), color));
        Ok(form_key)
    }

    /// Add a race sharing `tint_masks` between both sexes and return its key.
    pub fn add_race(&mut self, plugin: PluginHandle, id: u32, tint_masks: Vec<TintAssets>) -> Result<FormKey> {
        let form_key = self.form_key(plugin, id)?;
        self.insert_race(plugin, Race::new(form_key.clone()).with_tint_masks(tint_masks))?;
        Ok(form_key)
    }

    /// Add a fully specified race record.
    pub fn insert_race(&mut self, plugin: PluginHandle, race: Race) -> Result<()> {
        self.plugin_mut(plugin)?.races.push(race);
        Ok(())
    }

    /// Add an NPC record.
    pub fn add_npc(&mut self, plugin: PluginHandle, npc: Npc) -> Result<()> {
        self.plugin_mut(plugin)?.npcs.push(npc);
        Ok(())
    }

    /// Finish the load order.
    pub fn build(self) -> Result<RecordStore> {
        RecordStore::from_plugins(self.plugins)
    }
}
