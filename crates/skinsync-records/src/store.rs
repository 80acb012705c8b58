//! Load order storage and winning override resolution.
//!
//! Key points:
//! - Plugins are kept in load order, lowest priority first
//! - Each record kind gets an FxHashMap from form key to its winning location
//! - NPC enumeration order is computed once at build time

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use skinsync_common::{FormKey, ModKey};

use crate::source::RecordSource;
use crate::types::{ColorRecord, Npc, Race};
use crate::{Error, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Location of a record: (plugin index, record index).
type Slot = (usize, usize);

/// The records contributed by one plugin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plugin {
    pub mod_key: ModKey,
    #[cfg_attr(feature = "serde", serde(default))]
    pub races: Vec<Race>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub colors: Vec<ColorRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub npcs: Vec<Npc>,
}

impl Plugin {
    /// Create an empty plugin.
    pub fn new(mod_key: ModKey) -> Self {
        Self {
            mod_key,
            races: Vec::new(),
            colors: Vec::new(),
            npcs: Vec::new(),
        }
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.races.len() + self.colors.len() + self.npcs.len()
    }

    /// Check if the plugin has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Record counts of a store, by kind of winning record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub plugins: usize,
    pub races: usize,
    pub colors: usize,
    pub npcs: usize,
}

/// A load order with precomputed winning overrides.
#[derive(Debug)]
pub struct RecordStore {
    plugins: Vec<Plugin>,
    races: FxHashMap<FormKey, Slot>,
    colors: FxHashMap<FormKey, Slot>,
    npcs: FxHashMap<FormKey, Slot>,
    npc_order: Vec<Slot>,
}

impl RecordStore {
    /// Build a store from plugins in load order (lowest priority first).
    pub fn from_plugins(plugins: Vec<Plugin>) -> Result<Self> {
        let mut seen: FxHashMap<ModKey, ()> = FxHashMap::default();
        for plugin in &plugins {
            if seen.insert(plugin.mod_key.clone(), ()).is_some() {
                return Err(Error::DuplicatePlugin(plugin.mod_key.to_string()));
            }
        }

        let mut races = FxHashMap::default();
        let mut colors = FxHashMap::default();
        let mut npcs = FxHashMap::default();

        // Later plugins overwrite earlier slots.
        for (p, plugin) in plugins.iter().enumerate() {
            for (i, race) in plugin.races.iter().enumerate() {
                races.insert(race.form_key.clone(), (p, i));
            }
            for (i, color) in plugin.colors.iter().enumerate() {
                colors.insert(color.form_key.clone(), (p, i));
            }
            for (i, npc) in plugin.npcs.iter().enumerate() {
                npcs.insert(npc.form_key.clone(), (p, i));
            }
        }

        // Priority order: walk plugins from the top, keep each key once.
        let mut npc_order = Vec::with_capacity(npcs.len());
        for (p, plugin) in plugins.iter().enumerate().rev() {
            for (i, npc) in plugin.npcs.iter().enumerate() {
                if npcs.get(&npc.form_key) == Some(&(p, i)) {
                    npc_order.push((p, i));
                }
            }
        }

        tracing::debug!(
            plugins = plugins.len(),
            races = races.len(),
            colors = colors.len(),
            npcs = npcs.len(),
            "built record store"
        );

        Ok(Self {
            plugins,
            races,
            colors,
            npcs,
            npc_order,
        })
    }

    /// Plugins in load order.
    #[inline]
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Counts of winning records.
    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            plugins: self.plugins.len(),
            races: self.races.len(),
            colors: self.colors.len(),
            npcs: self.npcs.len(),
        }
    }

    /// Winning race records, in no particular order.
    pub fn winning_races(&self) -> impl Iterator<Item = &Race> {
        self.races.values().map(move |&(p, i)| &self.plugins[p].races[i])
    }

    /// Which plugin provides the winning version of an NPC.
    pub fn npc_origin(&self, key: &FormKey) -> Option<&ModKey> {
        self.npcs.get(key).map(|&(p, _)| &self.plugins[p].mod_key)
    }
}

impl RecordSource for RecordStore {
    fn race(&self, key: &FormKey) -> Option<&Race> {
        self.races.get(key).map(|&(p, i)| &self.plugins[p].races[i])
    }

    fn color(&self, key: &FormKey) -> Option<&ColorRecord> {
        self.colors.get(key).map(|&(p, i)| &self.plugins[p].colors[i])
    }

    fn npc(&self, key: &FormKey) -> Option<&Npc> {
        self.npcs.get(key).map(|&(p, i)| &self.plugins[p].npcs[i])
    }

    fn winning_npcs(&self) -> Vec<&Npc> {
        self.npc_order
            .iter()
            .map(|&(p, i)| &self.plugins[p].npcs[i])
            .collect()
    }
}
