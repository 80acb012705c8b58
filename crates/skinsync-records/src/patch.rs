//! Output plugin holding NPC overrides.

use indexmap::IndexMap;
use skinsync_common::{FormKey, ModKey};

use crate::store::Plugin;
use crate::types::Npc;

/// A patch plugin under construction.
///
/// Overrides are created on first write and kept in first-touch order.
/// Asking for the same record again returns the existing copy, so edits
/// from several passes accumulate on one override.
#[derive(Debug, Clone)]
pub struct PatchMod {
    mod_key: ModKey,
    npcs: IndexMap<FormKey, Npc>,
}

impl PatchMod {
    /// Create an empty patch.
    pub fn new(mod_key: ModKey) -> Self {
        Self {
            mod_key,
            npcs: IndexMap::new(),
        }
    }

    /// The patch plugin's own name.
    #[inline]
    pub fn mod_key(&self) -> &ModKey {
        &self.mod_key
    }

    /// Writable override of `source`, copying it on first access.
    pub fn get_or_add_override(&mut self, source: &Npc) -> &mut Npc {
        self.npcs
            .entry(source.form_key.clone())
            .or_insert_with(|| {
                tracing::trace!(npc = %source.form_key, "adding override");
                source.clone()
            })
    }

    /// The override for a record, if one was created.
    #[inline]
    pub fn npc(&self, key: &FormKey) -> Option<&Npc> {
        self.npcs.get(key)
    }

    /// Check whether a record has been overridden.
    #[inline]
    pub fn contains(&self, key: &FormKey) -> bool {
        self.npcs.contains_key(key)
    }

    /// Overrides in first-touch order.
    pub fn npcs(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.values()
    }

    /// Number of overridden records.
    #[inline]
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    /// Check if nothing was overridden.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    /// Convert into a plain plugin, e.g. for serialization.
    pub fn into_plugin(self) -> Plugin {
        let mut plugin = Plugin::new(self.mod_key);
        plugin.npcs = self.npcs.into_values().collect();
        plugin
    }
}
