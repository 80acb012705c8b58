//! Read access to resolved records.

use skinsync_common::FormKey;

use crate::types::{ColorRecord, Npc, Race};

/// Read side of a load order.
///
/// Lookups return the winning version of a record: the one from the
/// highest priority plugin that contains it.
pub trait RecordSource {
    /// Resolve a race reference.
    fn race(&self, key: &FormKey) -> Option<&Race>;

    /// Resolve a color form reference.
    fn color(&self, key: &FormKey) -> Option<&ColorRecord>;

    /// Resolve an NPC reference.
    fn npc(&self, key: &FormKey) -> Option<&Npc>;

    /// Winning NPC records, highest priority plugin first.
    fn winning_npcs(&self) -> Vec<&Npc>;
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    #[inline]
    fn race(&self, key: &FormKey) -> Option<&Race> {
        (**self).race(key)
    }

    #[inline]
    fn color(&self, key: &FormKey) -> Option<&ColorRecord> {
        (**self).color(key)
    }

    #[inline]
    fn npc(&self, key: &FormKey) -> Option<&Npc> {
        (**self).npc(key)
    }

    #[inline]
    fn winning_npcs(&self) -> Vec<&Npc> {
        (**self).winning_npcs()
    }
}
