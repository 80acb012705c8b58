//! Texture lighting reconciliation.
//!
//! The engine shades NPC faces with the texture lighting color, which is
//! expected to track the resolved skin color. Records edited by tools that
//! only touch tint layers drift apart; this pass writes the resolved color
//! back wherever the two disagree.

use skinsync_records::RecordSource;

use crate::character::{CharacterSkinContext, ResolvedColor};
use crate::patcher::{current_npc, PassStats, Patcher};
use crate::Result;

impl<S: RecordSource + ?Sized> Patcher<'_, S> {
    pub(crate) fn texture_lighting_pass(&mut self, progress: &mut dyn FnMut(usize, usize)) -> Result<PassStats> {
        let source = self.source;
        let npcs = source.winning_npcs();
        let total = npcs.len();
        let mut stats = PassStats::default();

        for (i, winning) in npcs.into_iter().enumerate() {
            progress(i, total);
            stats.visited += 1;

            let npc = current_npc(&self.patch, winning);
            let Some(context) = CharacterSkinContext::resolve(source, &mut self.races, npc) else {
                stats.unresolved += 1;
                continue;
            };

            let color = match context.resolved_color() {
                ResolvedColor::Color(color) => color,
                ResolvedColor::LiteralColor => {
                    stats.skipped += 1;
                    continue;
                }
                ResolvedColor::MissingPreset(preset) => {
                    tracing::debug!(npc = %winning.label(), preset, "skin preset not defined by race");
                    stats.skipped += 1;
                    continue;
                }
            };

            if npc.texture_lighting == Some(color) {
                stats.unchanged += 1;
                continue;
            }

            tracing::debug!(
                npc = %winning.label(),
                from = ?npc.texture_lighting,
                to = %color,
                "updating texture lighting"
            );

            let tint_index = context.profile.tint_index;
            let npc = self.writable(&winning.form_key)?;
            npc.texture_lighting = Some(color);
            if let Some(layer) = npc.tint_layer_mut(tint_index) {
                layer.color = Some(color);
            }
            stats.patched += 1;
        }
        progress(total, total);

        tracing::info!(
            npcs = stats.visited,
            patched = stats.patched,
            unchanged = stats.unchanged,
            unresolved = stats.unresolved,
            skipped = stats.skipped,
            "texture lighting done"
        );
        Ok(stats)
    }
}
