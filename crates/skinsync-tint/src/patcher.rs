//! Patch run context.
//!
//! A [`Patcher`] owns everything that lives for exactly one run: the race
//! profile cache and the output plugin. The passes themselves are defined in
//! `vampire.rs` and `lighting.rs`.

use std::fmt;

use skinsync_common::{FormKey, ModKey, ModType};
use skinsync_records::{Npc, PatchMod, RecordSource};

use crate::cache::{CacheStats, RaceProfileCache};
use crate::settings::Settings;
use crate::vampire::VampireRaces;
use crate::Result;

/// File name stem of the default output plugin.
pub const DEFAULT_PATCH_NAME: &str = "SkinColorPatch";

/// The passes of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    VampireNormalization,
    TextureLighting,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::VampireNormalization => f.write_str("vampire skin normalization"),
            Pass::TextureLighting => f.write_str("texture lighting"),
        }
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// NPCs the pass applies to.
    pub visited: usize,
    /// NPCs written to the patch.
    pub patched: usize,
    /// NPCs already in the desired state.
    pub unchanged: usize,
    /// NPCs whose race has no usable skin profile.
    pub unresolved: usize,
    /// NPCs deliberately left alone (literal colors, unknown presets).
    pub skipped: usize,
}

/// Summary of a full run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// `None` when the vampire pass is disabled.
    pub vampire: Option<PassStats>,
    pub texture_lighting: PassStats,
    /// NPC overrides in the output plugin.
    pub overrides: usize,
    pub cache: CacheStats,
}

/// State of one patch run over a record source.
pub struct Patcher<'a, S: RecordSource + ?Sized> {
    pub(crate) source: &'a S,
    pub(crate) races: RaceProfileCache,
    pub(crate) vampire_races: VampireRaces,
    pub(crate) patch: PatchMod,
}

impl<'a, S: RecordSource + ?Sized> Patcher<'a, S> {
    /// Start a run writing into a new plugin named `patch_mod`.
    pub fn new(source: &'a S, patch_mod: ModKey) -> Self {
        Self {
            source,
            races: RaceProfileCache::new(),
            vampire_races: VampireRaces::skyrim(),
            patch: PatchMod::new(patch_mod),
        }
    }

    /// Replace the vampire to base race table.
    pub fn with_vampire_races(mut self, vampire_races: VampireRaces) -> Self {
        self.vampire_races = vampire_races;
        self
    }

    /// Run all enabled passes.
    pub fn run(&mut self, settings: &Settings) -> Result<PatchReport> {
        self.run_with_progress(settings, |_, _, _| {})
    }

    /// Run all enabled passes, reporting `(pass, done, total)` per NPC.
    ///
    /// Vampire normalization runs before texture lighting so that injected
    /// skin layers are reconciled in the same run.
    pub fn run_with_progress(
        &mut self,
        settings: &Settings,
        mut progress: impl FnMut(Pass, usize, usize),
    ) -> Result<PatchReport> {
        let vampire = if settings.default_vampire_color_patch {
            Some(self.vampire_pass(&mut |done, total| {
                progress(Pass::VampireNormalization, done, total)
            })?)
        } else {
            tracing::info!("vampire skin normalization disabled");
            None
        };

        let texture_lighting =
            self.texture_lighting_pass(&mut |done, total| progress(Pass::TextureLighting, done, total))?;

        let cache = self.races.stats();
        tracing::debug!(races = self.races.len(), hits = cache.hits, misses = cache.misses, "race profile cache");

        Ok(PatchReport {
            vampire,
            texture_lighting,
            overrides: self.patch.len(),
            cache,
        })
    }

    /// Inject base race skin layers into default-skinned vampires.
    pub fn default_vampire_color_patch(&mut self) -> Result<PassStats> {
        self.vampire_pass(&mut |_, _| {})
    }

    /// Reconcile texture lighting with each NPC's resolved skin color.
    pub fn update_texture_lighting(&mut self) -> Result<PassStats> {
        self.texture_lighting_pass(&mut |_, _| {})
    }

    /// Race profile cache of this run.
    #[inline]
    pub fn races(&self) -> &RaceProfileCache {
        &self.races
    }

    /// Output plugin built so far.
    #[inline]
    pub fn patch(&self) -> &PatchMod {
        &self.patch
    }

    /// Finish the run and take the output plugin.
    pub fn into_patch(self) -> PatchMod {
        self.patch
    }

    /// Writable override of an NPC, created on first use.
    pub(crate) fn writable(&mut self, key: &FormKey) -> Result<&mut Npc> {
        let source = self.source;
        let record = source
            .npc(key)
            .ok_or_else(|| skinsync_records::Error::RecordNotFound(key.to_string()))?;
        Ok(self.patch.get_or_add_override(record))
    }
}

/// The NPC as the current run sees it: its override if one exists.
#[inline]
pub(crate) fn current_npc<'b>(patch: &'b PatchMod, winning: &'b Npc) -> &'b Npc {
    patch.npc(&winning.form_key).unwrap_or(winning)
}

/// Run both passes over `source` and return the output plugin.
pub fn run_patch<S: RecordSource + ?Sized>(source: &S, settings: &Settings) -> Result<PatchMod> {
    let mut patcher = Patcher::new(source, ModKey::from_name(DEFAULT_PATCH_NAME, ModType::Plugin));
    patcher.run(settings)?;
    Ok(patcher.into_patch())
}
