//! Vampire skin normalization.
//!
//! Vampire races carry their own tint presets, so an NPC that never picked a
//! skin tone renders with the vampire race's default. This pass gives such
//! NPCs an explicit skin layer holding the base race's default color, which
//! keeps them looking like their base race even when the vampire default is
//! changed for the player.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use skinsync_common::{FormKey, ModKey, ModType};
use skinsync_records::{Npc, RecordSource, TintLayer};

use crate::cache::RaceProfileCache;
use crate::patcher::{current_npc, PassStats, Patcher};
use crate::Result;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Vampire race and base race form ids in Skyrim.esm.
const SKYRIM_VAMPIRE_RACES: [(u32, u32); 10] = [
    (0x088794, 0x013746), // Nord
    (0x08883C, 0x013741), // Breton
    (0x088844, 0x013744), // Imperial
    (0x088846, 0x013748), // Redguard
    (0x088884, 0x013749), // Wood elf
    (0x08883D, 0x013742), // Dark elf
    (0x088840, 0x013743), // High elf
    (0x0A82B9, 0x013747), // Orc
    (0x088845, 0x013745), // Khajiit
    (0x08883A, 0x013740), // Argonian
];

/// Map from vampire race to the race it is a variant of.
#[derive(Debug, Clone, Default)]
pub struct VampireRaces {
    map: FxHashMap<FormKey, FormKey>,
}

impl VampireRaces {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The ten playable vampire races of Skyrim.esm.
    pub fn skyrim() -> Self {
        let skyrim = ModKey::from_name("Skyrim", ModType::Master);
        let mut races = Self::new();
        for (vampire, base) in SKYRIM_VAMPIRE_RACES {
            races.insert(
                FormKey::masked(vampire, skyrim.clone()),
                FormKey::masked(base, skyrim.clone()),
            );
        }
        races
    }

    /// Register a vampire race variant.
    pub fn insert(&mut self, vampire: FormKey, base: FormKey) {
        self.map.insert(vampire, base);
    }

    /// Base race of a vampire race, `None` for any other race.
    #[inline]
    pub fn base_race(&self, vampire: &FormKey) -> Option<&FormKey> {
        self.map.get(vampire)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

enum VampirePlan {
    Unresolved,
    AlreadyTinted,
    Inject(TintLayer),
}

fn plan_layer<S: RecordSource + ?Sized>(
    source: &S,
    races: &mut RaceProfileCache,
    npc: &Npc,
    base_race: &FormKey,
) -> VampirePlan {
    let sex = npc.sex();

    let Some(vampire) = races.get(source, &npc.race).and_then(|r| r.for_sex(sex).cloned()) else {
        return VampirePlan::Unresolved;
    };

    if npc.tint_layer(vampire.tint_index).is_some() {
        return VampirePlan::AlreadyTinted;
    }

    let Some(base) = races.get(source, base_race).and_then(|r| r.for_sex(sex).cloned()) else {
        return VampirePlan::Unresolved;
    };

    let default = base.default_color;
    let preset = vampire
        .find_preset_by_rgb(default.color)
        .and_then(|index| i16::try_from(index).ok())
        .unwrap_or(TintLayer::NO_PRESET);

    // The base race's channel numbering applies to the injected layer.
    VampirePlan::Inject(TintLayer {
        index: Some(base.tint_index),
        color: Some(default.color),
        interpolation_value: Some(default.interpolation),
        preset: Some(preset),
    })
}

impl<S: RecordSource + ?Sized> Patcher<'_, S> {
    pub(crate) fn vampire_pass(&mut self, progress: &mut dyn FnMut(usize, usize)) -> Result<PassStats> {
        let source = self.source;
        let npcs = source.winning_npcs();
        let total = npcs.len();
        let mut stats = PassStats::default();

        for (i, winning) in npcs.into_iter().enumerate() {
            progress(i, total);

            let npc = current_npc(&self.patch, winning);
            let Some(base_race) = self.vampire_races.base_race(&npc.race) else {
                continue;
            };
            stats.visited += 1;

            let layer = match plan_layer(source, &mut self.races, npc, base_race) {
                VampirePlan::Inject(layer) => layer,
                VampirePlan::AlreadyTinted => {
                    stats.unchanged += 1;
                    continue;
                }
                VampirePlan::Unresolved => {
                    tracing::debug!(npc = %winning.label(), "vampire or base race skin profile missing");
                    stats.unresolved += 1;
                    continue;
                }
            };

            tracing::debug!(
                npc = %winning.label(),
                index = ?layer.index,
                preset = ?layer.preset,
                "injecting base race skin layer"
            );
            self.writable(&winning.form_key)?.push_tint_layer(layer);
            stats.patched += 1;
        }
        progress(total, total);

        tracing::info!(
            vampires = stats.visited,
            patched = stats.patched,
            unchanged = stats.unchanged,
            unresolved = stats.unresolved,
            "vampire skin normalization done"
        );
        Ok(stats)
    }
}
