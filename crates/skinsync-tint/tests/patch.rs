//! End-to-end tests of the patch passes over a small Skyrim-shaped load order.

use std::cell::Cell;

use pretty_assertions::assert_eq;
use skinsync_common::{FormKey, Rgb};
use skinsync_records::{
    ColorRecord, Npc, NpcFlags, Race, RecordSource, RecordStore, RecordStoreBuilder, TintAssets,
    TintLayer, TintPreset,
};
use skinsync_tint::{
    interpolate, run_patch, Error, Pass, PassStats, Patcher, RaceProfileCache, Settings,
};

const NORD: u32 = 0x013746;
const NORD_VAMPIRE: u32 = 0x088794;
const BRETON: u32 = 0x013741;
const BRETON_VAMPIRE: u32 = 0x08883C;
const ORC: u32 = 0x013747;
const ORC_VAMPIRE: u32 = 0x0A82B9;

const NORD_DEFAULT: Rgb = Rgb::new(200, 150, 100);
const BRETON_DEFAULT: Rgb = Rgb::new(180, 120, 90);

fn sk(id: u32) -> FormKey {
    format!("{id:06X}:Skyrim.esm").parse().unwrap()
}

/// Skyrim.esm with four skinned races and an orc race without head data.
///
/// Nord and Nord vampire share skin channel 3; the vampire has a preset with
/// the Nord default's RGB under a different color form. Breton vampires use
/// channel 5 and have no preset matching the Breton default.
fn store_with(npcs: Vec<Npc>) -> RecordStore {
    let mut builder = RecordStoreBuilder::new();
    let skyrim = builder.add_plugin("Skyrim.esm").unwrap();

    let nord_default = builder.add_color(skyrim, 0xA01, NORD_DEFAULT).unwrap();
    let nord_dark = builder.add_color(skyrim, 0xA02, Rgb::new(90, 60, 40)).unwrap();
    let vampire_gray = builder.add_color(skyrim, 0xA03, Rgb::new(150, 150, 160)).unwrap();
    let vampire_warm = builder.add_color(skyrim, 0xA04, NORD_DEFAULT).unwrap();
    let breton_default = builder.add_color(skyrim, 0xA05, BRETON_DEFAULT).unwrap();
    let breton_vampire = builder.add_color(skyrim, 0xA06, Rgb::new(120, 130, 140)).unwrap();

    builder
        .add_race(
            skyrim,
            NORD,
            vec![TintAssets::skin_tone(
                3,
                nord_default.clone(),
                vec![
                    TintPreset::new(0, nord_dark, 1.0),
                    TintPreset::new(1, nord_default, 1.0),
                ],
            )],
        )
        .unwrap();
    builder
        .add_race(
            skyrim,
            NORD_VAMPIRE,
            vec![TintAssets::skin_tone(
                3,
                vampire_gray.clone(),
                vec![
                    TintPreset::new(0, vampire_gray, 0.9),
                    TintPreset::new(2, vampire_warm, 1.0),
                ],
            )],
        )
        .unwrap();
    builder
        .add_race(
            skyrim,
            BRETON,
            vec![TintAssets::skin_tone(
                3,
                breton_default.clone(),
                vec![TintPreset::new(0, breton_default, 0.8)],
            )],
        )
        .unwrap();
    builder
        .add_race(
            skyrim,
            BRETON_VAMPIRE,
            vec![TintAssets::skin_tone(
                5,
                breton_vampire.clone(),
                vec![TintPreset::new(0, breton_vampire, 1.0)],
            )],
        )
        .unwrap();
    builder.insert_race(skyrim, Race::new(sk(ORC))).unwrap();

    for npc in npcs {
        builder.add_npc(skyrim, npc).unwrap();
    }
    builder.build().unwrap()
}

fn npc(id: u32, race: u32) -> Npc {
    let mut npc = Npc::new(sk(id), sk(race));
    npc.texture_lighting = Some(Rgb::new(0, 0, 0));
    npc
}

fn patcher(store: &RecordStore) -> Patcher<'_, RecordStore> {
    Patcher::new(store, "SkinColorPatch.esp".parse().unwrap())
}

/// Load order with the patch applied on top, as the next run would see it.
fn with_patch_applied(store: &RecordStore, patch: skinsync_records::PatchMod) -> RecordStore {
    let mut plugins = store.plugins().to_vec();
    plugins.push(patch.into_plugin());
    RecordStore::from_plugins(plugins).unwrap()
}

#[test]
fn vampire_without_layers_gets_base_default() {
    let store = store_with(vec![npc(0x800, NORD_VAMPIRE)]);
    let mut patcher = patcher(&store);

    let stats = patcher.default_vampire_color_patch().unwrap();
    assert_eq!(
        stats,
        PassStats {
            visited: 1,
            patched: 1,
            ..PassStats::default()
        }
    );

    let patched = patcher.patch().npc(&sk(0x800)).unwrap();
    assert_eq!(
        patched.tint_layers,
        Some(vec![TintLayer {
            index: Some(3),
            color: Some(NORD_DEFAULT),
            interpolation_value: Some(1.0),
            preset: Some(2),
        }])
    );
}

#[test]
fn vampire_injection_uses_base_channel_and_sentinel() {
    let mut vampire = npc(0x801, BRETON_VAMPIRE);
    vampire.configuration.flags.insert(NpcFlags::FEMALE);
    // A layer on another channel does not count as a skin override.
    vampire.push_tint_layer(TintLayer::new(3));

    let store = store_with(vec![vampire]);
    let mut patcher = patcher(&store);
    patcher.default_vampire_color_patch().unwrap();

    let layers = patcher.patch().npc(&sk(0x801)).unwrap().tint_layers.clone().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(
        layers[1],
        TintLayer {
            index: Some(3),
            color: Some(BRETON_DEFAULT),
            interpolation_value: Some(0.8),
            preset: Some(TintLayer::NO_PRESET),
        }
    );
}

#[test]
fn vampire_with_skin_layer_is_left_alone() {
    let mut vampire = npc(0x802, NORD_VAMPIRE);
    let layer = TintLayer {
        preset: Some(0),
        interpolation_value: Some(0.5),
        ..TintLayer::new(3)
    };
    vampire.push_tint_layer(layer.clone());

    let store = store_with(vec![vampire, npc(0x803, NORD)]);
    let mut patcher = patcher(&store);
    let stats = patcher.default_vampire_color_patch().unwrap();

    assert_eq!(stats.visited, 1);
    assert_eq!(stats.unchanged, 1);
    assert!(patcher.patch().is_empty());
    assert_eq!(store.npc(&sk(0x802)).unwrap().tint_layers, Some(vec![layer]));
}

#[test]
fn texture_lighting_follows_race_default() {
    let store = store_with(vec![npc(0x810, BRETON)]);
    let settings = Settings {
        default_vampire_color_patch: false,
    };

    let patch = run_patch(&store, &settings).unwrap();
    let patched = patch.npc(&sk(0x810)).unwrap();
    assert_eq!(patched.texture_lighting, Some(interpolate(BRETON_DEFAULT, 0.8)));
    assert_eq!(patched.texture_lighting, Some(Rgb::new(169, 121, 97)));
    assert!(patched.tint_layers.is_none());

    let rerun = run_patch(&with_patch_applied(&store, patch), &settings).unwrap();
    assert!(rerun.is_empty());
}

#[test]
fn texture_lighting_follows_preset_layer_and_syncs_color() {
    let mut nord = npc(0x811, NORD);
    nord.push_tint_layer(TintLayer {
        preset: Some(0),
        interpolation_value: Some(0.5),
        color: Some(Rgb::new(1, 1, 1)),
        ..TintLayer::new(3)
    });

    let store = store_with(vec![nord]);
    let mut patcher = patcher(&store);
    let stats = patcher.update_texture_lighting().unwrap();
    assert_eq!(stats.patched, 1);

    let expected = interpolate(Rgb::new(90, 60, 40), 0.5);
    let patched = patcher.patch().npc(&sk(0x811)).unwrap();
    assert_eq!(patched.texture_lighting, Some(expected));

    let layer = patched.tint_layer(3).unwrap();
    assert_eq!(layer.color, Some(expected));
    assert_eq!(layer.preset, Some(0));
    assert_eq!(layer.interpolation_value, Some(0.5));
}

#[test]
fn matching_texture_lighting_is_not_written() {
    let mut nord = npc(0x812, NORD);
    nord.texture_lighting = Some(NORD_DEFAULT);

    let store = store_with(vec![nord]);
    let mut patcher = patcher(&store);
    let stats = patcher.update_texture_lighting().unwrap();

    assert_eq!(stats.unchanged, 1);
    assert!(patcher.patch().is_empty());
}

#[test]
fn missing_texture_lighting_is_written() {
    let mut nord = npc(0x813, NORD);
    nord.texture_lighting = None;

    let store = store_with(vec![nord]);
    let patch = run_patch(&store, &Settings::default()).unwrap();
    assert_eq!(patch.npc(&sk(0x813)).unwrap().texture_lighting, Some(NORD_DEFAULT));
}

#[test]
fn literal_skin_layer_is_never_modified() {
    let mut nord = npc(0x814, NORD);
    nord.texture_lighting = Some(Rgb::new(1, 2, 3));
    nord.push_tint_layer(TintLayer {
        preset: Some(TintLayer::NO_PRESET),
        color: Some(Rgb::new(4, 5, 6)),
        ..TintLayer::new(3)
    });

    let store = store_with(vec![nord]);
    let mut patcher = patcher(&store);
    let stats = patcher.update_texture_lighting().unwrap();

    assert_eq!(stats.skipped, 1);
    assert!(patcher.patch().is_empty());
}

#[test]
fn unknown_preset_is_skipped() {
    let mut nord = npc(0x815, NORD);
    nord.push_tint_layer(TintLayer {
        preset: Some(42),
        ..TintLayer::new(3)
    });

    let store = store_with(vec![nord]);
    let mut patcher = patcher(&store);
    assert_eq!(patcher.update_texture_lighting().unwrap().skipped, 1);
    assert!(patcher.patch().is_empty());
}

#[test]
fn vampire_with_unresolvable_base_race_is_skipped() {
    const KHAJIIT: u32 = 0x013745;
    const KHAJIIT_VAMPIRE: u32 = 0x088845;

    let mut builder = RecordStoreBuilder::new();
    let skyrim = builder.add_plugin("Skyrim.esm").unwrap();
    let gray = builder.add_color(skyrim, 0xA01, Rgb::new(150, 150, 160)).unwrap();
    let fur = builder.add_color(skyrim, 0xA02, Rgb::new(160, 120, 80)).unwrap();

    let vampire_mask = || {
        vec![TintAssets::skin_tone(3, gray.clone(), vec![TintPreset::new(0, gray.clone(), 1.0)])]
    };
    builder.add_race(skyrim, ORC_VAMPIRE, vampire_mask()).unwrap();
    builder.add_race(skyrim, KHAJIIT_VAMPIRE, vampire_mask()).unwrap();

    // Orcs have no head data, Khajiit only have it for males.
    builder.insert_race(skyrim, Race::new(sk(ORC))).unwrap();
    let mut khajiit = Race::new(sk(KHAJIIT)).with_tint_masks(vec![TintAssets::skin_tone(
        3,
        fur.clone(),
        vec![TintPreset::new(0, fur, 1.0)],
    )]);
    khajiit.head_data.as_mut().unwrap().female = None;
    builder.insert_race(skyrim, khajiit).unwrap();

    let mut khajiit_vampire = npc(0x870, KHAJIIT_VAMPIRE);
    khajiit_vampire.configuration.flags.insert(NpcFlags::FEMALE);
    builder.add_npc(skyrim, khajiit_vampire).unwrap();
    builder.add_npc(skyrim, npc(0x871, ORC_VAMPIRE)).unwrap();
    let store = builder.build().unwrap();

    let mut patcher = patcher(&store);
    let stats = patcher.default_vampire_color_patch().unwrap();
    assert_eq!(
        stats,
        PassStats {
            visited: 2,
            unresolved: 2,
            ..PassStats::default()
        }
    );
    assert!(patcher.patch().is_empty());
    assert!(store.npc(&sk(0x870)).unwrap().tint_layers.is_none());
    assert!(store.npc(&sk(0x871)).unwrap().tint_layers.is_none());
}

#[test]
fn races_without_profile_are_skipped_by_both_passes() {
    let store = store_with(vec![npc(0x820, ORC), npc(0x821, ORC_VAMPIRE), npc(0x822, 0x0DEAD)]);
    let mut patcher = patcher(&store);

    let report = patcher.run(&Settings::default()).unwrap();
    assert_eq!(
        report.vampire,
        Some(PassStats {
            visited: 1,
            unresolved: 1,
            ..PassStats::default()
        })
    );
    assert_eq!(report.texture_lighting.unresolved, 3);
    assert_eq!(report.overrides, 0);
    assert!(patcher.into_patch().is_empty());
}

#[test]
fn reconciliation_sees_injected_vampire_layer() {
    let store = store_with(vec![npc(0x830, NORD_VAMPIRE), npc(0x831, NORD)]);
    let mut patcher = patcher(&store);

    let report = patcher.run(&Settings::default()).unwrap();
    assert_eq!(report.vampire.unwrap().patched, 1);
    assert_eq!(report.texture_lighting.patched, 2);
    assert_eq!(report.overrides, 2);

    // Injected preset 2 of the vampire race has the Nord default's RGB.
    let vampire = patcher.patch().npc(&sk(0x830)).unwrap();
    assert_eq!(vampire.texture_lighting, Some(NORD_DEFAULT));
    assert_eq!(vampire.tint_layers.as_ref().unwrap().len(), 1);
    assert_eq!(vampire.tint_layer(3).unwrap().color, Some(NORD_DEFAULT));

    let patch = patcher.into_patch();
    let rerun = run_patch(&with_patch_applied(&store, patch), &Settings::default()).unwrap();
    assert!(rerun.is_empty());
}

#[test]
fn disabled_vampire_pass_uses_vampire_default() {
    let store = store_with(vec![npc(0x840, NORD_VAMPIRE)]);
    let mut patcher = patcher(&store);

    let report = patcher
        .run(&Settings {
            default_vampire_color_patch: false,
        })
        .unwrap();
    assert!(report.vampire.is_none());

    let vampire = patcher.patch().npc(&sk(0x840)).unwrap();
    assert!(vampire.tint_layers.is_none());
    assert_eq!(vampire.texture_lighting, Some(interpolate(Rgb::new(150, 150, 160), 0.9)));
}

#[test]
fn progress_reports_every_pass() {
    let store = store_with(vec![npc(0x850, NORD), npc(0x851, BRETON)]);
    let mut patcher = patcher(&store);

    let mut calls = Vec::new();
    patcher
        .run_with_progress(&Settings::default(), |pass, done, total| calls.push((pass, done, total)))
        .unwrap();

    assert_eq!(calls.first(), Some(&(Pass::VampireNormalization, 0, 2)));
    assert!(calls.contains(&(Pass::VampireNormalization, 2, 2)));
    assert_eq!(calls.last(), Some(&(Pass::TextureLighting, 2, 2)));
}

/// Delegating source that counts race lookups.
struct CountingSource<'a> {
    inner: &'a RecordStore,
    race_lookups: Cell<usize>,
}

impl RecordSource for CountingSource<'_> {
    fn race(&self, key: &FormKey) -> Option<&Race> {
        self.race_lookups.set(self.race_lookups.get() + 1);
        self.inner.race(key)
    }

    fn color(&self, key: &FormKey) -> Option<&ColorRecord> {
        self.inner.color(key)
    }

    fn npc(&self, key: &FormKey) -> Option<&Npc> {
        self.inner.npc(key)
    }

    fn winning_npcs(&self) -> Vec<&Npc> {
        self.inner.winning_npcs()
    }
}

#[test]
fn race_profiles_are_resolved_once() {
    let store = store_with(vec![]);
    let source = CountingSource {
        inner: &store,
        race_lookups: Cell::new(0),
    };

    let mut cache = RaceProfileCache::new();
    let first = cache.get(&source, &sk(NORD));
    assert_eq!(source.race_lookups.get(), 1);

    let second = cache.get(&source, &sk(NORD));
    assert_eq!(source.race_lookups.get(), 1);
    assert_eq!(first, second);
}

#[test]
fn patch_run_resolves_each_race_once() {
    let npcs = (0..20).map(|i| npc(0x900 + i, if i % 2 == 0 { NORD } else { BRETON })).collect();
    let store = store_with(npcs);
    let source = CountingSource {
        inner: &store,
        race_lookups: Cell::new(0),
    };

    let patch = run_patch(&source, &Settings::default()).unwrap();
    assert_eq!(patch.len(), 20);
    assert_eq!(source.race_lookups.get(), 2);
}

/// Source whose enumeration lists an NPC it cannot resolve.
struct CorruptSource {
    inner: RecordStore,
}

impl RecordSource for CorruptSource {
    fn race(&self, key: &FormKey) -> Option<&Race> {
        self.inner.race(key)
    }

    fn color(&self, key: &FormKey) -> Option<&ColorRecord> {
        self.inner.color(key)
    }

    fn npc(&self, _key: &FormKey) -> Option<&Npc> {
        None
    }

    fn winning_npcs(&self) -> Vec<&Npc> {
        self.inner.winning_npcs()
    }
}

#[test]
fn failed_override_write_aborts_run() {
    let source = CorruptSource {
        inner: store_with(vec![npc(0x860, NORD)]),
    };

    let err = run_patch(&source, &Settings::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Records(skinsync_records::Error::RecordNotFound(_))
    ));
}
