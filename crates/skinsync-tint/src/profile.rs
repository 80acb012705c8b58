//! Race skin profiles.
//!
//! A [`SkinProfile`] is everything the patch passes need to know about a
//! race's skin tone mask for one sex: which tint channel carries skin tone,
//! which preset is the default, and the color of every selectable preset.

use indexmap::IndexMap;
use skinsync_common::Rgb;
use skinsync_records::{Race, RecordSource, Sex, TintMaskType};

use crate::color::SkinColor;

/// Skin tone data of one race and sex.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinProfile {
    /// Tint channel of the skin tone mask.
    pub tint_index: u16,
    /// Color used when an NPC has no skin tint layer.
    pub default_color: SkinColor,
    /// Preset index of [`default_color`](Self::default_color).
    pub default_index: u16,
    /// Every preset by index, in declaration order.
    pub additional_colors: IndexMap<u16, SkinColor>,
}

impl SkinProfile {
    /// Resolve the skin profile of `race` for `sex`.
    ///
    /// Returns `None` when the race has no head data for that sex, no skin
    /// tone mask, or no default preset that can be resolved and matched.
    ///
    /// The default is the preset whose color reference is the same record as
    /// the mask's default; a different color form with equal RGB does not
    /// count. Presets without an index or with an unresolvable color are
    /// skipped. A repeated preset index overwrites the earlier color; if that
    /// drops the default preset's color from the table and no later preset
    /// restores it, the race has no profile.
    pub fn resolve<S: RecordSource + ?Sized>(source: &S, race: &Race, sex: Sex) -> Option<Self> {
        let head_data = race.head_data.as_ref()?;
        let sex_data = head_data.for_sex(sex)?;

        let mask = sex_data
            .tint_masks
            .iter()
            .find(|mask| mask.mask_type == Some(TintMaskType::SkinTone))?;

        let default_preset = source.color(mask.preset_default.as_ref()?)?;
        let tint_index = mask.index?;

        let mut additional_colors = IndexMap::with_capacity(mask.presets.len());
        let mut default = None;

        for preset in &mask.presets {
            let (Some(index), Some(color_key)) = (preset.index, preset.color.as_ref()) else {
                continue;
            };
            let Some(color) = source.color(color_key) else {
                continue;
            };

            let skin_color = SkinColor::new(color.color, preset.default_value.unwrap_or(1.0));
            additional_colors.insert(index, skin_color);

            if *color_key == default_preset.form_key {
                default = Some((index, skin_color));
            } else if default.is_some_and(|(default_index, _)| default_index == index) {
                default = None;
            }
        }

        let (default_index, default_color) = default?;

        Some(Self {
            tint_index,
            default_color,
            default_index,
            additional_colors,
        })
    }

    /// Preset index of the first preset with exactly this RGB.
    pub fn find_preset_by_rgb(&self, color: Rgb) -> Option<u16> {
        self.additional_colors
            .iter()
            .find(|(_, skin)| skin.same_rgb(color))
            .map(|(&index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinsync_common::FormKey;
    use skinsync_records::{
        HeadData, HeadDataSex, RecordStore, RecordStoreBuilder, TintAssets, TintPreset,
    };

    struct Fixture {
        store: RecordStore,
        race: FormKey,
    }

    fn fixture(masks: Vec<TintAssets>, extra_colors: &[(u32, Rgb)]) -> Fixture {
        let mut builder = RecordStoreBuilder::new();
        let skyrim = builder.add_plugin("Skyrim.esm").unwrap();
        for &(id, color) in extra_colors {
            builder.add_color(skyrim, id, color).unwrap();
        }
        let race = builder.add_race(skyrim, 0x013746, masks).unwrap();
        Fixture {
            store: builder.build().unwrap(),
            race,
        }
    }

    fn key(id: u32) -> FormKey {
        format!("{id:06X}:Skyrim.esm").parse().unwrap()
    }

    fn resolve(fx: &Fixture, sex: Sex) -> Option<SkinProfile> {
        let race = fx.store.race(&fx.race).unwrap();
        SkinProfile::resolve(&fx.store, race, sex)
    }

    #[test]
    fn test_resolves_default_and_presets() {
        let fx = fixture(
            vec![
                TintAssets {
                    index: Some(1),
                    mask_type: Some(TintMaskType::LipColor),
                    preset_default: Some(key(0xA02)),
                    presets: vec![TintPreset::new(0, key(0xA02), 1.0)],
                },
                TintAssets::skin_tone(
                    3,
                    key(0xA01),
                    vec![
                        TintPreset::new(0, key(0xA02), 0.5),
                        TintPreset::new(1, key(0xA01), 0.8),
                        TintPreset {
                            default_value: None,
                            ..TintPreset::new(2, key(0xA03), 0.0)
                        },
                    ],
                ),
            ],
            &[
                (0xA01, Rgb::new(180, 120, 90)),
                (0xA02, Rgb::new(10, 20, 30)),
                (0xA03, Rgb::new(1, 2, 3)),
            ],
        );

        let profile = resolve(&fx, Sex::Male).unwrap();
        assert_eq!(profile.tint_index, 3);
        assert_eq!(profile.default_index, 1);
        assert_eq!(profile.default_color, SkinColor::new(Rgb::new(180, 120, 90), 0.8));

        let indices: Vec<u16> = profile.additional_colors.keys().copied().collect();
        assert_eq!(indices, vec![0, 1, 2]);
        // Missing default value falls back to 1.
        assert_eq!(profile.additional_colors[&2].interpolation, 1.0);
    }

    #[test]
    fn test_deterministic() {
        let fx = fixture(
            vec![TintAssets::skin_tone(3, key(0xA01), vec![TintPreset::new(0, key(0xA01), 1.0)])],
            &[(0xA01, Rgb::new(200, 150, 100))],
        );
        assert_eq!(resolve(&fx, Sex::Female), resolve(&fx, Sex::Female));
    }

    #[test]
    fn test_default_matched_by_identity_not_rgb() {
        // 0xA02 has the same RGB as the default but is a different record.
        let fx = fixture(
            vec![TintAssets::skin_tone(3, key(0xA01), vec![TintPreset::new(0, key(0xA02), 1.0)])],
            &[(0xA01, Rgb::new(200, 150, 100)), (0xA02, Rgb::new(200, 150, 100))],
        );
        assert!(resolve(&fx, Sex::Male).is_none());
    }

    #[test]
    fn test_skips_incomplete_presets() {
        let fx = fixture(
            vec![TintAssets::skin_tone(
                3,
                key(0xA01),
                vec![
                    TintPreset {
                        index: None,
                        ..TintPreset::new(0, key(0xA01), 1.0)
                    },
                    TintPreset::new(1, key(0xBAD), 1.0),
                    TintPreset {
                        color: None,
                        ..TintPreset::new(2, key(0xA01), 1.0)
                    },
                    TintPreset::new(3, key(0xA01), 1.0),
                ],
            )],
            &[(0xA01, Rgb::new(200, 150, 100))],
        );

        let profile = resolve(&fx, Sex::Male).unwrap();
        assert_eq!(profile.additional_colors.len(), 1);
        assert_eq!(profile.default_index, 3);
    }

    #[test]
    fn test_duplicate_index_overwrites() {
        let fx = fixture(
            vec![TintAssets::skin_tone(
                3,
                key(0xA01),
                vec![TintPreset::new(0, key(0xA02), 1.0), TintPreset::new(0, key(0xA01), 0.7)],
            )],
            &[(0xA01, Rgb::new(200, 150, 100)), (0xA02, Rgb::new(1, 1, 1))],
        );

        let profile = resolve(&fx, Sex::Male).unwrap();
        assert_eq!(profile.additional_colors.len(), 1);
        assert_eq!(profile.additional_colors[&0], SkinColor::new(Rgb::new(200, 150, 100), 0.7));
    }

    #[test]
    fn test_overwritten_default_slot() {
        let mask = |presets| TintAssets::skin_tone(3, key(0xA01), presets);
        let colors = [(0xA01, Rgb::new(200, 150, 100)), (0xA02, Rgb::new(1, 1, 1))];

        // Default at index 0 replaced by another color: no coherent default.
        let fx = fixture(
            vec![mask(vec![TintPreset::new(0, key(0xA01), 0.7), TintPreset::new(0, key(0xA02), 1.0)])],
            &colors,
        );
        assert!(resolve(&fx, Sex::Male).is_none());

        // A later preset restores the default under a new index.
        let fx = fixture(
            vec![mask(vec![
                TintPreset::new(0, key(0xA01), 0.7),
                TintPreset::new(0, key(0xA02), 1.0),
                TintPreset::new(1, key(0xA01), 0.5),
            ])],
            &colors,
        );
        let profile = resolve(&fx, Sex::Male).unwrap();
        assert_eq!(profile.default_index, 1);
        assert_eq!(profile.additional_colors[&profile.default_index], profile.default_color);
        assert_eq!(profile.additional_colors[&0].color, Rgb::new(1, 1, 1));
    }

    #[test]
    fn test_absent_cases() {
        // No skin tone mask at all.
        let fx = fixture(vec![], &[(0xA01, Rgb::new(1, 2, 3))]);
        assert!(resolve(&fx, Sex::Male).is_none());

        // Unresolvable default preset.
        let fx = fixture(
            vec![TintAssets::skin_tone(3, key(0xBAD), vec![TintPreset::new(0, key(0xA01), 1.0)])],
            &[(0xA01, Rgb::new(1, 2, 3))],
        );
        assert!(resolve(&fx, Sex::Male).is_none());

        // Mask without a channel index.
        let mut mask = TintAssets::skin_tone(3, key(0xA01), vec![TintPreset::new(0, key(0xA01), 1.0)]);
        mask.index = None;
        let fx = fixture(vec![mask], &[(0xA01, Rgb::new(1, 2, 3))]);
        assert!(resolve(&fx, Sex::Male).is_none());
    }

    #[test]
    fn test_missing_head_data() {
        let fx = fixture(vec![], &[]);
        let mut race = fx.store.race(&fx.race).unwrap().clone();

        race.head_data = None;
        assert!(SkinProfile::resolve(&fx.store, &race, Sex::Male).is_none());

        race.head_data = Some(HeadData {
            male: Some(HeadDataSex::default()),
            female: None,
        });
        assert!(SkinProfile::resolve(&fx.store, &race, Sex::Female).is_none());
    }

    #[test]
    fn test_find_preset_by_rgb() {
        let fx = fixture(
            vec![TintAssets::skin_tone(
                3,
                key(0xA01),
                vec![
                    TintPreset::new(4, key(0xA02), 1.0),
                    TintPreset::new(5, key(0xA01), 1.0),
                    TintPreset::new(6, key(0xA03), 0.2),
                ],
            )],
            &[
                (0xA01, Rgb::new(1, 1, 1)),
                (0xA02, Rgb::new(2, 2, 2)),
                (0xA03, Rgb::new(2, 2, 2)),
            ],
        );

        let profile = resolve(&fx, Sex::Male).unwrap();
        assert_eq!(profile.find_preset_by_rgb(Rgb::new(2, 2, 2)), Some(4));
        assert_eq!(profile.find_preset_by_rgb(Rgb::new(9, 9, 9)), None);
    }
}
