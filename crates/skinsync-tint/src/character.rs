//! Per-NPC skin resolution.

use std::rc::Rc;

use skinsync_common::Rgb;
use skinsync_records::{Npc, RecordSource, TintLayer};

use crate::cache::RaceProfileCache;
use crate::profile::SkinProfile;

/// Outcome of computing an NPC's skin color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedColor {
    /// The color the NPC should render with.
    Color(Rgb),
    /// The skin layer carries a literal color (preset `-1`); left alone.
    LiteralColor,
    /// The skin layer names a preset the race does not have.
    MissingPreset(i16),
}

/// A race skin profile paired with the NPC's own skin tint layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSkinContext {
    pub profile: Rc<SkinProfile>,
    /// First tint layer on the profile's skin channel.
    pub skin_layer: Option<TintLayer>,
}

impl CharacterSkinContext {
    /// Resolve the skin context of `npc`.
    ///
    /// Returns `None` when the NPC's race has no skin profile for its sex.
    pub fn resolve<S: RecordSource + ?Sized>(source: &S, races: &mut RaceProfileCache, npc: &Npc) -> Option<Self> {
        let race = races.get(source, &npc.race)?;
        let profile = race.for_sex(npc.sex())?.clone();
        let skin_layer = npc.tint_layer(profile.tint_index).cloned();

        Some(Self { profile, skin_layer })
    }

    /// Skin color implied by the layer's preset, or by the race default.
    pub fn resolved_color(&self) -> ResolvedColor {
        let preset = self
            .skin_layer
            .as_ref()
            .and_then(|layer| layer.preset.map(|preset| (layer, preset)));

        match preset {
            Some((_, TintLayer::NO_PRESET)) => ResolvedColor::LiteralColor,
            Some((layer, preset)) => {
                let color = u16::try_from(preset)
                    .ok()
                    .and_then(|index| self.profile.additional_colors.get(&index));
                match color {
                    Some(color) => {
                        let ratio = layer.interpolation_value.unwrap_or(1.0);
                        ResolvedColor::Color(color.interpolate(Some(ratio)))
                    }
                    None => ResolvedColor::MissingPreset(preset),
                }
            }
            None => ResolvedColor::Color(self.profile.default_color.interpolate(None)),
        }
    }
}
