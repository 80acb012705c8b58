//! Record types.
//!
//! These mirror the subset of Skyrim's RACE, CLFM and NPC_ records that skin
//! tinting depends on. Every field that the game allows to be missing is an
//! `Option`; resolution code treats absence as "no data", never as an error.

use skinsync_common::{FormKey, Rgb};

/// Kind of a race tint mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TintMaskType {
    None,
    LipColor,
    CheekColor,
    Eyeliner,
    EyeSocketUpper,
    EyeSocketLower,
    SkinTone,
    Paint,
    LaughLines,
    CheekColorLower,
    Nose,
    Chin,
    Neck,
    Forehead,
    Dirt,
}

impl TintMaskType {
    /// Map the on-disk TINP value.
    pub fn from_u16(value: u16) -> Option<Self> {
        Some(match value {
            0 => Self::None,
            1 => Self::LipColor,
            2 => Self::CheekColor,
            3 => Self::Eyeliner,
            4 => Self::EyeSocketUpper,
            5 => Self::EyeSocketLower,
            6 => Self::SkinTone,
            7 => Self::Paint,
            8 => Self::LaughLines,
            9 => Self::CheekColorLower,
            10 => Self::Nose,
            11 => Self::Chin,
            12 => Self::Neck,
            13 => Self::Forehead,
            14 => Self::Dirt,
            _ => return None,
        })
    }
}

/// A color form (CLFM).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorRecord {
    pub form_key: FormKey,
    #[cfg_attr(feature = "serde", serde(default))]
    pub editor_id: Option<String>,
    pub color: Rgb,
}

impl ColorRecord {
    pub fn new(form_key: FormKey, color: Rgb) -> Self {
        Self {
            form_key,
            editor_id: None,
            color,
        }
    }
}

/// One selectable preset of a tint mask.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TintPreset {
    /// Reference to a [`ColorRecord`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Option<FormKey>,
    /// Blend ratio the preset is shown at.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_value: Option<f32>,
    /// Preset index referenced by NPC tint layers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub index: Option<u16>,
}

impl TintPreset {
    pub fn new(index: u16, color: FormKey, default_value: f32) -> Self {
        Self {
            color: Some(color),
            default_value: Some(default_value),
            index: Some(index),
        }
    }
}

/// A race tint mask and its presets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TintAssets {
    /// Tint channel index, matched against [`TintLayer::index`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub index: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mask_type: Option<TintMaskType>,
    /// Reference to the [`ColorRecord`] used when an NPC picks nothing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preset_default: Option<FormKey>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub presets: Vec<TintPreset>,
}

impl TintAssets {
    /// A skin tone mask with the given channel index.
    pub fn skin_tone(index: u16, preset_default: FormKey, presets: Vec<TintPreset>) -> Self {
        Self {
            index: Some(index),
            mask_type: Some(TintMaskType::SkinTone),
            preset_default: Some(preset_default),
            presets,
        }
    }
}

/// Sex-specific head data.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadDataSex {
    #[cfg_attr(feature = "serde", serde(default))]
    pub tint_masks: Vec<TintAssets>,
}

/// Head data of a race, split by sex.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadData {
    #[cfg_attr(feature = "serde", serde(default))]
    pub male: Option<HeadDataSex>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub female: Option<HeadDataSex>,
}

impl HeadData {
    /// Head data for one sex.
    #[inline]
    pub fn for_sex(&self, sex: Sex) -> Option<&HeadDataSex> {
        match sex {
            Sex::Male => self.male.as_ref(),
            Sex::Female => self.female.as_ref(),
        }
    }
}

/// A race record (RACE).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Race {
    pub form_key: FormKey,
    #[cfg_attr(feature = "serde", serde(default))]
    pub editor_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub head_data: Option<HeadData>,
}

impl Race {
    pub fn new(form_key: FormKey) -> Self {
        Self {
            form_key,
            editor_id: None,
            head_data: None,
        }
    }

    /// Set the same tint masks for both sexes.
    pub fn with_tint_masks(mut self, masks: Vec<TintAssets>) -> Self {
        self.head_data = Some(HeadData {
            male: Some(HeadDataSex { tint_masks: masks.clone() }),
            female: Some(HeadDataSex { tint_masks: masks }),
        });
        self
    }
}

/// Character sex as encoded in the NPC configuration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

/// NPC configuration (ACBS) flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NpcFlags(pub u32);

impl NpcFlags {
    pub const FEMALE: Self = Self(0x0000_0001);
    pub const ESSENTIAL: Self = Self(0x0000_0002);
    pub const IS_CHAR_GEN_FACE_PRESET: Self = Self(0x0000_0004);
    pub const UNIQUE: Self = Self(0x0000_0020);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

/// NPC configuration block.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcConfiguration {
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: NpcFlags,
}

/// A per-NPC tint layer.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TintLayer {
    /// Tint channel, matched against [`TintAssets::index`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub index: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Option<Rgb>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interpolation_value: Option<f32>,
    /// Preset index into the race mask; `-1` means "literal color".
    #[cfg_attr(feature = "serde", serde(default))]
    pub preset: Option<i16>,
}

impl TintLayer {
    /// Sentinel preset value meaning the layer color is not preset driven.
    pub const NO_PRESET: i16 = -1;

    pub fn new(index: u16) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }
}

/// A character record (NPC_).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    pub form_key: FormKey,
    #[cfg_attr(feature = "serde", serde(default))]
    pub editor_id: Option<String>,
    pub race: FormKey,
    #[cfg_attr(feature = "serde", serde(default))]
    pub configuration: NpcConfiguration,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tint_layers: Option<Vec<TintLayer>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub texture_lighting: Option<Rgb>,
}

impl Npc {
    pub fn new(form_key: FormKey, race: FormKey) -> Self {
        Self {
            form_key,
            editor_id: None,
            race,
            configuration: NpcConfiguration::default(),
            tint_layers: None,
            texture_lighting: None,
        }
    }

    /// Sex from the configuration flags.
    #[inline]
    pub fn sex(&self) -> Sex {
        if self.configuration.flags.contains(NpcFlags::FEMALE) {
            Sex::Female
        } else {
            Sex::Male
        }
    }

    /// First tint layer on the given channel.
    pub fn tint_layer(&self, index: u16) -> Option<&TintLayer> {
        self.tint_layers
            .as_ref()?
            .iter()
            .find(|layer| layer.index == Some(index))
    }

    /// Mutable access to the first tint layer on the given channel.
    pub fn tint_layer_mut(&mut self, index: u16) -> Option<&mut TintLayer> {
        self.tint_layers
            .as_mut()?
            .iter_mut()
            .find(|layer| layer.index == Some(index))
    }

    /// Append a tint layer, creating the list if the record has none.
    pub fn push_tint_layer(&mut self, layer: TintLayer) {
        self.tint_layers.get_or_insert_with(Vec::new).push(layer);
    }

    /// Display label: editor id if present, form key otherwise.
    pub fn label(&self) -> String {
        match &self.editor_id {
            Some(id) => format!("{id} [{}]", self.form_key),
            None => self.form_key.to_string(),
        }
    }
}
