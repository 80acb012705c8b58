//! Record identity - plugin-qualified form keys.
//!
//! Every record in a load order is identified by the plugin that first
//! defines it plus a 24-bit local id. Overrides in later plugins keep the
//! same key, which is what makes "winning override" resolution possible.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::Error;

/// Highest local id a plugin can address.
const MAX_FORM_ID: u32 = 0x00FF_FFFF;

/// Kind of plugin, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModType {
    Master,
    Plugin,
    Light,
}

impl ModType {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "esm" => Some(Self::Master),
            "esp" => Some(Self::Plugin),
            "esl" => Some(Self::Light),
            _ => None,
        }
    }
}

/// A plugin file name such as `Skyrim.esm`.
///
/// Comparison and hashing are ASCII case-insensitive, the original spelling
/// is kept for display.
#[derive(Clone)]
pub struct ModKey {
    file_name: String,
    mod_type: ModType,
}

impl ModKey {
    /// Parse a plugin file name.
    pub fn new(file_name: impl Into<String>) -> Result<Self, Error> {
        let file_name = file_name.into();
        let (stem, ext) = file_name
            .rsplit_once('.')
            .ok_or_else(|| Error::InvalidModKey(file_name.clone()))?;

        if stem.is_empty() || stem.contains(':') {
            return Err(Error::InvalidModKey(file_name));
        }

        let mod_type = ModType::from_extension(ext).ok_or_else(|| Error::InvalidModKey(file_name.clone()))?;

        Ok(Self { file_name, mod_type })
    }

    /// Build a key from a stem and kind, e.g. `("Skyrim", ModType::Master)`.
    pub fn from_name(stem: &str, mod_type: ModType) -> Self {
        let ext = match mod_type {
            ModType::Master => "esm",
            ModType::Plugin => "esp",
            ModType::Light => "esl",
        };
        Self {
            file_name: format!("{stem}.{ext}"),
            mod_type,
        }
    }

    /// The plugin file name as written.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The plugin kind.
    #[inline]
    pub fn mod_type(&self) -> ModType {
        self.mod_type
    }
}

impl PartialEq for ModKey {
    fn eq(&self, other: &Self) -> bool {
        self.file_name.eq_ignore_ascii_case(&other.file_name)
    }
}

impl Eq for ModKey {}

impl Hash for ModKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.file_name.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Debug for ModKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModKey({})", self.file_name)
    }
}

impl fmt::Display for ModKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name)
    }
}

impl FromStr for ModKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identity of a record: local id plus the plugin that defines it.
///
/// Text form: `XXXXXX:Plugin.esp` with a six digit hex id.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FormKey {
    id: u32,
    mod_key: ModKey,
}

impl FormKey {
    /// Create a form key, rejecting ids above 24 bits.
    pub fn new(id: u32, mod_key: ModKey) -> Result<Self, Error> {
        if id > MAX_FORM_ID {
            return Err(Error::FormIdOutOfRange(id));
        }
        Ok(Self { id, mod_key })
    }

    /// Create a form key from a raw form id, dropping the load order byte.
    pub fn masked(raw_id: u32, mod_key: ModKey) -> Self {
        Self {
            id: raw_id & MAX_FORM_ID,
            mod_key,
        }
    }

    /// Local id within the defining plugin.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The defining plugin.
    #[inline]
    pub fn mod_key(&self) -> &ModKey {
        &self.mod_key
    }
}

impl fmt::Debug for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormKey({})", self)
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}:{}", self.id, self.mod_key)
    }
}

impl FromStr for FormKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, mod_key) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidFormKey(format!("missing ':' in {s:?}")))?;

        if id.is_empty() || id.len() > 6 {
            return Err(Error::InvalidFormKey(format!("expected 1-6 hex digits, got {id:?}")));
        }

        let id = u32::from_str_radix(id, 16)
            .map_err(|_| Error::InvalidFormKey(format!("invalid hex id {id:?}")))?;

        Self::new(id, mod_key.parse()?)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FormKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FormKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ModKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.file_name)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ModKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
