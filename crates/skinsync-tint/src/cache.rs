//! Per-run memoization of race skin profiles.

use std::hash::BuildHasherDefault;
use std::rc::Rc;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use skinsync_common::FormKey;
use skinsync_records::{RecordSource, Sex};

use crate::profile::SkinProfile;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Skin profiles of a race for both sexes.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceProfile {
    pub male: Option<Rc<SkinProfile>>,
    pub female: Option<Rc<SkinProfile>>,
}

impl RaceProfile {
    /// Profile for one sex.
    #[inline]
    pub fn for_sex(&self, sex: Sex) -> Option<&Rc<SkinProfile>> {
        match sex {
            Sex::Male => self.male.as_ref(),
            Sex::Female => self.female.as_ref(),
        }
    }
}

/// Hit/miss counters of a [`RaceProfileCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Lazily filled map from race to its resolved [`RaceProfile`].
///
/// Absence is cached too: a race that cannot be resolved, or that has no
/// profile for either sex, is looked at once. The cache belongs to a single
/// run; race data is assumed not to change while it is alive.
#[derive(Debug, Default)]
pub struct RaceProfileCache {
    entries: FxHashMap<FormKey, Option<RaceProfile>>,
    stats: CacheStats,
}

impl RaceProfileCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile of the race `race`, resolving it on first request.
    pub fn get<S: RecordSource + ?Sized>(&mut self, source: &S, race: &FormKey) -> Option<RaceProfile> {
        if let Some(entry) = self.entries.get(race) {
            self.stats.hits += 1;
            return entry.clone();
        }

        self.stats.misses += 1;
        let profile = Self::resolve(source, race);
        if profile.is_none() {
            tracing::debug!(race = %race, "race has no skin profile");
        }
        self.entries.insert(race.clone(), profile.clone());
        profile
    }

    fn resolve<S: RecordSource + ?Sized>(source: &S, key: &FormKey) -> Option<RaceProfile> {
        let race = source.race(key)?;
        let male = SkinProfile::resolve(source, race, Sex::Male).map(Rc::new);
        let female = SkinProfile::resolve(source, race, Sex::Female).map(Rc::new);

        if male.is_none() && female.is_none() {
            return None;
        }
        Some(RaceProfile { male, female })
    }

    /// Number of races looked at so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was resolved yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters.
    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
