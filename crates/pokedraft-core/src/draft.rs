// Draft generation: rejection sampling of evolution families.
//
// Every slot of every pick is filled by drawing a random chain id, fetching
// that family and keeping it only if its root species is not excluded and it
// is not already in the pick. Transient lookup failures count as one more
// rejected draw. Each slot gets a bounded number of draws so a dead catalog
// surfaces as an error instead of a request that never finishes.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::exclusions::Exclusions;
use crate::family::{Family, FamilyId, FAMILY_COUNT};
use crate::lookup::{FamilyLookup, LookupError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_PICK_COUNT: usize = 8;
pub const DEFAULT_OPTIONS_PER_PICK: usize = 4;
pub const DEFAULT_MAX_ATTEMPTS_PER_SLOT: u32 = 10_000;

/// Chain ids inside `1..=FAMILY_COUNT` that the catalog has no record for.
pub const MISSING_CHAIN_IDS: &[u32] = &[210, 222, 225, 226, 227, 231, 238, 251];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("no valid family found for pick {pick}, slot {slot} after {attempts} attempts")]
    Exhausted { pick: usize, slot: usize, attempts: u32 },

    #[error("family lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("family_count must be greater than 0")]
    EmptyCatalog,
}

// ---------------------------------------------------------------------------
// Draft structures
// ---------------------------------------------------------------------------

/// The families offered for one pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSet {
    pub families: Vec<Family>,
}

impl DraftSet {
    pub fn ids(&self) -> Vec<FamilyId> {
        self.families.iter().map(|f| f.id).collect()
    }

    pub fn contains(&self, id: FamilyId) -> bool {
        self.families.iter().any(|f| f.id == id)
    }
}

/// A complete draft: one [`DraftSet`] per pick, in pick order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub picks: Vec<DraftSet>,
}

impl Draft {
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.picks.iter().flat_map(|set| set.families.iter())
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables for the sampler. Deserialized from the `[draft]` config table;
/// every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    pub pick_count: usize,
    pub options_per_pick: usize,
    /// Ids are drawn uniformly from `1..=family_count`.
    pub family_count: u32,
    /// Draws allowed per slot before giving up with [`DraftError::Exhausted`].
    pub max_attempts_per_slot: u32,
    /// Reject families already offered in an earlier pick, not just the
    /// current one.
    pub unique_across_draft: bool,
    /// Ids that are rejected without a lookup.
    pub skip_chain_ids: Vec<u32>,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            pick_count: DEFAULT_PICK_COUNT,
            options_per_pick: DEFAULT_OPTIONS_PER_PICK,
            family_count: FAMILY_COUNT,
            max_attempts_per_slot: DEFAULT_MAX_ATTEMPTS_PER_SLOT,
            unique_across_draft: false,
            skip_chain_ids: MISSING_CHAIN_IDS.to_vec(),
        }
    }
}

impl DraftSettings {
    /// Number of distinct ids in `1..=family_count` that are not skipped.
    pub fn drawable_id_count(&self) -> usize {
        let skipped: HashSet<u32> = self
            .skip_chain_ids
            .iter()
            .copied()
            .filter(|id| (1..=self.family_count).contains(id))
            .collect();
        self.family_count as usize - skipped.len()
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Why a drawn id did not fill the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Skipped,
    Transient,
    Excluded,
    Duplicate,
}

pub struct DraftGenerator {
    lookup: Arc<dyn FamilyLookup>,
    exclusions: Arc<Exclusions>,
    settings: DraftSettings,
}

impl DraftGenerator {
    pub fn new(
        lookup: Arc<dyn FamilyLookup>,
        exclusions: Arc<Exclusions>,
        settings: DraftSettings,
    ) -> Self {
        Self {
            lookup,
            exclusions,
            settings,
        }
    }

    /// Generate a draft using a freshly seeded RNG.
    pub async fn generate_draft(&self) -> Result<Draft, DraftError> {
        let mut rng = StdRng::from_entropy();
        self.generate_draft_with(&mut rng).await
    }

    /// Generate a draft drawing ids from `rng`. Given the same RNG state and
    /// the same lookup answers, the result is identical.
    pub async fn generate_draft_with<R>(&self, rng: &mut R) -> Result<Draft, DraftError>
    where
        R: Rng + Send,
    {
        if self.settings.family_count == 0 {
            return Err(DraftError::EmptyCatalog);
        }

        let mut picks: Vec<DraftSet> = Vec::with_capacity(self.settings.pick_count);
        let mut lookups = 0u32;

        for pick in 0..self.settings.pick_count {
            let mut families: Vec<Family> = Vec::with_capacity(self.settings.options_per_pick);
            for slot in 0..self.settings.options_per_pick {
                let (family, attempts) = self
                    .fill_slot(rng, &picks, &families, pick, slot)
                    .await?;
                lookups += attempts;
                families.push(family);
            }
            picks.push(DraftSet { families });
        }

        info!(
            picks = picks.len(),
            options = self.settings.options_per_pick,
            draws = lookups,
            "draft generated"
        );
        Ok(Draft { picks })
    }

    /// Draw until one family is accepted for this slot. Returns the family and
    /// the number of draws it took.
    async fn fill_slot<R>(
        &self,
        rng: &mut R,
        earlier: &[DraftSet],
        current: &[Family],
        pick: usize,
        slot: usize,
    ) -> Result<(Family, u32), DraftError>
    where
        R: Rng + Send,
    {
        let max = self.settings.max_attempts_per_slot;
        let (pick, slot) = (pick + 1, slot + 1);
        for attempt in 1..=max {
            let id = FamilyId(rng.gen_range(1..=self.settings.family_count));
            match self.try_family(id, earlier, current).await? {
                Ok(family) => return Ok((family, attempt)),
                Err(reason) => {
                    debug!(%id, pick, slot, attempt, ?reason, "draw rejected");
                }
            }
        }

        warn!(pick, slot, attempts = max, "giving up on slot");
        Err(DraftError::Exhausted {
            pick,
            slot,
            attempts: max,
        })
    }

    /// One draw. The outer `Result` carries fatal errors; the inner one says
    /// whether the family was accepted.
    async fn try_family(
        &self,
        id: FamilyId,
        earlier: &[DraftSet],
        current: &[Family],
    ) -> Result<Result<Family, Rejection>, DraftError> {
        if self.settings.skip_chain_ids.contains(&id.0) {
            return Ok(Err(Rejection::Skipped));
        }

        let family = match self.lookup.lookup(id).await {
            Ok(family) => family,
            Err(e) if e.is_transient() => {
                warn!(%id, error = %e, "family lookup failed, drawing again");
                return Ok(Err(Rejection::Transient));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(kind) = self.exclusions.check(family.root_name()) {
            debug!(%id, root = family.root_name(), %kind, "excluded root species");
            return Ok(Err(Rejection::Excluded));
        }

        let in_current = current.iter().any(|f| f.id == family.id);
        let in_earlier =
            self.settings.unique_across_draft && earlier.iter().any(|set| set.contains(family.id));
        if in_current || in_earlier {
            return Ok(Err(Rejection::Duplicate));
        }

        Ok(Ok(family))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
