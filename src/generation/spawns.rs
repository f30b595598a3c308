//! # Spawn Tables
//!
//! Floor-scaled weighted selection of what to put in a room.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One weighted template, available from `min_floor` downwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub template_id: String,
    pub weight: u32,
    pub min_floor: u32,
}

impl SpawnEntry {
    pub fn new(template_id: &str, weight: u32, min_floor: u32) -> Self {
        Self {
            template_id: template_id.to_string(),
            weight,
            min_floor,
        }
    }
}

/// Weighted templates for one category of content (monsters, items, ...).
///
/// An id listed more than once has its weight overridden by the deepest entry
/// that applies, so a template can become more common further down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTable {
    pub entries: Vec<SpawnEntry>,
}

impl SpawnTable {
    pub fn new(entries: Vec<SpawnEntry>) -> Self {
        Self { entries }
    }

    /// Templates available on `floor` with their effective weights, in first-listed order.
    pub fn candidates(&self, floor: u32) -> Vec<(&str, u32)> {
        let mut candidates: Vec<(&str, u32, u32)> = Vec::new();
        for entry in self.entries.iter().filter(|entry| entry.min_floor <= floor) {
            match candidates
                .iter_mut()
                .find(|(id, _, _)| *id == entry.template_id)
            {
                Some(existing) if entry.min_floor >= existing.2 => {
                    existing.1 = entry.weight;
                    existing.2 = entry.min_floor;
                }
                Some(_) => {}
                None => candidates.push((entry.template_id.as_str(), entry.weight, entry.min_floor)),
            }
        }
        candidates
            .into_iter()
            .map(|(id, weight, _)| (id, weight))
            .collect()
    }

    /// Draws `count` template ids with replacement, weighted by floor.
    ///
    /// Empty when nothing is available on `floor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{SpawnEntry, SpawnTable};
    /// use rand::SeedableRng;
    ///
    /// let table = SpawnTable::new(vec![SpawnEntry::new("orc", 1, 0)]);
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    /// assert_eq!(table.choose(0, 3, &mut rng), vec!["orc", "orc", "orc"]);
    /// ```
    pub fn choose(&self, floor: u32, count: usize, rng: &mut StdRng) -> Vec<String> {
        let candidates = self.candidates(floor);
        let Ok(distribution) = WeightedIndex::new(candidates.iter().map(|(_, weight)| *weight))
        else {
            return Vec::new();
        };
        (0..count)
            .map(|_| candidates[distribution.sample(rng)].0.to_string())
            .collect()
    }
}

/// Step function over ascending `(min_floor, max_count)` thresholds.
///
/// # Examples
///
/// ```
/// use delve::max_count_for_floor;
///
/// let thresholds = [(1, 2), (4, 3), (6, 5)];
/// assert_eq!(max_count_for_floor(&thresholds, 0), 0);
/// assert_eq!(max_count_for_floor(&thresholds, 4), 3);
/// assert_eq!(max_count_for_floor(&thresholds, 9), 5);
/// ```
pub fn max_count_for_floor(thresholds: &[(u32, u32)], floor: u32) -> u32 {
    thresholds
        .iter()
        .take_while(|(min_floor, _)| *min_floor <= floor)
        .last()
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

/// How many entities a room gets: uniform in `0..=max_count_for_floor`.
pub fn roll_count(thresholds: &[(u32, u32)], floor: u32, rng: &mut StdRng) -> usize {
    rng.gen_range(0..=max_count_for_floor(thresholds, floor)) as usize
}
