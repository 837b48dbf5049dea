//! Issue selection policies
//!
//! A policy decides which catalog entries are reported for one document of a
//! given category. The default draws a random subset sized by
//! [`Category::cardinality`], so repeated audits of the same file can report
//! different findings.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{Category, Issue};

/// Strategy for picking findings for a single document
pub trait SelectionPolicy: Send + Sync {
    fn select(&self, category: Category, candidates: &[Issue]) -> Vec<Issue>;
}

/// Uniform random sample without replacement
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelection;

impl RandomSelection {
    /// Draw using a caller-supplied RNG (seed it for reproducible tests)
    pub fn select_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        category: Category,
        candidates: &[Issue],
    ) -> Vec<Issue> {
        let bounds = category.cardinality();
        // Never ask for more than the catalog holds
        let max = bounds.max.min(candidates.len());
        let min = bounds.min.min(max);
        let count = rng.gen_range(min..=max);

        candidates.choose_multiple(rng, count).cloned().collect()
    }
}

impl SelectionPolicy for RandomSelection {
    fn select(&self, category: Category, candidates: &[Issue]) -> Vec<Issue> {
        self.select_with_rng(&mut rand::thread_rng(), category, candidates)
    }
}

/// Deterministic policy: the first `max` candidates in catalog order
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingSelection;

impl SelectionPolicy for LeadingSelection {
    fn select(&self, category: Category, candidates: &[Issue]) -> Vec<Issue> {
        let count = category.cardinality().max.min(candidates.len());
        candidates[..count].to_vec()
    }
}
