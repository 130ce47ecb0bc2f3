//! Region selection strategies.
//!
//! A selector spreads load across regions. It is consulted once per call,
//! before the call is made; a failed call is never re-sent to another
//! region.

use rand::seq::SliceRandom;

use af_domain::error::{Error, Result};

pub trait RegionSelector: Send + Sync {
    /// Pick one region from `candidates`. Empty candidates are a
    /// configuration error.
    fn select<'a>(&self, candidates: &'a [String]) -> Result<&'a str>;
}

fn no_regions() -> Error {
    Error::Config("llm.regions must list at least one region".into())
}

/// Uniform random choice. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRegionSelector;

impl RegionSelector for UniformRegionSelector {
    fn select<'a>(&self, candidates: &'a [String]) -> Result<&'a str> {
        candidates
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .ok_or_else(no_regions)
    }
}

/// Always the candidate at `index` (wrapping). For tests and pinned
/// deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRegionSelector {
    pub index: usize,
}

impl FixedRegionSelector {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl RegionSelector for FixedRegionSelector {
    fn select<'a>(&self, candidates: &'a [String]) -> Result<&'a str> {
        if candidates.is_empty() {
            return Err(no_regions());
        }
        Ok(candidates[self.index % candidates.len()].as_str())
    }
}
