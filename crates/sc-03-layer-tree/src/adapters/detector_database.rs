//! # Detector Database
//!
//! Memoizes detector computation by local pattern. Large layouts repeat the
//! same few neighbourhoods over and over, so most lookups are hits.
//!
//! Patterns are keyed by the SHA-256 digest of their `bincode` encoding.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::algorithms::flows::LocalPattern;
use crate::domain::detectors::RelativeDetector;
use crate::domain::errors::TreeError;

/// SHA-256 digest of an encoded local pattern.
pub type Fingerprint = [u8; 32];

/// Fingerprint `pattern`.
pub fn fingerprint(pattern: &LocalPattern) -> Result<Fingerprint, TreeError> {
    let encoded = bincode::serialize(pattern).map_err(|e| TreeError::Encoding(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    Ok(hash)
}

/// Cache of relative detectors keyed by pattern fingerprint.
#[derive(Clone, Debug, Default)]
pub struct DetectorDatabase {
    entries: HashMap<Fingerprint, Vec<RelativeDetector>>,
    /// Lookups answered from the cache
    hits: u64,
    /// Lookups that required a computation
    misses: u64,
}

impl DetectorDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached detectors of `pattern`, computed with `compute` on a miss.
    pub fn get_or_compute<F>(
        &mut self,
        pattern: &LocalPattern,
        compute: F,
    ) -> Result<Vec<RelativeDetector>, TreeError>
    where
        F: FnOnce(&LocalPattern) -> Vec<RelativeDetector>,
    {
        let key = fingerprint(pattern)?;
        if let Some(detectors) = self.entries.get(&key) {
            self.hits += 1;
            debug!(hits = self.hits, "Detector database hit");
            return Ok(detectors.clone());
        }
        self.misses += 1;
        let detectors = compute(pattern);
        self.entries.insert(key, detectors.clone());
        Ok(detectors)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
