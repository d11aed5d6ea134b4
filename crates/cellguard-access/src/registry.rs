use cellguard_core::{CellGuardError, DEFAULT_CLEARANCES, Result, Tier, normalize_identity};
use std::collections::HashMap;
use tracing::debug;

/// Frozen mapping from identity token to clearance tier.
///
/// Entries are fixed at construction; there is no way to add, remove, or
/// re-tier an identity afterwards.
#[derive(Debug, Clone)]
pub struct ClearanceRegistry {
    entries: HashMap<String, Tier>,
}

impl Default for ClearanceRegistry {
    /// The contingency table: one operator per tier.
    fn default() -> Self {
        let entries = DEFAULT_CLEARANCES
            .iter()
            .map(|(id, tier)| (id.to_string(), *tier))
            .collect();
        Self { entries }
    }
}

impl ClearanceRegistry {
    /// Build a registry from `(identity, tier)` pairs.
    ///
    /// Identities are normalized before insertion. Two entries that normalize to
    /// the same key must agree on the tier; a blank identity is rejected.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Tier)>,
        S: AsRef<str>,
    {
        let mut map: HashMap<String, Tier> = HashMap::new();
        for (raw, tier) in entries {
            let key = normalize_identity(raw.as_ref()).ok_or_else(|| {
                CellGuardError::Config("clearance registry contains an empty identity".into())
            })?;
            match map.get(&key) {
                Some(existing) if *existing != tier => {
                    return Err(CellGuardError::DuplicateIdentity(key));
                }
                Some(_) => debug!(identity = %key, "duplicate registry entry with matching tier"),
                None => {
                    map.insert(key, tier);
                }
            }
        }
        Ok(Self { entries: map })
    }

    /// Resolve an identity to its tier. Case-insensitive, ignores surrounding whitespace.
    /// Blank and unregistered identities both resolve to `None`.
    pub fn lookup(&self, identity: &str) -> Option<Tier> {
        let key = normalize_identity(identity)?;
        self.entries.get(&key).copied()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.lookup(identity).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
