use std::collections::HashMap;

use indexmap::IndexMap;

/// Resolves raw vendor strings to canonical names via the alias table.
///
/// Lookup is two-phase: an exact hit on the configured keys, then a fall
/// back over a case-folded index built once per run. When two alias keys
/// collide case-insensitively, the first declared key wins. There is no
/// fuzzy or partial matching; near-miss spellings stay as extracted.
pub struct VendorNormalizer {
    exact: IndexMap<String, String>,
    folded: HashMap<String, String>,
}

impl VendorNormalizer {
    pub fn new(aliases: &IndexMap<String, String>) -> Self {
        let mut folded = HashMap::with_capacity(aliases.len());
        for (raw, canonical) in aliases {
            folded
                .entry(raw.to_lowercase())
                .or_insert_with(|| canonical.clone());
        }
        Self { exact: aliases.clone(), folded }
    }

    /// Canonical form of a raw vendor string. Empty input passes through
    /// unchanged; unmatched input is returned trimmed but otherwise as-is.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return trimmed.to_string();
        }
        if let Some(canonical) = self.exact.get(trimmed) {
            return canonical.clone();
        }
        if let Some(canonical) = self.folded.get(&trimmed.to_lowercase()) {
            return canonical.clone();
        }
        trimmed.to_string()
    }
}
