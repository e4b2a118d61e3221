//! URL slug derivation for conferences.
//!
//! Slugs are derived from the acronym: `"ICINSE-2025"` becomes
//! `"icinse2025"`. Collisions resolve with a linear probe (`base`, `base1`,
//! `base2`, ...).

/// Normalizes an acronym into a URL-safe slug.
///
/// Lowercases, drops spaces, hyphens, and underscores, then keeps only
/// ASCII lowercase letters and digits. A missing or unusable acronym yields
/// an empty string; callers treat that as "no slug".
#[must_use]
pub fn generate_slug(acronym: Option<&str>) -> String {
    acronym
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Probes `base`, `base1`, `base2`, ... until `is_taken` clears a candidate.
///
/// Terminates because the candidate sequence is infinite while the set of
/// taken slugs is finite.
#[must_use]
pub fn resolve_conflict<F>(base: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !is_taken(base) {
        return base.to_owned();
    }

    let mut suffix = 1u64;
    loop {
        let candidate = format!("{base}{suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_slug_normalizes() {
        assert_eq!(generate_slug(Some("ICINSE-2025")), "icinse2025");
        assert_eq!(generate_slug(Some("Ic In_Se 2025")), "icinse2025");
        assert_eq!(generate_slug(Some("ICSE'26!")), "icse26");
    }

    #[test]
    fn test_generate_slug_empty_inputs() {
        assert_eq!(generate_slug(None), "");
        assert_eq!(generate_slug(Some("")), "");
        assert_eq!(generate_slug(Some("   ")), "");
        assert_eq!(generate_slug(Some("---___")), "");
    }

    #[test]
    fn test_resolve_conflict_probes_linearly() {
        let taken: HashSet<&str> = ["icse", "icse1", "icse2"].into();
        assert_eq!(resolve_conflict("icse", |c| taken.contains(c)), "icse3");
        assert_eq!(resolve_conflict("free", |c| taken.contains(c)), "free");
    }
}
