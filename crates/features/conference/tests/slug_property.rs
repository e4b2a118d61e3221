use cmt_conference::slug::{generate_slug, resolve_conflict};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn slug_output_is_lowercase_alphanumeric(input in "[A-Za-z0-9 _-]{0,40}") {
        let slug = generate_slug(Some(&input));
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        prop_assert!(slug.len() <= input.len());
    }

    #[test]
    fn slug_is_idempotent(input in "[A-Za-z0-9 _-]{0,40}") {
        let once = generate_slug(Some(&input));
        prop_assert_eq!(generate_slug(Some(&once)), once.clone());
    }

    #[test]
    fn resolved_slug_is_never_taken(
        base in "[a-z0-9]{1,12}",
        taken_suffixes in prop::collection::hash_set(0u64..20, 0..10),
    ) {
        let taken: HashSet<String> = taken_suffixes
            .into_iter()
            .map(|n| if n == 0 { base.clone() } else { format!("{base}{n}") })
            .collect();

        let resolved = resolve_conflict(&base, |c| taken.contains(c));
        prop_assert!(!taken.contains(&resolved));
        prop_assert!(resolved.starts_with(base.as_str()));
    }
}

#[test]
fn known_acronym_examples() {
    assert_eq!(generate_slug(Some("ICINSE-2025")), "icinse2025");
    assert_eq!(generate_slug(None), "");
    assert_eq!(generate_slug(Some("")), "");
    assert_eq!(generate_slug(Some("   ")), "");
}
