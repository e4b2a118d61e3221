//! Conference-scoped submission numbering.
//!
//! Numbers look like `001P`, `027P`, `1000P`: a zero-padded minimum-3-digit
//! counter with a literal `P` suffix. They appear in stored filenames and
//! in display, and are assigned once per submission.

/// Computes the next number from the set already assigned in a conference.
///
/// Each existing value is parsed by stripping the trailing `P`; values that
/// do not match the pattern are skipped rather than rejected. The result is
/// `max + 1`, or `001P` when nothing parsed.
pub fn next_number<I, S>(existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let max = existing
        .into_iter()
        .filter_map(|value| value.as_ref().strip_suffix('P')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    format!("{:03}P", max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_is_001p() {
        assert_eq!(next_number(Vec::<String>::new()), "001P");
    }

    #[test]
    fn test_increments_past_the_maximum() {
        assert_eq!(next_number(["001P", "003P", "002P"]), "004P");
        assert_eq!(next_number(["026P"]), "027P");
    }

    #[test]
    fn test_malformed_values_are_skipped() {
        assert_eq!(next_number(["garbage", "12", "P", "-3P", "005P"]), "006P");
        assert_eq!(next_number(["garbage", "12", "P"]), "001P");
    }

    #[test]
    fn test_no_truncation_above_999() {
        assert_eq!(next_number(["999P"]), "1000P");
        assert_eq!(next_number(["1000P"]), "1001P");
    }

    #[test]
    fn test_gaps_do_not_get_reused() {
        assert_eq!(next_number(["001P", "005P"]), "006P");
    }
}
