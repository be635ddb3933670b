//! Tag maps
//!
//! Metering sources report tags as two positional sequences: the titles and
//! the values. The pipeline works on the collapsed key → value map.

use std::collections::BTreeMap;

use crate::error::ImportError;

/// Tag key → tag value
pub type Tags = BTreeMap<String, String>;

/// Pairs tag titles with tag values by position
///
/// Later duplicate titles overwrite earlier ones. Sequences of different
/// length are rejected instead of being truncated.
pub fn tags_from_pairs<T, V>(titles: &[T], values: &[V]) -> Result<Tags, ImportError>
where
    T: AsRef<str>,
    V: AsRef<str>,
{
    if titles.len() != values.len() {
        return Err(ImportError::TagArityMismatch {
            titles: titles.len(),
            values: values.len(),
        });
    }

    Ok(titles
        .iter()
        .zip(values)
        .map(|(title, value)| (title.as_ref().to_string(), value.as_ref().to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_positionally() {
        let tags = tags_from_pairs(
            &["cluster", "project", "pod", "customer"],
            &["abbot1", "billing", "libellum-9sd3d", "982341"],
        )
        .unwrap();

        assert_eq!(tags.len(), 4);
        assert_eq!(tags["pod"], "libellum-9sd3d");
        assert_eq!(tags["customer"], "982341");
    }

    #[test]
    fn test_later_duplicate_wins() {
        let tags = tags_from_pairs(&["pod", "pod"], &["first", "second"]).unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags["pod"], "second");
    }

    #[test]
    fn test_arity_mismatch_fails() {
        let result = tags_from_pairs(&["cluster", "project"], &["abbot1"]);

        assert_eq!(
            result,
            Err(ImportError::TagArityMismatch { titles: 2, values: 1 })
        );
    }

    #[test]
    fn test_empty_sequences() {
        let empty: [&str; 0] = [];
        assert!(tags_from_pairs(&empty, &empty).unwrap().is_empty());
    }
}
