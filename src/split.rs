//! Delimiter splitting for dotted identifier strings.

/// Split `s` at each occurrence of `delimiter`, cutting at the first
/// delimiter while the remainder is non-empty.
///
/// A leading delimiter yields an empty first segment and doubled delimiters
/// yield empty middle segments, but a trailing delimiter yields nothing: the
/// remainder after the final cut is empty, so the loop stops. The empty
/// string yields no segments.
pub fn split_delimited(s: &str, delimiter: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        match rest.find(delimiter) {
            Some(at) => {
                segments.push(&rest[..at]);
                rest = &rest[at + delimiter.len_utf8()..];
            }
            None => {
                segments.push(rest);
                break;
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_plain() {
        assert_eq!(
            split_delimited("Math.Mat44.MultiplyVector3", '.'),
            vec!["Math", "Mat44", "MultiplyVector3"]
        );
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(split_delimited("Math", '.'), vec!["Math"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_delimited("", '.').is_empty());
    }

    #[test]
    fn test_trailing_delimiter_dropped() {
        assert_eq!(split_delimited("a.b.", '.'), vec!["a", "b"]);
    }

    #[test]
    fn test_leading_delimiter_kept() {
        assert_eq!(split_delimited(".a", '.'), vec!["", "a"]);
    }

    #[test]
    fn test_doubled_delimiter() {
        assert_eq!(split_delimited("a..b", '.'), vec!["a", "", "b"]);
    }

    #[test]
    fn test_only_delimiter() {
        assert_eq!(split_delimited(".", '.'), vec![""]);
    }

    proptest! {
        #[test]
        fn prop_join_roundtrip(
            segments in proptest::collection::vec("[A-Za-z0-9]{1,8}", 1..6)
        ) {
            let joined = segments.join(".");
            prop_assert_eq!(split_delimited(&joined, '.'), segments);
        }

        #[test]
        fn prop_segments_never_contain_delimiter(s in "[a-c.]{0,16}") {
            for segment in split_delimited(&s, '.') {
                prop_assert!(!segment.contains('.'));
            }
        }
    }
}
