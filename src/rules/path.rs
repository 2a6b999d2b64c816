use std::{fmt, str::FromStr};

use nonempty::NonEmpty;

/// The location of a value inside nested data: one or more segments,
/// written in dotted form as `ce.cableOrAdapter.cableLength`.
///
/// A path always has at least one segment. The first segment is the root
/// key a serialization was started under; each further segment is a mapping
/// key along the descent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: NonEmpty<String>,
}

impl Path {
    /// A single-segment path at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ParsePathError::Empty`] if `root` is the empty string.
    pub fn new(root: &str) -> Result<Self, ParsePathError> {
        if root.is_empty() {
            return Err(ParsePathError::Empty);
        }
        Ok(Self {
            segments: NonEmpty::new(root.to_string()),
        })
    }

    /// This path extended by one further segment.
    ///
    /// # Errors
    ///
    /// Returns [`ParsePathError::EmptySegment`] if `segment` is the empty
    /// string; a path never holds empty segments.
    pub fn join(&self, segment: &str) -> Result<Self, ParsePathError> {
        if segment.is_empty() {
            return Err(ParsePathError::EmptySegment(format!("{self}.")));
        }
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// The root (first) segment.
    #[must_use]
    pub fn root(&self) -> &str {
        self.segments.first()
    }

    /// The final segment.
    #[must_use]
    pub fn last(&self) -> &str {
        self.segments.last()
    }

    /// Number of segments. Always at least one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Segments in order, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParsePathError::Empty);
        }
        let mut segments = Vec::new();
        for segment in s.split('.') {
            if segment.is_empty() {
                return Err(ParsePathError::EmptySegment(s.to_string()));
            }
            segments.push(segment.to_string());
        }
        let segments = NonEmpty::from_vec(segments).ok_or(ParsePathError::Empty)?;
        Ok(Self { segments })
    }
}

impl TryFrom<&str> for Path {
    type Error = ParsePathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Errors raised while parsing a dotted path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParsePathError {
    /// The input had no segments at all.
    #[error("a path must have at least one segment")]
    Empty,
    /// The input contained an empty segment, e.g. `a..b` or `.a`.
    #[error("empty segment in path '{0}'")]
    EmptySegment(String),
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{ParsePathError, Path};

    #[test_case("ce", 1 ; "single segment")]
    #[test_case("ce.cableOrAdapter", 2 ; "two segments")]
    #[test_case("ce.cableOrAdapter.cableLength", 3 ; "three segments")]
    fn parse_and_display_round_trip(input: &str, depth: usize) {
        let path: Path = input.parse().unwrap();
        assert_eq!(path.depth(), depth);
        assert_eq!(path.to_string(), input);
    }

    #[test_case("" ; "empty input")]
    fn empty_input_is_rejected(input: &str) {
        assert_eq!(input.parse::<Path>().unwrap_err(), ParsePathError::Empty);
    }

    #[test_case("a..b" ; "interior")]
    #[test_case(".a" ; "leading")]
    #[test_case("a." ; "trailing")]
    fn empty_segments_are_rejected(input: &str) {
        assert!(matches!(
            input.parse::<Path>().unwrap_err(),
            ParsePathError::EmptySegment(_)
        ));
    }

    #[test]
    fn join_extends_the_path() {
        let path = Path::new("ce").unwrap().join("cableOrAdapter").unwrap();
        assert_eq!(path.to_string(), "ce.cableOrAdapter");
        assert_eq!(path.root(), "ce");
        assert_eq!(path.last(), "cableOrAdapter");
    }

    #[test]
    fn join_rejects_empty_segments() {
        let error = Path::new("ce").unwrap().join("").unwrap_err();
        assert_eq!(error, ParsePathError::EmptySegment("ce.".to_string()));
    }

    #[test]
    fn new_rejects_empty_root() {
        assert_eq!(Path::new("").unwrap_err(), ParsePathError::Empty);
    }

    #[test]
    fn segments_iterate_root_first() {
        let path: Path = "a.b.c".parse().unwrap();
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, ["a", "b", "c"]);
    }
}
