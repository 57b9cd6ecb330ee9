//! Paths locating the value currently being validated.
//!
//! Every rule receives a [`JsonPath`] naming the attribute it checks, built
//! from the schema keys walked so far and, inside [`each`](crate::each), the
//! index of the array element.

use std::fmt::{self, Display};

/// A segment of a validation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A schema key (e.g. `car`, `engine`)
    Field(String),
    /// An array element position inside `each`
    Index(usize),
}

impl PathSegment {
    /// Returns the segment in its string form; indices are stringified.
    pub fn as_key(&self) -> String {
        match self {
            PathSegment::Field(name) => name.clone(),
            PathSegment::Index(idx) => idx.to_string(),
        }
    }
}

/// An immutable path from the validated root to the current attribute.
///
/// Extending a path never modifies it; each step produces a new value, so a
/// parent path can be shared by all of its children.
///
/// # Example
///
/// ```rust
/// use rulebook::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("car")
///     .push_field("colors")
///     .push_index(0)
///     .push_field("hex");
///
/// assert_eq!(path.keys(), vec!["car", "colors", "0", "hex"]);
/// assert_eq!(path.dotted(), "car.colors.0.hex");
/// assert_eq!(path.to_string(), "car.colors[0].hex");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the validated root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the segments as strings, indices included.
    pub fn keys(&self) -> Vec<String> {
        self.segments.iter().map(PathSegment::as_key).collect()
    }

    /// Joins all segments with `.`, the form used in schema-shape messages.
    pub fn dotted(&self) -> String {
        self.keys().join(".")
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_empty() {
        let path = JsonPath::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
        assert_eq!(path.dotted(), "");
        assert!(path.keys().is_empty());
    }

    #[test]
    fn test_nested_fields() {
        let path = JsonPath::root().push_field("car").push_field("engine");
        assert_eq!(path.to_string(), "car.engine");
        assert_eq!(path.dotted(), "car.engine");
    }

    #[test]
    fn test_index_is_stringified_in_keys() {
        let path = JsonPath::from_field("colors").push_index(3);
        assert_eq!(path.keys(), vec!["colors".to_string(), "3".to_string()]);
        assert_eq!(path.to_string(), "colors[3]");
        assert_eq!(path.dotted(), "colors.3");
    }

    #[test]
    fn test_path_immutability() {
        let base = JsonPath::root().push_field("colors");
        let path_a = base.push_index(0);
        let path_b = base.push_index(1);

        assert_eq!(base.to_string(), "colors");
        assert_eq!(path_a.to_string(), "colors[0]");
        assert_eq!(path_b.to_string(), "colors[1]");
    }

    #[test]
    fn test_last_segment() {
        let path = JsonPath::root().push_field("colors").push_index(0);
        assert_eq!(path.last(), Some(&PathSegment::Index(0)));
        assert_eq!(JsonPath::root().last(), None);
    }

    #[test]
    fn test_segments_iterator() {
        let path = JsonPath::root()
            .push_field("a")
            .push_index(1)
            .push_field("b");

        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], &PathSegment::Field("a".to_string()));
        assert_eq!(segments[1], &PathSegment::Index(1));
        assert_eq!(segments[2], &PathSegment::Field("b".to_string()));
    }
}
