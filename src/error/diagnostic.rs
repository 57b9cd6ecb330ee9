//! Diagnostics and the sparse error tree.
//!
//! A failing rule produces a [`Diagnostic`]; the engine collects them into an
//! [`ErrorTree`] that mirrors the schema, keeping only the failing branches.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::path::JsonPath;

/// The error payload produced by a failing rule.
///
/// Most rules report a [`Message`](Diagnostic::Message). Nested schemas
/// report a [`Tree`](Diagnostic::Tree), and [`each`](crate::each) reports
/// [`Items`](Diagnostic::Items) with one slot per array element.
///
/// # Example
///
/// ```rust
/// use rulebook::Diagnostic;
///
/// let diagnostic = Diagnostic::from("Must be string");
/// assert!(diagnostic.is_error());
/// assert_eq!(diagnostic.as_message(), Some("Must be string"));
///
/// // An empty message carries no error.
/// assert!(!Diagnostic::from("").is_error());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A flat, human-readable message.
    Message(String),
    /// Errors of a nested schema, keyed by attribute.
    Tree(ErrorTree),
    /// Positional results of an array check; `None` marks a passing element.
    Items(Vec<Option<Diagnostic>>),
}

impl Diagnostic {
    /// Creates a message diagnostic.
    pub fn message(message: impl Into<String>) -> Self {
        Diagnostic::Message(message.into())
    }

    /// Returns true if this diagnostic carries at least one error.
    ///
    /// Empty messages, empty trees and item lists whose every slot passes
    /// are treated as success.
    pub fn is_error(&self) -> bool {
        match self {
            Diagnostic::Message(message) => !message.is_empty(),
            Diagnostic::Tree(tree) => !tree.is_empty(),
            Diagnostic::Items(items) => items.iter().flatten().any(Diagnostic::is_error),
        }
    }

    /// Prunes a rule result down to its failing parts.
    ///
    /// Returns `None` when nothing failed. Trees lose their passing keys and
    /// item lists keep their length, with passing slots set to `None`.
    pub fn normalize(result: Option<Diagnostic>) -> Option<Diagnostic> {
        match result? {
            Diagnostic::Message(message) if message.is_empty() => None,
            Diagnostic::Message(message) => Some(Diagnostic::Message(message)),
            Diagnostic::Tree(tree) => {
                let pruned: IndexMap<_, _> = tree
                    .0
                    .into_iter()
                    .filter_map(|(key, diag)| Diagnostic::normalize(Some(diag)).map(|d| (key, d)))
                    .collect();
                ErrorTree(pruned).into_diagnostic()
            }
            Diagnostic::Items(items) => {
                let items: Vec<_> = items.into_iter().map(Diagnostic::normalize).collect();
                if items.iter().any(Option::is_some) {
                    Some(Diagnostic::Items(items))
                } else {
                    None
                }
            }
        }
    }

    pub fn as_message(&self) -> Option<&str> {
        match self {
            Diagnostic::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ErrorTree> {
        match self {
            Diagnostic::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&[Option<Diagnostic>]> {
        match self {
            Diagnostic::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Converts the diagnostic into plain JSON.
    ///
    /// Messages become strings, trees become objects and item lists become
    /// arrays with `null` for passing elements.
    pub fn to_json(&self) -> Value {
        match self {
            Diagnostic::Message(message) => Value::String(message.clone()),
            Diagnostic::Tree(tree) => tree.to_json(),
            Diagnostic::Items(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map_or(Value::Null, Diagnostic::to_json))
                    .collect(),
            ),
        }
    }

    fn collect_leaves(&self, path: &JsonPath, out: &mut Vec<FieldError>) {
        match self {
            Diagnostic::Message(message) => out.push(FieldError {
                path: path.clone(),
                message: message.clone(),
            }),
            Diagnostic::Tree(tree) => {
                for (key, diag) in tree.iter() {
                    diag.collect_leaves(&path.push_field(key), out);
                }
            }
            Diagnostic::Items(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if let Some(diag) = item {
                        diag.collect_leaves(&path.push_index(idx), out);
                    }
                }
            }
        }
    }
}

impl From<&str> for Diagnostic {
    fn from(message: &str) -> Self {
        Diagnostic::Message(message.to_string())
    }
}

impl From<String> for Diagnostic {
    fn from(message: String) -> Self {
        Diagnostic::Message(message)
    }
}

impl From<ErrorTree> for Diagnostic {
    fn from(tree: ErrorTree) -> Self {
        Diagnostic::Tree(tree)
    }
}

/// A single failing leaf of an [`ErrorTree`], with its full path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Where the failing value sits in the validated data.
    pub path: JsonPath,
    /// The message reported by the rule.
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Sparse, ordered map of failing attributes.
///
/// The engine only inserts keys whose evaluation failed and never hands out
/// an empty tree; keys keep schema order.
///
/// # Example
///
/// ```rust
/// use rulebook::{Diagnostic, ErrorTree};
///
/// let mut engine = ErrorTree::new();
/// engine.insert("cylinders", Diagnostic::from("Must be an integer"));
///
/// let mut car = ErrorTree::new();
/// car.insert("engine", Diagnostic::from(engine));
///
/// let diag = car.at(&["engine", "cylinders"]).unwrap();
/// assert_eq!(diag.as_message(), Some("Must be an integer"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorTree(IndexMap<String, Diagnostic>);

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a diagnostic under `key`, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, diagnostic: Diagnostic) {
        self.0.insert(key.into(), diagnostic);
    }

    pub fn get(&self, key: &str) -> Option<&Diagnostic> {
        self.0.get(key)
    }

    /// Follows a sequence of keys through nested trees and item lists.
    ///
    /// Numeric keys select positions inside [`Diagnostic::Items`].
    pub fn at<S: AsRef<str>>(&self, keys: &[S]) -> Option<&Diagnostic> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.get(first.as_ref())?;
        for key in rest {
            current = match current {
                Diagnostic::Tree(tree) => tree.get(key.as_ref())?,
                Diagnostic::Items(items) => {
                    let idx: usize = key.as_ref().parse().ok()?;
                    items.get(idx)?.as_ref()?
                }
                Diagnostic::Message(_) => return None,
            };
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flattens the tree into its failing leaves, in schema order.
    pub fn leaves(&self) -> Vec<FieldError> {
        let mut out = Vec::new();
        let root = JsonPath::root();
        for (key, diag) in self.iter() {
            diag.collect_leaves(&root.push_field(key), &mut out);
        }
        out
    }

    /// Converts the tree into a JSON object.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(key, diag)| (key.clone(), diag.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Wraps the tree as a diagnostic, or `None` if it holds no errors.
    pub fn into_diagnostic(self) -> Option<Diagnostic> {
        if self.is_empty() {
            None
        } else {
            Some(Diagnostic::Tree(self))
        }
    }
}

impl Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leaves = self.leaves();
        writeln!(f, "Validation failed with {} error(s):", leaves.len())?;
        for (i, leaf) in leaves.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, leaf)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

impl IntoIterator for ErrorTree {
    type Item = (String, Diagnostic);
    type IntoIter = indexmap::map::IntoIter<String, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Trees cross task boundaries with the futures that build them.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorTree>();
    assert_sync::<ErrorTree>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(entries: Vec<(&str, Diagnostic)>) -> ErrorTree {
        let mut tree = ErrorTree::new();
        for (key, diag) in entries {
            tree.insert(key, diag);
        }
        tree
    }

    #[test]
    fn test_is_error() {
        assert!(Diagnostic::from("Required").is_error());
        assert!(!Diagnostic::from("").is_error());
        assert!(!Diagnostic::Tree(ErrorTree::new()).is_error());
        assert!(!Diagnostic::Items(vec![None, None]).is_error());
        assert!(Diagnostic::Items(vec![None, Some("bad".into())]).is_error());
        assert!(!Diagnostic::Items(vec![Some("".into())]).is_error());
    }

    #[test]
    fn test_normalize_prunes_passing_branches() {
        let nested = tree(vec![
            ("make", Diagnostic::from("")),
            ("model", Diagnostic::from("Unknown model")),
        ]);
        let result = Diagnostic::normalize(Some(Diagnostic::Tree(nested))).unwrap();
        let tree = result.as_tree().unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.contains_key("model"));
    }

    #[test]
    fn test_normalize_empty_results() {
        assert_eq!(Diagnostic::normalize(None), None);
        assert_eq!(Diagnostic::normalize(Some("".into())), None);
        assert_eq!(
            Diagnostic::normalize(Some(Diagnostic::Tree(tree(vec![("a", "".into())])))),
            None
        );
        assert_eq!(
            Diagnostic::normalize(Some(Diagnostic::Items(vec![None, Some("".into())]))),
            None
        );
    }

    #[test]
    fn test_normalize_keeps_item_positions() {
        let items = Diagnostic::Items(vec![Some("".into()), Some("bad".into()), None]);
        let normalized = Diagnostic::normalize(Some(items)).unwrap();

        assert_eq!(
            normalized.as_items().unwrap(),
            &[None, Some(Diagnostic::from("bad")), None]
        );
    }

    #[test]
    fn test_at_navigates_trees_and_items() {
        let hex = tree(vec![("hex", Diagnostic::from("Must be string"))]);
        let car = tree(vec![(
            "colors",
            Diagnostic::Items(vec![None, Some(Diagnostic::Tree(hex))]),
        )]);
        let root = tree(vec![("car", Diagnostic::Tree(car))]);

        let diag = root.at(&["car", "colors", "1", "hex"]).unwrap();
        assert_eq!(diag.as_message(), Some("Must be string"));
        assert!(root.at(&["car", "colors", "0"]).is_none());
        assert!(root.at(&["car", "colors", "x"]).is_none());
        assert!(root.at::<&str>(&[]).is_none());
    }

    #[test]
    fn test_leaves_and_display() {
        let engine = tree(vec![("cylinders", Diagnostic::from("Must be an integer"))]);
        let root = tree(vec![
            ("deal", Diagnostic::from("Must be string")),
            ("car", Diagnostic::Tree(tree(vec![("engine", Diagnostic::Tree(engine))]))),
        ]);

        let leaves = root.leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[1].path.to_string(), "car.engine.cylinders");

        let display = root.to_string();
        assert!(display.contains("2 error(s)"));
        assert!(display.contains("deal: Must be string"));
        assert!(display.contains("car.engine.cylinders: Must be an integer"));
    }

    #[test]
    fn test_to_json() {
        let root = tree(vec![
            ("deal", Diagnostic::from("Required")),
            ("sizes", Diagnostic::Items(vec![None, Some("Too small".into())])),
        ]);

        assert_eq!(
            root.to_json(),
            json!({ "deal": "Required", "sizes": [null, "Too small"] })
        );
    }
}
