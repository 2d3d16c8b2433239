//! Case-insensitive set of key names to drop

use ahash::AHashSet;
use std::borrow::Cow;

/// Key names excluded from the output, matched without regard to case
///
/// Names are stored case-folded (Unicode lowercase). Membership is a single
/// hash lookup; looking up an ASCII key with no uppercase letters does not
/// allocate.
///
/// Folding with full Unicode lowercase is broader than an ordinal
/// case-insensitive comparison: characters whose lowercase form is a plain
/// letter match that letter, so `"k"` also matches the KELVIN SIGN (U+212A)
/// and `"å"` matches the ANGSTROM SIGN (U+212B).
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    names: AHashSet<String>,
}

impl ExclusionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key name. Returns false when an equal name (ignoring case) is
    /// already present.
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(fold_case(name).into_owned())
    }

    /// Check whether `key` matches any excluded name, ignoring case
    pub fn contains(&self, key: &str) -> bool {
        if self.names.is_empty() {
            return false;
        }
        self.names.contains(fold_case(key).as_ref())
    }

    /// Number of distinct names (after case folding)
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no names are excluded
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the case-folded names, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name.as_ref());
        }
    }
}

/// Unicode lowercase, borrowed when `name` is already lowercase ASCII
fn fold_case(name: &str) -> Cow<'_, str> {
    if name.is_ascii() && !name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_lowercase())
    }
}
