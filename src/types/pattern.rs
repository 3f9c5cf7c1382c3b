//! Expected-side patterns and the predicate capability.
//!
//! ## Variants
//!
//! A [`Pattern`] is one of a closed set of matchers:
//!
//! - [`Pattern::Literal`]: value equality
//! - [`Pattern::Regex`]: regex search against string items
//! - [`Pattern::Kind`]: type check against the item's [`ValueKind`]
//! - [`Pattern::Custom`]: caller-supplied test closure
//!
//! All of them are dispatched through the [`Matches`] trait, which is also
//! the seam for plugging in non-`Value` item types.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{BoxError, PredicateError};
use crate::types::{Value, ValueKind};

/// The predicate capability: "does this pattern match this item?"
///
/// An `Err` means the test itself failed and must abort the match.
pub trait Matches<I: ?Sized> {
    fn matches(&self, item: &I) -> Result<bool, PredicateError>;
}

type TestFn = dyn Fn(&Value) -> Result<bool, BoxError> + Send + Sync;

/// A caller-supplied predicate with a description for messages.
#[derive(Clone)]
pub struct CustomPredicate {
    description: String,
    test: Arc<TestFn>,
}

impl CustomPredicate {
    /// Create a predicate that may fail
    pub fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }

    /// Create a predicate that cannot fail
    pub fn infallible<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(description, move |value: &Value| Ok(test(value)))
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the test, tagging any failure with this predicate's description
    pub fn test(&self, value: &Value) -> Result<bool, PredicateError> {
        (self.test)(value).map_err(|source| PredicateError::new(self.description.clone(), source))
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPredicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Pattern enum
// ============================================================================

/// An expected-side matching criterion.
///
/// ## Example
///
/// ```
/// use exact_match::types::{Matches, Pattern, Value, ValueKind};
///
/// let re = Pattern::regex("^foo").unwrap();
/// assert!(re.matches(&Value::from("food")).unwrap());
/// assert!(!re.matches(&Value::from(5)).unwrap());
///
/// let kind = Pattern::Kind(ValueKind::Numeric);
/// assert!(kind.matches(&Value::from(2.5)).unwrap());
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches an equal value
    Literal(Value),
    /// Matches a string containing a match for the regex
    Regex(Regex),
    /// Matches any value of the given kind
    Kind(ValueKind),
    /// Matches whatever the closure accepts
    Custom(CustomPredicate),
}

impl Pattern {
    /// Literal pattern from anything convertible to a [`Value`]
    pub fn literal(value: impl Into<Value>) -> Self {
        Pattern::Literal(value.into())
    }

    /// Compile a regex pattern
    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(source)?))
    }

    /// Custom pattern from an infallible closure
    pub fn satisfying<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Pattern::Custom(CustomPredicate::infallible(description, test))
    }

    /// The literal value, if this is a literal pattern
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Pattern::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Ordering between two patterns, defined only for literals
    pub fn partial_cmp_literal(&self, other: &Pattern) -> Option<Ordering> {
        self.as_literal()?.partial_cmp(other.as_literal()?)
    }
}

impl Matches<Value> for Pattern {
    fn matches(&self, item: &Value) -> Result<bool, PredicateError> {
        match self {
            Pattern::Literal(expected) => Ok(expected == item),
            Pattern::Regex(re) => Ok(item.as_str().map_or(false, |s| re.is_match(s))),
            Pattern::Kind(kind) => Ok(kind.accepts(item.kind())),
            Pattern::Custom(predicate) => predicate.test(item),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(value) => write!(f, "{}", value),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
            Pattern::Kind(kind) => write!(f, "a kind of {}", kind),
            Pattern::Custom(predicate) => f.write_str(predicate.description()),
        }
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Pattern::Literal(value)
    }
}

impl From<ValueKind> for Pattern {
    fn from(kind: ValueKind) -> Self {
        Pattern::Kind(kind)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Regex(re)
    }
}

impl From<CustomPredicate> for Pattern {
    fn from(predicate: CustomPredicate) -> Self {
        Pattern::Custom(predicate)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
