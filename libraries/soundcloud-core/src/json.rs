//! Shape-agnostic navigation over decoded JSON payloads.
//!
//! API responses are not contractually typed: any field may be missing, `null`
//! or of an unexpected shape. [`JsonNode`] turns every one of those cases into
//! "absent", so decoders can be written as a flat sequence of optional
//! extractions.
//!
//! ```
//! use soundcloud_core::JsonDocument;
//!
//! let doc = JsonDocument::from_slice(br#"{"id": 42, "tags": ["a", "b"]}"#);
//! let root = doc.root();
//!
//! assert_eq!(root.at("id").as_int(), Some(42));
//! assert_eq!(root.at("id").as_str(), None);
//! assert_eq!(root.at("tags").at(1).as_str(), Some("b"));
//! assert!(root.at("missing").at(3).at("deeper").is_absent());
//! ```

use crate::client_id::ClientId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::iter::FusedIterator;
use tracing::warn;
use url::Url;

/// Owner of a decoded payload.
///
/// Decoding never fails: bytes that are not valid JSON produce a document
/// whose root is absent, leaving it to the parse step to report the failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDocument {
    value: Option<Value>,
}

impl JsonDocument {
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Self { value: Some(value) },
            Err(e) => {
                warn!(error = %e, size = bytes.len(), "Response body is not valid JSON");
                Self { value: None }
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        Self { value: Some(value) }
    }

    /// Node wrapping the whole payload.
    pub fn root(&self) -> JsonNode<'_> {
        JsonNode::new(self.value.as_ref())
    }
}

/// A borrowed view of a JSON value that may be absent.
///
/// Navigation ([`JsonNode::at`]) and every typed accessor are total: they
/// never panic and degrade to absent / `None` when the shape does not match.
/// A JSON `null` behaves exactly like an absent value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JsonNode<'a> {
    value: Option<&'a Value>,
}

impl<'a> JsonNode<'a> {
    pub fn new(value: Option<&'a Value>) -> Self {
        Self { value }
    }

    pub fn absent() -> Self {
        Self { value: None }
    }

    /// Navigate by array index or object key.
    ///
    /// Indexing a non-array, keying a non-object, a missing key, a negative
    /// index or an out-of-range index all yield an absent node.
    pub fn at<I: NodeIndex>(&self, index: I) -> JsonNode<'a> {
        JsonNode::new(self.value.and_then(|value| index.index_into(value)))
    }

    /// True when there is no value or the value is `null`.
    pub fn is_absent(&self) -> bool {
        matches!(self.value, None | Some(Value::Null))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, Some(Value::Array(_)))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.value, Some(Value::Object(_)))
    }

    /// The underlying value, if any.
    pub fn raw(&self) -> Option<&'a Value> {
        self.value
    }

    /// Integer value. Floats and numeric strings are not converted.
    pub fn as_int(&self) -> Option<i64> {
        self.value?.as_i64()
    }

    /// Non-negative integer value.
    pub fn as_u64(&self) -> Option<u64> {
        self.value?.as_u64()
    }

    /// Any JSON number, integers included.
    pub fn as_double(&self) -> Option<f64> {
        match self.value? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value?.as_bool()
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value?.as_str()
    }

    pub fn as_string(&self) -> Option<String> {
        self.as_str().map(str::to_owned)
    }

    /// Absolute URL with the `client_id` query parameter appended.
    ///
    /// Relative references and strings that are not URLs yield `None`.
    pub fn as_url(&self, client_id: &ClientId) -> Option<Url> {
        let mut url = Url::parse(self.as_str()?).ok()?;
        if url.cannot_be_a_base() {
            return None;
        }
        client_id.apply(&mut url);
        Some(url)
    }

    /// Parse a string value with a chrono format string.
    ///
    /// Formats with an offset (`%z`) are converted to UTC, formats without one
    /// are read as UTC. Date-only formats resolve to midnight.
    pub fn as_date(&self, format: &str) -> Option<DateTime<Utc>> {
        let text = self.as_str()?;

        if let Ok(date) = DateTime::parse_from_str(text, format) {
            return Some(date.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
        NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Apply `transform` to every element of an array, preserving order.
    ///
    /// Returns `None` when the value is not an array, so a missing field is
    /// distinguishable from an empty one.
    pub fn map_array<U, F>(&self, mut transform: F) -> Option<Vec<U>>
    where
        F: FnMut(JsonNode<'a>) -> U,
    {
        let items = self.value?.as_array()?;
        Some(items.iter().map(|item| transform(JsonNode::from(item))).collect())
    }

    /// Lazily iterate over array elements. Empty for anything but an array.
    pub fn iter(&self) -> Elements<'a> {
        let items = match self.value {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        };
        Elements {
            inner: items.iter(),
        }
    }
}

impl<'a> From<&'a Value> for JsonNode<'a> {
    fn from(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }
}

impl<'a> IntoIterator for JsonNode<'a> {
    type Item = JsonNode<'a>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &JsonNode<'a> {
    type Item = JsonNode<'a>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an array node.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    inner: std::slice::Iter<'a, Value>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = JsonNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(JsonNode::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Elements<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(JsonNode::from)
    }
}

impl ExactSizeIterator for Elements<'_> {}

impl FusedIterator for Elements<'_> {}

/// Types usable with [`JsonNode::at`]: integer indices and string keys.
pub trait NodeIndex: private::Sealed {
    #[doc(hidden)]
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value>;
}

impl NodeIndex for usize {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        value.as_array()?.get(*self)
    }
}

macro_rules! signed_index {
    ($($ty:ty),*) => {
        $(
            impl NodeIndex for $ty {
                fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
                    usize::try_from(*self).ok()?.index_into(value)
                }
            }
        )*
    };
}

signed_index!(i32, i64, isize, u32, u64);

impl NodeIndex for str {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        value.as_object()?.get(self)
    }
}

impl NodeIndex for String {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.as_str().index_into(value)
    }
}

impl<T: NodeIndex + ?Sized> NodeIndex for &T {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        (**self).index_into(value)
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for isize {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T: Sealed + ?Sized> Sealed for &T {}
}
