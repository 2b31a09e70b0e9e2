//! HTTP request descriptors.
//!
//! A [`RequestDescriptor`] is the transport-ready form of a call: verb,
//! address and optional form body. Parameters go in the query string for GET
//! and in an `application/x-www-form-urlencoded` body for every other verb.

use bytes::Bytes;
use std::fmt;
use url::Url;

/// Content type of form-encoded request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP verbs supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Build a request descriptor for `url`.
    ///
    /// Empty or absent parameters leave the address untouched and produce no
    /// body.
    pub fn request(self, url: Url, parameters: Option<&Parameters>) -> RequestDescriptor {
        let parameters = parameters.filter(|p| !p.is_empty());

        match (self, parameters) {
            (_, None) => RequestDescriptor {
                method: self,
                url,
                body: None,
            },
            (HttpMethod::Get, Some(parameters)) => {
                let mut url = url;
                url.query_pairs_mut().extend_pairs(parameters.iter());
                RequestDescriptor {
                    method: self,
                    url,
                    body: None,
                }
            }
            (_, Some(parameters)) => RequestDescriptor {
                method: self,
                url,
                body: Some(Bytes::from(parameters.to_form_string())),
            },
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered request parameters with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    pairs: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();

        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Builder-style [`Parameters::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `key=value` pairs joined by `&`, form-encoded.
    pub fn to_form_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut parameters = Parameters::new();
        for (key, value) in iter {
            parameters.insert(key, value);
        }
        parameters
    }
}

/// Immutable, transport-ready request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: Url,
    body: Option<Bytes>,
}

impl RequestDescriptor {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Form-encoded body, only ever set for non-GET requests.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn content_type(&self) -> Option<&'static str> {
        self.body.as_ref().map(|_| FORM_CONTENT_TYPE)
    }
}
