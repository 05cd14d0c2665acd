//! Header filters and the request metadata they are matched against.

use crate::types::{HeaderScope, Matcher};
use bastion_core::wire::RawFilter;
use bastion_core::ObjectId;

/// Reserved object header: object identifier
pub const FILTER_OBJECT_ID: &str = "$Object:objectID";
/// Reserved object header: container identifier
pub const FILTER_OBJECT_CONTAINER_ID: &str = "$Object:containerID";
/// Reserved object header: owner identifier
pub const FILTER_OBJECT_OWNER_ID: &str = "$Object:ownerID";
/// Reserved object header: creation epoch
pub const FILTER_OBJECT_CREATION_EPOCH: &str = "$Object:creationEpoch";
/// Reserved object header: payload length
pub const FILTER_OBJECT_PAYLOAD_LENGTH: &str = "$Object:payloadLength";
/// Reserved object header: payload hash
pub const FILTER_OBJECT_PAYLOAD_HASH: &str = "$Object:payloadHash";
/// Reserved object header: object type
pub const FILTER_OBJECT_TYPE: &str = "$Object:objectType";

/// Key/value header of a request or an object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    key: String,
    value: String,
}

impl Header {
    /// Create a new header
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Reserved header carrying an object identifier
    #[must_use]
    pub fn object_id(id: &ObjectId) -> Self {
        Self::new(FILTER_OBJECT_ID, id.encode_to_string())
    }

    /// Header key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Header value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Headers describing one request, supplied per evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    request_headers: Vec<Header>,
    object_headers: Vec<Header>,
}

impl RequestMetadata {
    /// Create empty metadata
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace request headers
    pub fn set_request_headers(&mut self, headers: Vec<Header>) {
        self.request_headers = headers;
    }

    /// Replace object headers
    pub fn set_object_headers(&mut self, headers: Vec<Header>) {
        self.object_headers = headers;
    }

    /// Set request headers
    #[must_use]
    pub fn with_request_headers(mut self, headers: Vec<Header>) -> Self {
        self.request_headers = headers;
        self
    }

    /// Set object headers
    #[must_use]
    pub fn with_object_headers(mut self, headers: Vec<Header>) -> Self {
        self.object_headers = headers;
        self
    }

    /// Request headers
    #[must_use]
    pub fn request_headers(&self) -> &[Header] {
        &self.request_headers
    }

    /// Object headers
    #[must_use]
    pub fn object_headers(&self) -> &[Header] {
        &self.object_headers
    }
}

/// Predicate over one header of a request or its object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filter {
    scope: HeaderScope,
    matcher: Matcher,
    key: String,
    value: String,
}

impl Filter {
    fn new(scope: HeaderScope, matcher: Matcher, header: Header) -> Self {
        Self {
            scope,
            matcher,
            key: header.key,
            value: header.value,
        }
    }

    /// Filter over request headers
    #[must_use]
    pub fn request_header(matcher: Matcher, header: Header) -> Self {
        Self::new(HeaderScope::Request, matcher, header)
    }

    /// Filter over object headers
    #[must_use]
    pub fn object_header(matcher: Matcher, header: Header) -> Self {
        Self::new(HeaderScope::Object, matcher, header)
    }

    /// Filter over service headers. Such filters are carried but not evaluated.
    #[must_use]
    pub fn service_header(matcher: Matcher, header: Header) -> Self {
        Self::new(HeaderScope::Service, matcher, header)
    }

    /// Matches only the object with the given identifier
    #[must_use]
    pub fn by_object_id(id: &ObjectId) -> Self {
        Self::object_header(Matcher::Equal, Header::object_id(id))
    }

    /// Matches every object except the one with the given identifier
    #[must_use]
    pub fn exclude_object_id(id: &ObjectId) -> Self {
        Self::object_header(Matcher::NotEqual, Header::object_id(id))
    }

    /// Header scope
    #[must_use]
    pub fn scope(&self) -> HeaderScope {
        self.scope
    }

    /// Matcher
    #[must_use]
    pub fn matcher(&self) -> Matcher {
        self.matcher
    }

    /// Header key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Expected header value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether no field of the filter was ever set
    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        self.scope == HeaderScope::Unknown(0)
            && self.matcher == Matcher::Unknown(0)
            && self.key.is_empty()
            && self.value.is_empty()
    }

    pub(crate) fn from_raw(raw: &RawFilter) -> Self {
        Self {
            scope: HeaderScope::from_code(raw.header_type),
            matcher: Matcher::from_code(raw.match_type),
            key: raw.key.clone(),
            value: raw.value.clone(),
        }
    }

    pub(crate) fn to_raw(&self) -> RawFilter {
        RawFilter {
            header_type: self.scope.code(),
            match_type: self.matcher.code(),
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_filters() {
        let id = ObjectId::from_bytes([5u8; 32]);

        let by = Filter::by_object_id(&id);
        assert_eq!(by.scope(), HeaderScope::Object);
        assert_eq!(by.matcher(), Matcher::Equal);
        assert_eq!(by.key(), FILTER_OBJECT_ID);
        assert_eq!(by.value(), id.encode_to_string());

        let exclude = Filter::exclude_object_id(&id);
        assert_eq!(exclude.matcher(), Matcher::NotEqual);
        assert_eq!(exclude.value(), by.value());
    }

    #[test]
    fn test_uninitialized_filter() {
        assert!(Filter::from_raw(&RawFilter::default()).is_uninitialized());
        assert!(!Filter::request_header(Matcher::Equal, Header::new("", "")).is_uninitialized());
    }

    #[test]
    fn test_metadata_setters() {
        let mut meta = RequestMetadata::new();
        meta.set_request_headers(vec![Header::new("a", "1")]);
        meta.set_object_headers(vec![Header::new("b", "2"), Header::new("c", "3")]);

        assert_eq!(meta.request_headers().len(), 1);
        assert_eq!(meta.object_headers()[1].value(), "3");
    }
}
