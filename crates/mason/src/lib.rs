//! Mason hypermedia documents.
//!
//! A [`MasonDocument`] pairs an arbitrary serializable body with the reserved
//! Mason properties `@namespaces`, `@controls` and `@error`. The body is
//! flattened into the top level of the serialized object, so a document
//! wrapping a book serializes as the book's fields plus the reserved keys.
//!
//! See <https://github.com/JornWildt/Mason> for the format itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Media type for every Mason response body.
pub const MASON_MEDIA_TYPE: &str = "application/vnd.mason+json";

/// Entry of the `@namespaces` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
}

/// A hypermedia control: where to go, and how to get there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// Optional properties of a control, everything except `href`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlAttributes {
    method: Option<String>,
    encoding: Option<String>,
    title: Option<String>,
    schema: Option<Value>,
}

impl ControlAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// HTTP method, stored upper-cased.
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        self.method = Some(method.as_ref().to_ascii_uppercase());
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// JSON Schema the request body must satisfy.
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    fn with_href(self, href: String) -> Control {
        Control {
            href,
            method: self.method,
            encoding: self.encoding,
            title: self.title,
            schema: self.schema,
        }
    }
}

/// The `@error` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasonError {
    #[serde(rename = "@message")]
    pub message: String,
    #[serde(rename = "@messages")]
    pub messages: Vec<String>,
}

/// Body for documents that carry nothing besides Mason properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoBody {}

/// Body of an error document: the path of the resource that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_url: String,
}

/// A Mason document with a typed body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasonDocument<T> {
    #[serde(flatten)]
    body: T,
    #[serde(
        rename = "@namespaces",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    namespaces: BTreeMap<String, Namespace>,
    #[serde(rename = "@controls", default, skip_serializing_if = "BTreeMap::is_empty")]
    controls: BTreeMap<String, Control>,
    #[serde(rename = "@error", default, skip_serializing_if = "Option::is_none")]
    error: Option<MasonError>,
}

impl MasonDocument<NoBody> {
    /// A document without entity fields, such as an API entry point.
    pub fn empty() -> Self {
        Self::new(NoBody {})
    }
}

impl MasonDocument<ResourceRef> {
    /// An error-only document for the resource at `resource_url`.
    pub fn error(
        resource_url: impl Into<String>,
        title: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let mut document = Self::new(ResourceRef {
            resource_url: resource_url.into(),
        });
        document.add_error(title, details);
        document
    }
}

impl<T> MasonDocument<T> {
    pub fn new(body: T) -> Self {
        Self {
            body,
            namespaces: BTreeMap::new(),
            controls: BTreeMap::new(),
            error: None,
        }
    }

    /// Declares where the document's link relations come from. Re-adding a
    /// prefix replaces its URI.
    pub fn add_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> &mut Self {
        self.namespaces
            .insert(prefix.into(), Namespace { name: uri.into() });
        self
    }

    /// Adds a control, replacing any control of the same name. `href` always
    /// wins over whatever the attributes carry.
    pub fn add_control(
        &mut self,
        name: impl Into<String>,
        href: impl Into<String>,
        attributes: ControlAttributes,
    ) -> &mut Self {
        self.controls
            .insert(name.into(), attributes.with_href(href.into()));
        self
    }

    /// Sets `@error`. Only meant for error documents; Mason allows several
    /// messages but one detail line is all this API produces.
    pub fn add_error(&mut self, title: impl Into<String>, details: impl Into<String>) -> &mut Self {
        self.error = Some(MasonError {
            message: title.into(),
            messages: vec![details.into()],
        });
        self
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    pub fn into_body(self) -> T {
        self.body
    }

    pub fn namespaces(&self) -> &BTreeMap<String, Namespace> {
        &self.namespaces
    }

    pub fn controls(&self) -> &BTreeMap<String, Control> {
        &self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    pub fn error_details(&self) -> Option<&MasonError> {
        self.error.as_ref()
    }
}

impl<T: Default> Default for MasonDocument<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
