//! Namespaces and attributes.
//!
//! [§ 1.2.1 Namespaces](https://infra.spec.whatwg.org/#namespaces)

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

/// The namespaces the HTML parser can produce.
///
/// Elements only ever use [`Namespace::Html`], [`Namespace::Svg`] or
/// [`Namespace::MathMl`]; the remaining variants appear on adjusted foreign
/// attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// "http://www.w3.org/1999/xhtml"
    Html,
    /// "http://www.w3.org/2000/svg"
    Svg,
    /// "http://www.w3.org/1998/Math/MathML"
    #[strum(serialize = "math")]
    #[serde(rename = "math")]
    MathMl,
    /// "http://www.w3.org/1999/xlink"
    XLink,
    /// "http://www.w3.org/XML/1998/namespace"
    Xml,
    /// "http://www.w3.org/2000/xmlns/"
    Xmlns,
}

impl Namespace {
    /// The namespace URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::XLink => "http://www.w3.org/1999/xlink",
            Self::Xml => "http://www.w3.org/XML/1998/namespace",
            Self::Xmlns => "http://www.w3.org/2000/xmlns/",
        }
    }
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes have a namespace (null or a non-empty string), namespace prefix
/// (null or a non-empty string), local name (a non-empty string), value
/// (a string)..."
///
/// Attributes from HTML start tags have no namespace. Only the foreign
/// attribute adjustment gives an attribute a prefix and namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Namespace prefix, e.g. `xlink` for `xlink:href`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Attribute namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Namespace>,
    /// Local name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// A plain, non-namespaced attribute.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            prefix: None,
            namespace: None,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// The name used by the tree dump: namespaced attributes render as
    /// `"<ns> <local>"` (e.g. `xlink href`, `xmlns xmlns`), others as the
    /// bare local name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.namespace {
            Some(ns @ (Namespace::XLink | Namespace::Xml | Namespace::Xmlns)) => {
                let label: &'static str = ns.into();
                format!("{label} {}", self.name)
            }
            _ => self.name.clone(),
        }
    }

    /// The qualified name as it appeared in the source, e.g. `xlink:href`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.prefix
            .as_ref()
            .map_or_else(|| self.name.clone(), |p| format!("{p}:{}", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefixes_namespaced_attributes() {
        let attr = Attribute {
            prefix: Some("xlink".to_string()),
            namespace: Some(Namespace::XLink),
            name: "href".to_string(),
            value: "#a".to_string(),
        };
        assert_eq!(attr.display_name(), "xlink href");
        assert_eq!(attr.qualified_name(), "xlink:href");
        assert_eq!(Attribute::new("class", "x").display_name(), "class");
    }

    #[test]
    fn element_namespace_labels() {
        assert_eq!(Namespace::Svg.to_string(), "svg");
        assert_eq!(Namespace::MathMl.to_string(), "math");
    }
}
