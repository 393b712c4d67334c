//! # JSON-LD
//!
//! Just enough JSON-LD to answer one question: which property of a credential
//! subject's type carries a given IRI, and what identifier does the subject
//! hold under that property?
//!
//! Contexts are merged without full JSON-LD processing. Remote contexts are
//! loaded through the [`ContextLoader`] and followed until every URL has been
//! seen once.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::provider::{ContextLoader, Result};

/// A merged JSON-LD `@context`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonLdContext(Map<String, Value>);

impl JsonLdContext {
    /// Returns `true` if the context defines the term `type_`.
    #[must_use]
    pub fn defines(&self, type_: &str) -> bool {
        self.0.contains_key(type_)
    }

    /// The property of `type_` whose IRI is `iri`. Properties are looked up in
    /// the type's scoped context first, then in the context itself.
    #[must_use]
    pub fn property_for_iri(&self, type_: &str, iri: &str) -> Option<&str> {
        let scoped =
            self.0.get(type_).and_then(|def| def.get("@context")).and_then(Value::as_object);

        scoped.into_iter().chain(std::iter::once(&self.0)).find_map(|terms| {
            terms.iter().find_map(|(term, definition)| {
                let id = match definition {
                    Value::String(id) => id.as_str(),
                    Value::Object(def) => def.get("@id").and_then(Value::as_str)?,
                    _ => return None,
                };
                (self.expand(id, scoped) == iri).then_some(term.as_str())
            })
        })
    }

    // Expand a compact IRI (`prefix:suffix`) using prefixes from the scoped
    // context or the context itself.
    fn expand(&self, id: &str, scoped: Option<&Map<String, Value>>) -> String {
        let Some((prefix, suffix)) = id.split_once(':') else {
            return id.to_string();
        };
        if suffix.starts_with("//") {
            return id.to_string();
        }
        let namespace = scoped
            .and_then(|s| s.get(prefix))
            .or_else(|| self.0.get(prefix))
            .and_then(Value::as_str);
        namespace.map_or_else(|| id.to_string(), |ns| format!("{ns}{suffix}"))
    }
}

/// Build the merged context for an `@context` value: a URL, an inline object
/// or an array of either. Later definitions override earlier ones.
///
/// # Errors
///
/// Returns an error if a remote context cannot be loaded.
pub async fn load_context(context: &Value, loader: &impl ContextLoader) -> Result<JsonLdContext> {
    let mut merged = Map::new();
    let mut seen = HashSet::new();
    let mut pending = vec![context.clone()];

    // depth-first, preserving document order
    while let Some(next) = pending.pop() {
        match next {
            Value::String(url) => {
                if !seen.insert(url.clone()) {
                    continue;
                }
                let document = loader.load(&url).await?;
                if let Some(nested) = document.get("@context") {
                    pending.push(nested.clone());
                }
            }
            Value::Array(items) => pending.extend(items.into_iter().rev()),
            Value::Object(terms) => merged.extend(terms),
            _ => {}
        }
    }

    Ok(JsonLdContext(merged))
}

/// A typed view over a JSON value.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    /// A JSON object.
    Object(&'a Map<String, Value>),

    /// A JSON array.
    Array(&'a [Value]),

    /// Any other value.
    Scalar(&'a Value),
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(map),
            Value::Array(items) => Self::Array(items),
            _ => Self::Scalar(value),
        }
    }
}

/// Find the identifier held under `property` anywhere in `root`, searching no
/// deeper than `max_depth` levels.
///
/// The property's value is either the identifier itself or an object carrying
/// it in `identifier` or `id`.
#[must_use]
pub fn find_identifier<'a>(root: Node<'a>, property: &str, max_depth: usize) -> Option<&'a str> {
    let mut stack = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        let children: Vec<&Value> = match node {
            Node::Object(map) => {
                if let Some(value) = map.get(property) {
                    if let Some(id) = identifier(value) {
                        return Some(id);
                    }
                }
                map.values().collect()
            }
            Node::Array(items) => items.iter().collect(),
            Node::Scalar(_) => continue,
        };

        if depth < max_depth {
            stack.extend(children.into_iter().rev().map(|child| (Node::from(child), depth + 1)));
        }
    }

    None
}

fn identifier(value: &Value) -> Option<&str> {
    match value {
        Value::String(id) => Some(id),
        Value::Object(map) => {
            map.get("identifier").or_else(|| map.get("id")).and_then(Value::as_str)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use anyhow::anyhow;
    use serde_json::json;

    use super::*;

    const PRIMARY_ORG: &str = "https://velocitynetwork.foundation/ontology#primaryOrganization";

    struct Loader(HashMap<&'static str, Value>);

    impl ContextLoader for Loader {
        async fn load(&self, url: &str) -> Result<Value> {
            self.0.get(url).cloned().ok_or_else(|| anyhow!("{url} not found"))
        }
    }

    fn loader() -> Loader {
        Loader(HashMap::from([
            ("https://example.com/base.jsonld", json!({"@context": {"vnf": "https://velocitynetwork.foundation/ontology#"}})),
            (
                "https://example.com/employment.jsonld",
                json!({"@context": [
                    "https://example.com/base.jsonld",
                    {
                        "EmploymentPast": {
                            "@id": "vnf:EmploymentPast",
                            "@context": {"legalEmployer": {"@id": "vnf:primaryOrganization", "@type": "@id"}}
                        }
                    }
                ]}),
            ),
        ]))
    }

    #[tokio::test]
    async fn scoped_property() {
        let context = json!(["https://example.com/employment.jsonld", {"name": "https://schema.org/name"}]);
        let merged = load_context(&context, &loader()).await.expect("should load");

        assert!(merged.defines("EmploymentPast"));
        assert!(merged.defines("name"));
        assert_eq!(merged.property_for_iri("EmploymentPast", PRIMARY_ORG), Some("legalEmployer"));
        assert_eq!(merged.property_for_iri("Unknown", PRIMARY_ORG), None);
    }

    #[tokio::test]
    async fn missing_remote_context() {
        let context = json!("https://example.com/missing.jsonld");
        assert!(load_context(&context, &loader()).await.is_err());
    }

    #[tokio::test]
    async fn repeated_urls_load_once() {
        let context = json!(["https://example.com/base.jsonld", "https://example.com/base.jsonld"]);
        let merged = load_context(&context, &loader()).await.expect("should load");
        assert!(merged.defines("vnf"));
    }

    #[test]
    fn nested_identifier() {
        let subject = json!({
            "type": "EmploymentPast",
            "role": {"title": "Engineer"},
            "history": [{"legalEmployer": {"name": "ACME", "identifier": "did:ion:acme"}}]
        });

        assert_eq!(find_identifier(Node::from(&subject), "legalEmployer", 32), Some("did:ion:acme"));
        assert_eq!(find_identifier(Node::from(&subject), "legalEmployer", 1), None);
        assert_eq!(find_identifier(Node::from(&subject), "missing", 32), None);
    }

    #[test]
    fn deep_nesting_terminates() {
        let mut value = json!({"legalEmployer": "did:ion:deep"});
        for _ in 0..100 {
            value = json!({"child": value});
        }
        assert_eq!(find_identifier(Node::from(&value), "legalEmployer", 32), None);
    }
}
