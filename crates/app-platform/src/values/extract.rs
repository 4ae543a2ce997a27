use std::collections::BTreeMap;

use snafu::{ResultExt, Snafu};

use crate::values::ValueTree;

/// The raw content of a ConfigMap or Secret holding values.
pub type RawValues = BTreeMap<String, Vec<u8>>;

#[derive(Debug, Snafu)]
pub enum ExtractError {
    #[snafu(display("expected {source_name} to have exactly one key but got {count}"))]
    UnexpectedKeyCount { source_name: String, count: usize },

    #[snafu(display("failed to parse {source_name}: {source}"))]
    ParseValues {
        source_name: String,
        source: serde_yaml::Error,
    },
}

/// Which layer a value source belongs to. Later layers override earlier ones.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SourceLevel {
    Catalog,
    App,
    User,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum SourceKind {
    #[strum(serialize = "configmap")]
    ConfigMap,

    #[strum(serialize = "secret")]
    Secret,
}

/// A logical value source, e.g. the "catalog secret" or the "user configmap".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValueSource {
    pub level: SourceLevel,
    pub kind: SourceKind,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{level} {kind}", level = self.level, kind = self.kind)
    }
}

/// Parses the values held by `source`.
///
/// A source holds its values as a single YAML (or JSON) document stored under exactly one key.
/// An unconfigured source (`None`) or one without keys yields an empty tree.
pub fn extract(source: ValueSource, data: Option<&RawValues>) -> Result<ValueTree, ExtractError> {
    let Some(data) = data else {
        return Ok(ValueTree::new());
    };

    let source_name = source.to_string();
    let mut payloads = data.values();
    let payload = match (payloads.next(), data.len()) {
        (None, _) => return Ok(ValueTree::new()),
        (Some(payload), 1) => payload,
        (Some(_), count) => return UnexpectedKeyCountSnafu { source_name, count }.fail(),
    };

    parse_values(payload).context(ParseValuesSnafu { source_name })
}

fn parse_values(payload: &[u8]) -> Result<ValueTree, serde_yaml::Error> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(ValueTree::new());
    }

    // Merge keys (`<<: *anchor`) are expanded before the document becomes a value tree.
    let mut document: serde_yaml::Value = serde_yaml::from_slice(payload)?;
    document.apply_merge()?;

    let values: Option<ValueTree> = serde_yaml::from_value(document)?;
    Ok(values.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    const CATALOG_SECRET: ValueSource = ValueSource {
        level: SourceLevel::Catalog,
        kind: SourceKind::Secret,
    };

    fn raw(entries: &[(&str, &str)]) -> RawValues {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn absent_source_is_empty() {
        assert_eq!(extract(CATALOG_SECRET, None).unwrap(), ValueTree::new());
        assert_eq!(
            extract(CATALOG_SECRET, Some(&RawValues::new())).unwrap(),
            ValueTree::new()
        );
    }

    #[test]
    fn single_key_is_parsed_like_the_document() {
        let document = indoc! {"
            image:
              registry: quay.io
              tag: 1.2.3
            replicas: 3
            ingress:
              hosts: [a.example.com, b.example.com]
        "};

        let extracted = extract(CATALOG_SECRET, Some(&raw(&[("values", document)]))).unwrap();
        let parsed: ValueTree = serde_yaml::from_str(document).unwrap();

        assert_eq!(extracted, parsed);
        assert_eq!(extracted["replicas"], json!(3));
        assert_eq!(extracted["image"]["tag"], json!("1.2.3"));
    }

    #[test]
    fn json_payload_is_accepted() {
        let extracted = extract(
            CATALOG_SECRET,
            Some(&raw(&[("values.json", r#"{"a": {"b": [1, 2]}}"#)])),
        )
        .unwrap();

        assert_eq!(extracted["a"]["b"], json!([1, 2]));
    }

    #[rstest]
    #[case("")]
    #[case("  \n")]
    #[case("null")]
    fn empty_payload_is_empty(#[case] payload: &str) {
        assert_eq!(
            extract(CATALOG_SECRET, Some(&raw(&[("values", payload)]))).unwrap(),
            ValueTree::new()
        );
    }

    #[rstest]
    #[case(&[("a", "x: 1"), ("b", "y: 2")])]
    #[case(&[("a", "not: [valid"), ("b", "y: 2"), ("c", "")])]
    fn more_than_one_key_fails(#[case] entries: &[(&str, &str)]) {
        let error = extract(CATALOG_SECRET, Some(&raw(entries))).unwrap_err();

        assert!(matches!(
            error,
            ExtractError::UnexpectedKeyCount { count, .. } if count == entries.len()
        ));
        assert_eq!(
            error.to_string(),
            format!(
                "expected catalog secret to have exactly one key but got {}",
                entries.len()
            )
        );
    }

    #[test]
    fn malformed_payload_fails() {
        let error = extract(
            ValueSource {
                level: SourceLevel::User,
                kind: SourceKind::ConfigMap,
            },
            Some(&raw(&[("values", "image: [unterminated")])),
        )
        .unwrap_err();

        assert!(matches!(error, ExtractError::ParseValues { .. }));
        assert!(
            error
                .to_string()
                .starts_with("failed to parse user configmap: ")
        );
    }

    #[test]
    fn non_mapping_payload_fails() {
        let error = extract(CATALOG_SECRET, Some(&raw(&[("values", "- a\n- b\n")]))).unwrap_err();

        assert!(matches!(error, ExtractError::ParseValues { .. }));
    }

    #[test]
    fn merge_keys_are_expanded() {
        let document = indoc! {"
            base: &base
              a: 1
              b: 1
            derived:
              <<: *base
              b: 2
              c: 2
        "};

        let extracted = extract(CATALOG_SECRET, Some(&raw(&[("values", document)]))).unwrap();

        assert_eq!(
            serde_json::Value::Object(extracted),
            json!({
                "base": {"a": 1, "b": 1},
                "derived": {"a": 1, "b": 2, "c": 2},
            })
        );
    }
}
