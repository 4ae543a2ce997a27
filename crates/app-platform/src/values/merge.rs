use serde_json::{Value, map::Entry};

use crate::values::ValueTree;

/// Deep merges `overrides` into `base`, preferring values from `overrides`.
///
/// Two objects under the same key are merged recursively. Any other value in `overrides`,
/// including lists and `null`, replaces the value in `base` as a whole. Keys only present in one
/// of the trees are kept.
///
/// ```
/// # use app_platform::values::merge_into;
/// # use serde_json::json;
/// let mut base = json!({"image": {"registry": "quay.io", "tag": "1.0.0"}, "replicas": 1});
/// let overrides = json!({"image": {"tag": "1.1.0"}, "replicas": 3});
///
/// merge_into(
///     base.as_object_mut().unwrap(),
///     overrides.as_object().unwrap().clone(),
/// );
/// assert_eq!(base, json!({"image": {"registry": "quay.io", "tag": "1.1.0"}, "replicas": 3}));
/// ```
pub fn merge_into(base: &mut ValueTree, overrides: ValueTree) {
    for (key, value) in overrides {
        match base.entry(key) {
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Value::Object(current), Value::Object(value)) => merge_into(current, value),
                (current, value) => *current = value,
            },
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
}

/// Merges the given layers in order, later layers taking precedence over earlier ones.
pub fn merge_layers(layers: impl IntoIterator<Item = ValueTree>) -> ValueTree {
    layers
        .into_iter()
        .fold(ValueTree::new(), |mut merged, layer| {
            merge_into(&mut merged, layer);
            merged
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn tree(value: Value) -> ValueTree {
        match value {
            Value::Object(map) => map,
            other => panic!("test input must be an object, got {other}"),
        }
    }

    #[rstest]
    #[case::disjoint(json!({"a": 1}), json!({"b": 2}), json!({"a": 1, "b": 2}))]
    #[case::scalar_override(json!({"a": 1, "b": 1}), json!({"b": 2}), json!({"a": 1, "b": 2}))]
    #[case::nested(
        json!({"image": {"registry": "quay.io", "tag": "1.0.0"}}),
        json!({"image": {"tag": "1.1.0"}}),
        json!({"image": {"registry": "quay.io", "tag": "1.1.0"}})
    )]
    #[case::lists_are_replaced(
        json!({"hosts": ["a", "b"]}),
        json!({"hosts": ["c"]}),
        json!({"hosts": ["c"]})
    )]
    #[case::object_replaces_scalar(
        json!({"ingress": false}),
        json!({"ingress": {"enabled": true}}),
        json!({"ingress": {"enabled": true}})
    )]
    #[case::scalar_replaces_object(
        json!({"ingress": {"enabled": true}}),
        json!({"ingress": "disabled"}),
        json!({"ingress": "disabled"})
    )]
    #[case::null_replaces(json!({"a": {"b": 1}}), json!({"a": null}), json!({"a": null}))]
    #[case::empty_override(json!({"a": 1}), json!({}), json!({"a": 1}))]
    fn merge(#[case] base: Value, #[case] overrides: Value, #[case] expected: Value) {
        let mut merged = tree(base);
        merge_into(&mut merged, tree(overrides));

        assert_eq!(Value::Object(merged), expected);
    }

    #[test]
    fn later_layers_win() {
        let merged = merge_layers([
            tree(json!({"a": 1, "b": 1, "nested": {"x": 1}})),
            tree(json!({"b": 2, "c": 2, "nested": {"y": 2}})),
            tree(json!({"c": 3, "nested": {"x": 3}})),
        ]);

        assert_eq!(
            Value::Object(merged),
            json!({"a": 1, "b": 2, "c": 3, "nested": {"x": 3, "y": 2}})
        );
    }

    #[test]
    fn no_layers_is_empty() {
        assert!(merge_layers([]).is_empty());
    }
}
