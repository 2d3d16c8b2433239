//! Recursive key exclusion over `serde_json::Value` trees
//!
//! [`filter`] walks the tree once and emits the surviving structure straight
//! into the sink, so no filtered copy of the document is ever built.
//! [`filter_value`] is the build-then-serialize alternative; both produce the
//! same bytes and the same removal count for the same formatting.
//!
//! An object member whose key is excluded is counted once and its value is
//! never visited, so matches nested under it are not counted. Arrays are
//! never excluded themselves and keep their length.

use crate::error::Result;
use crate::exclusion::ExclusionSet;
use crate::number::NumberRepr;
use crate::FilterOptions;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use serde_json::{Map, Value};
use std::cell::Cell;
use std::io::Write;

/// Filter `root` into `sink`, returning the number of removed members
///
/// The sink is flushed before returning. Errors only come from the sink.
pub fn filter<W: Write>(
    root: &Value,
    excluded: &ExclusionSet,
    mut sink: W,
    opts: &FilterOptions,
) -> Result<u64> {
    let removed = Cell::new(0u64);
    let view = Filtered {
        value: root,
        excluded,
        removed: &removed,
    };

    if opts.pretty {
        let indent = vec![b' '; opts.indent];
        let mut ser =
            serde_json::Serializer::with_formatter(&mut sink, PrettyFormatter::with_indent(&indent));
        view.serialize(&mut ser)?;
    } else {
        let mut ser = serde_json::Serializer::with_formatter(&mut sink, CompactFormatter);
        view.serialize(&mut ser)?;
    }

    if opts.trailing_newline {
        sink.write_all(b"\n")?;
    }
    sink.flush()?;

    Ok(removed.get())
}

/// Filter `root` into a fresh buffer
pub fn filter_to_vec(
    root: &Value,
    excluded: &ExclusionSet,
    opts: &FilterOptions,
) -> Result<(Vec<u8>, u64)> {
    let mut buf = Vec::new();
    let removed = filter(root, excluded, &mut buf, opts)?;
    Ok((buf, removed))
}

/// Build the filtered tree in memory
///
/// Numbers are normalized with the same integer/float policy as [`filter`],
/// so serializing the result matches the streaming output.
pub fn filter_value(root: &Value, excluded: &ExclusionSet) -> (Value, u64) {
    let mut removed = 0;
    let value = rebuild(root, excluded, &mut removed);
    (value, removed)
}

/// Count the members [`filter`] would remove, without emitting anything
pub fn count_matches(root: &Value, excluded: &ExclusionSet) -> u64 {
    match root {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                if excluded.contains(key) {
                    1
                } else {
                    count_matches(value, excluded)
                }
            })
            .sum(),
        Value::Array(items) => items.iter().map(|item| count_matches(item, excluded)).sum(),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => 0,
    }
}

fn rebuild(value: &Value, excluded: &ExclusionSet, removed: &mut u64) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                if excluded.contains(key) {
                    *removed += 1;
                    continue;
                }
                out.insert(key.clone(), rebuild(child, excluded, removed));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| rebuild(item, excluded, removed))
                .collect(),
        ),
        Value::Number(number) => Value::Number(
            NumberRepr::classify(number)
                .to_number()
                .unwrap_or_else(|| number.clone()),
        ),
        Value::Null | Value::Bool(_) | Value::String(_) => value.clone(),
    }
}

/// Serialize-time view of a value with excluded members skipped
struct Filtered<'a> {
    value: &'a Value,
    excluded: &'a ExclusionSet,
    removed: &'a Cell<u64>,
}

impl<'a> Filtered<'a> {
    fn child(&self, value: &'a Value) -> Filtered<'a> {
        Filtered {
            value,
            excluded: self.excluded,
            removed: self.removed,
        }
    }
}

impl Serialize for Filtered<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value {
            Value::Object(map) => {
                // Length unknown until members are matched.
                let mut out = serializer.serialize_map(None)?;
                for (key, child) in map {
                    if self.excluded.contains(key) {
                        self.removed.set(self.removed.get() + 1);
                        continue;
                    }
                    out.serialize_entry(key, &self.child(child))?;
                }
                out.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::String(text) => serializer.serialize_str(text),
            Value::Number(number) => NumberRepr::classify(number).serialize(serializer),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterError;
    use serde_json::json;
    use std::io;

    fn set(names: &[&str]) -> ExclusionSet {
        names.iter().collect()
    }

    fn compact(input: &str, names: &[&str]) -> (String, u64) {
        let root: Value = serde_json::from_str(input).unwrap();
        let (bytes, removed) = filter_to_vec(&root, &set(names), &FilterOptions::compact()).unwrap();
        (String::from_utf8(bytes).unwrap(), removed)
    }

    #[test]
    fn removes_matches_at_every_depth() {
        let (out, removed) = compact(r#"{"a":1,"secret":2,"b":{"secret":3,"c":4}}"#, &["secret"]);
        assert_eq!(out, r#"{"a":1,"b":{"c":4}}"#);
        assert_eq!(removed, 2);
    }

    #[test]
    fn objects_inside_arrays_are_filtered() {
        let (out, removed) = compact(r#"{"list":[{"x":1,"drop":2},{"drop":3,"y":4}]}"#, &["drop"]);
        assert_eq!(out, r#"{"list":[{"x":1},{"y":4}]}"#);
        assert_eq!(removed, 2);
    }

    #[test]
    fn dropped_subtree_is_not_visited() {
        let (out, removed) = compact(r#"{"keep":{"drop":{"drop":{"drop":true}}}}"#, &["drop"]);
        assert_eq!(out, r#"{"keep":{}}"#);
        assert_eq!(removed, 1);
    }

    #[test]
    fn top_level_array() {
        let (out, removed) = compact(r#"[{"a":1},{"a":2}]"#, &["a"]);
        assert_eq!(out, "[{},{}]");
        assert_eq!(removed, 2);
    }

    #[test]
    fn scalar_root_passes_through() {
        assert_eq!(compact("\"drop\"", &["drop"]), ("\"drop\"".to_string(), 0));
        assert_eq!(compact("null", &["drop"]), ("null".to_string(), 0));
        assert_eq!(compact("17", &["drop"]), ("17".to_string(), 0));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let (out, removed) = compact(r#"{"foo":1,"FOO":2,"fOo":3,"bar":4}"#, &["Foo"]);
        assert_eq!(out, r#"{"bar":4}"#);
        assert_eq!(removed, 3);
    }

    #[test]
    fn key_order_is_preserved() {
        let (out, _) = compact(r#"{"z":1,"drop":0,"a":2,"m":3}"#, &["drop"]);
        assert_eq!(out, r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn numbers_keep_their_class() {
        let (out, _) = compact(r#"{"i":42,"f":2.5,"one":1.0,"neg":-3}"#, &[]);
        assert_eq!(out, r#"{"i":42,"f":2.5,"one":1.0,"neg":-3}"#);

        let (out, _) = compact(r#"{"e":1e10}"#, &[]);
        let value: Value = serde_json::from_str(&out).unwrap();
        assert!(value["e"].is_f64());
        assert_eq!(value["e"].as_f64(), Some(1e10));
    }

    #[test]
    fn negative_zero_is_written_as_zero() {
        let (out, _) = compact(r#"{"z":-0,"list":[-0,0]}"#, &[]);
        assert_eq!(out, r#"{"z":0,"list":[0,0]}"#);

        let root: Value = serde_json::from_str("[-0]").unwrap();
        let (tree, _) = filter_value(&root, &ExclusionSet::new());
        assert_eq!(serde_json::to_string(&tree).unwrap(), "[0]");
    }

    #[test]
    fn strings_are_reescaped_exactly() {
        let (out, _) = compact(r#"{"s":"line\nbreak \"quoted\" é \\"}"#, &[]);
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["s"], json!("line\nbreak \"quoted\" é \\"));
    }

    #[test]
    fn pretty_output_uses_indent() {
        let root = json!({"keep": {"drop": 1}, "list": [1, 2]});
        let (bytes, removed) =
            filter_to_vec(&root, &set(&["drop"]), &FilterOptions::default()).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\n  \"keep\": {},\n  \"list\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn custom_indent_and_trailing_newline() {
        let root = json!({"a": 1});
        let opts = FilterOptions {
            pretty: true,
            indent: 4,
            trailing_newline: true,
        };
        let (bytes, _) = filter_to_vec(&root, &ExclusionSet::new(), &opts).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "{\n    \"a\": 1\n}\n");
    }

    #[test]
    fn streaming_and_tree_variants_agree() {
        let root = json!({
            "id": 7,
            "Meta": {"trace": "x"},
            "items": [{"meta": 1, "v": 2.5}, [], {}, {"nested": {"META": null}}],
            "big": 18446744073709551615u64
        });
        let excluded = set(&["meta"]);
        let (streamed, streamed_removed) =
            filter_to_vec(&root, &excluded, &FilterOptions::default()).unwrap();
        let (tree, tree_removed) = filter_value(&root, &excluded);
        assert_eq!(streamed_removed, tree_removed);
        assert_eq!(streamed, serde_json::to_vec_pretty(&tree).unwrap());
        assert_eq!(count_matches(&root, &excluded), streamed_removed);
        assert_eq!(streamed_removed, 3);
    }

    #[test]
    fn large_unsigned_is_written_as_float() {
        let root: Value = serde_json::from_str("[18446744073709551615]").unwrap();
        let (tree, _) = filter_value(&root, &ExclusionSet::new());
        assert!(tree[0].is_f64());
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failures_surface_as_io() {
        let root = json!({"a": [1, 2, 3]});
        let err = filter(&root, &ExclusionSet::new(), BrokenSink, &FilterOptions::default())
            .unwrap_err();
        match err {
            FilterError::Io(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
