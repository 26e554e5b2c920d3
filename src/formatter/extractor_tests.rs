use crate::formatter::extractor::{extract_fields, FieldValue};
use crate::formatter::lexer::{parse_partial, scan_objects, PartialValue};
use crate::formatter::split::split_list_items;
use serde_json::json;

fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

fn list(items: &[&str]) -> FieldValue {
    FieldValue::List(items.iter().map(|item| item.to_string()).collect())
}

mod lexer_tests {
    use super::*;

    #[test]
    fn test_truncated_values_are_marked_incomplete() {
        let value = parse_partial(r#"{"a": "x\"y", "b": [1, tr"#).unwrap();

        let PartialValue::Object { entries, complete } = value else {
            panic!("expected object");
        };
        assert!(!complete);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].value,
            PartialValue::String {
                text: "x\"y".to_string(),
                complete: true
            }
        );
        assert_eq!(
            entries[1].value,
            PartialValue::Array {
                items: vec![
                    PartialValue::Scalar {
                        raw: "1".to_string(),
                        complete: true
                    },
                    PartialValue::Scalar {
                        raw: "tr".to_string(),
                        complete: false
                    },
                ],
                complete: false
            }
        );
    }

    #[test]
    fn test_unicode_escapes() {
        let value = parse_partial(r#""caf\u00e9 \ud83d\ude00""#).unwrap();
        assert_eq!(
            value,
            PartialValue::String {
                text: "café 😀".to_string(),
                complete: true
            }
        );
    }

    #[test]
    fn test_escape_cut_off_by_buffer_end() {
        let value = parse_partial(r#""caf\u00"#).unwrap();
        assert_eq!(
            value,
            PartialValue::String {
                text: "caf".to_string(),
                complete: false
            }
        );
    }

    #[test]
    fn test_entry_offsets_point_at_key() {
        let objects = scan_objects(r#"  {"a": 1, "bb": 2}"#);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].0, 2);

        let PartialValue::Object { entries, complete } = &objects[0].1 else {
            panic!("expected object");
        };
        assert!(*complete);
        assert_eq!(entries[0].start, 3);
        assert_eq!(entries[1].start, 11);
    }

    #[test]
    fn test_garbage_between_entries_is_skipped() {
        let value = parse_partial(r#"{"a": "1" oops, "b": "2"}"#).unwrap();
        assert_eq!(value.to_json(), Some(json!({"a": "1", "b": "2"})));
    }

    #[test]
    fn test_to_json_drops_unfinished_array_items() {
        let value = parse_partial(r#"{"items": ["done", "half"#).unwrap();
        assert_eq!(value.to_json(), Some(json!({"items": ["done"]})));
    }

    #[test]
    fn test_containers_past_depth_limit_are_dropped() {
        let buffer = format!("{}\"x\"{}", "[".repeat(70), "]".repeat(70));
        let value = parse_partial(&buffer).unwrap();

        assert!(value.is_complete());
        let rendered = value.to_json().unwrap().to_string();
        assert!(!rendered.contains('x'), "dropped content survived: {rendered}");
        assert!(!rendered.contains('"'));
    }
}

mod split_tests {
    use super::*;

    #[test]
    fn test_split_keeps_quoted_commas_and_drops_open_trailing_item() {
        assert_eq!(split_list_items(r#"["a, b", "c"#), vec!["a, b"]);
    }

    #[test]
    fn test_split_unescapes_quotes() {
        assert_eq!(
            split_list_items(r#"["say \"hi\"", "x"]"#),
            vec![r#"say "hi""#, "x"]
        );
    }

    #[test]
    fn test_split_respects_nesting() {
        assert_eq!(
            split_list_items(r#"[{"k": "1,2"}, 'single']"#),
            vec![r#"{"k": "1,2"}"#, "single"]
        );
    }

    #[test]
    fn test_split_discards_empty_items() {
        assert_eq!(split_list_items(r#"[ , "a", ]"#), vec!["a"]);
    }
}

mod tests {
    use super::*;

    #[test]
    fn test_too_short_buffers_yield_empty_table() {
        assert!(extract_fields("{").is_empty());
        assert!(extract_fields("{\n").is_empty());
        assert!(extract_fields(r#"{"a": 1}"#).is_empty());
    }

    #[test]
    fn test_non_object_buffer_yields_empty_table() {
        assert!(extract_fields(r#"hello {"optimized_prompt": "x"}"#).is_empty());
        assert!(extract_fields(r#"["optimized_prompt", "x"]"#).is_empty());
    }

    #[test]
    fn test_later_occurrence_overwrites_earlier() {
        let table = extract_fields(
            r#"{"changes_made": ["a", "b"], "optimized_prompt": "p", "changes_made": ["c", "d"]}"#,
        );

        assert_eq!(table.get("changes_made").unwrap().value, list(&["c", "d"]));
        assert_eq!(
            table.keys().collect::<Vec<_>>(),
            vec!["optimized_prompt", "changes_made"]
        );
    }

    #[test]
    fn test_later_occurrence_wins_across_restarted_objects() {
        let table = extract_fields(r#"{"optimized_prompt": "first"}{"optimized_prompt": "second"#);

        let entry = table.get("optimized_prompt").unwrap();
        assert_eq!(entry.value, text("second"));
        assert!(!entry.complete);
        assert!(!table.is_closed());
    }

    #[test]
    fn test_completeness_flags() {
        let table = extract_fields(r#"{"optimized_prompt": "done", "changes_made": ["x""#);

        assert!(table.get("optimized_prompt").unwrap().complete);
        let changes = table.get("changes_made").unwrap();
        assert!(!changes.complete);
        assert_eq!(changes.value, list(&["x"]));
    }

    #[test]
    fn test_list_items_are_deduplicated_in_first_seen_order() {
        let table = extract_fields(r#"{"changes_made": ["x", "y", "x", "z"#);
        assert_eq!(table.get("changes_made").unwrap().value, list(&["x", "y"]));
    }

    #[test]
    fn test_objects_and_object_arrays_are_structured() {
        let table = extract_fields(
            r#"{"optimized_prompt": [{"role": "Editor"}, {"role": "Rev"#,
        );
        assert_eq!(
            table.get("optimized_prompt").unwrap().value,
            FieldValue::Structured(json!([{"role": "Editor"}, {"role": "Rev"}]))
        );
    }

    #[test]
    fn test_unterminated_scalar_is_skipped() {
        let table = extract_fields(r#"{"optimized_prompt": "p", "score": 4"#);
        assert!(table.get("score").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_closed_buffer() {
        let table = extract_fields("{\"share_message\": null}\n");
        assert!(table.is_closed());
        assert_eq!(table.get("share_message").unwrap().value, text("null"));
    }
}
