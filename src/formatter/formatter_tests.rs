use crate::formatter::test_utils::{contains_raw_json_key, cumulative_snapshots};
use crate::formatter::{classify, format, format_final, format_value, BufferKind};
use crate::types::{
    OptimizationLevel, DEFAULT_SHARE_MESSAGE, EMPTY_RESULT, GENERATING, GENERATING_OPTIMIZED,
};
use serde_json::json;

const BASIC: Option<OptimizationLevel> = Some(OptimizationLevel::Basic);
const STRUCTURED: Option<OptimizationLevel> = Some(OptimizationLevel::Structured);
const MASTERY: Option<OptimizationLevel> = Some(OptimizationLevel::Mastery);
const SYSTEM: Option<OptimizationLevel> = Some(OptimizationLevel::System);

const BASIC_RESPONSE: &str = r#"{"optimized_prompt": "Write a haiku", "changes_made": ["Added tone", "Clarified audience"], "share_message": "Share it!"}"#;

mod classify_tests {
    use super::*;

    #[test]
    fn test_classify_buffers() {
        assert_eq!(classify("  \n"), BufferKind::Empty);
        assert_eq!(
            classify(r#"{"a": 1}"#),
            BufferKind::CompleteJson(json!({"a": 1}))
        );
        assert_eq!(classify(r#"{"a": "#), BufferKind::IncompleteJson);
        assert_eq!(classify("{'a': 'b'}"), BufferKind::DictLike);
        assert_eq!(
            classify(r#"Here is "optimized_prompt": "x""#),
            BufferKind::AmbiguousFragment
        );
        assert_eq!(classify("Don't forget [this]"), BufferKind::Plain);
    }
}

mod basic_tests {
    use super::*;

    #[test]
    fn test_complete_basic_response() {
        assert_eq!(
            format(BASIC_RESPONSE, BASIC),
            "**Optimized Prompt:**\nWrite a haiku\n\n**Changes Made:**\n• Added tone\n• Clarified audience\n\nShare it!"
        );
    }

    #[test]
    fn test_streaming_string_shows_indicator() {
        assert_eq!(
            format(r#"{"optimized_prompt": "partial tex"#, BASIC),
            "**Optimized Prompt:**\npartial tex\n\n*Generating…*"
        );
    }

    #[test]
    fn test_lone_brace_shows_placeholder() {
        assert_eq!(format("{", BASIC), GENERATING_OPTIMIZED);
        assert_eq!(format(r#"{"optimized_prompt": ""#, BASIC), GENERATING_OPTIMIZED);
    }

    #[test]
    fn test_duplicate_changes_are_listed_once() {
        assert_eq!(
            format(r#"{"changes_made": ["x", "x", "y"]}"#, BASIC),
            "**Changes Made:**\n• x\n• y"
        );
        assert_eq!(
            format(r#"{"changes_made": ["x", "x", "y", "z"#, BASIC),
            "**Changes Made:**\n• x\n• y\n\n*Generating…*"
        );
    }

    #[test]
    fn test_fields_render_in_schema_order() {
        assert_eq!(
            format(
                r#"{"share_message": "S", "changes_made": ["c"], "optimized_prompt": "P"}"#,
                BASIC
            ),
            "**Optimized Prompt:**\nP\n\n**Changes Made:**\n• c\n\nS"
        );
    }

    #[test]
    fn test_restarted_answer_shows_latest_value() {
        assert_eq!(
            format(
                r#"{"optimized_prompt": "first"}{"optimized_prompt": "second"#,
                BASIC
            ),
            "**Optimized Prompt:**\nsecond\n\n*Generating…*"
        );
    }

    #[test]
    fn test_blank_fields_fall_back_to_empty_result() {
        assert_eq!(
            format(
                r#"{"optimized_prompt": "", "changes_made": [], "share_message": null}"#,
                BASIC
            ),
            EMPTY_RESULT
        );
    }

    #[test]
    fn test_unknown_fields_render_generically() {
        assert_eq!(format(r#"{"result": "Hello"}"#, BASIC), "**Result:**\nHello");
    }

    #[test]
    fn test_no_raw_json_in_any_prefix() {
        for snapshot in cumulative_snapshots(BASIC_RESPONSE, 1) {
            let output = format(&snapshot, BASIC);
            assert!(
                !contains_raw_json_key(&output),
                "raw JSON leaked for {snapshot:?}: {output:?}"
            );
            assert!(!output.contains('{'), "brace leaked for {snapshot:?}");
        }
    }

    #[test]
    fn test_chunked_stream_ends_with_complete_rendering() {
        let snapshots = cumulative_snapshots(BASIC_RESPONSE, 7);
        let last = snapshots.last().unwrap();
        assert_eq!(format(last, BASIC), format(BASIC_RESPONSE, BASIC));
    }

    #[test]
    fn test_final_rendering_of_cut_off_buffer() {
        assert_eq!(
            format_final(r#"{"optimized_prompt": "partial tex"#, BASIC),
            "**Optimized Prompt:**\npartial tex"
        );
        assert_eq!(format_final("{", BASIC), EMPTY_RESULT);
        assert_eq!(format_final(r#"{"optimized_prompt": "P"#, None), EMPTY_RESULT);
        assert_eq!(format_final(BASIC_RESPONSE, BASIC), format(BASIC_RESPONSE, BASIC));
    }

    #[test]
    fn test_formatting_is_idempotent() {
        for snapshot in cumulative_snapshots(BASIC_RESPONSE, 5) {
            assert_eq!(format(&snapshot, BASIC), format(&snapshot, BASIC));
        }
    }
}

mod structured_tests {
    use super::*;

    #[test]
    fn test_prompt_variants_are_separated_and_share_block_added_once() {
        let buffer = r#"{"optimized_prompt": [{"role": "Editor", "objective": "Tighten prose"}, {"role": "Reviewer", "objective": "Check facts"}], "changes_made": ["Split roles"]}"#;
        let output = format(buffer, STRUCTURED);

        assert_eq!(
            output,
            format!(
                "**Optimized Prompt:**\n**Role:** Editor\n**Objective:** Tighten prose\n\n**Role:** Reviewer\n**Objective:** Check facts\n\n**Changes Made:**\n• Split roles\n\n{DEFAULT_SHARE_MESSAGE}"
            )
        );
        assert_eq!(output.matches(DEFAULT_SHARE_MESSAGE).count(), 1);
    }

    #[test]
    fn test_partial_prompt_object() {
        let buffer = r#"{"optimized_prompt": {"role": "Tutor", "objective": "Explain fractions", "task": ["Use pizza", "Give an exa"#;
        assert_eq!(
            format(buffer, STRUCTURED),
            "**Optimized Prompt:**\n**Role:** Tutor\n**Objective:** Explain fractions\n**Task:**\n• Use pizza\n\n*Generating…*"
        );
    }

    #[test]
    fn test_partial_output_never_adds_share_block() {
        let output = format(r#"{"optimized_prompt": "Draft", "changes_made": ["a"#, STRUCTURED);
        assert!(!output.contains(DEFAULT_SHARE_MESSAGE));
    }

    #[test]
    fn test_pro_tip_only() {
        assert_eq!(
            format(r#"{"pro_tip": "Be specific."}"#, STRUCTURED),
            format!("Be specific.\n\n{DEFAULT_SHARE_MESSAGE}")
        );
        assert_eq!(
            format(r#"{"pro_tip": "Be spec"#, STRUCTURED),
            "Be spec\n\n*Generating…*"
        );
    }

    #[test]
    fn test_explicit_share_message_replaces_default() {
        let output = format(
            r#"{"optimized_prompt": "P", "share_message": "Tell friends"}"#,
            STRUCTURED,
        );
        assert_eq!(output, "**Optimized Prompt:**\nP\n\n**Share Message:**\nTell friends");
    }

    #[test]
    fn test_techniques_and_tip_sections() {
        let output = format(
            r#"{"optimized_prompt": "P", "techniques_applied": ["Chain of thought"], "pro_tip": "Iterate."}"#,
            STRUCTURED,
        );
        assert_eq!(
            output,
            format!(
                "**Optimized Prompt:**\nP\n\n**Techniques Applied:**\n• Chain of thought\n\n**Pro Tip:**\nIterate.\n\n{DEFAULT_SHARE_MESSAGE}"
            )
        );
    }

    #[test]
    fn test_no_raw_json_in_any_prefix() {
        let buffer = r#"{"optimized_prompt": {"role": "Editor", "constraints": ["Be brief", "No jargon"]}, "pro_tip": "Read it aloud."}"#;
        for snapshot in cumulative_snapshots(buffer, 1) {
            let output = format(&snapshot, STRUCTURED);
            assert!(
                !contains_raw_json_key(&output),
                "raw JSON leaked for {snapshot:?}: {output:?}"
            );
        }
    }
}

mod level_tests {
    use super::*;

    #[test]
    fn test_mastery_complete() {
        let buffer = r#"{"overview": "Short intro", "deconstruct": {"core_intent": "Summarize", "key_entities": ["report", "team"]}, "deliver": ["Step one", "Step two"]}"#;
        assert_eq!(
            format(buffer, MASTERY),
            "**Overview:**\nShort intro\n\n**Deconstruct:**\n**Core Intent:** Summarize\n**Key Entities:**\n• report\n• team\n\n**Deliver:**\n• Step one\n• Step two"
        );
    }

    #[test]
    fn test_mastery_partial() {
        let buffer = r#"{"overview": "Short intro", "deconstruct": {"core_intent": "Summ"#;
        assert_eq!(
            format(buffer, MASTERY),
            "**Overview:**\nShort intro\n\n**Deconstruct:**\n**Core Intent:** Summ\n\n*Generating…*"
        );
    }

    #[test]
    fn test_nesting_past_depth_limit_never_leaks() {
        let mut buffer = String::from(r#"{"overview": "Intro", "deconstruct": "#);
        buffer.push_str(&r#"{"k": "#.repeat(70));
        buffer.push_str(r#""deep""#);

        let output = format(&buffer, MASTERY);
        assert!(!contains_raw_json_key(&output), "raw JSON leaked: {output:?}");
        assert!(!output.contains('{'));
        assert_eq!(output, "**Overview:**\nIntro\n\n*Generating…*");
    }

    #[test]
    fn test_system_complete() {
        let buffer = r#"{"system_prompt": "You are a helpful tutor.", "key_enhancements": ["Added persona", "Added persona", "Set tone"], "audience": "Students"}"#;
        assert_eq!(
            format(buffer, SYSTEM),
            "**System Prompt:**\nYou are a helpful tutor.\n\n**Key Enhancements:**\n• Added persona\n• Set tone\n\n**Audience:**\nStudents"
        );
    }

    #[test]
    fn test_system_partial() {
        assert_eq!(
            format(r#"{"system_prompt": "You are a help"#, SYSTEM),
            "**System Prompt:**\nYou are a help\n\n*Generating…*"
        );
    }

    #[test]
    fn test_unleveled_json_renders_generically() {
        assert_eq!(format(r#"{"optimized_prompt": "P"}"#, None), "**Optimized Prompt:**\nP");
        assert_eq!(format(r#"["one", "two"]"#, None), "• one\n• two");
        assert_eq!(format(r#"{"optimized_prompt": "P"#, None), GENERATING);
    }
}

mod text_tests {
    use super::*;

    #[test]
    fn test_dict_like_complete() {
        let buffer = "{'optimized_prompt': 'Write a poem', 'changes_made': ['Added rhyme'], 'done': True}";
        assert_eq!(
            format(buffer, BASIC),
            "**Optimized Prompt:**\nWrite a poem\n\n**Changes Made:**\n• Added rhyme"
        );
    }

    #[test]
    fn test_dict_like_partial() {
        let buffer = "{'optimized_prompt': 'Write a po";
        assert_eq!(
            format(buffer, BASIC),
            "**Optimized Prompt:**\nWrite a po\n\n*Generating…*"
        );
        assert_eq!(format(buffer, None), GENERATING);
    }

    #[test]
    fn test_dict_after_prose() {
        assert_eq!(format("Result: {'role': 'Editor'}", None), "**Role:**\nEditor");
    }

    #[test]
    fn test_ambiguous_fragment() {
        assert_eq!(format(r#"Here is "optimized_prompt": "x""#, BASIC), GENERATING);
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = "Hello there, how can I help?";
        assert_eq!(format(text, BASIC), text);
        assert_eq!(format(text, None), text);
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(format("", BASIC), "");
        assert_eq!(format("   ", None), "");
    }

    #[test]
    fn test_non_string_data() {
        assert_eq!(format_value(&json!(42), BASIC), "");
        assert_eq!(format_value(&json!(null), None), "");
        assert_eq!(format_value(&json!("plain words"), None), "plain words");
    }
}
