use crate::formatter::plain::format_structured;

#[test]
fn test_labeled_reply_with_inline_list() {
    let text = "Optimized Prompt: Write a haiku about autumn\nChanges made: [\"Added season\", \"Set form\"]\nShare message: Try it!";
    assert_eq!(
        format_structured(text),
        "**Optimized Prompt:**\nWrite a haiku about autumn\n\n**Changes Made:**\n• Added season\n• Set form\n\n**Share Message:**\nTry it!"
    );
}

#[test]
fn test_prompt_parts_stay_inside_optimized_prompt() {
    let text = "**Optimized Prompt:**\n**Role:** Editor\n**Task:**\n- Trim words\n- Keep tone\n\n**Pro Tip:** Be concise.";
    assert_eq!(
        format_structured(text),
        "**Optimized Prompt:**\n**Role:** Editor\n**Task:**\n• Trim words\n• Keep tone\n\n**Pro Tip:**\nBe concise."
    );
}

#[test]
fn test_markdown_heading_labels() {
    let text = "## Changes Made:\n• Added tone\n• Added tone\n• Shortened";
    assert_eq!(
        format_structured(text),
        "**Changes Made:**\n• Added tone\n• Shortened"
    );
}

#[test]
fn test_preamble_is_kept_untitled() {
    assert_eq!(
        format_structured("Here you go!\nOptimized Prompt: P"),
        "Here you go!\n\n**Optimized Prompt:**\nP"
    );
}

#[test]
fn test_paragraph_breaks_inside_a_section() {
    let text = "Pro tip: First idea.\n\nSecond idea.";
    assert_eq!(
        format_structured(text),
        "**Pro Tip:**\nFirst idea.\n\nSecond idea."
    );
}

#[test]
fn test_text_without_labels_is_only_trimmed() {
    assert_eq!(
        format_structured("  Just a friendly reply.  \n"),
        "Just a friendly reply."
    );
    assert_eq!(
        format_structured("Roles: many\nTask force assembled"),
        "Roles: many\nTask force assembled"
    );
}

#[test]
fn test_empty_labeled_sections_are_dropped() {
    assert_eq!(
        format_structured("Optimized Prompt:\nChanges Made: []\nPro Tip: Keep going"),
        "**Pro Tip:**\nKeep going"
    );
}

#[test]
fn test_bracketed_placeholder_is_not_a_list() {
    let text = "Optimized Prompt:\n[Role] You are an expert editor, fix grammar, keep tone.\nChanges made: [\"Added role\"]";
    assert_eq!(
        format_structured(text),
        "**Optimized Prompt:**\n[Role] You are an expert editor, fix grammar, keep tone.\n\n**Changes Made:**\n• Added role"
    );
    assert_eq!(
        format_structured("Pro tip: [Topic]: climate, energy, food"),
        "**Pro Tip:**\n[Topic]: climate, energy, food"
    );
}

#[test]
fn test_single_quoted_list_body() {
    assert_eq!(
        format_structured("Changes made: ['Added role', 'Set tone, kept voice']"),
        "**Changes Made:**\n• Added role\n• Set tone, kept voice"
    );
}
