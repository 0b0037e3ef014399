//! Prompt builder for rendering templates and injecting context.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, ChatTurn, ContextBlock, PromptTemplate};
use handlebars::Handlebars;
use std::collections::HashMap;
use urgeease_core::{AppError, AppResult};

/// Build the grounding prompt from a template, prior turns, retrieved context
/// and the user's message.
///
/// Rendering is deterministic given its inputs.
///
/// # Example
/// ```no_run
/// use urgeease_prompt::{build_prompt, ChatTurn, ContextBlock, PromptTemplate};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = vec![ContextBlock {
///     source: "guide.txt".to_string(),
///     text: "Urge surfing: wait 10 minutes and breathe.".to_string(),
/// }];
/// let built = build_prompt(&PromptTemplate::default(), &[], &context, "I feel an urge")?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    template: &PromptTemplate,
    history: &[ChatTurn],
    context: &[ContextBlock],
    query: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!(
        "Building prompt '{}' ({} history turns, {} context blocks)",
        template.id,
        history.len(),
        context.len()
    );

    let mut variables = HashMap::new();
    variables.insert("chat_history".to_string(), format_history(history));
    variables.insert("context".to_string(), format_context(context));
    variables.insert("query".to_string(), query.to_string());

    let text = render_template(&template.template, &variables)?;

    Ok(BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            template_id: template.id.clone(),
            history_turns: history.len(),
            context_blocks: context.len(),
        },
    })
}

/// Format chat history as `<turn role='…'>…</turn>` lines.
pub fn format_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("<turn role='{}'>{}</turn>", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format retrieved passages as source-tagged blocks separated by blank lines.
pub fn format_context(blocks: &[ContextBlock]) -> String {
    blocks
        .iter()
        .map(|block| format!("[SOURCE: {}]\n{}", block.source, block.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output; chat content must reach the model verbatim
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide_block() -> ContextBlock {
        ContextBlock {
            source: "guide.txt".to_string(),
            text: "Urge surfing: wait 10 minutes & breathe.".to_string(),
        }
    }

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), "Hello, world!".to_string());

        let result = render_template("Question: {{query}}", &vars).unwrap();
        assert_eq!(result, "Question: Hello, world!");
    }

    #[test]
    fn test_render_does_not_escape() {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), "<b>can't</b> & won't".to_string());

        let result = render_template("{{query}}", &vars).unwrap();
        assert_eq!(result, "<b>can't</b> & won't");
    }

    #[test]
    fn test_format_history() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        assert_eq!(
            format_history(&history),
            "<turn role='user'>hi</turn>\n<turn role='assistant'>hello</turn>"
        );
        assert_eq!(format_history(&[]), "");
    }

    #[test]
    fn test_format_context() {
        let blocks = vec![
            guide_block(),
            ContextBlock {
                source: "triggers.txt".to_string(),
                text: "Time, mood, environment.".to_string(),
            },
        ];
        assert_eq!(
            format_context(&blocks),
            "[SOURCE: guide.txt]\nUrge surfing: wait 10 minutes & breathe.\n\n[SOURCE: triggers.txt]\nTime, mood, environment."
        );
    }

    #[test]
    fn test_build_prompt_with_default_template() {
        let built = build_prompt(
            &PromptTemplate::default(),
            &[ChatTurn::user("I slipped yesterday")],
            &[guide_block()],
            "What should I do when I feel an urge?",
        )
        .unwrap();

        assert!(built.text.contains("[SOURCE: guide.txt]"));
        assert!(built.text.contains("wait 10 minutes & breathe"));
        assert!(built.text.contains("<turn role='user'>I slipped yesterday</turn>"));
        assert!(built.text.contains("User message: What should I do when I feel an urge?"));
        assert_eq!(built.metadata.history_turns, 1);
        assert_eq!(built.metadata.context_blocks, 1);
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let template = PromptTemplate::default();
        let a = build_prompt(&template, &[], &[guide_block()], "q").unwrap();
        let b = build_prompt(&template, &[], &[guide_block()], "q").unwrap();
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn test_invalid_template_is_prompt_error() {
        let template = PromptTemplate {
            id: "bad".to_string(),
            template: "{{#if}}".to_string(),
        };
        assert!(matches!(
            build_prompt(&template, &[], &[], "q"),
            Err(AppError::Prompt(_))
        ));
    }
}
