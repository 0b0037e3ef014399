//! Prompt template loading.

use crate::types::PromptTemplate;
use std::path::Path;
use urgeease_core::{AppError, AppResult};

/// Identifier of the built-in grounding template.
pub const DEFAULT_TEMPLATE_ID: &str = "urgeease.rag.default";

const DEFAULT_TEMPLATE: &str = r#"You are UrgeEase, a supportive recovery assistant for behavioral addictions.
You are NOT a licensed therapist. Do NOT diagnose. Do NOT prescribe medication.
Be compassionate, non-judgmental, and practical.

Safety:
- If the user expresses self-harm or suicidal intent, stop normal coaching and provide crisis resources.

Grounding rules:
- Use ONLY <context> and <chat_history> for factual claims.
- If the context does not contain the answer, say you don't have enough information from the provided sources.
- When you use the context, cite sources by filename.

<chat_history>
{{chat_history}}
</chat_history>

<context>
{{context}}
</context>

User message: {{query}}

Respond with:
1) Supportive response
2) 1-3 practical next steps (CBT/ACT style)
3) Sources used (filenames)
"#;

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// Load a template definition from a YAML file.
///
/// The file holds `id` and `template` keys.
///
/// # Example
/// ```no_run
/// use urgeease_prompt::load_template;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let template = load_template(Path::new(".urgeease/prompt.yaml"))?;
/// println!("Loaded template: {}", template.id);
/// # Ok(())
/// # }
/// ```
pub fn load_template(path: &Path) -> AppResult<PromptTemplate> {
    tracing::debug!("Loading prompt template from: {:?}", path);

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let template: PromptTemplate = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    if template.id.trim().is_empty() {
        return Err(AppError::Prompt("Prompt template id is required".to_string()));
    }
    if !template.template.contains("{{query}}") {
        return Err(AppError::Prompt(format!(
            "Prompt template '{}' never references {{{{query}}}}",
            template.id
        )));
    }

    tracing::info!("Loaded prompt template: {}", template.id);
    Ok(template)
}
