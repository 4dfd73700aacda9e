// LLM prompt constants for interview question generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{HIRING_ASSISTANT_SYSTEM, LIST_ONLY_INSTRUCTION};

/// Question prompt template. Replace `{tech_stack}` and `{n}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = "\
Tech stack: {tech_stack}

Write EXACTLY {n} intermediate technical interview questions for a candidate with this tech stack.
- Each question must be a single sentence ending with a question mark.
- Cover different technologies from the stack where possible.
- Keep them relevant, technically diverse, and appropriately challenging.

Return only the {n} items as a JSON array of strings, no extra text.";

pub fn question_system_prompt() -> String {
    format!("{HIRING_ASSISTANT_SYSTEM} {LIST_ONLY_INSTRUCTION}")
}

pub fn build_question_prompt(tech_stack: &str, n: usize) -> String {
    QUESTION_PROMPT_TEMPLATE
        .replace("{tech_stack}", tech_stack)
        .replace("{n}", &n.to_string())
}
