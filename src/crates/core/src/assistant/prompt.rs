//! Prompt construction for the model gateway.

/// Presence of any of these means the user already asked for code.
const CODE_INTENT_KEYWORDS: [&str; 2] = ["code", "script"];

/// Words that signal the user is asking to repair a previous failure.
pub const FIX_INTENT_KEYWORDS: [&str; 8] = [
    "fix",
    "error",
    "issue",
    "problem",
    "failed",
    "resolve",
    "help",
    "not working",
];

const SYSTEM_INSTRUCTION: &str = r#"You are a Fusion 360 API expert. Generate executable Python code that creates 3D models using the Fusion 360 API (adsk.core, adsk.fusion).

Follow these rules in every script:

1. Place ALL code inside a run(context) entry-point function.
2. Wrap the body in try/except and report failures through the UI with the full traceback.
3. Initialize app = adsk.core.Application.get(), ui = app.userInterface, design = app.activeProduct and rootComp = design.rootComponent before touching geometry.
4. Create objects through their containers: get the collection, create the input, set its properties, then add the feature.
5. Use adsk.core.ValueInput.createByString('5 mm') for dimensioned values so units are explicit.
6. Return the complete script; it will be executed without modifications.

Format the script in a single ```python fenced block."#;

/// System instruction, with the retrieved documentation digest appended
/// when one was produced for this turn.
pub fn build_system_instruction(docs_digest: Option<&str>) -> String {
    match docs_digest {
        Some(digest) => format!("{}\n\n{}", SYSTEM_INSTRUCTION, digest),
        None => SYSTEM_INSTRUCTION.to_string(),
    }
}

/// User instruction. Messages without obvious code intent are rewritten
/// into an explicit code-generation request; a prior failure is appended
/// as context so the model does not repeat the mistake.
pub fn build_user_instruction(text: &str, error_context: Option<&str>) -> String {
    let lowered = text.to_lowercase();
    let mut instruction = if CODE_INTENT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        text.to_string()
    } else {
        format!(
            "Write a complete, executable Fusion 360 Python script for this task:\n\n{}\n\nThe script will be executed directly, so include every required section: imports, the run(context) entry point, error handling and the actual implementation.",
            text
        )
    };

    if let Some(error) = error_context {
        instruction.push_str(&format!(
            "\n\nThe previous attempt failed. Fix the previous error and do not repeat the same mistake:\n\n{}",
            error
        ));
    }

    instruction
}

pub fn has_fix_intent(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FIX_INTENT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
