//! System instructions sent with every chunk

/// Build the fixed system prompt
///
/// `preserve_terms` are kept verbatim by the provider; `quote_char` is the
/// catalog's quoting character, which must be escaped by doubling it.
#[must_use]
pub fn build_system_prompt(preserve_terms: &[String], quote_char: char) -> String {
    let mut prompt = String::from(
        "You are a professional software localizer. You receive a JSON object whose keys are \
         message identifiers and whose values are user interface messages.\n\
         Rules:\n\
         - Translate only the string values. Never translate, add, remove or reorder keys.\n\
         - When a value is an object, translate each of its string values and keep its keys.\n\
         - Keep placeholders and message syntax such as {name}, {count, plural, ...}, <b>, </b> and %s exactly as they are.\n",
    );

    if !preserve_terms.is_empty() {
        let terms = preserve_terms
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!("- Do not translate these terms, keep them verbatim: {terms}.\n"));
    }

    prompt.push_str(&format!(
        "- Escape every literal {quote_char} character in a translated value by doubling it ({quote_char}{quote_char}).\n\
         - Respond with a single JSON object and nothing else: no explanations, no code fences.\n"
    ));

    prompt
}
