use crate::schema::FIELD_NAMES;

pub fn build_extraction_prompt(text: &str) -> String {
    let fields: String = FIELD_NAMES
        .iter()
        .map(|name| format!("{}:\n", name))
        .collect();

    format!(
        r#"
Extract the transaction details from the text below.

Return ONLY this exact format. EACH FIELD MUST BE ON ITS OWN LINE.
NO quotes, NO commas, NO JSON, NO extra text, NO code blocks.

{}
Text:
{}
"#,
        fields, text
    )
}
