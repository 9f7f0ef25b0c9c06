use crate::utils::static_files::StaticFiles;
use common::utils::log_entry::io::IOEntry;
use std::path::Path;

/// Loads an embedded HTML template and substitutes every `{{key}}`.
/// Values are inserted verbatim; escape them with [`escape_html`] first.
pub fn render(template: &str, values: &[(&str, String)]) -> Result<String, String> {
    let path = format!("html/{}", template);
    let file = StaticFiles::get(&path).ok_or_else(|| String::from(IOEntry::ReadFileError(Path::new(&path).display(), std::io::ErrorKind::NotFound.into())))?;
    Ok(fill(&String::from_utf8_lossy(&file.data), values))
}

// Inserted values are never scanned for placeholders again.
pub fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after
            .find("}}")
            .and_then(|end| values.iter().find(|(key, _)| *key == &after[..end]).map(|(_, value)| (end, value)));
        match value {
            Some((end, value)) => {
                output.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                output.push_str("{{");
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

pub fn script_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value)
        .map(|json| json.replace('<', "\\u003c").replace('>', "\\u003e").replace('&', "\\u0026"))
        .map_err(|err| err.to_string())
}
