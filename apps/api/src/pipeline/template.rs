//! Named-placeholder prompt rendering.
//!
//! `{name}` is replaced by the matching value in one left-to-right pass, so a
//! substituted value is never scanned again. `{{` and `}}` emit literal braces.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("template placeholder '{{{0}}}' has no value")]
    MissingVariable(String),

    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),
}

pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(pos) = rest.find(&['{', '}'][..]) {
        out.push_str(&rest[..pos]);
        let brace = rest.as_bytes()[pos];
        let after = &rest[pos + 1..];

        if brace == b'}' {
            // Lone `}` is kept; `}}` collapses to one.
            out.push('}');
            let skip = if after.starts_with('}') { 2 } else { 1 };
            rest = &rest[pos + skip..];
            offset += pos + skip;
            continue;
        }

        if after.starts_with('{') {
            out.push('{');
            rest = &rest[pos + 2..];
            offset += pos + 2;
            continue;
        }

        let end = after
            .find('}')
            .ok_or(TemplateError::Unterminated(offset + pos))?;
        let name = &after[..end];
        let value = vars
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
        out.push_str(value);

        let consumed = pos + 1 + end + 1;
        rest = &rest[consumed..];
        offset += consumed;
    }

    out.push_str(rest);
    Ok(out)
}
