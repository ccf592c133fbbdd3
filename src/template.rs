//! Placeholder substitution for the repository manifest template.
//!
//! Templates use `{name}` placeholders; `{{` and `}}` stand for literal
//! braces. Substituted values are XML escaped because the template renders
//! an `addon.xml` document.

use quick_xml::escape::escape;
use thiserror::Error;

/// Errors raised while rendering a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references a placeholder with no value.
    #[error("unknown template placeholder `{{{name}}}`")]
    UnknownPlaceholder {
        /// Placeholder name without braces.
        name: String,
    },

    /// A `{` was opened but never closed.
    #[error("unterminated placeholder at byte {offset}")]
    Unterminated {
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// A lone `}` appeared outside a placeholder.
    #[error("unmatched `}}` at byte {offset}")]
    UnmatchedBrace {
        /// Byte offset of the brace.
        offset: usize,
    },
}

/// Render `template`, replacing each `{name}` with the matching value.
///
/// # Errors
///
/// Returns a [`TemplateError`] for unknown placeholders and unbalanced
/// braces.
///
/// # Examples
///
/// ```
/// use kodi_repo_generator::template::render;
///
/// let xml = render("<addon id=\"{id}\" name=\"{name}\"/>", &[("id", "a"), ("name", "A & B")])
///     .unwrap();
/// assert_eq!(xml, "<addon id=\"a\" name=\"A &amp; B\"/>");
/// ```
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        let (literal, tail) = rest.split_at(pos);
        rendered.push_str(literal);
        let offset = template.len() - tail.len();

        if let Some(after) = tail.strip_prefix("{{") {
            rendered.push('{');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            rendered.push('}');
            rest = after;
        } else if let Some(after) = tail.strip_prefix('{') {
            let (name, remainder) = after
                .split_once('}')
                .ok_or(TemplateError::Unterminated { offset })?;
            let value = lookup(values, name)?;
            rendered.push_str(&escape(value));
            rest = remainder;
        } else {
            return Err(TemplateError::UnmatchedBrace { offset });
        }
    }

    rendered.push_str(rest);
    Ok(rendered)
}

fn lookup<'a>(values: &[(&str, &'a str)], name: &str) -> Result<&'a str, TemplateError> {
    values
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| TemplateError::UnknownPlaceholder {
            name: name.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("no placeholders", "no placeholders")]
    #[case::single("id={id}", "id=repo")]
    #[case::repeated("{id}/{id}", "repo/repo")]
    #[case::escaped_braces("{{id}} {id}", "{id} repo")]
    #[case::trailing("{url}{output}addons.xml", "https://host/_zips/addons.xml")]
    fn substitutes_known_placeholders(#[case] template: &str, #[case] expected: &str) {
        let values = [
            ("id", "repo"),
            ("url", "https://host/"),
            ("output", "_zips/"),
        ];
        assert_eq!(render(template, &values), Ok(expected.to_owned()));
    }

    #[test]
    fn escapes_markup_in_values() {
        let rendered = render("<summary>{s}</summary>", &[("s", "<b>\"Tom\" & Jerry</b>")])
            .expect("render succeeds");
        assert_eq!(
            rendered,
            "<summary>&lt;b&gt;&quot;Tom&quot; &amp; Jerry&lt;/b&gt;</summary>"
        );
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        assert_eq!(
            render("{missing}", &[("id", "repo")]),
            Err(TemplateError::UnknownPlaceholder {
                name: "missing".to_owned()
            })
        );
    }

    #[test]
    fn unterminated_placeholder_reports_offset() {
        assert_eq!(
            render("abc{id", &[("id", "repo")]),
            Err(TemplateError::Unterminated { offset: 3 })
        );
    }

    #[test]
    fn lone_closing_brace_is_an_error() {
        assert_eq!(
            render("a}b", &[]),
            Err(TemplateError::UnmatchedBrace { offset: 1 })
        );
    }
}
