//! Line parser for the configuration syntax.
//!
//! The parser turns preprocessed text into an ordered list of sections
//! and their option assignments. It knows nothing about variable
//! substitution or defaults; [`Configuration`](crate::Configuration)
//! layers those on top.

use once_cell::sync::Lazy;
use regex::Regex;

use bruin_core::{ConfigError, Error, Result};

/// Matches a section header line, with an optional trailing comment.
static SECTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]*)\]\s*(?:[#;].*)?$").unwrap());

/// Legal section names: letters, digits, underscores and dots, starting
/// with a letter, underscore or dot, at least two characters long.
static SECTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[_.a-zA-Z][_.a-zA-Z0-9]+$").unwrap());

/// One section of parsed input, in file order.
///
/// The same section name may appear more than once; merging duplicates
/// is the caller's concern.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedSection {
    pub name: String,
    pub options: Vec<(String, String)>,
}

/// Parse configuration text into sections.
///
/// Rules, applied line by line:
///
/// - Blank lines are ignored.
/// - Lines whose first non-whitespace character is `#` or `;` are
///   comments, even when indented.
/// - An indented line continues the value of the preceding option; the
///   pieces are joined with a newline.
/// - `[name]` opens a section. Anything after the closing bracket must
///   be a comment.
/// - `name = value` or `name: value` assigns an option within the
///   current section. Option names are case-sensitive. A `;` preceded
///   by whitespace starts an inline comment.
pub(crate) fn parse(text: &str) -> Result<Vec<ParsedSection>> {
    let mut sections: Vec<ParsedSection> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with(['#', ';']) {
            continue;
        }

        if line.starts_with([' ', '\t']) {
            continue_option(&mut sections, trimmed, number)?;
        } else if line.starts_with('[') {
            sections.push(section_header(line, number)?);
        } else {
            option_line(&mut sections, line, number)?;
        }
    }

    for section in &mut sections {
        for (_, value) in &mut section.options {
            *value = value.trim().to_string();
        }
    }

    Ok(sections)
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Config(ConfigError::Parse {
        line,
        message: message.into(),
    })
}

fn continue_option(sections: &mut [ParsedSection], text: &str, number: usize) -> Result<()> {
    let option = sections
        .last_mut()
        .and_then(|section| section.options.last_mut());
    match option {
        Some((_, value)) => {
            value.push('\n');
            value.push_str(text);
            Ok(())
        }
        None => Err(parse_error(
            number,
            "continuation line without a preceding option",
        )),
    }
}

fn section_header(line: &str, number: usize) -> Result<ParsedSection> {
    let captures = SECTION_LINE
        .captures(line)
        .ok_or_else(|| parse_error(number, "malformed section header"))?;
    let name = match captures.get(1) {
        Some(name) => name.as_str(),
        None => "",
    };
    if !SECTION_NAME.is_match(name) {
        return Err(parse_error(number, format!("invalid section name {name:?}")));
    }
    Ok(ParsedSection {
        name: name.to_string(),
        options: Vec::new(),
    })
}

fn option_line(sections: &mut [ParsedSection], line: &str, number: usize) -> Result<()> {
    let separator = line.find([':', '=']).ok_or_else(|| {
        parse_error(
            number,
            "expected a section header, option assignment, or comment",
        )
    })?;

    let name = line[..separator].trim();
    if name.is_empty() {
        return Err(parse_error(number, "option name is empty"));
    }

    let value = strip_inline_comment(&line[separator + 1..]).trim().to_string();

    match sections.last_mut() {
        Some(section) => {
            section.options.push((name.to_string(), value));
            Ok(())
        }
        None => Err(parse_error(
            number,
            "option appears before any section header",
        )),
    }
}

/// Truncate `value` at the first `;` that follows whitespace.
fn strip_inline_comment(value: &str) -> &str {
    let mut previous_was_space = false;
    for (index, ch) in value.char_indices() {
        if ch == ';' && previous_was_space {
            return &value[..index];
        }
        previous_was_space = ch.is_whitespace();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(text: &str) -> ParsedSection {
        let mut sections = parse(text).unwrap();
        assert_eq!(sections.len(), 1);
        sections.remove(0)
    }

    fn assert_parse_fails_at(text: &str, expected_line: usize) {
        match parse(text) {
            Err(Error::Config(ConfigError::Parse { line, .. })) => {
                assert_eq!(line, expected_line)
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_sections_and_options() {
        let sections = parse(
            "[main]\n\
             host = example.com\n\
             port: 8080\n\
             [extra]\n\
             flag = yes\n",
        )
        .unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "main");
        assert_eq!(
            sections[0].options,
            vec![
                ("host".to_string(), "example.com".to_string()),
                ("port".to_string(), "8080".to_string()),
            ]
        );
        assert_eq!(sections[1].name, "extra");
        assert_eq!(
            sections[1].options,
            vec![("flag".to_string(), "yes".to_string())]
        );
    }

    #[test]
    fn test_comments_ignored() {
        let section = parse_one(
            "# leading comment\n\
             [main]\n\
             ; another comment\n\
             \t# indented comment\n\
             key = value\n",
        );
        assert_eq!(section.options, vec![("key".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_inline_comment_stripped() {
        let section = parse_one("[main]\nkey = value ; trailing words\n");
        assert_eq!(section.options[0].1, "value");
    }

    #[test]
    fn test_semicolon_without_whitespace_is_kept() {
        let section = parse_one("[main]\nkey = a;b\n");
        assert_eq!(section.options[0].1, "a;b");
    }

    #[test]
    fn test_continuation_lines_join_with_newline() {
        let section = parse_one("[main]\ntext = first\n\tsecond\n    third\n");
        assert_eq!(section.options[0].1, "first\nsecond\nthird");
    }

    #[test]
    fn test_continuation_of_empty_value() {
        let section = parse_one("[main]\ntext =\n    only line\n");
        assert_eq!(section.options[0].1, "only line");
    }

    #[test]
    fn test_option_names_are_case_sensitive() {
        let section = parse_one("[main]\nKey = upper\nkey = lower\n");
        assert_eq!(
            section.options,
            vec![
                ("Key".to_string(), "upper".to_string()),
                ("key".to_string(), "lower".to_string()),
            ]
        );
    }

    #[test]
    fn test_section_header_with_trailing_comment() {
        let section = parse_one("[main] ; the main section\nkey = v\n");
        assert_eq!(section.name, "main");
    }

    #[test]
    fn test_invalid_section_name() {
        assert_parse_fails_at("[1bad]\n", 1);
        assert_parse_fails_at("[x]\n", 1);
        assert_parse_fails_at("[has space]\n", 1);
    }

    #[test]
    fn test_option_before_section() {
        assert_parse_fails_at("key = value\n", 1);
    }

    #[test]
    fn test_garbage_line() {
        assert_parse_fails_at("[main]\nthis is not an assignment\n", 2);
    }

    #[test]
    fn test_continuation_without_option() {
        assert_parse_fails_at("[main]\n    dangling\n", 2);
    }

    #[test]
    fn test_dotted_section_names() {
        let section = parse_one("[db.primary]\nurl = x\n");
        assert_eq!(section.name, "db.primary");
    }
}
