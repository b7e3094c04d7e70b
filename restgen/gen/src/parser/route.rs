//! Route template parsing.
//!
//! A template is literal text with `{name}` placeholders. Placeholder names
//! follow identifier rules so they can be matched against parameter names;
//! `{{` and `}}` are not escapes, braces only ever delimit placeholders.
//! A template is a path only: the query string is built from parameters, so
//! `?` and `#` are rejected.

use crate::ir::{RouteSegment, RouteTemplate};

/// Parses a route template into literal and placeholder segments.
///
/// ## Errors
///
/// Returns the reason the template is malformed: an unclosed `{`, a stray
/// `}`, an empty or non-identifier placeholder, or a `?` or `#` in the
/// literal text.
///
/// ## Examples
///
/// ```
/// use restgen_gen::parser::route::parse_route;
///
/// let route = parse_route("/repos/{owner}/{repo}").unwrap();
/// assert_eq!(route.placeholders(), vec!["owner", "repo"]);
///
/// assert!(parse_route("/repos/{owner").is_err());
/// ```
pub fn parse_route(raw: &str) -> Result<RouteTemplate, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '{' => {
                let start = idx + 1;
                let end = loop {
                    match chars.next() {
                        Some((close, '}')) => break close,
                        Some((_, '{')) => {
                            return Err(format!("nested `{{` at offset {idx}"));
                        }
                        Some(_) => {}
                        None => return Err(format!("unclosed `{{` at offset {idx}")),
                    }
                };
                let name = &raw[start..end];
                if name.is_empty() {
                    return Err(format!("empty placeholder at offset {idx}"));
                }
                if !is_identifier(name) {
                    return Err(format!("placeholder `{name}` is not an identifier"));
                }
                if !literal.is_empty() {
                    segments.push(RouteSegment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(RouteSegment::Placeholder(name.to_string()));
            }
            '}' => return Err(format!("stray `}}` at offset {idx}")),
            '?' | '#' => {
                return Err(format!(
                    "`{c}` at offset {idx}; query and fragment are not part of a route"
                ));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(RouteSegment::Literal(literal));
    }

    Ok(RouteTemplate {
        raw: raw.to_string(),
        segments,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if name == "_" {
        return false;
    }
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
