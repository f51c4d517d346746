//! Markup rewriting.
//!
//! HTML: every name in `class` and `styleName` goes through the registry and
//! ends up in `class`. JSX: `className` is left alone (global names), while
//! `styleName` names are scoped and merged into `className`.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use crate::error::ScopeError;
use crate::registry::ScopedNameRegistry;

lazy_static! {
    static ref ATTR_RE: Regex =
        Regex::new(r#"(\s+)(class|className|styleName)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
    static ref DYNAMIC_CLASS_NAME_RE: Regex = Regex::new(r"\sclassName\s*=\s*\{").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupFlavor {
    Html,
    Jsx,
}

impl MarkupFlavor {
    fn class_attr(self) -> &'static str {
        match self {
            MarkupFlavor::Html => "class",
            MarkupFlavor::Jsx => "className",
        }
    }
}

pub fn rewrite_markup(source: &str, registry: &mut ScopedNameRegistry) -> Result<String, ScopeError> {
    rewrite(source, registry, MarkupFlavor::Html)
}

pub fn rewrite_jsx(source: &str, registry: &mut ScopedNameRegistry) -> Result<String, ScopeError> {
    rewrite(source, registry, MarkupFlavor::Jsx)
}

pub fn rewrite(
    source: &str,
    registry: &mut ScopedNameRegistry,
    flavor: MarkupFlavor,
) -> Result<String, ScopeError> {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        let opens_tag =
            bytes[i] == b'<' && bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic());
        if opens_tag {
            let name_end = i
                + 1
                + bytes[i + 1..]
                    .iter()
                    .take_while(|&&b| is_tag_name_byte(b))
                    .count();
            if let Some(tag_end) = find_tag_end(bytes, name_end) {
                out.push_str(&source[last..name_end]);
                out.push_str(&rewrite_attributes(
                    &source[name_end..tag_end],
                    registry,
                    flavor,
                )?);
                last = tag_end;
                i = tag_end;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&source[last..]);
    Ok(out)
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b':' | b'-')
}

/// Index of the `>` closing a start tag whose attributes begin at `from`.
/// Quoted values and `{...}` expressions (nested braces, JS strings) are
/// skipped, so `style={{ a: 1 }}` and `() => { ... }` stay inside the tag.
/// Returns `None` when the text is not a well-formed tag.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut j = from;

    while j < bytes.len() {
        let b = bytes[j];
        if let Some(q) = quote {
            if b == b'\\' && depth > 0 {
                j += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            j += 1;
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b'`' if depth > 0 => quote = Some(b),
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            b'<' if depth == 0 => return None,
            b'>' if depth == 0 => return Some(j),
            _ => {}
        }
        j += 1;
    }
    None
}

/// Marks the byte offsets of `attrs` that sit outside quotes and braces, so
/// attribute-looking text inside an expression is not rewritten.
fn top_level_offsets(attrs: &str) -> Vec<bool> {
    let bytes = attrs.as_bytes();
    let mut mask = vec![false; bytes.len()];
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut j = 0;

    while j < bytes.len() {
        let b = bytes[j];
        mask[j] = depth == 0 && quote.is_none();
        match quote {
            Some(q) => {
                if b == b'\\' && depth > 0 {
                    j += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'`' if depth > 0 => quote = Some(b),
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
        j += 1;
    }
    mask
}

/// Resolves each whitespace-separated name of a class list.
pub fn scope_class_list(
    value: &str,
    registry: &mut ScopedNameRegistry,
) -> Result<Vec<String>, ScopeError> {
    value
        .split_whitespace()
        .map(|name| registry.resolve(name))
        .collect()
}

struct ClassAttr {
    range: Range<usize>,
    leading_ws: String,
    name: String,
    value: String,
    quote: char,
}

fn rewrite_attributes(
    attrs: &str,
    registry: &mut ScopedNameRegistry,
    flavor: MarkupFlavor,
) -> Result<String, ScopeError> {
    let top_level = top_level_offsets(attrs);
    let found: Vec<ClassAttr> = ATTR_RE
        .captures_iter(attrs)
        .filter(|caps| caps.get(0).is_some_and(|m| top_level[m.start()]))
        .filter_map(|caps| {
            let (value, quote) = match (caps.get(3), caps.get(4)) {
                (Some(v), _) => (v.as_str(), '"'),
                (None, Some(v)) => (v.as_str(), '\''),
                _ => return None,
            };
            Some(ClassAttr {
                range: caps.get(0)?.range(),
                leading_ws: caps[1].to_string(),
                name: caps[2].to_string(),
                value: value.to_string(),
                quote,
            })
        })
        .collect();

    if found.is_empty() {
        return Ok(attrs.to_string());
    }
    // An expression `className={...}` cannot be merged into statically.
    let dynamic_class_name = DYNAMIC_CLASS_NAME_RE
        .find_iter(attrs)
        .any(|m| top_level[m.start()]);
    if flavor == MarkupFlavor::Jsx && dynamic_class_name {
        return Ok(attrs.to_string());
    }

    // Resolve in attribute order so tokens follow document order.
    let mut styled = Vec::new();
    for attr in &found {
        match (attr.name.as_str(), flavor) {
            ("styleName", _) => styled.extend(scope_class_list(&attr.value, registry)?),
            ("class", MarkupFlavor::Html) => {
                scope_class_list(&attr.value, registry)?;
            }
            _ => {}
        }
    }
    let target = flavor.class_attr();
    let has_target = found.iter().any(|a| a.name == target);

    let mut out = String::with_capacity(attrs.len());
    let mut last = 0;
    let mut styled_written = false;

    for attr in &found {
        out.push_str(&attrs[last..attr.range.start]);
        last = attr.range.end;

        let names = if attr.name == "styleName" {
            if has_target || styled_written {
                continue;
            }
            styled_written = true;
            styled.clone()
        } else if attr.name == target {
            let mut names = match flavor {
                MarkupFlavor::Html => scope_class_list(&attr.value, registry)?,
                MarkupFlavor::Jsx => attr.value.split_whitespace().map(str::to_string).collect(),
            };
            if !styled_written {
                names.extend(styled.iter().cloned());
                styled_written = true;
            }
            names
        } else {
            // `className` in HTML or `class` in JSX: not ours.
            out.push_str(&attrs[attr.range.clone()]);
            continue;
        };

        out.push_str(&format!(
            "{}{}={q}{}{q}",
            attr.leading_ws,
            target,
            names.join(" "),
            q = attr.quote
        ));
    }
    out.push_str(&attrs[last..]);
    Ok(out)
}
