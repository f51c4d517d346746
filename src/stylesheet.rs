//! Stylesheet Scoping
//!
//! Rewrites class selectors in CSS/SCSS source to their registry tokens.
//! Only rule preludes are touched: declarations, at-rule preludes, comments,
//! string literals and `#{}` interpolations are copied through verbatim.
//!
//! `:global(.a)` and a bare `:global` (up to the next `,`) keep names as
//! written; `:local(...)` switches scoping back on. `@extend` targets are
//! scoped too. Parent-suffix selectors (`&__elem`) are rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ScopeError;
use crate::registry::{NameEntry, ScopedNameRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedStylesheet {
    pub css: String,
    /// Local names used by this sheet, in first-seen order.
    pub exports: Vec<NameEntry>,
}

pub fn scope_stylesheet(
    source: &str,
    registry: &mut ScopedNameRegistry,
) -> Result<ScopedStylesheet, ScopeError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len() + source.len() / 8);
    let mut segment = Segment::default();
    let mut exports = Exports::default();
    let mut depth = 0usize;
    let mut parens = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match c {
            '/' if next == Some('*') => {
                let end = find_block_comment_end(&chars, i + 2);
                segment.push_opaque(&chars[i..end]);
                i = end;
                continue;
            }
            '/' if next == Some('/') && parens == 0 => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == '\n')
                    .map_or(chars.len(), |p| i + p);
                segment.push_opaque(&chars[i..end]);
                i = end;
                continue;
            }
            '"' | '\'' => {
                let end = find_string_end(&chars, i);
                segment.push_opaque(&chars[i..end]);
                i = end;
                continue;
            }
            '#' if next == Some('{') => {
                let end = find_interpolation_end(&chars, i + 2);
                segment.push_opaque(&chars[i..end]);
                i = end;
                continue;
            }
            '(' => {
                parens += 1;
                segment.push_code(c);
            }
            ')' => {
                parens = parens.saturating_sub(1);
                segment.push_code(c);
            }
            '{' if parens == 0 => {
                segment.write_prelude(&mut out, registry, &mut exports)?;
                out.push('{');
                depth += 1;
            }
            '}' if parens == 0 => {
                if depth == 0 {
                    return Err(ScopeError::UnbalancedBlock(format!(
                        "stylesheet: unexpected '}}' at line {}",
                        line_of(&chars, i)
                    )));
                }
                segment.write_statement(&mut out, registry, &mut exports)?;
                out.push('}');
                depth -= 1;
            }
            ';' if parens == 0 => {
                segment.write_statement(&mut out, registry, &mut exports)?;
                out.push(';');
            }
            _ => segment.push_code(c),
        }
        i += 1;
    }

    if depth != 0 {
        return Err(ScopeError::UnbalancedBlock(format!(
            "stylesheet: {} unclosed block(s)",
            depth
        )));
    }
    segment.write_statement(&mut out, registry, &mut exports)?;

    Ok(ScopedStylesheet {
        css: out,
        exports: exports.entries,
    })
}

fn line_of(chars: &[char], index: usize) -> usize {
    chars[..index].iter().filter(|&&c| c == '\n').count() + 1
}

fn find_block_comment_end(chars: &[char], from: usize) -> usize {
    let mut j = from;
    while j + 1 < chars.len() {
        if chars[j] == '*' && chars[j + 1] == '/' {
            return j + 2;
        }
        j += 1;
    }
    chars.len()
}

fn find_string_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut j = start + 1;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            c if c == quote => return j + 1,
            '\n' => return j,
            _ => j += 1,
        }
    }
    chars.len()
}

fn find_interpolation_end(chars: &[char], from: usize) -> usize {
    let mut nesting = 1;
    let mut j = from;
    while j < chars.len() {
        match chars[j] {
            '{' => nesting += 1,
            '}' => {
                nesting -= 1;
                if nesting == 0 {
                    return j + 1;
                }
            }
            _ => {}
        }
        j += 1;
    }
    chars.len()
}

#[derive(Default)]
struct Exports {
    seen: HashSet<String>,
    entries: Vec<NameEntry>,
}

impl Exports {
    fn record(&mut self, local: &str, token: &str) {
        if self.seen.insert(local.to_string()) {
            self.entries.push(NameEntry {
                local: local.to_string(),
                token: token.to_string(),
            });
        }
    }
}

enum Piece {
    Code(String),
    Opaque(String),
}

/// Text between two structural characters (`{`, `}`, `;`).
#[derive(Default)]
struct Segment {
    pieces: Vec<Piece>,
}

impl Segment {
    fn push_code(&mut self, c: char) {
        match self.pieces.last_mut() {
            Some(Piece::Code(code)) => code.push(c),
            _ => self.pieces.push(Piece::Code(c.to_string())),
        }
    }

    fn push_opaque(&mut self, chars: &[char]) {
        self.pieces.push(Piece::Opaque(chars.iter().collect()));
    }

    fn is_at_rule(&self) -> bool {
        self.at_keyword().is_some()
    }

    /// Name of the at-rule this segment starts with (`media` for `@media`).
    fn at_keyword(&self) -> Option<String> {
        let code = self.pieces.iter().find_map(|p| match p {
            Piece::Code(code) if !code.trim().is_empty() => Some(code.trim_start()),
            _ => None,
        })?;
        let rest = code.strip_prefix('@')?;
        Some(rest.chars().take_while(|&c| is_ident_char(c)).collect())
    }

    fn write_verbatim(&mut self, out: &mut String) {
        for piece in self.pieces.drain(..) {
            match piece {
                Piece::Code(s) | Piece::Opaque(s) => out.push_str(&s),
            }
        }
    }

    fn write_prelude(
        &mut self,
        out: &mut String,
        registry: &mut ScopedNameRegistry,
        exports: &mut Exports,
    ) -> Result<(), ScopeError> {
        if self.is_at_rule() {
            self.write_verbatim(out);
            return Ok(());
        }
        self.write_selector(out, registry, exports)
    }

    /// Declarations pass through; `@extend` targets are scoped like selectors
    /// so they keep matching the renamed rules.
    fn write_statement(
        &mut self,
        out: &mut String,
        registry: &mut ScopedNameRegistry,
        exports: &mut Exports,
    ) -> Result<(), ScopeError> {
        if self.at_keyword().as_deref() == Some("extend") {
            self.write_selector(out, registry, exports)
        } else {
            self.write_verbatim(out);
            Ok(())
        }
    }

    fn write_selector(
        &mut self,
        out: &mut String,
        registry: &mut ScopedNameRegistry,
        exports: &mut Exports,
    ) -> Result<(), ScopeError> {
        let mut selector = SelectorRewriter::default();
        for piece in self.pieces.drain(..) {
            match piece {
                Piece::Code(code) => selector.rewrite(&code, out, registry, exports)?,
                Piece::Opaque(text) => out.push_str(&text),
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Global,
    Local,
    Plain,
}

#[derive(Default)]
struct SelectorRewriter {
    wrappers: Vec<Wrapper>,
    global_mode: bool,
    in_brackets: bool,
}

impl SelectorRewriter {
    fn is_global(&self) -> bool {
        match self
            .wrappers
            .iter()
            .rev()
            .find(|w| **w != Wrapper::Plain)
        {
            Some(Wrapper::Global) => true,
            Some(_) => false,
            None => self.global_mode,
        }
    }

    fn rewrite(
        &mut self,
        code: &str,
        out: &mut String,
        registry: &mut ScopedNameRegistry,
        exports: &mut Exports,
    ) -> Result<(), ScopeError> {
        let chars: Vec<char> = code.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if self.in_brackets {
                self.in_brackets = c != ']';
                out.push(c);
                i += 1;
                continue;
            }

            match c {
                '[' => {
                    self.in_brackets = true;
                    out.push(c);
                }
                // `&__elem` would glue a suffix onto the scoped parent token, which
                // no longer matches the token markup gets for `block__elem`.
                '&' if chars.get(i + 1).is_some_and(|&next| is_ident_char(next)) => {
                    let suffix: String = chars[i..]
                        .iter()
                        .skip(1)
                        .take_while(|&&ch| is_ident_char(ch))
                        .collect();
                    return Err(ScopeError::ParentSuffix(format!("&{}", suffix)));
                }
                ':' => {
                    if let Some(consumed) = self.pseudo_switch(&chars[i..]) {
                        i += consumed;
                        continue;
                    }
                    out.push(c);
                }
                '(' => {
                    self.wrappers.push(Wrapper::Plain);
                    out.push(c);
                }
                ')' => match self.wrappers.pop() {
                    Some(Wrapper::Global) | Some(Wrapper::Local) => {}
                    _ => out.push(c),
                },
                ',' => {
                    if self.wrappers.is_empty() {
                        self.global_mode = false;
                    }
                    out.push(c);
                }
                '.' => {
                    let ident_len = class_ident_len(&chars[i + 1..]);
                    if ident_len == 0 {
                        out.push(c);
                    } else {
                        let local: String = chars[i + 1..i + 1 + ident_len].iter().collect();
                        out.push('.');
                        if self.is_global() {
                            out.push_str(&local);
                        } else {
                            let token = registry.resolve(&local)?;
                            exports.record(&local, &token);
                            out.push_str(&token);
                        }
                        i += 1 + ident_len;
                        continue;
                    }
                }
                _ => out.push(c),
            }
            i += 1;
        }
        Ok(())
    }

    /// Handles `:global`, `:global(`, `:local` and `:local(`. Returns how many
    /// chars were consumed, or `None` for any other pseudo-class.
    fn pseudo_switch(&mut self, rest: &[char]) -> Option<usize> {
        for (keyword, wrapper) in [(":global", Wrapper::Global), (":local", Wrapper::Local)] {
            let len = keyword.chars().count();
            if rest.len() < len || !rest[..len].iter().copied().eq(keyword.chars()) {
                continue;
            }
            match rest.get(len) {
                Some('(') => {
                    self.wrappers.push(wrapper);
                    return Some(len + 1);
                }
                Some(&c) if is_ident_char(c) => return None,
                _ => {
                    self.global_mode = wrapper == Wrapper::Global;
                    let spaces = rest[len..].iter().take_while(|c| c.is_whitespace()).count();
                    return Some(len + spaces);
                }
            }
        }
        None
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

/// Length of a class identifier at the start of `chars`, or 0 when the text
/// cannot start one (`.5em`, `.-1`, `. foo`).
fn class_ident_len(chars: &[char]) -> usize {
    let starts_ok = match chars {
        [first, ..] if first.is_ascii_digit() => false,
        ['-', second, ..] => !second.is_ascii_digit() && is_ident_char(*second),
        [first, ..] => is_ident_char(*first) && *first != '-',
        [] => false,
    };
    if !starts_ok {
        return 0;
    }
    chars.iter().take_while(|&&c| is_ident_char(c)).count()
}
