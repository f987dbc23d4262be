//! Local class names declared by a style-module source.
//!
//! This is a lexical scan, not a CSS parser. In brace syntax text is split
//! into chunks ending in `{`, `;` or `}`; only chunks ending in `{` are
//! selectors, which keeps declarations out and lets nested SCSS rules through.
//! Indented Sass has no braces, so there a selector is a line with
//! deeper-indented lines under it. Nested selectors are resolved against
//! their parent rule, so `&__item` under `.menu` yields `menu__item`.

use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use crate::path;

/// Class names of a style module, picking the syntax from the file extension.
pub fn class_names_for_path(resource_path: &str, source: &str) -> Vec<String> {
    match path::extension(resource_path) {
        Some(ext) if ext.eq_ignore_ascii_case("sass") => class_names_indented(source),
        _ => class_names(source),
    }
}

/// Class names in order of first appearance, without duplicates.
pub fn class_names(source: &str) -> Vec<String> {
    let mut found = ClassSet::default();
    let mut chunk = String::new();
    let mut chars = source.chars().peekable();
    // Resolved selector of every open block; at-rules inherit their parent's.
    let mut blocks: Vec<String> = Vec::new();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                skip_block_comment(&mut chars);
            }
            '/' if chars.peek() == Some(&'/') => {
                skip_line(&mut chars);
            }
            '"' | '\'' => skip_string(&mut chars, c),
            '#' if chars.peek() == Some(&'{') => {
                chars.next();
                skip_balanced(&mut chars, '{', '}');
                // Keep the interpolated part from gluing onto a class name.
                chunk.push('#');
            }
            '(' if ends_with_url(&chunk) => skip_balanced(&mut chars, '(', ')'),
            '{' => {
                let parent = blocks.last().map_or("", String::as_str);
                let resolved = open_rule(parent, &chunk, &mut found);
                blocks.push(resolved);
                chunk.clear();
            }
            '}' => {
                blocks.pop();
                chunk.clear();
            }
            ';' => chunk.clear(),
            '\\' => {
                chunk.push(c);
                if let Some(escaped) = chars.next() {
                    chunk.push(escaped);
                }
            }
            _ => chunk.push(c),
        }
    }

    found.names
}

/// Class names of an indented-syntax (`.sass`) source.
pub fn class_names_indented(source: &str) -> Vec<String> {
    let lines = logical_lines(source);
    let mut found = ClassSet::default();
    // (indent, resolved selector) of the rules enclosing the current line
    let mut blocks: Vec<(usize, String)> = Vec::new();

    for (i, (indent, text)) in lines.iter().enumerate() {
        let has_children = lines.get(i + 1).is_some_and(|(next, _)| next > indent);
        if !has_children {
            continue;
        }

        while blocks.last().is_some_and(|(open, _)| open >= indent) {
            blocks.pop();
        }
        let parent = blocks.last().map_or("", |(_, sel)| sel.as_str());
        // `=mixin` and `+include` are the indented forms of `@mixin`/`@include`
        let prelude = match text.strip_prefix(['=', '+']) {
            Some(rest) => format!("@{rest}"),
            None => text.clone(),
        };
        let resolved = open_rule(parent, &prelude, &mut found);
        blocks.push((*indent, resolved));
    }

    found.names
}

/// Non-blank lines with their indentation, comments removed and selector
/// lists continued with a trailing `,` joined into one line.
fn logical_lines(source: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    let mut comment_indent: Option<usize> = None;
    let mut continues = false;

    for raw in source.lines() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let indent = raw.len() - raw.trim_start().len();

        // Comment bodies run on for as long as lines are indented deeper.
        match comment_indent {
            Some(open) if indent > open => continue,
            _ => comment_indent = None,
        }
        if text.starts_with("//") || text.starts_with("/*") {
            comment_indent = Some(indent);
            continue;
        }

        match lines.last_mut() {
            Some((_, prev)) if continues => {
                prev.push(' ');
                prev.push_str(text);
            }
            _ => lines.push((indent, text.to_string())),
        }
        continues = text.ends_with(',');
    }

    lines
}

/// Record the classes of a rule opened with `prelude` under `parent` and
/// return the selector its children nest under.
fn open_rule(parent: &str, prelude: &str, found: &mut ClassSet) -> String {
    let prelude = prelude.trim();
    if prelude.starts_with('@') {
        return parent.to_string();
    }
    let resolved = resolve_nested(parent, prelude);
    selector_classes(&resolved, found);
    resolved
}

/// Nest `selector` under `parent`: `&` stands for the parent, and parts
/// without `&` become its descendants.
fn resolve_nested(parent: &str, selector: &str) -> String {
    let parents = split_list(parent);
    if parents.is_empty() {
        return selector.replace('&', "");
    }

    let mut resolved = Vec::new();
    for part in split_list(selector) {
        for p in &parents {
            if part.contains('&') {
                resolved.push(part.replace('&', p));
            } else {
                resolved.push(format!("{p} {part}"));
            }
        }
    }
    resolved.join(", ")
}

/// Split a selector list on top-level commas.
fn split_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in selector.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(selector[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(selector[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

#[derive(Default)]
struct ClassSet {
    seen: HashSet<String>,
    names: Vec<String>,
}

impl ClassSet {
    fn insert(&mut self, name: String) {
        if self.seen.insert(name.clone()) {
            self.names.push(name);
        }
    }
}

fn skip_block_comment(chars: &mut Peekable<Chars<'_>>) {
    let mut prev = '\0';
    for c in chars.by_ref() {
        if prev == '*' && c == '/' {
            return;
        }
        prev = c;
    }
}

fn skip_line(chars: &mut Peekable<Chars<'_>>) {
    for c in chars.by_ref() {
        if c == '\n' {
            return;
        }
    }
}

fn skip_string(chars: &mut Peekable<Chars<'_>>, quote: char) {
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            c if c == quote || c == '\n' => return,
            _ => {}
        }
    }
}

/// Skip to the `close` matching an already consumed `open`.
fn skip_balanced(chars: &mut Peekable<Chars<'_>>, open: char, close: char) {
    let mut depth = 1usize;
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => skip_string(chars, c),
            '\\' => {
                chars.next();
            }
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Like [`skip_balanced`], returning the text between the delimiters.
fn take_balanced(chars: &mut Peekable<Chars<'_>>, open: char, close: char) -> String {
    let mut inner = String::new();
    let mut depth = 1usize;
    for c in chars.by_ref() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
        inner.push(c);
    }
    inner
}

fn ends_with_url(chunk: &str) -> bool {
    let bytes = chunk.as_bytes();
    bytes.len() >= 3 && bytes[bytes.len() - 3..].eq_ignore_ascii_case(b"url")
}

fn selector_classes(prelude: &str, found: &mut ClassSet) {
    let mut chars = prelude.chars().peekable();
    // `:global .a .b` makes the rest of the selector global until `,` or a
    // bare `:local`.
    let mut global = false;

    while let Some(c) = chars.next() {
        match c {
            ',' => global = false,
            '[' => skip_balanced(&mut chars, '[', ']'),
            '#' if chars.peek() == Some(&'{') => {
                chars.next();
                skip_balanced(&mut chars, '{', '}');
            }
            ':' => {
                let pseudo = take_ident(&mut chars);
                if pseudo.eq_ignore_ascii_case("global") {
                    if chars.peek() == Some(&'(') {
                        chars.next();
                        skip_balanced(&mut chars, '(', ')');
                    } else {
                        global = true;
                    }
                } else if pseudo.eq_ignore_ascii_case("local") {
                    if chars.peek() == Some(&'(') {
                        chars.next();
                        // `:local(...)` is local whatever mode surrounds it
                        let inner = take_balanced(&mut chars, '(', ')');
                        selector_classes(&inner, found);
                    } else {
                        global = false;
                    }
                }
            }
            '.' => {
                let name = take_ident(&mut chars);
                if !global && is_valid_class(&name) {
                    found.insert(name);
                }
            }
            _ => {}
        }
    }
}

fn take_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c == '\\' {
            chars.next();
            if let Some(escaped) = chars.next() {
                ident.push(escaped);
            }
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

fn is_valid_class(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some('-') => !matches!(chars.next(), None | Some('0'..='9')),
        Some(_) => true,
    }
}
