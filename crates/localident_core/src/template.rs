//! Naming templates such as `[name]_[local]__[hash]`.
//!
//! Placeholders are matched case-insensitively. Bracketed text that is not a
//! known placeholder stays in the output untouched, as does an unclosed `[`.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placeholder {
    /// `[folder]`, resolved to the grouping key
    Folder,
    /// `[name]`, resolved to the grouping key
    Name,
    /// `[local]`
    Local,
    /// `[hash]`
    Hash,
    /// `[ext]`
    Ext,
    /// `[path]`
    Path,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        let p = match name.to_ascii_lowercase().as_str() {
            "folder" => Placeholder::Folder,
            "name" => Placeholder::Name,
            "local" => Placeholder::Local,
            "hash" => Placeholder::Hash,
            "ext" => Placeholder::Ext,
            "path" => Placeholder::Path,
            _ => return None,
        };
        Some(p)
    }

    /// Whether this placeholder stands for the grouping key.
    pub fn is_grouping(self) -> bool {
        matches!(self, Placeholder::Folder | Placeholder::Name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Values substituted into a template.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interpolation<'a> {
    pub group: &'a str,
    pub local: &'a str,
    pub hash: &'a str,
    pub ext: &'a str,
    pub path: &'a str,
}

impl Interpolation<'_> {
    fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Folder | Placeholder::Name => self.group,
            Placeholder::Local => self.local,
            Placeholder::Hash => self.hash,
            Placeholder::Ext => self.ext,
            Placeholder::Path => self.path,
        }
    }
}

/// A parsed naming template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('[') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let Some(close) = after.find(']') else {
                literal.push_str(&rest[open..]);
                rest = "";
                break;
            };

            match Placeholder::parse(&after[..close]) {
                Some(p) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(p));
                }
                None => literal.push_str(&rest[open..open + close + 2]),
            }
            rest = &after[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `placeholder` appears anywhere in the template.
    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(p) if *p == placeholder))
    }

    pub fn interpolate(&self, values: &Interpolation<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + values.local.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => out.push_str(values.value(*p)),
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Template::parse(source)
    }
}
