use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod builtin;
pub mod matcher;
pub mod registry;
pub mod shape;

// Re-export main types
pub use matcher::{find_listed_holder, match_header, MatchOptions, MatchResult};
pub use registry::TemplateRegistry;
pub use shape::ValueShape;

/// Placeholder name a template must bind to prove a file carries a
/// "modified by" notice
pub const MODIFICATION_NOTICE: &str = "modification_notice";

/// Padding tolerated at line edges and around placeholders
const SEP: &str = r"[^\p{L}\p{N}]*";

/// Gap between two boilerplate words: at least one non-word character
const WORD_GAP: &str = r"[^\p{L}\p{N}]+";

/// A template record as it appears in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The template describes an upstream license of a third-party-derived file
    #[serde(default)]
    pub third_party: bool,
    /// A `{modification_notice?}` line must be bound for the file to pass
    #[serde(default)]
    pub requires_modification_notice: bool,
    /// Header lines; `{name}`, `{name:shape}` and `{name?}` mark placeholders
    pub lines: Vec<String>,
    /// Exact values accepted for holder-shaped placeholders, case-sensitive.
    /// Empty means any holder.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holders: Vec<String>,
}

/// Malformed template definitions. Any of these aborts the run before a
/// single file is checked.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate template id '{0}'")]
    DuplicateId(String),

    #[error("template '{0}' has no non-blank lines")]
    EmptyTemplate(String),

    #[error("template '{template}' line {line}: unterminated placeholder")]
    UnterminatedPlaceholder { template: String, line: usize },

    #[error("template '{template}' line {line}: invalid placeholder name '{name}'")]
    InvalidPlaceholderName { template: String, line: usize, name: String },

    #[error("template '{template}' line {line}: unknown value shape '{shape}'")]
    UnknownShape { template: String, line: usize, shape: String },

    #[error("template '{template}': placeholder '{name}' is declared more than once")]
    DuplicatePlaceholder { template: String, name: String },

    #[error("template '{template}' line {line}: optional placeholder '{name}' must stand on its own line")]
    OptionalInMixedLine { template: String, line: usize, name: String },

    #[error("template '{0}' requires a modification notice but is not marked third_party")]
    NoticeWithoutThirdParty(String),

    #[error("template '{0}' requires a modification notice but has no '{{modification_notice?}}' line")]
    MissingNoticePlaceholder(String),

    #[error("template '{0}' lists holders but has no holder placeholder")]
    HoldersWithoutPlaceholder(String),

    #[error("template '{0}' lists an empty holder")]
    EmptyHolder(String),

    #[error("template '{template}' line {line}: {source}")]
    InvalidPattern {
        template: String,
        line: usize,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub name: String,
    pub shape: ValueShape,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

/// One line of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePattern {
    /// Explicit blank separator
    Blank,
    /// Boilerplate only
    Literal(String),
    /// Boilerplate with inline placeholders
    Mixed(Vec<Segment>),
    /// The whole line is a placeholder value
    Placeholder(Placeholder),
}

/// A template line with its compiled matcher
#[derive(Debug, Clone)]
pub struct TemplateLine {
    pattern: LinePattern,
    regex: Option<Regex>,
}

impl TemplateLine {
    pub fn is_blank(&self) -> bool {
        matches!(self.pattern, LinePattern::Blank)
    }

    /// Literal and mixed lines carry boilerplate
    pub fn is_literal(&self) -> bool {
        matches!(self.pattern, LinePattern::Literal(_) | LinePattern::Mixed(_))
    }

    pub fn is_optional(&self) -> bool {
        matches!(&self.pattern, LinePattern::Placeholder(p) if p.optional)
    }

    pub fn placeholders(&self) -> Vec<&Placeholder> {
        match &self.pattern {
            LinePattern::Placeholder(placeholder) => vec![placeholder],
            LinePattern::Mixed(segments) => segments
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Placeholder(placeholder) => Some(placeholder),
                    Segment::Text(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Try this line against one header line, returning the bound values
    pub fn bind(&self, text: &str) -> Option<Vec<(String, String)>> {
        let regex = self.regex.as_ref()?;
        let captures = regex.captures(text)?;

        let mut bound = Vec::new();
        for (index, placeholder) in self.placeholders().into_iter().enumerate() {
            let value = captures.get(index + 1)?.as_str().trim();
            if !placeholder.shape.accepts(value) {
                return None;
            }
            bound.push((placeholder.name.clone(), value.to_string()));
        }
        Some(bound)
    }
}

/// An accepted header shape
#[derive(Debug, Clone)]
pub struct LicenseTemplate {
    id: String,
    description: Option<String>,
    third_party: bool,
    requires_modification_notice: bool,
    source: Vec<String>,
    holders: Vec<String>,
    lines: Vec<TemplateLine>,
}

impl LicenseTemplate {
    /// Parse and compile one definition
    pub fn compile(definition: &TemplateDefinition) -> Result<Self, TemplateError> {
        let id = definition.id.trim().to_string();
        let mut lines = Vec::with_capacity(definition.lines.len());
        let mut names: Vec<String> = Vec::new();

        let holders: Vec<String> = definition.holders.iter().map(|holder| holder.trim().to_string()).collect();
        if holders.iter().any(|holder| holder.is_empty()) {
            return Err(TemplateError::EmptyHolder(id));
        }

        for (index, text) in definition.lines.iter().enumerate() {
            let line = index + 1;
            let pattern = parse_line(&id, line, text)?;
            let regex = compile_pattern(&pattern, &holders).map_err(|source| TemplateError::InvalidPattern {
                template: id.clone(),
                line,
                source,
            })?;
            let compiled = TemplateLine { pattern, regex };

            for placeholder in compiled.placeholders() {
                if names.contains(&placeholder.name) {
                    return Err(TemplateError::DuplicatePlaceholder {
                        template: id.clone(),
                        name: placeholder.name.clone(),
                    });
                }
                names.push(placeholder.name.clone());
            }
            lines.push(compiled);
        }

        if lines.iter().all(|line| line.is_blank()) {
            return Err(TemplateError::EmptyTemplate(id));
        }
        let has_holder = lines
            .iter()
            .flat_map(|line| line.placeholders())
            .any(|placeholder| placeholder.shape == ValueShape::Holder);
        if !holders.is_empty() && !has_holder {
            return Err(TemplateError::HoldersWithoutPlaceholder(id));
        }
        if definition.requires_modification_notice {
            if !definition.third_party {
                return Err(TemplateError::NoticeWithoutThirdParty(id));
            }
            if !names.iter().any(|name| name == MODIFICATION_NOTICE) {
                return Err(TemplateError::MissingNoticePlaceholder(id));
            }
        }

        Ok(Self {
            id,
            description: definition.description.clone(),
            third_party: definition.third_party,
            requires_modification_notice: definition.requires_modification_notice,
            source: definition.lines.clone(),
            holders,
            lines,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_third_party(&self) -> bool {
        self.third_party
    }

    pub fn requires_modification_notice(&self) -> bool {
        self.requires_modification_notice
    }

    pub fn lines(&self) -> &[TemplateLine] {
        &self.lines
    }

    /// Definition text, as written in configuration
    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// Accepted holder values; empty when any holder is accepted
    pub fn holders(&self) -> &[String] {
        &self.holders
    }

    /// Number of lines carrying boilerplate; higher sorts first
    pub fn specificity(&self) -> usize {
        self.lines.iter().filter(|line| line.is_literal()).count()
    }

    /// Render the header text with `values` substituted. Optional lines
    /// without a value are left out.
    pub fn render(&self, values: &IndexMap<String, String>) -> Vec<String> {
        let mut rendered = Vec::new();
        for line in &self.lines {
            match &line.pattern {
                LinePattern::Blank => rendered.push(String::new()),
                LinePattern::Literal(text) => rendered.push(text.clone()),
                LinePattern::Placeholder(placeholder) => match values.get(&placeholder.name) {
                    Some(value) => rendered.push(value.clone()),
                    None if placeholder.optional => {}
                    None => rendered.push(format!("{{{}}}", placeholder.name)),
                },
                LinePattern::Mixed(segments) => {
                    let mut text = String::new();
                    for segment in segments {
                        match segment {
                            Segment::Text(literal) => text.push_str(literal),
                            Segment::Placeholder(placeholder) => match values.get(&placeholder.name) {
                                Some(value) => text.push_str(value),
                                None => text.push_str(&format!("{{{}}}", placeholder.name)),
                            },
                        }
                    }
                    rendered.push(text);
                }
            }
        }
        rendered
    }
}

/// Parse one definition line into a pattern
fn parse_line(template: &str, line: usize, text: &str) -> Result<LinePattern, TemplateError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(LinePattern::Blank);
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    body.push(next);
                }
                if !closed {
                    return Err(TemplateError::UnterminatedPlaceholder {
                        template: template.to_string(),
                        line,
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(parse_placeholder(template, line, &body)?));
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }

    let placeholder_count = segments
        .iter()
        .filter(|segment| matches!(segment, Segment::Placeholder(_)))
        .count();

    if placeholder_count == 0 {
        return Ok(LinePattern::Literal(text.replace("{{", "{").replace("}}", "}")));
    }
    if let [Segment::Placeholder(placeholder)] = segments.as_slice() {
        return Ok(LinePattern::Placeholder(placeholder.clone()));
    }

    // Optional values only make sense for whole lines
    for segment in &segments {
        if let Segment::Placeholder(placeholder) = segment {
            if placeholder.optional {
                return Err(TemplateError::OptionalInMixedLine {
                    template: template.to_string(),
                    line,
                    name: placeholder.name.clone(),
                });
            }
        }
    }
    Ok(LinePattern::Mixed(segments))
}

fn parse_placeholder(template: &str, line: usize, body: &str) -> Result<Placeholder, TemplateError> {
    let (name, shape) = match body.split_once(':') {
        Some((name, shape)) => (name.trim(), Some(shape.trim())),
        None => (body.trim(), None),
    };
    let (name, optional) = match name.strip_suffix('?') {
        Some(name) => (name.trim(), true),
        None => (name, false),
    };

    let valid_name = name.chars().next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_name {
        return Err(TemplateError::InvalidPlaceholderName {
            template: template.to_string(),
            line,
            name: name.to_string(),
        });
    }

    let shape = match shape {
        Some(shape) => ValueShape::parse(shape).ok_or_else(|| TemplateError::UnknownShape {
            template: template.to_string(),
            line,
            shape: shape.to_string(),
        })?,
        None => ValueShape::default_for(name),
    };

    Ok(Placeholder {
        name: name.to_string(),
        shape,
        optional,
    })
}

/// Boilerplate as a case-insensitive word sequence, punctuation and
/// whitespace between words ignored but never dropped
fn words_pattern(text: &str) -> Option<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| format!("(?i:{})", regex::escape(word)))
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(WORD_GAP))
    }
}

/// Capturing group for a placeholder. Holder placeholders of a template with
/// a holder list only take one of the listed names, verbatim apart from
/// whitespace.
fn placeholder_pattern(placeholder: &Placeholder, holders: &[String]) -> String {
    if placeholder.shape == ValueShape::Holder && !holders.is_empty() {
        let names: Vec<String> = holders
            .iter()
            .map(|holder| {
                holder
                    .split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();
        return format!("({})", names.join("|"));
    }
    format!("({})", placeholder.shape.fragment())
}

fn compile_pattern(pattern: &LinePattern, holders: &[String]) -> Result<Option<Regex>, regex::Error> {
    let body = match pattern {
        LinePattern::Blank => return Ok(None),
        LinePattern::Literal(text) => words_pattern(text).unwrap_or_default(),
        LinePattern::Placeholder(placeholder) => {
            return Regex::new(&format!("^{}$", placeholder_pattern(placeholder, holders))).map(Some);
        }
        LinePattern::Mixed(segments) => segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => words_pattern(text),
                Segment::Placeholder(placeholder) => Some(placeholder_pattern(placeholder, holders)),
            })
            .collect::<Vec<_>>()
            .join(SEP),
    };
    Regex::new(&format!("^{sep}{body}{sep}$", sep = SEP, body = body)).map(Some)
}
