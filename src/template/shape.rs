use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value constraint of a template placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueShape {
    /// A 4-digit year or a range/list of years, never in the future
    Year,
    /// Free text naming the copyright holder, matched case-sensitively
    Holder,
    Url,
    /// A line pointing at the upstream source, e.g. `Original files: https://...`
    Attribution,
    /// A line stating that the file was modified by someone
    ModificationNotice,
    Text,
}

impl ValueShape {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "year" => Some(Self::Year),
            "holder" => Some(Self::Holder),
            "url" => Some(Self::Url),
            "attribution" => Some(Self::Attribution),
            "modification-notice" | "modification_notice" => Some(Self::ModificationNotice),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Shape implied by a placeholder name when none is given
    pub fn default_for(placeholder: &str) -> Self {
        Self::parse(placeholder).unwrap_or(Self::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Holder => "holder",
            Self::Url => "url",
            Self::Attribution => "attribution",
            Self::ModificationNotice => "modification-notice",
            Self::Text => "text",
        }
    }

    /// Regex fragment for the value. Only non-capturing groups, so the
    /// fragment can be embedded in a line pattern.
    pub fn fragment(&self) -> &'static str {
        match self {
            Self::Year => r"(?:19|20)\d{2}(?:\s*(?:-|–|,)\s*(?:19|20)\d{2})*",
            Self::Holder | Self::Text => r"\S(?:.*\S)?",
            Self::Url => r#"(?:https?|ftp)://[^\s<>"]+"#,
            Self::Attribution => r#".*?(?:https?|ftp)://[^\s<>"]+.*"#,
            Self::ModificationNotice => r"(?i:.*\bmodified\b.*)",
        }
    }

    /// Checks the regex cannot express
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Year => years_are_plausible(value, chrono::Local::now().year()),
            _ => !value.trim().is_empty(),
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn years_are_plausible(value: &str, current_year: i32) -> bool {
    let years: Vec<i32> = value
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect();

    !years.is_empty()
        && years.iter().all(|year| *year <= current_year)
        && years.windows(2).all(|pair| pair[0] <= pair[1])
}
