use serde::{Deserialize, Serialize};

pub mod extractor;
pub mod syntax;

// Re-export from submodules
pub use extractor::{decode_prefix, extract, extract_text};
pub use syntax::{detect_language, syntax_for, CommentSyntax};

/// One line of a file header with the comment markers stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLine {
    /// 1-based line number in the original file
    pub number: usize,
    pub text: String,
    /// Index of the comment block the line belongs to. A run of line
    /// comments is one block, every block comment starts a new one.
    #[serde(default)]
    pub block: usize,
}

impl HeaderLine {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// The leading comment block of a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHeader {
    pub lines: Vec<HeaderLine>,
    /// Byte offset of the first non-header content
    pub code_offset: usize,
    /// Set when no comment syntax is registered for the file's language
    pub unsupported_language: bool,
}

impl RawHeader {
    pub fn unsupported() -> Self {
        Self {
            unsupported_language: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn first_non_blank(&self) -> Option<&HeaderLine> {
        self.lines.iter().find(|line| !line.is_blank())
    }

    /// Reconstruct comment text from the header, reapplying the markers of `syntax`.
    ///
    /// A header made of one comment block gets one line prefix per line when
    /// the language has line comments. Otherwise every block is rendered as
    /// its own block comment, so extracting the result gives back the same
    /// lines and block boundaries.
    pub fn render(&self, syntax: &CommentSyntax) -> String {
        let mut output = String::new();
        let groups = self.blocks();

        match (syntax.line_prefixes.last(), syntax.blocks.first()) {
            (Some(prefix), block) if groups.len() <= 1 || block.is_none() => {
                for line in &self.lines {
                    if line.is_blank() {
                        output.push_str(prefix);
                    } else {
                        output.push_str(&format!("{} {}", prefix, line.text));
                    }
                    output.push('\n');
                }
            }
            (_, Some(block)) => {
                for group in groups {
                    output.push_str(block.open);
                    output.push('\n');
                    for line in group {
                        match block.continuation {
                            Some(marker) if line.is_blank() => output.push_str(&format!(" {}", marker)),
                            Some(marker) => output.push_str(&format!(" {} {}", marker, line.text)),
                            None => output.push_str(&line.text),
                        }
                        output.push('\n');
                    }
                    output.push_str(block.close);
                    output.push('\n');
                }
            }
            (_, None) => {}
        }

        output
    }

    /// Lines grouped by comment block, in order
    fn blocks(&self) -> Vec<&[HeaderLine]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for index in 1..=self.lines.len() {
            if index == self.lines.len() || self.lines[index].block != self.lines[start].block {
                if index > start {
                    groups.push(&self.lines[start..index]);
                }
                start = index;
            }
        }
        groups
    }
}
