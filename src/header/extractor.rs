use std::str::Utf8Error;
use super::syntax::{BlockDelimiters, CommentSyntax};
use super::{HeaderLine, RawHeader};

const BOM: &str = "\u{feff}";

/// Decode a file prefix as UTF-8.
///
/// A multi-byte sequence cut off at the end of the prefix is not an error; the
/// incomplete tail is dropped.
pub fn decode_prefix(bytes: &[u8]) -> Result<&str, Utf8Error> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if e.error_len().is_none() => {
            // Truncated at the prefix boundary, the valid part is usable
            Ok(std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default())
        }
        Err(e) => Err(e),
    }
}

/// Extract the leading comment block from raw file bytes.
///
/// Invalid UTF-8 is replaced rather than rejected; callers that need to
/// report undecodable files should go through [`decode_prefix`] and
/// [`extract_text`] instead.
pub fn extract(bytes: &[u8], syntax: Option<&CommentSyntax>) -> RawHeader {
    match decode_prefix(bytes) {
        Ok(text) => extract_text(text, syntax),
        Err(_) => extract_text(&String::from_utf8_lossy(bytes), syntax),
    }
}

/// Extract the leading comment block from decoded file content
pub fn extract_text(content: &str, syntax: Option<&CommentSyntax>) -> RawHeader {
    let syntax = match syntax {
        Some(syntax) => syntax,
        None => return RawHeader::unsupported(),
    };

    let mut lines = Vec::new();
    let mut offset = 0;
    let mut code_offset = None;
    let mut open_block: Option<&BlockDelimiters> = None;
    let mut block = 0;
    let mut last_kind: Option<CommentKind> = None;

    if content.starts_with(BOM) {
        offset = BOM.len();
    }

    for (index, raw_line) in content[offset..].split_inclusive('\n').enumerate() {
        let number = index + 1;
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim();

        if let Some(delimiters) = open_block {
            match line.find(delimiters.close) {
                Some(close_at) => {
                    // A bare closing delimiter is not a header line
                    let text = strip_continuation(&line[..close_at], delimiters);
                    if !text.is_empty() {
                        push_line(&mut lines, number, block, text);
                    }
                    open_block = None;
                    if let Some(rest_at) = trailing_code(line, close_at + delimiters.close.len()) {
                        code_offset = Some(line_start + rest_at);
                        break;
                    }
                }
                None => push_line(&mut lines, number, block, strip_continuation(line, delimiters)),
            }
            continue;
        }

        if trimmed.is_empty() {
            push_line(&mut lines, number, block, "");
            continue;
        }

        if index == 0 && syntax.allows_shebang && trimmed.starts_with("#!") {
            continue;
        }

        // Block openers first so that `--[[` is not taken for a `--` line comment
        if let Some(delimiters) = syntax.blocks.iter().find(|delimiters| trimmed.starts_with(delimiters.open)) {
            if last_kind.is_some() {
                block += 1;
            }
            last_kind = Some(CommentKind::Block);

            let open_at = line.len() - line.trim_start().len();
            let body_at = open_at + delimiters.open.len();
            match line[body_at..].find(delimiters.close) {
                Some(relative_close) => {
                    let close_at = body_at + relative_close;
                    let text = strip_continuation(&line[body_at..close_at], delimiters);
                    if !text.is_empty() {
                        push_line(&mut lines, number, block, text);
                    }
                    if let Some(rest_at) = trailing_code(line, close_at + delimiters.close.len()) {
                        code_offset = Some(line_start + rest_at);
                        break;
                    }
                }
                None => {
                    let text = strip_continuation(&line[body_at..], delimiters);
                    if !text.is_empty() {
                        push_line(&mut lines, number, block, text);
                    }
                    open_block = Some(delimiters);
                }
            }
            continue;
        }

        if let Some(prefix) = syntax.line_prefixes.iter().find(|prefix| trimmed.starts_with(**prefix)) {
            let body = trimmed[prefix.len()..].trim();
            if index < 2 && is_encoding_marker(body) {
                continue;
            }
            if last_kind == Some(CommentKind::Block) {
                block += 1;
            }
            last_kind = Some(CommentKind::Line);
            push_line(&mut lines, number, block, body);
            continue;
        }

        code_offset = Some(line_start);
        break;
    }

    trim_blank_edges(&mut lines);

    RawHeader {
        lines,
        code_offset: code_offset.unwrap_or(content.len()),
        unsupported_language: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentKind {
    Line,
    Block,
}

fn push_line(lines: &mut Vec<HeaderLine>, number: usize, block: usize, text: &str) {
    lines.push(HeaderLine {
        number,
        text: text.trim().to_string(),
        block,
    });
}

fn strip_continuation<'a>(text: &'a str, block: &BlockDelimiters) -> &'a str {
    let text = text.trim();
    match block.continuation {
        Some(marker) => text.trim_start_matches(marker).trim(),
        None => text,
    }
}

/// Offset of non-blank content after a block comment closes on the same line
fn trailing_code(line: &str, after_close: usize) -> Option<usize> {
    let rest = &line[after_close..];
    if rest.trim().is_empty() {
        None
    } else {
        Some(after_close + (rest.len() - rest.trim_start().len()))
    }
}

fn is_encoding_marker(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    (lower.contains("-*-") && lower.contains("coding"))
        || (lower.starts_with("vim:") && lower.contains("fileencoding"))
        || lower.starts_with("coding:")
        || lower.starts_with("coding=")
}

fn trim_blank_edges(lines: &mut Vec<HeaderLine>) {
    while lines.last().map_or(false, |line| line.is_blank()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| line.is_blank()).count();
    lines.drain(..leading);
}
