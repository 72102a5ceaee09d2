use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use super::{LicenseTemplate, TemplateLine};
use crate::header::{HeaderLine, RawHeader};

/// Residual tolerance around a template's span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Non-blank header lines allowed before the template starts
    pub max_leading_residual: usize,
    /// Non-blank header lines allowed after the template ends, up to the
    /// next blank line or comment block
    pub max_trailing_residual: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_leading_residual: 2,
            max_trailing_residual: 2,
        }
    }
}

/// Successful alignment of a header against one template
#[derive(Debug, Clone)]
pub struct MatchResult<'t> {
    pub template: &'t LicenseTemplate,
    /// Placeholder name to bound value, in template order
    pub bindings: IndexMap<String, String>,
    pub literal_lines: usize,
    /// Non-blank header lines outside the template's span
    pub residual_lines: usize,
}

impl MatchResult<'_> {
    pub fn template_id(&self) -> &str {
        self.template.id()
    }

    pub fn is_bound(&self, placeholder: &str) -> bool {
        self.bindings.contains_key(placeholder)
    }
}

/// Match a header against templates in priority order.
///
/// The first template that aligns wins; within a template the alignment with
/// the fewest leading residual lines wins. Both make the result a function of
/// the inputs alone.
pub fn match_header<'t>(
    header: &RawHeader,
    templates: &'t [LicenseTemplate],
    options: &MatchOptions,
) -> Option<MatchResult<'t>> {
    if header.is_empty() {
        return None;
    }

    let lines: Vec<Cow<'_, str>> = header
        .lines
        .iter()
        .map(|line| fold_copyright_sign(&line.text))
        .collect();
    let blocks: Vec<usize> = header.lines.iter().map(|line| line.block).collect();
    let starts = start_positions(&lines, options.max_leading_residual);

    for template in templates {
        for &(start, leading) in &starts {
            let mut bound = Vec::new();
            let end = match align(template.lines(), &lines, start, &mut bound) {
                Some(end) => end,
                None => continue,
            };

            let trailing = trailing_residual(&lines, &blocks, end);
            if trailing > options.max_trailing_residual {
                continue;
            }

            return Some(MatchResult {
                template,
                bindings: bound.into_iter().collect(),
                literal_lines: template.specificity(),
                residual_lines: leading + trailing,
            });
        }
    }

    None
}

/// First copyright line of the header naming one of `holders`, together with
/// the holder. Holders are looked up case-sensitively anywhere on the line.
pub fn find_listed_holder<'r, 'h>(header: &'r RawHeader, holders: &'h [String]) -> Option<(&'r HeaderLine, &'h str)> {
    if holders.is_empty() {
        return None;
    }
    header
        .lines
        .iter()
        .filter(|line| line.text.to_ascii_lowercase().contains("copyright"))
        .find_map(|line| {
            holders
                .iter()
                .find(|holder| line.text.contains(holder.as_str()))
                .map(|holder| (line, holder.as_str()))
        })
}

/// Candidate start indices paired with the number of non-blank lines skipped
/// to reach them
fn start_positions(lines: &[Cow<'_, str>], max_leading: usize) -> Vec<(usize, usize)> {
    let mut starts = vec![(0, 0)];
    let mut skipped = 0;

    for (index, line) in lines.iter().enumerate() {
        if skipped == max_leading {
            break;
        }
        if !is_blank(line) {
            skipped += 1;
            starts.push((index + 1, skipped));
        }
    }
    starts
}

/// Align `patterns` with `lines` from `pos`, returning the index after the
/// last consumed line. Optional placeholder lines are tried bound first, then
/// skipped.
fn align(
    patterns: &[TemplateLine],
    lines: &[Cow<'_, str>],
    pos: usize,
    bound: &mut Vec<(String, String)>,
) -> Option<usize> {
    let (pattern, rest) = match patterns.split_first() {
        Some(split) => split,
        None => return Some(pos),
    };

    if pattern.is_blank() {
        let blanks = lines[pos..].iter().take_while(|line| is_blank(line)).count();
        if blanks == 0 {
            return None;
        }
        return align(rest, lines, pos + blanks, bound);
    }

    let next = pos + lines[pos..].iter().take_while(|line| is_blank(line)).count();
    if let Some(values) = lines.get(next).and_then(|line| pattern.bind(line)) {
        let checkpoint = bound.len();
        bound.extend(values);
        if let Some(end) = align(rest, lines, next + 1, bound) {
            return Some(end);
        }
        bound.truncate(checkpoint);
    }

    if pattern.is_optional() {
        return align(rest, lines, pos, bound);
    }
    None
}

/// Non-blank lines after `end` that continue the paragraph the template
/// ended in. A blank line or a new comment block closes the window.
fn trailing_residual(lines: &[Cow<'_, str>], blocks: &[usize], end: usize) -> usize {
    let anchor = match end.checked_sub(1).or_else(|| (end < blocks.len()).then_some(end)) {
        Some(index) => blocks[index],
        None => return 0,
    };
    lines[end..]
        .iter()
        .zip(&blocks[end..])
        .take_while(|(line, block)| !is_blank(line) && **block == anchor)
        .count()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drop a copyright sign right after the word "Copyright", so that
/// `Copyright (c) 2021` and `Copyright © 2021` read as `Copyright 2021`
fn fold_copyright_sign(line: &str) -> Cow<'_, str> {
    // ASCII lowercasing keeps byte offsets aligned with `line`
    let lower = line.to_ascii_lowercase();
    let after = match lower.find("copyright") {
        Some(at) => at + "copyright".len(),
        None => return Cow::Borrowed(line),
    };

    let rest = line[after..].trim_start();
    for sign in ["(c)", "(C)", "©"] {
        if let Some(stripped) = rest.strip_prefix(sign) {
            return Cow::Owned(format!("{} {}", &line[..after], stripped.trim_start()));
        }
    }
    Cow::Borrowed(line)
}
