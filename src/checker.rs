use glob::Pattern;
use indexmap::IndexMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::header::{decode_prefix, detect_language, extract_text, syntax_for, RawHeader};
use crate::template::{find_listed_holder, match_header, MatchOptions, TemplateRegistry};
use crate::verdict::{classify, listed_third_party, unreadable, Verdict, VerdictKind};

/// Default number of leading bytes read per file
pub const DEFAULT_MAX_HEADER_BYTES: usize = 4096;

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub match_options: MatchOptions,
    /// Leading bytes considered per file
    pub max_header_bytes: usize,
    /// Files matching any of these are exempt and never read
    pub exempt: Vec<Pattern>,
    /// Extension or file name to language tag, ahead of the built-in table
    pub languages: IndexMap<String, String>,
    /// Copyright holders whose headers count as third-party when no template
    /// matches
    pub third_party_holders: Vec<String>,
    /// Stop scheduling files after the first failing verdict
    pub fail_fast: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            match_options: MatchOptions::default(),
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            exempt: Vec::new(),
            languages: IndexMap::new(),
            third_party_holders: Vec::new(),
            fail_fast: false,
        }
    }
}

/// One input to the checker: a path, its language if already known, and the
/// file prefix (or the error reading it)
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Option<String>,
    pub content: io::Result<Vec<u8>>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, language: Option<&str>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            language: language.map(str::to_string),
            content: Ok(content.into()),
        }
    }

    /// Read at most `limit` leading bytes of `path`
    pub fn read(path: impl Into<PathBuf>, language: Option<String>, limit: usize) -> Self {
        let path = path.into();
        let content = read_prefix(&path, limit);
        Self { path, language, content }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total_files: usize,
    /// Files that produced a verdict
    pub checked: usize,
    /// Verdict count per kind, every kind present
    pub counts: IndexMap<String, usize>,
    pub failures: usize,
    pub non_compliant: Vec<PathBuf>,
    /// Set when fail-fast stopped the run early
    pub aborted: bool,
    /// Files never checked because of fail-fast
    pub skipped: usize,
}

impl CheckSummary {
    pub fn count(&self, kind: VerdictKind) -> usize {
        self.counts.get(kind.as_str()).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckReport {
    pub verdicts: Vec<Verdict>,
    pub summary: CheckSummary,
}

impl CheckReport {
    pub fn has_failures(&self) -> bool {
        self.summary.failures > 0
    }
}

/// Runs extraction, matching and classification over files.
///
/// The registry is shared read-only; a checker can be cloned cheaply and used
/// from several threads.
#[derive(Debug, Clone)]
pub struct HeaderChecker {
    registry: Arc<TemplateRegistry>,
    options: CheckOptions,
}

impl HeaderChecker {
    pub fn new(registry: Arc<TemplateRegistry>, options: CheckOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Check one in-memory file. Only the first `max_header_bytes` bytes are
    /// looked at.
    pub fn check_source(&self, path: &Path, language: Option<&str>, bytes: &[u8]) -> Verdict {
        let syntax = language.and_then(syntax_for);
        if syntax.is_none() {
            return classify(path, language, &RawHeader::unsupported(), None);
        }

        let prefix = &bytes[..bytes.len().min(self.options.max_header_bytes)];
        let text = match decode_prefix(prefix) {
            Ok(text) => text,
            Err(e) => {
                let error = io::Error::new(io::ErrorKind::InvalidData, e);
                return unreadable(path, language, &error);
            }
        };

        let header = extract_text(text, syntax);
        let matched = match_header(&header, self.registry.templates_for(language), &self.options.match_options);
        if matched.is_none() {
            if let Some((line, holder)) = find_listed_holder(&header, &self.options.third_party_holders) {
                return listed_third_party(path, language, line, holder);
            }
        }
        classify(path, language, &header, matched)
    }

    /// Check prepared inputs on the rayon pool
    pub fn check_inputs(&self, inputs: Vec<SourceFile>) -> CheckReport {
        let total = inputs.len();
        let stop = AtomicBool::new(false);

        let verdicts: Vec<Verdict> = inputs
            .into_par_iter()
            .filter_map(|input| {
                if stop.load(Ordering::Relaxed) {
                    return None;
                }
                let verdict = self.check_input(input);
                if self.options.fail_fast && verdict.is_failure() {
                    stop.store(true, Ordering::Relaxed);
                }
                Some(verdict)
            })
            .collect();

        let aborted = stop.load(Ordering::Relaxed);
        let skipped = total - verdicts.len();
        if aborted {
            warn!("Stopped after first failure, {} file(s) skipped", skipped);
        }
        build_report(total, verdicts, aborted, skipped)
    }

    /// Read and check files from disk
    pub fn check_files(&self, paths: &[PathBuf]) -> CheckReport {
        let total = paths.len();
        let stop = AtomicBool::new(false);

        let verdicts: Vec<Verdict> = paths
            .par_iter()
            .filter_map(|path| {
                if stop.load(Ordering::Relaxed) {
                    return None;
                }
                let language = detect_language(path, &self.options.languages);
                let verdict = match self.exempt_pattern(path) {
                    Some(pattern) => Verdict::exempt(path.clone(), language, pattern.as_str()),
                    None => {
                        let input = SourceFile::read(path.clone(), language, self.options.max_header_bytes);
                        self.check_input(input)
                    }
                };
                if self.options.fail_fast && verdict.is_failure() {
                    stop.store(true, Ordering::Relaxed);
                }
                Some(verdict)
            })
            .collect();

        let aborted = stop.load(Ordering::Relaxed);
        let skipped = total - verdicts.len();
        if aborted {
            warn!("Stopped after first failure, {} file(s) skipped", skipped);
        }
        build_report(total, verdicts, aborted, skipped)
    }

    fn check_input(&self, input: SourceFile) -> Verdict {
        let language = input
            .language
            .or_else(|| detect_language(&input.path, &self.options.languages));

        if let Some(pattern) = self.exempt_pattern(&input.path) {
            return Verdict::exempt(input.path, language, pattern.as_str());
        }

        let verdict = match &input.content {
            Ok(bytes) => self.check_source(&input.path, language.as_deref(), bytes),
            Err(e) => {
                warn!("Failed to read {}: {}", input.path.display(), e);
                unreadable(&input.path, language.as_deref(), e)
            }
        };
        debug!("{}: {} ({})", verdict.path.display(), verdict.kind, verdict.reason);
        verdict
    }

    fn exempt_pattern(&self, path: &Path) -> Option<&Pattern> {
        let path = path.strip_prefix(".").unwrap_or(path);
        self.options.exempt.iter().find(|pattern| pattern.matches_path(path))
    }
}

/// Read at most `limit` leading bytes of a file
pub fn read_prefix(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(limit.min(DEFAULT_MAX_HEADER_BYTES));
    File::open(path)?.take(limit as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn build_report(total: usize, mut verdicts: Vec<Verdict>, aborted: bool, skipped: usize) -> CheckReport {
    verdicts.sort_by(|a, b| a.path.cmp(&b.path));

    let mut counts: IndexMap<String, usize> = VerdictKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), 0))
        .collect();
    for verdict in &verdicts {
        if let Some(count) = counts.get_mut(verdict.kind.as_str()) {
            *count += 1;
        }
    }

    let non_compliant: Vec<PathBuf> = verdicts
        .iter()
        .filter(|verdict| verdict.is_failure())
        .map(|verdict| verdict.path.clone())
        .collect();

    info!(
        "Checked {} of {} file(s), {} non-compliant",
        verdicts.len(),
        total,
        non_compliant.len()
    );

    CheckReport {
        summary: CheckSummary {
            total_files: total,
            checked: verdicts.len(),
            counts,
            failures: non_compliant.len(),
            non_compliant,
            aborted,
            skipped,
        },
        verdicts,
    }
}
