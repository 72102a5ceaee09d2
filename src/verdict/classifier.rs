use std::io;
use std::path::Path;
use super::{Verdict, VerdictKind};
use crate::header::{HeaderLine, RawHeader};
use crate::template::{MatchResult, MODIFICATION_NOTICE};

/// ヘッダーとマッチ結果から判定を決める
pub fn classify(
    path: &Path,
    language: Option<&str>,
    header: &RawHeader,
    matched: Option<MatchResult<'_>>,
) -> Verdict {
    let path = path.to_path_buf();
    let language = language.map(str::to_string);

    if header.unsupported_language {
        let reason = match &language {
            Some(language) => format!("No comment syntax for language '{}'", language),
            None => "Unknown language".to_string(),
        };
        return Verdict::new(path, language, VerdictKind::Exempt, reason);
    }

    if header.is_empty() {
        return Verdict::new(path, language, VerdictKind::MissingHeader, "No leading comment block");
    }

    let matched = match matched {
        Some(matched) => matched,
        None => {
            let reason = match header.first_non_blank() {
                Some(line) => format!("Header does not match any template (line {}: \"{}\")", line.number, line.text),
                None => "Header does not match any template".to_string(),
            };
            return Verdict::new(path, language, VerdictKind::UnrecognizedHeader, reason);
        }
    };

    let template = matched.template;
    let (kind, reason) = if template.is_third_party() {
        if template.requires_modification_notice() && !matched.is_bound(MODIFICATION_NOTICE) {
            (
                VerdictKind::MissingModificationNotice,
                format!("Third-party header '{}' lacks a modification notice", template.id()),
            )
        } else {
            (
                VerdictKind::CompliantThirdParty,
                format!("Matches third-party template '{}'", template.id()),
            )
        }
    } else {
        (VerdictKind::Compliant, format!("Matches template '{}'", template.id()))
    };

    Verdict {
        path,
        language,
        kind,
        template_id: Some(template.id().to_string()),
        bindings: matched.bindings,
        reason,
    }
}

/// Verdict for a header no template matched but whose copyright line names a
/// listed third-party holder
pub fn listed_third_party(path: &Path, language: Option<&str>, line: &HeaderLine, holder: &str) -> Verdict {
    let mut verdict = Verdict::new(
        path.to_path_buf(),
        language.map(str::to_string),
        VerdictKind::CompliantThirdParty,
        format!("Copyright on line {} names third-party holder '{}'", line.number, holder),
    );
    verdict.bindings.insert("holder".to_string(), holder.to_string());
    verdict
}

/// Verdict for a file that could not be read or decoded
pub fn unreadable(path: &Path, language: Option<&str>, error: &io::Error) -> Verdict {
    Verdict::new(
        path.to_path_buf(),
        language.map(str::to_string),
        VerdictKind::Unreadable,
        format!("Failed to read file: {}", error),
    )
}
