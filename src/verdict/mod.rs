use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub mod classifier;

pub use classifier::{classify, listed_third_party, unreadable};

/// 判定の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictKind {
    Compliant,
    CompliantThirdParty,
    Exempt,
    MissingHeader,
    UnrecognizedHeader,
    MissingModificationNotice,
    Unreadable,
}

impl VerdictKind {
    /// 集計で使う固定の並び順
    pub const ALL: [VerdictKind; 7] = [
        VerdictKind::Compliant,
        VerdictKind::CompliantThirdParty,
        VerdictKind::Exempt,
        VerdictKind::MissingHeader,
        VerdictKind::UnrecognizedHeader,
        VerdictKind::MissingModificationNotice,
        VerdictKind::Unreadable,
    ];

    /// 失敗として数える判定か
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            VerdictKind::MissingHeader
                | VerdictKind::UnrecognizedHeader
                | VerdictKind::MissingModificationNotice
                | VerdictKind::Unreadable
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictKind::Compliant => "compliant",
            VerdictKind::CompliantThirdParty => "compliant-third-party",
            VerdictKind::Exempt => "exempt",
            VerdictKind::MissingHeader => "missing-header",
            VerdictKind::UnrecognizedHeader => "unrecognized-header",
            VerdictKind::MissingModificationNotice => "missing-modification-notice",
            VerdictKind::Unreadable => "unreadable",
        }
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1ファイルの判定結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub kind: VerdictKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bindings: IndexMap<String, String>,
    pub reason: String,
}

impl Verdict {
    pub fn new(path: PathBuf, language: Option<String>, kind: VerdictKind, reason: impl Into<String>) -> Self {
        Self {
            path,
            language,
            kind,
            template_id: None,
            bindings: IndexMap::new(),
            reason: reason.into(),
        }
    }

    /// Exempt by configuration, without reading the file
    pub fn exempt(path: PathBuf, language: Option<String>, pattern: &str) -> Self {
        Self::new(
            path,
            language,
            VerdictKind::Exempt,
            format!("Exempted by pattern '{}'", pattern),
        )
    }

    pub fn is_failure(&self) -> bool {
        self.kind.is_failure()
    }
}
