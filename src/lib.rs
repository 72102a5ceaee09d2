pub mod checker;
pub mod config;
pub mod header;
pub mod init;
pub mod output;
pub mod template;
pub mod verdict;
pub mod walk;

// Re-export main types for easy access
pub use checker::{CheckOptions, CheckReport, CheckSummary, HeaderChecker, SourceFile};
pub use header::{CommentSyntax, RawHeader};
pub use template::{LicenseTemplate, MatchOptions, MatchResult, TemplateDefinition, TemplateError, TemplateRegistry};
pub use verdict::{Verdict, VerdictKind};
