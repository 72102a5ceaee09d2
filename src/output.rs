use crate::checker::CheckReport;
use crate::header::syntax::supported_languages;
use crate::template::TemplateRegistry;
use crate::verdict::{Verdict, VerdictKind};

const FILE_WIDTH: usize = 36;
const VERDICT_WIDTH: usize = 27;
const DETAIL_WIDTH: usize = 44;

pub fn format_table_output(report: &CheckReport, verbose: bool) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let compliant = summary.count(VerdictKind::Compliant);
    let third_party = summary.count(VerdictKind::CompliantThirdParty);
    let exempt = summary.count(VerdictKind::Exempt);

    output.push_str(&format!("📄 Header Summary ({} files)\n", summary.total_files));
    output.push_str(&format!(
        "✅ {} compliant  🔗 {} third-party  ⏭️ {} exempt  🚫 {} violations\n",
        compliant, third_party, exempt, summary.failures
    ));
    if summary.aborted {
        output.push_str(&format!(
            "⛔ Stopped at first violation, {} files not checked\n",
            summary.skipped
        ));
    }
    output.push('\n');

    if verbose {
        output.push_str("📄 All Files:\n");
        let all: Vec<&Verdict> = report.verdicts.iter().collect();
        output.push_str(&format_verdict_table(&all));
    } else {
        let issues: Vec<&Verdict> = report.verdicts.iter().filter(|v| v.is_failure()).collect();
        if !issues.is_empty() {
            output.push_str("⚠️  Issues Found:\n");
            output.push_str(&format_verdict_table(&issues));
        } else {
            output.push_str("✅ No issues found!\n");
        }

        if report.verdicts.len() > issues.len() {
            output.push_str(&format!(
                "\n💡 Run with --verbose to see all {} files\n",
                report.verdicts.len()
            ));
        }
    }

    output
}

fn format_verdict_table(verdicts: &[&Verdict]) -> String {
    if verdicts.is_empty() {
        return "No files found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&border('┌', '┬', '┐'));
    output.push_str(&format!(
        "│ {:<fw$} │ {:<vw$} │ {:<dw$} │\n",
        "File",
        "Verdict",
        "Detail",
        fw = FILE_WIDTH,
        vw = VERDICT_WIDTH,
        dw = DETAIL_WIDTH
    ));
    output.push_str(&border('├', '┼', '┤'));

    for verdict in verdicts {
        let path = verdict.path.display().to_string();
        let detail = match (&verdict.template_id, verdict.is_failure()) {
            (Some(id), false) => id.clone(),
            _ => verdict.reason.clone(),
        };
        output.push_str(&format!(
            "│ {:<fw$} │ {:<vw$} │ {:<dw$} │\n",
            truncate_start(&path, FILE_WIDTH),
            verdict.kind.as_str(),
            truncate(&detail, DETAIL_WIDTH),
            fw = FILE_WIDTH,
            vw = VERDICT_WIDTH,
            dw = DETAIL_WIDTH
        ));
    }

    output.push_str(&border('└', '┴', '┘'));
    output
}

/// Template listing for the `templates` command
pub fn format_templates_table(registry: &TemplateRegistry) -> String {
    let mut output = String::new();
    output.push_str(&format!("📋 Templates ({}, in match order)\n\n", registry.len()));

    for (index, template) in registry.iter().enumerate() {
        let mut flags = Vec::new();
        if template.is_third_party() {
            flags.push("third-party");
        }
        if template.requires_modification_notice() {
            flags.push("requires modification notice");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        output.push_str(&format!("{}. {}{}\n", index + 1, template.id(), flags));
        if let Some(description) = template.description() {
            output.push_str(&format!("   {}\n", description));
        }
        if !template.holders().is_empty() {
            output.push_str(&format!("   holder: {}\n", template.holders().join(" | ")));
        }
        for line in template.source() {
            output.push_str(&format!("   │ {}\n", line));
        }
        output.push('\n');
    }

    let languages: Vec<&str> = supported_languages().collect();
    output.push_str(&format!("🔤 Languages: {}\n", languages.join(", ")));

    output
}

fn border(left: char, middle: char, right: char) -> String {
    format!(
        "{left}{}{middle}{}{middle}{}{right}\n",
        "─".repeat(FILE_WIDTH + 2),
        "─".repeat(VERDICT_WIDTH + 2),
        "─".repeat(DETAIL_WIDTH + 2),
        left = left,
        middle = middle,
        right = right
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

/// Keep the end of a path, where the file name is
fn truncate_start(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().skip(count - (max_len - 1)).collect();
        format!("…{}", kept)
    }
}
