use anyhow::Result;
use std::path::Path;
use crate::cli::OutputFormat;
use header_auditor::config::load_config;
use header_auditor::output::format_templates_table;

pub fn handle_templates(format: Option<OutputFormat>, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = config.build_registry()?;

    let format = format.unwrap_or_else(|| OutputFormat::from_config(config.format.as_deref()));
    match format {
        OutputFormat::Table => print!("{}", format_templates_table(&registry)),
        OutputFormat::Json => {
            let templates: Vec<serde_json::Value> = registry
                .iter()
                .map(|template| {
                    serde_json::json!({
                        "id": template.id(),
                        "description": template.description(),
                        "third_party": template.is_third_party(),
                        "requires_modification_notice": template.requires_modification_notice(),
                        "specificity": template.specificity(),
                        "holders": template.holders(),
                        "lines": template.source(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&templates)?);
        }
    }

    Ok(())
}
