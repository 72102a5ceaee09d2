use anyhow::Result;
use std::path::Path;

pub fn handle_config(show: bool, validate: bool, quiet: bool, config_path: Option<&Path>) -> Result<()> {
    if !show && !validate {
        if !quiet {
            eprintln!("Use --show or --validate");
        }
        std::process::exit(1);
    }

    if show {
        match header_auditor::config::load_config(config_path) {
            Ok(config) => {
                if !quiet {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
            }
            Err(e) => {
                if !quiet {
                    eprintln!("Error loading configuration: {:#}", e);
                }
                std::process::exit(1);
            }
        }
    }

    if validate {
        match header_auditor::config::load_config(config_path).and_then(|config| config.validate()) {
            Ok(()) => {
                if !quiet {
                    println!("✅ Configuration is valid");
                }
            }
            Err(e) => {
                if !quiet {
                    eprintln!("❌ Configuration validation failed: {:#}", e);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
