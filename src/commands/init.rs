use anyhow::Result;
use header_auditor::init;

pub fn handle_init(quiet: bool) -> Result<()> {
    let result = init::generate_config();

    if result.is_ok() && !quiet {
        println!("✅ Created .header-auditor.toml");
    }

    result
}
