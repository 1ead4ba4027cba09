use anyhow::Result;

use actionbook_registry::CapabilityRegistry;

use crate::config::AppConfig;

pub async fn cmd_info(config: &AppConfig) -> Result<()> {
    println!("actionbook System Information");
    println!("=============================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("BUILD_DATE", "unknown"));
    println!("Git Commit: {}", env!("GIT_HASH", "unknown"));
    println!();

    println!("Configuration:");
    println!("- Actions Directory: {}", config.actions_dir.display());
    println!("- Report Directory: {}", config.report_dir.display());
    println!("- Screenshot Directory: {}", config.screenshot_dir.display());
    match &config.log_dir {
        Some(dir) => println!("- Log Directory: {}", dir.display()),
        None => println!("- Log Directory: (stdout only)"),
    }
    println!(
        "- Driver Timeouts: page_ready={}ms element_visible={}ms clickable={}ms",
        config.timeouts.page_ready_ms,
        config.timeouts.element_visible_ms,
        config.timeouts.clickable_ms
    );
    println!();

    println!("Registered Verbs:");
    for verb in CapabilityRegistry::with_builtins().verbs() {
        println!("- {verb}");
    }

    Ok(())
}
