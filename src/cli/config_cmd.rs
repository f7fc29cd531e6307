use anyhow::{Context, Result};

use creditwatch::core::auth::Role;
use creditwatch::core::config::AppConfig;

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    let path = AppConfig::default()
        .save()
        .context("Failed to generate config")?;
    println!("Generated config at {}", path.display());
    println!("  Set exaroton.api_key (or EXAROTON_API_KEY) and add [[users]] for `cw serve`.");
    Ok(())
}

pub fn check() -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        eprintln!("No config file found at {}", path.display());
        eprintln!("Run `cw config init` to create one.");
        return Ok(());
    }

    let config = AppConfig::load()
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let issues = config.validate();
    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        println!("  Snapshot store: {}", config.store.resolved_path().display());
        if config.exaroton.resolved_api_key().is_none() {
            println!("  No Exaroton API key set.");
        }
        let admins = config
            .users
            .iter()
            .filter(|u| Role::from_id(&u.role) == Some(Role::Admin))
            .count();
        println!(
            "  {} user{} configured ({} admin)",
            config.users.len(),
            if config.users.len() == 1 { "" } else { "s" },
            admins
        );
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}
