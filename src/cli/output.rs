use std::io::IsTerminal;

use creditwatch::core::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// `--json` wins, then `--format`, then the config default.
    pub fn resolve(json_flag: bool, format_flag: Option<&str>, settings: &Settings) -> Self {
        if json_flag {
            return Self::Json;
        }
        match format_flag.unwrap_or(settings.default_format.as_str()) {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
}

/// Decide whether to emit ANSI colors from `--no-color`, the config `color`
/// setting, `NO_COLOR` and whether stdout is a terminal.
pub fn detect_color(color_flag: bool, setting: &str) -> bool {
    if !color_flag {
        return false;
    }
    match setting {
        "never" => false,
        "always" => true,
        _ => std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal(),
    }
}
