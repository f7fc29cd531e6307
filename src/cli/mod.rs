pub mod config_cmd;
pub mod history_cmd;
pub mod output;
pub mod prune_cmd;
pub mod record_cmd;
pub mod renderer;
pub mod serve_cmd;
