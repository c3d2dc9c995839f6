pub mod cli;

pub use cli::{build_cli_command, BackendArg, Cli, Commands};
