//! CLI module for the prompt chain service
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `run`: execute one chain and print the result as JSON

pub mod run;
pub mod serve;

use clap::{Parser, Subcommand};

/// Prompt chain service - staged structured generation over a completion API
#[derive(Parser)]
#[command(name = "pmp-prompt-chain")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Execute one chain and print the JSON result to stdout
    Run(run::RunArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "pmp-prompt-chain",
            "run",
            "--prompt",
            "make a button",
            "--step",
            "components",
            "--step",
            "instances",
            "--message",
            "",
            "--message",
            r#"[{"role":"user","content":"x"}]"#,
        ])
        .unwrap();

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.prompt, "make a button");
                assert_eq!(args.steps, vec!["components", "instances"]);
                assert_eq!(args.messages.len(), 2);
            }
            Command::Serve => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_requires_step() {
        assert!(Cli::try_parse_from(["pmp-prompt-chain", "run", "--prompt", "x"]).is_err());
    }
}
