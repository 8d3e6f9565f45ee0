//! Run command - executes a single chain from the command line

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::types::ApiErrorResponse;
use crate::config::AppConfig;
use crate::domain::RawChainRequest;
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Free-form request text
    #[arg(long)]
    pub prompt: String,

    /// Step to run, in order (components, instances, layout)
    #[arg(long = "step", required = true)]
    pub steps: Vec<String>,

    /// JSON message history per step; pass once per step, empty for none
    #[arg(long = "message")]
    pub messages: Vec<String>,
}

impl RunArgs {
    fn into_raw(self) -> RawChainRequest {
        RawChainRequest {
            prompt: Some(self.prompt),
            steps: self.steps,
            messages: self.messages,
        }
    }
}

/// Execute the chain; the result or `{"errors": ...}` goes to stdout
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_cli_logging(&config.logging);

    let orchestrator = crate::build_orchestrator(&config)?;

    // Ctrl+C abandons the chain before the next completion call
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    match orchestrator.run(args.into_raw(), &cancel).await {
        Ok(output) => {
            info!(steps = output.len(), "Chain completed");
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            let payload = ApiErrorResponse {
                errors: orchestrator.public_message(&err),
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
            anyhow::bail!("chain failed ({})", err.kind())
        }
    }
}
