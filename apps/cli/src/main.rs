use anyhow::Result;
use chama_cli::cli::Cli;
use chama_cli::config::Config;
use chama_cli::{build_context, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::init();
    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = api_url;
    }
    init_tracing(config.log_format);

    let ctx = build_context(&config);
    if let Err(e) = ctx.session.initialize().await {
        tracing::warn!("Stored session could not be verified: {}", e);
    }

    if cli.command.requires_session() && !ctx.session.is_authenticated() {
        anyhow::bail!("Not logged in. Run `chama auth login` first.");
    }

    cli.command.run(&ctx).await
}
