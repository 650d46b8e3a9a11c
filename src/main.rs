use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use market_menu::app::{run_menu, AppCtx};
use market_menu::cli::Cli;
use market_menu::market::YahooSource;
use market_menu::ui::console::Console;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_filter))
        .context("parsing log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let source = YahooSource::new().context("building HTTP client")?;
    let mut ctx = AppCtx::new(Box::new(source)).with_dirs(cli.input_dir, cli.output_dir);
    let mut console = Console::stdio(!cli.no_color);

    run_menu(&mut console, &mut ctx).await
}
