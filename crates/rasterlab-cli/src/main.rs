use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rasterlab_cli::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose {
        "rasterlab=debug,rasterlab_core=debug,rasterlab_io=debug,rasterlab_cli=debug"
    } else {
        "rasterlab=warn,rasterlab_core=warn,rasterlab_io=warn,rasterlab_cli=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    cli::run(args)
}
