mod app;
mod cli;
mod telemetry;

use app::App;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    telemetry::init_tracing(args.verbose)?;

    let app = App::new(args)?;
    app.run()?;

    Ok(())
}
