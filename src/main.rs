mod cli;
mod config;
mod layout;
mod layouts;
mod logging;
mod materialize;
mod runner;
mod util;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
