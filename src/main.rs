mod cli;
mod concat;
mod config;
mod header;
mod logging;
mod runner;
mod templates;
mod walk;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
