// src/main.rs

use depgraph::{Outcome, cli, logging, run};

fn main() {
    match run_main() {
        Ok(Outcome::Success) => {}
        Ok(Outcome::Problems) => std::process::exit(1),
        Err(err) => {
            eprintln!("depgraph error: {err:?}");
            std::process::exit(1);
        }
    }
}

fn run_main() -> anyhow::Result<Outcome> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args)
}
