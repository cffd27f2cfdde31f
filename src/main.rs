use clap::Parser;
use layoutguardd::cli::Args;

fn main() -> Result<(), impl std::error::Error> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    layoutguardd::run(args)
}
