use clap::Parser;

/// layoutguardd - automatic keyboard-layout switcher for interception-tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a config file, overriding the usual search path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to the control-plane Unix socket
    #[arg(short, long)]
    pub socket: Option<String>,

    /// Don't start the control-plane thread
    #[arg(long)]
    pub no_ipc: bool,
}
