use clap::Parser;

/// Options the primary wheel starts with when none are given.
pub const DEFAULT_OPTIONS: [&str; 8] = [
    "Ana", "Carlos", "María", "Juan", "Laura", "Pedro", "Sofía", "Diego",
];

#[derive(Debug, Clone, Parser)]
#[command(name = "roulette-server")]
#[command(about = "Shared real-time roulette: one picker spins, everyone watches")]
pub struct Config {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Initial option for the main wheel (repeatable)
    #[arg(long = "option", value_name = "LABEL")]
    pub options: Vec<String>,

    /// Reject option edits on a wheel while it is spinning
    #[arg(long)]
    pub lock_options_while_spinning: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "roulette_server=info,warn")]
    pub log: String,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn initial_options(&self) -> Vec<String> {
        if self.options.is_empty() {
            DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.options.clone()
        }
    }
}
