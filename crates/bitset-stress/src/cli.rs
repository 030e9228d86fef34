use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bitset_stress::Config;

/// Flags that override values from the scenario file.
#[derive(Debug, Default, Args, PartialEq)]
pub(crate) struct Overrides {
    /// Bitmap capacity in bits
    #[arg(short, long)]
    pub capacity: Option<usize>,

    /// Worker threads
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Fill rounds
    #[arg(short, long)]
    pub rounds: Option<usize>,

    /// Iterations per worker in the toggle race
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Bit raced by the toggle scenario
    #[arg(long)]
    pub index: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(iterations) = self.iterations {
            config.toggle_iterations = iterations;
        }
        if let Some(index) = self.index {
            config.toggle_index = index;
        }
        config
    }
}

#[derive(Debug, Subcommand, PartialEq)]
pub(crate) enum Command {
    /// Fill the bitmap from many threads and verify every bit landed.
    Fill(Overrides),
    /// Race set and unset on one bit while neighbours in its word churn.
    Toggle(Overrides),
}

impl Command {
    pub fn overrides(&self) -> &Overrides {
        match self {
            Command::Fill(overrides) | Command::Toggle(overrides) => overrides,
        }
    }
}

/// Stress the lock-free bitmap from many threads.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Turn debugging information on
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML scenario file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The scenario to run
    #[clap(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fill_with_overrides() {
        let cli = Cli::try_parse_from(["bitset-stress", "fill", "-c", "64", "-t", "2"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Fill(Overrides {
                capacity: Some(64),
                threads: Some(2),
                ..Overrides::default()
            })
        );
        assert!(!cli.verbose);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bitset-stress",
            "toggle",
            "--index",
            "3",
            "--verbose",
            "--config",
            "stress.yaml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("stress.yaml")));
        assert_eq!(cli.command.overrides().index, Some(3));
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let overrides = Overrides {
            rounds: Some(1),
            iterations: Some(50),
            ..Overrides::default()
        };
        let config = overrides.apply(Config::default());
        assert_eq!(config.rounds, 1);
        assert_eq!(config.toggle_iterations, 50);
        assert_eq!(config.capacity, Config::default().capacity);
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["bitset-stress"]).is_err());
    }
}
