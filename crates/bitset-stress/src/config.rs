use std::path::Path;

use atomic_bitset::WORD_BITS;
use serde::Deserialize;

use crate::error::ConfigError;

/// Stress scenario parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Requested bitmap capacity in bits.
    pub capacity: usize,
    /// Worker threads per round.
    pub threads: usize,
    /// Fill rounds.
    pub rounds: usize,
    /// Iterations per worker in the toggle race.
    pub toggle_iterations: usize,
    /// Bit raced by the toggle scenario.
    pub toggle_index: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 4096,
            threads: 8,
            rounds: 10,
            toggle_iterations: 100_000,
            toggle_index: 5,
        }
    }
}

impl Config {
    /// Check the parameters needed by the fill scenario.
    pub fn validate_fill(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        if self.capacity < self.threads {
            return Err(ConfigError::CapacityBelowThreads {
                capacity: self.capacity,
                threads: self.threads,
            });
        }
        Ok(())
    }

    /// Check the parameters needed by the toggle scenario.
    pub fn validate_toggle(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        if self.toggle_index >= self.capacity {
            return Err(ConfigError::ToggleIndexOutOfRange {
                index: self.toggle_index,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Bits sharing a word with the toggle target, target excluded.
    pub fn toggle_neighbours(&self) -> Vec<usize> {
        let start = self.toggle_index - self.toggle_index % WORD_BITS;
        (start..start + WORD_BITS)
            .filter(|&i| i != self.toggle_index)
            .collect()
    }
}

/// Parse a yaml scenario file.
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    // an empty document means "all defaults"
    if input.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(input)?)
}

/// Read and parse a yaml scenario file from disk.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
        assert_eq!(parse_config("  \n").unwrap(), Config::default());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = parse_config("capacity: 100\nthreads: 2\n").unwrap();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.threads, 2);
        assert_eq!(config.rounds, Config::default().rounds);
        assert_eq!(config.toggle_index, 5);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            parse_config("capacity: 10\nspeed: 3\n"),
            Err(ConfigError::YamlDeserializeError(_))
        ));
    }

    #[test]
    fn fill_needs_a_thread_per_bit() {
        let config = Config {
            capacity: 3,
            threads: 4,
            ..Config::default()
        };
        assert!(matches!(
            config.validate_fill(),
            Err(ConfigError::CapacityBelowThreads {
                capacity: 3,
                threads: 4
            })
        ));
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = Config {
            threads: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate_fill(), Err(ConfigError::NoThreads)));
        assert!(matches!(config.validate_toggle(), Err(ConfigError::NoThreads)));
    }

    #[test]
    fn toggle_index_must_fit_capacity() {
        let config = Config {
            capacity: 10,
            toggle_index: 10,
            ..Config::default()
        };
        assert!(matches!(
            config.validate_toggle(),
            Err(ConfigError::ToggleIndexOutOfRange { index: 10, capacity: 10 })
        ));
    }

    #[test]
    fn neighbours_cover_rest_of_word() {
        let config = Config {
            toggle_index: 37,
            ..Config::default()
        };
        let neighbours = config.toggle_neighbours();
        assert_eq!(neighbours.len(), 31);
        assert_eq!(neighbours.first(), Some(&32));
        assert_eq!(neighbours.last(), Some(&63));
        assert!(!neighbours.contains(&37));
    }

    #[test]
    fn repository_scenario_parses() {
        let yaml: &str = include_str!("../../../stress.yaml");
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.rounds, 100);
        config.validate_fill().unwrap();
        config.validate_toggle().unwrap();
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/bitset-stress.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
