use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use atomic_bitset::ConcurrentBitmap;
use colored::Colorize;
use crossbeam_channel::unbounded;

use crate::config::Config;
use crate::error::{Result, StressError};
use crate::{print_debug, print_warning};

/// How often toggle workers look at the stop flag.
const STOP_CHECK_INTERVAL: usize = 1024;

/// Outcome of a finished scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub scenario: &'static str,
    pub rounds: usize,
    pub operations: u64,
    pub elapsed: Duration,
    /// The run ended early on a stop request.
    pub stopped: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} round(s), {} operation(s) in {:.3?}",
            self.scenario, self.rounds, self.operations, self.elapsed
        )?;
        if self.stopped {
            write!(f, " (stopped)")?;
        }
        Ok(())
    }
}

/// Per-worker result of one fill round.
#[derive(Debug, Default)]
struct Tally {
    operations: u64,
    flips: usize,
}

/// Fill the bitmap from `threads` workers each round and verify every bit
/// landed exactly once.
pub fn run_fill(config: &Config, stop: &AtomicBool) -> Result<Report> {
    config.validate_fill()?;
    let bitmap = ConcurrentBitmap::new(config.capacity);
    let expected: Vec<usize> = (0..config.capacity).collect();
    let started = Instant::now();
    let mut operations = 0;
    let mut rounds = 0;

    for round in 0..config.rounds {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        bitmap.clear();
        let tally = fill_round(&bitmap, config)?;
        operations += tally.operations;
        verify_fill(&bitmap, round, &expected, tally.flips)?;
        rounds += 1;
        print_debug!("fill round {round} verified");
    }

    let stopped = rounds < config.rounds;
    if stopped {
        print_warning!("fill stopped after {rounds} round(s)");
    }
    Ok(Report {
        scenario: "fill",
        rounds,
        operations,
        elapsed: started.elapsed(),
        stopped,
    })
}

fn fill_round(bitmap: &ConcurrentBitmap, config: &Config) -> Result<Tally> {
    let (tx, rx) = unbounded();
    thread::scope(|s| {
        for worker in 0..config.threads {
            let tx = tx.clone();
            s.spawn(move || {
                let mut tally = Tally::default();
                let result = (worker..config.capacity)
                    .step_by(config.threads)
                    .try_for_each(|i| {
                        tally.operations += 1;
                        if bitmap.set(i)? {
                            tally.flips += 1;
                        }
                        Ok::<_, atomic_bitset::Error>(())
                    });
                let _ = tx.send(result.map(|()| tally));
            });
        }
    });
    drop(tx);

    let mut total = Tally::default();
    for msg in rx.iter() {
        let tally = msg?;
        total.operations += tally.operations;
        total.flips += tally.flips;
    }
    Ok(total)
}

fn verify_fill(
    bitmap: &ConcurrentBitmap,
    round: usize,
    expected: &[usize],
    flips: usize,
) -> Result<()> {
    if flips != expected.len() {
        return Err(StressError::FlipMismatch {
            round,
            expected: expected.len(),
            actual: flips,
        });
    }
    let count = bitmap.count();
    if count != expected.len() {
        return Err(StressError::CountMismatch {
            round,
            expected: expected.len(),
            actual: count,
        });
    }
    verify_ones(bitmap, round, expected)
}

fn verify_ones(bitmap: &ConcurrentBitmap, round: usize, expected: &[usize]) -> Result<()> {
    let ones = bitmap.to_vec();
    if let Some(position) = first_difference(&ones, expected) {
        return Err(StressError::OnesMismatch { round, position });
    }
    Ok(())
}

fn first_difference(actual: &[usize], expected: &[usize]) -> Option<usize> {
    actual
        .iter()
        .zip(expected)
        .position(|(a, e)| a != e)
        .or_else(|| (actual.len() != expected.len()).then_some(actual.len().min(expected.len())))
}

/// Race `set`/`unset` on one bit while other workers churn its neighbours in
/// the same word, then check no neighbour update was lost.
pub fn run_toggle(config: &Config, stop: &AtomicBool) -> Result<Report> {
    config.validate_toggle()?;
    let bitmap = ConcurrentBitmap::new(config.capacity);
    let target = config.toggle_index;
    let neighbours = config.toggle_neighbours();
    for &i in &neighbours {
        bitmap.set(i)?;
    }

    let started = Instant::now();
    let (tx, rx) = unbounded();
    thread::scope(|s| {
        for worker in 0..config.threads {
            let tx = tx.clone();
            let bitmap = &bitmap;
            let neighbour = neighbours[(worker / 2) % neighbours.len()];
            s.spawn(move || {
                let result = if worker % 2 == 0 {
                    toggle_target(bitmap, target, config.toggle_iterations, stop)
                } else {
                    churn_neighbour(bitmap, neighbour, config.toggle_iterations, stop)
                };
                let _ = tx.send(result);
            });
        }
    });
    drop(tx);

    let mut operations = 0;
    for msg in rx.iter() {
        operations += msg?;
    }

    // target may end either way; every neighbour must still be set
    let mut after_race = bitmap.to_vec();
    after_race.retain(|&i| i != target);
    if let Some(position) = first_difference(&after_race, &neighbours) {
        return Err(StressError::OnesMismatch { round: 0, position });
    }
    bitmap.unset(target)?;
    verify_ones(&bitmap, 0, &neighbours)?;

    let stopped = stop.load(Ordering::Relaxed);
    if stopped {
        print_warning!("toggle stopped early");
    }
    Ok(Report {
        scenario: "toggle",
        rounds: 1,
        operations,
        elapsed: started.elapsed(),
        stopped,
    })
}

fn toggle_target(
    bitmap: &ConcurrentBitmap,
    target: usize,
    iterations: usize,
    stop: &AtomicBool,
) -> std::result::Result<u64, atomic_bitset::Error> {
    let mut operations = 0;
    for n in 0..iterations {
        if n % STOP_CHECK_INTERVAL == 0 && stop.load(Ordering::Relaxed) {
            break;
        }
        if n % 2 == 0 {
            bitmap.set(target)?;
        } else {
            bitmap.unset(target)?;
        }
        operations += 1;
    }
    Ok(operations)
}

/// Each iteration clears and then restores `neighbour`, so the worker always
/// leaves it set.
fn churn_neighbour(
    bitmap: &ConcurrentBitmap,
    neighbour: usize,
    iterations: usize,
    stop: &AtomicBool,
) -> std::result::Result<u64, atomic_bitset::Error> {
    let mut operations = 0;
    for n in 0..iterations {
        if n % STOP_CHECK_INTERVAL == 0 && stop.load(Ordering::Relaxed) {
            break;
        }
        bitmap.unset(neighbour)?;
        bitmap.set(neighbour)?;
        operations += 2;
    }
    Ok(operations)
}
