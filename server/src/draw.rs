use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roulette_protocol::DrawResult;

// ==== knobs ====
const BASE_TURNS: u32 = 5; // every spin does at least this many full turns
const EXTRA_TURNS: u32 = 3; // plus 0..EXTRA_TURNS more, cosmetic only

/// Where draws get their randomness.
pub trait DrawSource: Send {
    /// Index in `[0, len)`. `len` is never zero.
    fn winner_index(&mut self, len: usize) -> usize;
    /// Cosmetic whole turns added on top of the base turns.
    fn extra_turns(&mut self) -> u32;
}

/// Uniform draws from any `rand` generator.
pub struct RngDraw<R> {
    rng: R,
}

impl<R: Rng> RngDraw<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDraw<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> DrawSource for RngDraw<R> {
    fn winner_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn extra_turns(&mut self) -> u32 {
        self.rng.gen_range(0..EXTRA_TURNS)
    }
}

/// An outcome decided at commit time and held privately until reveal.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub label: String,
    pub rotation: f64,
}

/// Final wheel angle in degrees. Only `rotation % 360` carries meaning:
/// it is the start of the winner's wedge.
pub fn rotation(winner_index: usize, len: usize, extra_turns: u32) -> f64 {
    let turns = f64::from(BASE_TURNS + extra_turns);
    let wedge = 360.0 / len as f64;
    turns * 360.0 + winner_index as f64 * wedge
}

/// Draws a winner from `options`. `None` when there is nothing to draw from.
pub fn commit(options: &[String], source: &mut dyn DrawSource) -> Option<Commit> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let index = source.winner_index(len) % len;
    let rotation = rotation(index, len, source.extra_turns());
    Some(Commit {
        label: options[index].clone(),
        rotation,
    })
}

/// Stamps a revealed label with the current time.
pub fn stamp(winner: String) -> DrawResult {
    let now = Utc::now();
    DrawResult {
        winner,
        timestamp: display_time(&now.with_timezone(&Local)),
        date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// `H:MM:SS`, hour not zero-padded, the way `es-ES` clocks read.
pub fn display_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-H:%M:%S").to_string()
}

#[cfg(test)]
pub(crate) struct FixedDraw {
    pub index: usize,
    pub extra_turns: u32,
}

#[cfg(test)]
impl DrawSource for FixedDraw {
    fn winner_index(&mut self, _len: usize) -> usize {
        self.index
    }

    fn extra_turns(&mut self) -> u32 {
        self.extra_turns
    }
}
