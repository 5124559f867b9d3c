use crate::draw::{self, Commit, DrawSource};
use crate::error::Rejection;
use roulette_protocol::{SpinPayload, SPIN_DURATION_MS};

/// `Idle -> Spinning -> Idle`. The committed outcome lives inside the
/// `Spinning` state, so a second commit cannot exist while one is pending.
#[derive(Debug, Clone, PartialEq)]
pub enum WheelState {
    Idle,
    Spinning(Commit),
}

#[derive(Debug)]
pub struct Wheel {
    options: Vec<String>,
    state: WheelState,
}

impl Wheel {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            state: WheelState::Idle,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, WheelState::Spinning(_))
    }

    /// Replaces the option list. A spin already committed keeps its label.
    pub fn replace_options(
        &mut self,
        options: Vec<String>,
        lock_while_spinning: bool,
    ) -> Result<(), Rejection> {
        if lock_while_spinning && self.is_spinning() {
            return Err(Rejection::OptionsLocked);
        }
        self.options = options;
        Ok(())
    }

    /// Commits an outcome and moves to `Spinning`. The returned payload is
    /// safe to broadcast: it says where the wheel stops, not who won.
    pub fn begin_spin(&mut self, source: &mut dyn DrawSource) -> Result<SpinPayload, Rejection> {
        if let WheelState::Spinning(_) = self.state {
            return Err(Rejection::AlreadySpinning);
        }
        let commit = draw::commit(&self.options, source).ok_or(Rejection::NoOptions)?;
        let spin = SpinPayload {
            rotation: commit.rotation,
            duration: SPIN_DURATION_MS,
        };
        self.state = WheelState::Spinning(commit);
        Ok(spin)
    }

    /// Back to `Idle`, handing out the commit. `None` if nothing was pending.
    pub fn finish_spin(&mut self) -> Option<Commit> {
        match std::mem::replace(&mut self.state, WheelState::Idle) {
            WheelState::Spinning(commit) => Some(commit),
            WheelState::Idle => None,
        }
    }
}
