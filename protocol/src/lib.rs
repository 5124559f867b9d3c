use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds between a spin commit and its reveal. Clients use it as the
/// animation length, so it travels with every spinning event.
pub const SPIN_DURATION_MS: u64 = 5000;

/// Maximum number of results kept in the shared history.
pub const HISTORY_LIMIT: usize = 10;

/// ---- Wheels ----
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WheelId {
    /// The main roulette, seeded with the configured options.
    Main,
    /// The secondary "who picks first" wheel. Starts empty.
    FirstPicker,
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelId::Main => write!(f, "main"),
            WheelId::FirstPicker => write!(f, "first-picker"),
        }
    }
}

impl WheelId {
    /// Text appended to a revealed label before it enters the history.
    pub fn result_suffix(&self) -> &'static str {
        match self {
            WheelId::Main => "",
            WheelId::FirstPicker => " (Escoge 1°)",
        }
    }

    pub fn options_updated(self, options: Vec<String>) -> ServerToClient {
        match self {
            WheelId::Main => ServerToClient::OptionsUpdated(options),
            WheelId::FirstPicker => ServerToClient::FirstPickerOptionsUpdated(options),
        }
    }

    pub fn spinning(self, spin: SpinPayload) -> ServerToClient {
        match self {
            WheelId::Main => ServerToClient::RouletteSpinning(spin),
            WheelId::FirstPicker => ServerToClient::FirstPickerSpinning(spin),
        }
    }

    pub fn result(self, result: DrawResult) -> ServerToClient {
        match self {
            WheelId::Main => ServerToClient::RouletteResult(result),
            WheelId::FirstPicker => ServerToClient::FirstPickerResult(result),
        }
    }
}

/// ---- Payloads ----

/// Broadcast the instant a draw is committed. Carries where the wheel stops,
/// never what it lands on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpinPayload {
    /// Final rotation in degrees, whole extra turns included.
    pub rotation: f64,
    /// Animation length in milliseconds.
    pub duration: u64,
}

/// A revealed outcome. Also the shape of every history entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawResult {
    pub winner: String,
    /// Local wall-clock time, `H:MM:SS` with an unpadded hour.
    pub timestamp: String,
    /// UTC, RFC 3339 with milliseconds.
    pub date: String,
}

/// Bootstrap snapshot unicast to a connection right after it joins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
    pub options: Vec<String>,
    pub history: Vec<DrawResult>,
    pub connected_users: usize,
    pub is_admin: bool,
    #[serde(default)]
    pub first_picker_options: Vec<String>,
}

/// ---- Events ----
///
/// Every frame is `{"event": "<name>", "data": <payload>}`; events without a
/// payload omit `data`.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientToServer {
    UpdateOptions(Vec<String>),
    SpinRoulette,

    // Secondary wheel
    UpdateFirstPickerOptions(Vec<String>),
    SpinFirstPicker,
    OpenFirstPickerModal,
    CloseFirstPickerModal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerToClient {
    // Unicast on connect
    AdminAssigned(bool),
    InitialState(InitialState),

    // Broadcast
    UsersUpdate(usize),
    OptionsUpdated(Vec<String>),
    RouletteSpinning(SpinPayload),
    RouletteResult(DrawResult),

    FirstPickerOptionsUpdated(Vec<String>),
    FirstPickerSpinning(SpinPayload),
    FirstPickerResult(DrawResult),
    FirstPickerModalOpened,
    FirstPickerModalClosed,
}

impl ServerToClient {
    /// Wire name of the event, handy for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ServerToClient::AdminAssigned(_) => "admin-assigned",
            ServerToClient::InitialState(_) => "initial-state",
            ServerToClient::UsersUpdate(_) => "users-update",
            ServerToClient::OptionsUpdated(_) => "options-updated",
            ServerToClient::RouletteSpinning(_) => "roulette-spinning",
            ServerToClient::RouletteResult(_) => "roulette-result",
            ServerToClient::FirstPickerOptionsUpdated(_) => "first-picker-options-updated",
            ServerToClient::FirstPickerSpinning(_) => "first-picker-spinning",
            ServerToClient::FirstPickerResult(_) => "first-picker-result",
            ServerToClient::FirstPickerModalOpened => "first-picker-modal-opened",
            ServerToClient::FirstPickerModalClosed => "first-picker-modal-closed",
        }
    }
}
