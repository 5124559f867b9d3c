use crate::arbiter::{Role, RoleArbiter};
use crate::draw::{self, DrawSource};
use crate::error::Rejection;
use crate::gateway::{short, Gateway, Outbox};
use crate::history::HistoryLog;
use crate::registry::{ConnectionId, ConnectionRegistry};
use crate::wheel::Wheel;
use parking_lot::Mutex;
use roulette_protocol::{
    ClientToServer, DrawResult, InitialState, ServerToClient, WheelId, SPIN_DURATION_MS,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Fixed gap between commit and reveal. Not configurable.
pub const REVEAL_DELAY: Duration = Duration::from_millis(SPIN_DURATION_MS);

/// All session state, owned in one place. Every mutation goes through
/// `&mut Session`, which is what keeps a single writer.
pub struct Session {
    registry: ConnectionRegistry,
    arbiter: RoleArbiter,
    gateway: Gateway,
    main: Wheel,
    first_picker: Wheel,
    history: HistoryLog,
    draw: Box<dyn DrawSource>,
    lock_options_while_spinning: bool,
}

impl Session {
    pub fn new(initial_options: Vec<String>, draw: Box<dyn DrawSource>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            arbiter: RoleArbiter::new(),
            gateway: Gateway::new(),
            main: Wheel::new(initial_options),
            first_picker: Wheel::new(Vec::new()),
            history: HistoryLog::new(),
            draw,
            lock_options_while_spinning: false,
        }
    }

    /// Refuse option edits on a wheel until its pending spin is revealed.
    pub fn with_options_lock(mut self, lock: bool) -> Self {
        self.lock_options_while_spinning = lock;
        self
    }

    pub fn wheel(&self, id: WheelId) -> &Wheel {
        match id {
            WheelId::Main => &self.main,
            WheelId::FirstPicker => &self.first_picker,
        }
    }

    fn wheel_mut(&mut self, id: WheelId) -> &mut Wheel {
        match id {
            WheelId::Main => &mut self.main,
            WheelId::FirstPicker => &mut self.first_picker,
        }
    }

    pub fn connected_count(&self) -> usize {
        self.registry.count()
    }

    pub fn picker(&self) -> Option<ConnectionId> {
        self.arbiter.picker()
    }

    pub fn history(&self) -> Vec<DrawResult> {
        self.history.snapshot()
    }

    /* ---------------- lifecycle ---------------- */

    /// Registers the connection, settles its role, unicasts the bootstrap
    /// snapshot and then broadcasts the new head count.
    pub fn join(&mut self, id: ConnectionId, outbox: Outbox) -> Role {
        let count = self.registry.register(id);
        self.gateway.attach(id, outbox);
        let role = self.arbiter.on_join(id);
        info!(conn = %short(id), ?role, count, "connection joined");

        self.gateway
            .unicast(id, ServerToClient::AdminAssigned(role.is_picker()));
        self.gateway
            .unicast(id, ServerToClient::InitialState(self.bootstrap(id)));
        self.gateway.broadcast_all(ServerToClient::UsersUpdate(count));
        role
    }

    pub fn leave(&mut self, id: ConnectionId) {
        if !self.registry.contains(id) {
            return;
        }
        let count = self.registry.unregister(id);
        self.gateway.detach(id);
        if self.arbiter.on_leave(id) {
            info!(conn = %short(id), "picker left, role vacant until next join");
        }
        info!(conn = %short(id), count, "connection left");
        self.gateway.broadcast_all(ServerToClient::UsersUpdate(count));
    }

    pub fn bootstrap(&self, id: ConnectionId) -> InitialState {
        InitialState {
            options: self.main.options().to_vec(),
            history: self.history.snapshot(),
            connected_users: self.registry.count(),
            is_admin: self.arbiter.is_authorized(id),
            first_picker_options: self.first_picker.options().to_vec(),
        }
    }

    /* ---------------- commands ---------------- */

    /// Applies one inbound command. `Ok(Some(wheel))` means a spin was
    /// committed and its reveal must be scheduled.
    pub fn handle(
        &mut self,
        id: ConnectionId,
        cmd: ClientToServer,
    ) -> Result<Option<WheelId>, Rejection> {
        match cmd {
            ClientToServer::UpdateOptions(options) => {
                self.update_options(id, WheelId::Main, options).map(|_| None)
            }
            ClientToServer::SpinRoulette => self.request_spin(id, WheelId::Main).map(Some),
            ClientToServer::UpdateFirstPickerOptions(options) => self
                .update_options(id, WheelId::FirstPicker, options)
                .map(|_| None),
            ClientToServer::SpinFirstPicker => {
                self.request_spin(id, WheelId::FirstPicker).map(Some)
            }
            ClientToServer::OpenFirstPickerModal => {
                self.toggle_first_picker_modal(id, true).map(|_| None)
            }
            ClientToServer::CloseFirstPickerModal => {
                self.toggle_first_picker_modal(id, false).map(|_| None)
            }
        }
    }

    fn authorize(&self, id: ConnectionId) -> Result<(), Rejection> {
        if self.arbiter.is_authorized(id) {
            Ok(())
        } else {
            Err(Rejection::NotPicker)
        }
    }

    pub fn update_options(
        &mut self,
        id: ConnectionId,
        wheel: WheelId,
        options: Vec<String>,
    ) -> Result<(), Rejection> {
        self.authorize(id)?;
        let lock = self.lock_options_while_spinning;
        self.wheel_mut(wheel).replace_options(options, lock)?;

        let options = self.wheel(wheel).options().to_vec();
        info!(%wheel, count = options.len(), "options updated");
        self.gateway.broadcast_all(wheel.options_updated(options));
        Ok(())
    }

    /// Commit phase. The spinning event goes out before anyone, server logs
    /// included, learns the label.
    pub fn request_spin(&mut self, id: ConnectionId, wheel: WheelId) -> Result<WheelId, Rejection> {
        self.authorize(id)?;
        let target = match wheel {
            WheelId::Main => &mut self.main,
            WheelId::FirstPicker => &mut self.first_picker,
        };
        let spin = target.begin_spin(self.draw.as_mut())?;

        info!(%wheel, rotation = spin.rotation, "spin committed");
        self.gateway.broadcast_all(wheel.spinning(spin));
        Ok(wheel)
    }

    /// Reveal phase. Returns `None` when the wheel had nothing pending.
    pub fn reveal(&mut self, wheel: WheelId) -> Option<DrawResult> {
        let commit = self.wheel_mut(wheel).finish_spin()?;
        let result = draw::stamp(format!("{}{}", commit.label, wheel.result_suffix()));

        self.history.append(result.clone());
        info!(%wheel, winner = %result.winner, "spin revealed");
        self.gateway.broadcast_all(wheel.result(result.clone()));
        Some(result)
    }

    pub fn toggle_first_picker_modal(&mut self, id: ConnectionId, open: bool) -> Result<(), Rejection> {
        self.authorize(id)?;
        let msg = if open {
            ServerToClient::FirstPickerModalOpened
        } else {
            ServerToClient::FirstPickerModalClosed
        };
        debug!(open, "first-picker modal toggled");
        self.gateway.broadcast_all(msg);
        Ok(())
    }
}

/* ---------------- shared handle ---------------- */

/// Cloneable handle shared by every socket task. Locks are never held across
/// an `.await`.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<Mutex<Session>>,
}

impl Hub {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn connect(&self, outbox: Outbox) -> ConnectionId {
        let id = Uuid::new_v4();
        self.inner.lock().join(id, outbox);
        id
    }

    pub fn disconnect(&self, id: ConnectionId) {
        self.inner.lock().leave(id);
    }

    /// Routes one command. Refusals are logged and dropped; the sender
    /// hears nothing back.
    pub fn dispatch(&self, id: ConnectionId, cmd: ClientToServer) {
        let outcome = self.inner.lock().handle(id, cmd);
        match outcome {
            Ok(Some(wheel)) => self.schedule_reveal(wheel),
            Ok(None) => {}
            Err(reason) => debug!(conn = %short(id), %reason, "command dropped"),
        }
    }

    /// One task per committed spin. The wheel state machine guarantees there
    /// is never a second one outstanding for the same wheel.
    fn schedule_reveal(&self, wheel: WheelId) {
        let hub = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(REVEAL_DELAY).await;
            if hub.inner.lock().reveal(wheel).is_none() {
                warn!(%wheel, "reveal fired with no pending spin");
            }
        });
    }

    /// Read access for diagnostics and tests.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.inner.lock())
    }
}
