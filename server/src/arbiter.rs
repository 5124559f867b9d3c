use crate::registry::ConnectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Picker,
    Spectator,
}

impl Role {
    pub fn is_picker(self) -> bool {
        self == Role::Picker
    }
}

/// Single-writer arbitration. The first connection to join while the role is
/// vacant becomes picker; nobody is ever preempted, and a departing picker is
/// not replaced until the next connection joins.
#[derive(Debug, Default)]
pub struct RoleArbiter {
    picker: Option<ConnectionId>,
}

impl RoleArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_join(&mut self, id: ConnectionId) -> Role {
        match self.picker {
            None => {
                self.picker = Some(id);
                Role::Picker
            }
            Some(current) if current == id => Role::Picker,
            Some(_) => Role::Spectator,
        }
    }

    /// Returns true if the leaving connection held the role.
    pub fn on_leave(&mut self, id: ConnectionId) -> bool {
        if self.picker == Some(id) {
            self.picker = None;
            true
        } else {
            false
        }
    }

    pub fn is_authorized(&self, id: ConnectionId) -> bool {
        self.picker == Some(id)
    }

    pub fn picker(&self) -> Option<ConnectionId> {
        self.picker
    }
}
