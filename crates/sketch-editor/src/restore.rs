//! Sequencing for restores that complete asynchronously.
//!
//! Decoding a persisted image finishes on a later turn of the event loop.
//! Each restore request takes a ticket from a monotonically increasing
//! counter; a finished restore is applied only if its ticket is newer than
//! the last state that landed. Synchronous changes (a new gesture, undo,
//! redo, clear, resize) land immediately and supersede every outstanding
//! ticket, so a slow decode can never overwrite a later state.

/// Identifies one restore request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RestoreTicket(u64);

impl RestoreTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RestoreSequencer {
    /// Highest sequence number handed out.
    issued: u64,
    /// Sequence number of the state currently on the canvas.
    applied: u64,
}

impl RestoreSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a restore request.
    pub fn issue(&mut self) -> RestoreTicket {
        self.issued += 1;
        RestoreTicket(self.issued)
    }

    /// Record a synchronous change. Every ticket issued so far becomes stale.
    pub fn supersede(&mut self) {
        self.issued += 1;
        self.applied = self.issued;
    }

    /// Whether a restore finishing now with `ticket` would be applied.
    pub fn is_current(&self, ticket: RestoreTicket) -> bool {
        ticket.0 > self.applied
    }

    /// Mark `ticket` as applied if it is still current.
    /// Returns `false` for stale tickets, which must be dropped.
    pub fn try_apply(&mut self, ticket: RestoreTicket) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "dropping stale restore #{} (canvas at #{})",
                ticket.0,
                self.applied
            );
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// Whether any issued request has not landed yet.
    pub fn has_pending(&self) -> bool {
        self.issued > self.applied
    }
}
