//! One-at-a-time gating for user actions.
//!
//! Each view owns an [`ActionGate`]. Starting an action hands out a
//! [`Ticket`]; a second start is refused until the first finishes. Calling
//! [`ActionGate::invalidate`] (for example when a view is reset) bumps the
//! generation, so a result that arrives later for an older ticket is
//! reported as stale and must be dropped by the caller.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

#[derive(Debug, Default)]
pub struct ActionGate {
    generation: u64,
    in_flight: bool,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Claim the gate, or `None` if an action is already pending.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(Ticket {
            generation: self.generation,
        })
    }

    /// Release the gate. Returns whether the ticket's result is still relevant.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Drop interest in any pending action and reopen the gate.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = false;
    }
}
