//! Last-write-wins timers.
//!
//! A [`Debouncer`] does not sleep by itself. Whoever schedules it sleeps and
//! then asks [`Debouncer::fire`] whether its ticket is still the live one;
//! scheduling again, or cancelling, makes every older ticket dead.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// One pending timer per purpose.
#[derive(Clone, Debug, Default)]
pub struct Debouncer {
    generation: u64,
    pending: Option<u64>,
}

impl Debouncer {
    /// Replaces any pending timer with a new one.
    pub fn schedule(&mut self) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        DebounceTicket(self.generation)
    }

    /// `true` exactly once, for the most recently scheduled ticket.
    pub fn fire(&mut self, ticket: DebounceTicket) -> bool {
        if self.pending == Some(ticket.0) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
