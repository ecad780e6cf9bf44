//! Query gating and sequence numbering.
//!
//! This is the pure half of the debounced dispatcher: it decides whether an
//! input change schedules a search, hands out sequence numbers when the
//! debounce fires, and says whether a response is still wanted. Timers live
//! in [`crate::timer`].

/// Where the dispatcher is in the query cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchPhase {
    /// Nothing scheduled or in flight.
    #[default]
    Idle,
    /// A debounce timer is running for the latest input.
    AwaitingDebounce,
    /// A request was sent and its response has not been applied yet.
    AwaitingResponse,
}

/// What to do with a changed input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDecision {
    /// Below the length gate: close the list and reset.
    Reject,
    /// (Re)start the debounce timer for this trimmed query.
    Debounce(String),
}

/// A dispatched query tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub sequence: u64,
    pub query: String,
}

/// Gate, phase and sequence counter for outgoing queries.
#[derive(Debug, Clone, Default)]
pub struct QueryDispatcher {
    min_length: usize,
    phase: DispatchPhase,
    sequence: u64,
}

impl QueryDispatcher {
    /// Create a dispatcher with the given minimum query length.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            ..Self::default()
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    /// Highest sequence number handed out so far (0 before the first dispatch).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Handle a changed input value.
    ///
    /// Either way any earlier pending response becomes stale, because the
    /// phase leaves `AwaitingResponse`.
    pub fn on_input(&mut self, raw: &str) -> InputDecision {
        let query = raw.trim();
        if query.chars().count() < self.min_length {
            self.phase = DispatchPhase::Idle;
            InputDecision::Reject
        } else {
            self.phase = DispatchPhase::AwaitingDebounce;
            InputDecision::Debounce(query.to_string())
        }
    }

    /// The debounce timer fired uncontested: number and release the query.
    pub fn on_debounce_elapsed(&mut self, query: String) -> QueryTicket {
        self.sequence += 1;
        self.phase = DispatchPhase::AwaitingResponse;
        QueryTicket {
            sequence: self.sequence,
            query,
        }
    }

    /// Whether a response tagged `sequence` may update the display.
    pub fn accepts(&self, sequence: u64) -> bool {
        self.phase == DispatchPhase::AwaitingResponse && sequence == self.sequence
    }

    /// The awaited response was applied.
    pub fn settle(&mut self) {
        self.phase = DispatchPhase::Idle;
    }

    /// Drop any pending work; the sequence counter keeps counting.
    pub fn reset(&mut self) {
        self.phase = DispatchPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_query_rejected() {
        let mut d = QueryDispatcher::new(2);
        assert_eq!(d.on_input(" a "), InputDecision::Reject);
        assert_eq!(d.phase(), DispatchPhase::Idle);
        assert_eq!(d.sequence(), 0);
    }

    #[test]
    fn test_query_is_trimmed() {
        let mut d = QueryDispatcher::new(2);
        assert_eq!(
            d.on_input("  wid "),
            InputDecision::Debounce("wid".to_string())
        );
        assert_eq!(d.phase(), DispatchPhase::AwaitingDebounce);
    }

    #[test]
    fn test_length_counts_characters() {
        let mut d = QueryDispatcher::new(2);
        assert_eq!(d.on_input("ñ"), InputDecision::Reject);
        assert_eq!(d.on_input("ñu"), InputDecision::Debounce("ñu".to_string()));
    }

    #[test]
    fn test_sequence_increments_per_dispatch() {
        let mut d = QueryDispatcher::new(2);
        d.on_input("ab");
        let first = d.on_debounce_elapsed("ab".to_string());
        d.on_input("abc");
        let second = d.on_debounce_elapsed("abc".to_string());

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert!(!d.accepts(1));
        assert!(d.accepts(2));
    }

    #[test]
    fn test_new_input_makes_pending_response_stale() {
        let mut d = QueryDispatcher::new(2);
        d.on_input("ab");
        let ticket = d.on_debounce_elapsed("ab".to_string());
        assert!(d.accepts(ticket.sequence));

        d.on_input("abc");
        assert!(!d.accepts(ticket.sequence));

        d.on_input("a");
        assert!(!d.accepts(ticket.sequence));
    }

    #[test]
    fn test_settle_returns_to_idle() {
        let mut d = QueryDispatcher::new(0);
        d.on_input("");
        let ticket = d.on_debounce_elapsed(String::new());
        d.settle();
        assert_eq!(d.phase(), DispatchPhase::Idle);
        assert!(!d.accepts(ticket.sequence));
    }
}
