//! Ordering of navigation requests. Only the latest request may update the
//! page; anything that completes after a newer one started is stale.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NavigationTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NavigationSequence {
    latest: u64,
}

impl NavigationSequence {
    /// Ticket for a new navigation; every earlier ticket becomes stale.
    pub fn start(&mut self) -> NavigationTicket {
        self.latest += 1;
        NavigationTicket(self.latest)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest(&self) -> Option<NavigationTicket> {
        (self.latest > 0).then_some(NavigationTicket(self.latest))
    }
}
