use tokio::sync::watch;

/// Per-controller request token dispenser
///
/// Every request gets a [`RequestTicket`] stamped with the current
/// generation. Issuing a new ticket or calling [`cancel`](Self::cancel)
/// bumps the generation and fires the abort signal of the outstanding
/// ticket, so whoever is awaiting it can drop the request early. A response
/// is only allowed to touch state if its ticket is still current.
#[derive(Debug, Default)]
pub struct RequestCanceller {
    generation: u64,
    active: Option<watch::Sender<bool>>,
}

/// Handle for one in-flight request
#[derive(Debug)]
pub struct RequestTicket {
    generation: u64,
    abort: watch::Receiver<bool>,
}

impl RequestCanceller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, aborting the previous one if it's still out
    pub fn issue(&mut self) -> RequestTicket {
        self.cancel();

        let (tx, rx) = watch::channel(false);
        self.active = Some(tx);

        RequestTicket {
            generation: self.generation,
            abort: rx,
        }
    }

    /// Invalidate everything issued so far. Returns whether a request was
    /// actually in flight.
    pub fn cancel(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.active.take() {
            Some(tx) => {
                // Nobody listening is fine, the ticket is stale either way
                let _ = tx.send(true);
                true
            }
            None => false,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.active.is_some() && ticket.generation == self.generation
    }

    /// Clear the in-flight marker for `ticket`. Returns `false` for a stale
    /// ticket, in which case nothing changes.
    pub fn finish(&mut self, ticket: &RequestTicket) -> bool {
        self.release(ticket.generation)
    }

    /// Same as [`finish`](Self::finish) for when only the generation is at
    /// hand, e.g. after the ticket itself has been dropped
    pub fn release(&mut self, generation: u64) -> bool {
        if self.active.is_none() || generation != self.generation {
            return false;
        }
        self.active = None;
        true
    }

    pub fn in_flight(&self) -> bool {
        self.active.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_aborted(&self) -> bool {
        *self.abort.borrow()
    }

    /// Resolves once the request has been superseded
    ///
    /// A dropped canceller counts as an abort as well: the controller that
    /// wanted the response is gone.
    pub async fn aborted(&mut self) {
        while !*self.abort.borrow_and_update() {
            if self.abort.changed().await.is_err() {
                return;
            }
        }
    }
}
