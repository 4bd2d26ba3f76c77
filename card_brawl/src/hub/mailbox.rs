//! Per-client frame queue.

use super::{actor::HubHandle, messages::ClientId};
use tokio::sync::mpsc;

/// Receiving side of one client's event stream.
///
/// Yields frames in broadcast order and `None` once the hub has dropped the
/// client (eviction, unregister or shutdown). Dropping the mailbox
/// unregisters it.
#[derive(Debug)]
pub struct Mailbox {
    id: ClientId,
    receiver: mpsc::Receiver<String>,
    hub: HubHandle,
}

impl Mailbox {
    pub(crate) fn new(id: ClientId, receiver: mpsc::Receiver<String>, hub: HubHandle) -> Self {
        Self { id, receiver, hub }
    }

    #[must_use]
    pub fn id(&self) -> ClientId {
        self.id
    }

    pub async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }

    /// Next frame if one is already queued.
    pub fn try_recv(&mut self) -> Option<String> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Mailbox {
    fn drop(&mut self) {
        self.hub.release(self.id);
    }
}
