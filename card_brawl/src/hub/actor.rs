//! Hub actor implementation with async message handling.

use super::{
    errors::{HubError, HubResult},
    mailbox::Mailbox,
    messages::{ClientId, EventKind, HubMessage, format_event},
};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    oneshot,
};

/// Frames a client may have queued before it is considered too slow.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 5;

/// Pending hub requests before handlers start waiting on the hub.
const HUB_INBOX_CAPACITY: usize = 100;

/// Hub actor handle for sending messages
#[derive(Clone, Debug)]
pub struct HubHandle {
    sender: mpsc::Sender<HubMessage>,
    mailbox_capacity: usize,
}

impl HubHandle {
    /// Capacity given to each new mailbox
    #[must_use]
    pub fn mailbox_capacity(&self) -> usize {
        self.mailbox_capacity
    }

    /// Whether the hub task has stopped
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Registers a new mailbox. `initial` is queued ahead of any broadcast.
    pub async fn subscribe(&self, initial: Option<String>) -> HubResult<Mailbox> {
        self.reserve_subscription().await?.activate(initial)
    }

    /// Claims an inbox slot for a later registration.
    ///
    /// Only this call waits on the hub. [`PendingSubscription::activate`]
    /// completes immediately, so it can run inside a critical section.
    pub async fn reserve_subscription(&self) -> HubResult<PendingSubscription> {
        let permit = self
            .sender
            .clone()
            .reserve_owned()
            .await
            .map_err(|_| HubError::Closed)?;
        Ok(PendingSubscription {
            permit,
            hub: self.clone(),
        })
    }

    pub async fn unregister(&self, id: ClientId) -> HubResult<()> {
        self.send(HubMessage::Unregister { id }).await
    }

    /// Formats and broadcasts one event.
    pub async fn send_event<T>(&self, event: EventKind, data: &T) -> HubResult<()>
    where
        T: Serialize + ?Sized,
    {
        let frame = format_event(event, data)?;
        self.broadcast(frame).await
    }

    /// Broadcasts a pre-formatted frame.
    pub async fn broadcast(&self, frame: String) -> HubResult<()> {
        self.send(HubMessage::Broadcast { frame }).await
    }

    pub async fn client_count(&self) -> HubResult<usize> {
        let (response, rx) = oneshot::channel();
        self.send(HubMessage::ClientCount { response }).await?;
        rx.await.map_err(|_| HubError::Closed)
    }

    /// Sends the shutdown frame to every client and waits for the hub to stop.
    pub async fn shutdown(&self) -> HubResult<()> {
        let (done, rx) = oneshot::channel();
        self.send(HubMessage::Shutdown { done }).await?;
        rx.await.map_err(|_| HubError::Closed)
    }

    /// Non-async unregister used when a mailbox is dropped.
    pub(crate) fn release(&self, id: ClientId) {
        match self.sender.try_send(HubMessage::Unregister { id }) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(message)) => {
                // Without a runtime the entry is reaped by the next broadcast
                // once it sees the closed mailbox.
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    let sender = self.sender.clone();
                    runtime.spawn(async move {
                        let _ = sender.send(message).await;
                    });
                }
            }
        }
    }

    async fn send(&self, message: HubMessage) -> HubResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| HubError::Closed)
    }
}

/// A registration holding its hub inbox slot. Dropping it gives the slot back.
#[derive(Debug)]
pub struct PendingSubscription {
    permit: mpsc::OwnedPermit<HubMessage>,
    hub: HubHandle,
}

impl PendingSubscription {
    /// Creates the mailbox and queues its registration without waiting.
    pub fn activate(self, initial: Option<String>) -> HubResult<Mailbox> {
        if self.hub.is_closed() {
            return Err(HubError::Closed);
        }
        let id = ClientId::new();
        // One slot past the client's share stays free for the shutdown frame.
        let (sender, receiver) = mpsc::channel(self.hub.mailbox_capacity + 1);
        if let Some(frame) = initial {
            // Fresh channel with capacity >= 2, can't be full.
            let _ = sender.try_send(frame);
        }
        self.permit.send(HubMessage::Register {
            id,
            mailbox: sender,
        });
        Ok(Mailbox::new(id, receiver, self.hub))
    }
}

/// Hub actor owning every client mailbox
pub struct HubActor {
    /// Message inbox
    inbox: mpsc::Receiver<HubMessage>,

    /// Registered client mailboxes
    clients: HashMap<ClientId, mpsc::Sender<String>>,
}

impl HubActor {
    /// Creates the actor and its handle. Spawn [`HubActor::run`] to start it.
    #[must_use]
    pub fn new(mailbox_capacity: usize) -> (Self, HubHandle) {
        let (sender, inbox) = mpsc::channel(HUB_INBOX_CAPACITY);
        let actor = Self {
            inbox,
            clients: HashMap::new(),
        };
        let handle = HubHandle {
            sender,
            mailbox_capacity: mailbox_capacity.max(1),
        };
        (actor, handle)
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        log::info!("Event hub starting");

        while let Some(message) = self.inbox.recv().await {
            match message {
                HubMessage::Register { id, mailbox } => {
                    self.clients.insert(id, mailbox);
                    log::debug!("Client {id} registered ({} total)", self.clients.len());
                }
                HubMessage::Unregister { id } => {
                    if self.clients.remove(&id).is_some() {
                        log::debug!("Client {id} unregistered ({} left)", self.clients.len());
                    }
                }
                HubMessage::Broadcast { frame } => self.broadcast(&frame),
                HubMessage::ClientCount { response } => {
                    let _ = response.send(self.clients.len());
                }
                HubMessage::Shutdown { done } => {
                    self.close_all();
                    let _ = done.send(());
                    break;
                }
            }
        }

        log::info!("Event hub stopped");
    }

    /// One non-blocking delivery per client. Full mailboxes get evicted.
    ///
    /// A mailbox counts as full once only the reserved shutdown slot is left.
    fn broadcast(&mut self, frame: &str) {
        self.clients.retain(|id, mailbox| {
            if mailbox.is_closed() {
                log::debug!("Client {id} went away, removing");
                return false;
            }
            if mailbox.capacity() <= 1 {
                log::warn!("Client {id} is not keeping up, dropping its stream");
                return false;
            }
            match mailbox.try_send(frame.to_string()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    log::warn!("Client {id} is not keeping up, dropping its stream");
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    log::debug!("Client {id} went away, removing");
                    false
                }
            }
        });
    }

    fn close_all(&mut self) {
        let frame = match format_event(EventKind::Shutdown, &Utc::now()) {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::error!("Failed to format shutdown event: {e}");
                None
            }
        };
        let count = self.clients.len();
        if let Some(frame) = &frame {
            for (id, mailbox) in self.clients.drain() {
                if let Err(TrySendError::Full(_)) = mailbox.try_send(frame.clone()) {
                    log::warn!("Client {id} had no room for the shutdown frame");
                }
            }
        } else {
            self.clients.clear();
        }
        log::info!("Closed {count} event streams");
    }
}
