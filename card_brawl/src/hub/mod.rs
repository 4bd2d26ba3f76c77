//! Event hub fanning game notifications out to streaming clients.
//!
//! This module implements:
//! - HubActor: a single task owning the registry of client mailboxes
//! - HubHandle: cloneable sender side used by request handlers
//! - PendingSubscription: a registration whose inbox slot is already held
//! - Mailbox: the bounded per-client queue a streaming response drains
//!
//! ## Architecture
//!
//! The hub runs in its own Tokio task with an mpsc inbox. Register,
//! unregister, broadcast and shutdown requests are handled strictly in
//! arrival order, so the registry needs no lock. Delivery to a client is a
//! single `try_send`; a client whose mailbox is full is evicted instead of
//! stalling the hub.
//!
//! ## Example
//!
//! ```no_run
//! use card_brawl::hub::{EventKind, HubActor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, hub) = HubActor::new(5);
//!     tokio::spawn(actor.run());
//!
//!     let mut mailbox = hub.subscribe(None).await.unwrap();
//!     hub.send_event(EventKind::Reset, "votes").await.unwrap();
//!     assert_eq!(
//!         mailbox.recv().await.as_deref(),
//!         Some("event: reset\ndata: votes\n\n")
//!     );
//! }
//! ```

pub mod actor;
pub mod errors;
pub mod mailbox;
pub mod messages;

pub use actor::{DEFAULT_MAILBOX_CAPACITY, HubActor, HubHandle, PendingSubscription};
pub use errors::HubError;
pub use mailbox::Mailbox;
pub use messages::{ClientId, EventKind, HubMessage, ResetKind, format_event};
