//! Actor wrapper serializing engine access
//!
//! The engine owns mutable session state, so all access goes through one
//! task processing requests in arrival order. One inbound event is fully
//! handled (including collaborator round-trips) before the next begins,
//! which is exactly the serialization the session model requires.

use eyre::Result;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::session::{StateTag, UserId};

use super::engine::ConversationEngine;
use super::{Event, Reply};

/// Requests accepted by the conversation actor
enum ConversationRequest {
    Handle {
        user: UserId,
        event: Event,
        reply: oneshot::Sender<Reply>,
    },
    StateTag {
        user: UserId,
        reply: oneshot::Sender<Option<StateTag>>,
    },
    Shutdown,
}

/// Cloneable handle to the conversation actor
#[derive(Clone)]
pub struct ConversationHandle {
    tx: mpsc::Sender<ConversationRequest>,
}

impl ConversationHandle {
    /// Spawn the actor task around an engine
    pub fn spawn(engine: ConversationEngine) -> Self {
        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(actor_loop(engine, rx));
        Self { tx }
    }

    /// Process one event for one user and wait for the reply
    pub async fn handle(&self, user: UserId, event: Event) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ConversationRequest::Handle {
                user,
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| eyre::eyre!("conversation channel closed"))?;
        reply_rx.await.map_err(|_| eyre::eyre!("conversation channel closed"))
    }

    /// Current state tag for a user
    pub async fn state_tag(&self, user: UserId) -> Result<Option<StateTag>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ConversationRequest::StateTag { user, reply: reply_tx })
            .await
            .map_err(|_| eyre::eyre!("conversation channel closed"))?;
        reply_rx.await.map_err(|_| eyre::eyre!("conversation channel closed"))
    }

    /// Stop the actor; outstanding requests are answered first
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(ConversationRequest::Shutdown)
            .await
            .map_err(|_| eyre::eyre!("conversation channel closed"))
    }
}

async fn actor_loop(mut engine: ConversationEngine, mut rx: mpsc::Receiver<ConversationRequest>) {
    info!("conversation actor started");

    while let Some(request) = rx.recv().await {
        match request {
            ConversationRequest::Handle { user, event, reply } => {
                let response = engine.handle(&user, event).await;
                let _ = reply.send(response);
            }
            ConversationRequest::StateTag { user, reply } => {
                let _ = reply.send(engine.state_tag(&user));
            }
            ConversationRequest::Shutdown => {
                debug!("conversation actor shutting down");
                break;
            }
        }
    }

    info!("conversation actor stopped");
}
