use std::collections::HashMap;

use highlight_engine::{
    AssetCache, HighlightController, LoadTicket, UploadOutcome, ViewerSession,
};
use uuid::Uuid;
use viewer_types::UploadResponse;

use crate::view::ViewSnapshot;

/// The viewer state wrapper for the bridge.
///
/// Holds the session, the process-wide asset cache and the load tickets
/// handed out to the host that have not been completed yet.
#[derive(Debug, Default)]
pub struct BridgeState {
    pub session: ViewerSession,
    pub cache: AssetCache,
    /// Outstanding tickets by id.
    pub pending: HashMap<Uuid, LoadTicket>,
    /// Note from the last successful upload.
    pub server_message: Option<String>,
}

impl BridgeState {
    pub fn new(controller: HighlightController) -> Self {
        Self {
            session: ViewerSession::new(controller),
            ..Self::default()
        }
    }

    /// Apply an upload response, recording any ticket it produces.
    pub fn accept_upload(&mut self, response: UploadResponse) -> UploadOutcome {
        self.server_message = response.message.clone();
        let outcome = self.session.apply_upload(response, &mut self.cache);
        self.track(&outcome);
        outcome
    }

    pub fn remount(&mut self) -> Result<UploadOutcome, BridgeError> {
        let outcome = self
            .session
            .remount(&mut self.cache)
            .ok_or(BridgeError::NoUpload)?;
        self.track(&outcome);
        Ok(outcome)
    }

    /// Remove a ticket from the pending set, failing if it was never issued
    /// or has already been completed.
    pub fn redeem(&mut self, ticket: &LoadTicket) -> Result<LoadTicket, BridgeError> {
        match self.pending.remove(&ticket.id) {
            Some(issued) if issued.url == ticket.url => Ok(issued),
            Some(issued) => {
                let id = issued.id;
                self.pending.insert(id, issued);
                Err(BridgeError::TicketMismatch {
                    id,
                    url: ticket.url.clone(),
                })
            }
            None => Err(BridgeError::UnknownTicket { id: ticket.id }),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::capture(&self.session, self.server_message.as_deref())
    }

    /// Put a redeemed ticket back, for a load that is waiting on host bytes.
    pub fn requeue(&mut self, ticket: LoadTicket) {
        self.pending.insert(ticket.id, ticket);
    }

    /// A new ticket for a URL replaces any older one the host abandoned.
    fn track(&mut self, outcome: &UploadOutcome) {
        if let UploadOutcome::Load(ticket) = outcome {
            self.pending.retain(|_, issued| issued.url != ticket.url);
            self.pending.insert(ticket.id, ticket.clone());
        }
    }
}

/// Errors from bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("no model has been uploaded")]
    NoUpload,

    #[error("unknown load ticket {id}")]
    UnknownTicket { id: Uuid },

    #[error("load ticket {id} was not issued for {url}")]
    TicketMismatch { id: Uuid, url: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
