//! Outbound services: the payment provider and image storage.
//!
//! Both are traits so the process entry point can pick a real provider or the
//! in-memory versions below (used by the demo and the tests).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shop_commerce::prelude::*;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{ActionError, ActionResult};

/// State of a hosted checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Open,
    Complete,
    Expired,
}

/// What we ask the payment provider to charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub cart_id: CartId,
    pub line_items: Vec<PaymentLineItem>,
    /// Where the provider sends the customer when done.
    pub return_url: String,
}

/// A checkout session as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub id: String,
    pub client_secret: String,
    pub status: SessionStatus,
    pub order_id: OrderId,
    pub cart_id: CartId,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_session(&self, request: PaymentRequest) -> ActionResult<PaymentSession>;

    async fn retrieve_session(&self, session_id: &str) -> ActionResult<PaymentSession>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image and return its public URL.
    async fn upload(&self, image: &ImageUpload) -> ActionResult<String>;

    async fn delete(&self, url: &str) -> ActionResult<()>;
}

/// Payment provider kept in memory. Sessions stay open until
/// [`InMemoryPayments::complete`] is called.
#[derive(Debug, Default)]
pub struct InMemoryPayments {
    sessions: Mutex<HashMap<String, (PaymentSession, PaymentRequest)>>,
}

impl InMemoryPayments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a session as paid.
    pub async fn complete(&self, session_id: &str) -> ActionResult<()> {
        self.set_status(session_id, SessionStatus::Complete).await
    }

    pub async fn expire(&self, session_id: &str) -> ActionResult<()> {
        self.set_status(session_id, SessionStatus::Expired).await
    }

    /// The request a session was created from.
    pub async fn request(&self, session_id: &str) -> Option<PaymentRequest> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).map(|(_, req)| req.clone())
    }

    async fn set_status(&self, session_id: &str, status: SessionStatus) -> ActionResult<()> {
        let mut sessions = self.sessions.lock().await;
        let (session, _) = sessions
            .get_mut(session_id)
            .ok_or_else(|| ActionError::Payment(format!("no such session: {session_id}")))?;
        session.status = status;
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPayments {
    async fn create_session(&self, request: PaymentRequest) -> ActionResult<PaymentSession> {
        if request.line_items.is_empty() {
            return Err(ActionError::Payment("session needs at least one line item".into()));
        }
        let id = format!("cs_{}", uuid::Uuid::new_v4().simple());
        let session = PaymentSession {
            client_secret: format!("{id}_secret"),
            id: id.clone(),
            status: SessionStatus::Open,
            order_id: request.order_id.clone(),
            cart_id: request.cart_id.clone(),
        };
        debug!(session_id = %id, order_id = %request.order_id, "payment session created");
        self.sessions
            .lock()
            .await
            .insert(id, (session.clone(), request));
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> ActionResult<PaymentSession> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .map(|(session, _)| session.clone())
            .ok_or_else(|| ActionError::Payment(format!("no such session: {session_id}")))
    }
}

/// Image bucket kept in memory.
#[derive(Debug)]
pub struct InMemoryImages {
    base_url: String,
    files: Mutex<HashMap<String, usize>>,
}

impl InMemoryImages {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            files: Mutex::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.files.lock().await.contains_key(url)
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }
}

impl Default for InMemoryImages {
    fn default() -> Self {
        Self::new("memory://images")
    }
}

#[async_trait]
impl ImageStore for InMemoryImages {
    async fn upload(&self, image: &ImageUpload) -> ActionResult<String> {
        let url = format!(
            "{}/{}-{}",
            self.base_url,
            uuid::Uuid::new_v4().simple(),
            image.file_name
        );
        self.files.lock().await.insert(url.clone(), image.bytes.len());
        info!(url = %url, bytes = image.bytes.len(), "image uploaded");
        Ok(url)
    }

    async fn delete(&self, url: &str) -> ActionResult<()> {
        match self.files.lock().await.remove(url) {
            Some(_) => Ok(()),
            None => Err(ActionError::Image(format!("no such image: {url}"))),
        }
    }
}
