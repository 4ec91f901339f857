//! Search collaborator seam.
//!
//! Gateway matching only needs "start a search" and "give me a response";
//! these traits let callers and tests substitute the SSDP transport.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::ssdp::{SsdpResponse, SsdpSession};
use async_trait::async_trait;

/// Starts discovery sessions
#[async_trait]
pub trait Search: Send + Sync {
    /// Start one search session
    async fn start(&self) -> Result<Box<dyn SearchSession>>;
}

/// A running discovery session
#[async_trait]
pub trait SearchSession: Send {
    /// Wait for the next response
    async fn response(&mut self) -> Result<SsdpResponse>;
}

/// SSDP multicast search
#[derive(Debug, Clone, Default)]
pub struct SsdpSearch {
    config: SearchConfig,
}

impl SsdpSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[async_trait]
impl Search for SsdpSearch {
    async fn start(&self) -> Result<Box<dyn SearchSession>> {
        let session = SsdpSession::start(&self.config).await?;
        Ok(Box::new(session))
    }
}

#[async_trait]
impl SearchSession for SsdpSession {
    async fn response(&mut self) -> Result<SsdpResponse> {
        self.next_response().await
    }
}
