//! Background document decoding
//!
//! Decoding runs on tokio's blocking pool. Each load is tagged with the
//! session generation that requested it and delivered as a single
//! [`DocumentReady`] event; the session drops results whose generation is no
//! longer current.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::error::{PagemarkError, Result};
use crate::raster::{PageDecoder, RasterStore};

/// Handle for an in-flight load, returned by `Session::begin_load`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
}

/// Completion event for one load
#[derive(Debug)]
pub struct DocumentReady {
    pub generation: u64,
    pub result: Result<RasterStore>,
}

/// Spawns decode work and reports completions over a channel
#[derive(Clone)]
pub struct DocumentLoader {
    decoder: Arc<dyn PageDecoder>,
    render_scale: f32,
    tx: UnboundedSender<DocumentReady>,
}

impl DocumentLoader {
    pub fn new(
        decoder: Arc<dyn PageDecoder>,
        render_scale: f32,
    ) -> (Self, UnboundedReceiver<DocumentReady>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            decoder,
            render_scale,
            tx,
        };
        (loader, rx)
    }

    /// Decode `bytes` off the calling task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, ticket: LoadTicket, bytes: Vec<u8>) -> JoinHandle<()> {
        let decoder = Arc::clone(&self.decoder);
        let scale = self.render_scale;
        let tx = self.tx.clone();
        let generation = ticket.generation;

        tokio::spawn(async move {
            log::debug!("Decoding document {} ({} bytes)", generation, bytes.len());
            let result = tokio::task::spawn_blocking(move || {
                RasterStore::load(decoder.as_ref(), &bytes, scale)
            })
            .await
            .unwrap_or_else(|e| Err(PagemarkError::Decode(format!("decode task failed: {e}"))));

            if tx.send(DocumentReady { generation, result }).is_err() {
                log::warn!("Session closed before document {} finished loading", generation);
            }
        })
    }
}
