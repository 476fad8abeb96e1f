//! Document session management
//!
//! This module contains:
//! - Session state: rasters, annotations, history, page and zoom
//! - Message types for viewer interactions
//! - Background document loading

pub mod loader;
pub mod messages;
pub mod state;

pub use loader::{DocumentLoader, DocumentReady, LoadTicket};
pub use messages::{EditMsg, Msg, PointerAction, Tool, ViewMsg};
pub use state::{Session, ToolState};
