//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome via WebSocket and speaks the CDP JSON-RPC protocol.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://127.0.0.1:41873").await?;
//! let target = client.get_targets().await?.remove(0);
//! let page = client.attach_page(&target.target_id).await?;
//! page.navigate("https://example.com").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::{CdpClient, CdpTimeouts};
pub use error::CdpError;
pub use protocol::*;
pub use session::{FrameOwner, PageSession};
