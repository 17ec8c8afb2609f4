//! Discord webhook delivery for alert messages.

pub mod dispatch;
pub mod send;
pub mod webhook;

pub use dispatch::{DispatchReport, Dispatcher, Pause, SendFailure, TokioPause};
pub use send::{group_messages, split_chunks};
pub use webhook::{HttpReply, ReqwestTransport, WebhookPayload, WebhookTransport};
