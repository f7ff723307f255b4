//! Mailbox domain module.
//!
//! - `model`: wire models of the backend JSON contract
//! - `api`: the [`MailApi`] trait implemented by HTTP clients
//! - `compose`: outgoing message drafts

mod api;
mod compose;
mod model;

pub use api::MailApi;
pub use compose::ComposeDraft;
pub use model::{
    Acknowledgement, DEFAULT_FOLDER, DEFAULT_PAGE_SIZE, EmailAttachment, EmailMessage, EmailQuery,
    FolderInfo, ImapConfig, LoginRequest, LoginResponse, SendEmailRequest, SmtpConfig,
    SyncRequest, SyncResponse,
};
