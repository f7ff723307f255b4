//! Backend interaction layer.
//!
//! HTTP implementation of [`postbox_core::mail::MailApi`].

pub mod http_mail_api;

pub use http_mail_api::HttpMailApi;
