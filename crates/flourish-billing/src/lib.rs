#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod client;
mod error;
mod event;
mod plan;
mod signature;

pub use client::{SubscriberClient, SubscriptionStatus};
pub use error::BillingError;
pub use event::{EntitlementAction, WebhookEvent, WebhookPayload, classify_event};
pub use plan::ProductCatalog;
pub use signature::{SIGNATURE_HEADER, sign, verify_signature};
