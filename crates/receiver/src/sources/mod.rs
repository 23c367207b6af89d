pub mod webhook;

pub use webhook::{decode, AlertManagerAlert, AlertManagerWebhook, AlertStatus};
