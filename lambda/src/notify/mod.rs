//! Outbound email delivery

pub mod email;

pub use email::{Mailer, OutgoingEmail, SesMailer};
