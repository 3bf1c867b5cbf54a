//! # Rekindle Channels
//!
//! [`rekindle_core::DispatchSink`] implementations: the WhatsApp Business
//! Cloud API for real deliveries, and a console sink for dry runs.

pub mod console;
pub mod whatsapp;

pub use console::ConsoleSink;
pub use whatsapp::WhatsAppSink;
