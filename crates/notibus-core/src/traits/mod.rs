// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits at the seams of the delivery pipeline.
//!
//! Each collaborator the pipeline consumes is expressed as a narrow
//! async trait so components can be wired independently and tested with
//! in-memory fakes.

pub mod channel;
pub mod conversation;
pub mod delivery_log;
pub mod extractor;
pub mod publisher;
pub mod session;

pub use channel::ChannelSender;
pub use conversation::ConversationHandler;
pub use delivery_log::DeliveryLog;
pub use extractor::TextExtractor;
pub use publisher::JobProducer;
pub use session::SessionStore;
