//! Activity handling and user interactions for notify-bot.
//!
//! This module provides functionality for handling inbound activities:
//! - Receiving activities over HTTP and running each turn on its own task
//! - Dispatching activities by type
//! - Replying to messages, recording reactions, and forwarding team lifecycle events

pub mod bot;
pub mod conversation_update;
pub mod endpoint;
pub mod handler;
pub mod message;
pub mod message_reaction;
pub mod turn;
