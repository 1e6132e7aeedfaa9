//! Core components, types, and utilities for the notify-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The inbound activity model.
//! - Canned reply texts.
//! - Common types and result handling.

pub mod activity;
pub mod config;
pub mod replies;
pub mod types;
