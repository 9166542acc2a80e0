//! Tidepool Adapter Modules
//!
//! Tidepoolプラットフォーム統合のためのアダプターモジュール

pub mod client;
pub mod models;
