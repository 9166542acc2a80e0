//! Adapter Layer
//!
//! 外部システム（Tidepoolプラットフォーム, ファイルシステム）との統合

pub mod repositories;
pub mod tidepool;
