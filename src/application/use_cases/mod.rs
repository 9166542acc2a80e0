//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **ParseReadingsUseCase**: エクスポートのパースと正規化
//! - **UploadReadingsUseCase**: リーディングのアップロード
//! - **MergeExportsUseCase**: 複数エクスポートのマージと重複排除

pub mod merge_exports;
pub mod parse_readings;
pub mod upload_readings;
