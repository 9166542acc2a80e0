//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **GlucoseReading**: 正規化された血糖値リーディング
//! - **UploadBatch**: アップロードバッチのバリューオブジェクト
//! - **UploadSession**: アップロードセッションのステートマシン
//! - **DatasetInfo**: データセット作成メタデータ

pub mod dataset_info;
pub mod reading;
pub mod upload_batch;
pub mod upload_session;
