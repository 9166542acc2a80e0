//! # Domain Errors
//!
//! ドメイン層のエラー型定義
//!
//! エラーの分類:
//!
//! - **ExportError**: エクスポートファイルの読み込み失敗（ファイル単位で致命的）
//! - **NormalizeError**: 行の正規化失敗（行単位でスキップされ、ファイル全体は処理継続）
//! - **PlatformError**: プラットフォームAPIの失敗（セッション単位で致命的）
//! - **SessionStateError**: アップロードセッションの不正な状態遷移

use std::path::PathBuf;
use thiserror::Error;

/// エクスポートファイルの読み込みエラー
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to read export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed export file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// 行の正規化エラー
///
/// 呼び出し側は行をスキップして処理を継続する。行単位のエラーは
/// ファイル全体を失敗させない
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("record type {record_type} is missing the '{column}' column")]
    MissingValue {
        record_type: String,
        column: &'static str,
    },
}

/// プラットフォームAPIのエラー
#[derive(Error, Debug)]
pub enum PlatformError {
    /// 認証失敗（致命的、データセットは作成されない）
    #[error("authentication rejected for user '{username}': {reason}")]
    Auth { username: String, reason: String },

    /// リクエスト失敗（発生したステップで致命的、後続ステップは中断）
    #[error("{operation} request failed: {reason}")]
    Request { operation: String, reason: String },

    /// レスポンスの形式が想定と異なる
    #[error("unexpected {operation} response: {reason}")]
    Response { operation: String, reason: String },
}

impl PlatformError {
    /// リクエスト失敗エラーを作成
    pub fn request(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::Request {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// レスポンス形式エラーを作成
    pub fn response(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::Response {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }
}

/// アップロードセッションの状態遷移エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid session transition: {from} -> {to}")]
pub struct SessionStateError {
    pub from: String,
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_error_display() {
        let err = NormalizeError::MissingValue {
            record_type: "0".to_string(),
            column: "Historic Glucose (mmol/L)",
        };
        assert_eq!(
            err.to_string(),
            "record type 0 is missing the 'Historic Glucose (mmol/L)' column"
        );
    }

    #[test]
    fn test_platform_error_request_helper() {
        let err = PlatformError::request("create-dataset", "HTTP 500");
        assert_eq!(
            err.to_string(),
            "create-dataset request failed: HTTP 500"
        );
    }

    #[test]
    fn test_session_state_error_display() {
        let err = SessionStateError {
            from: "Idle".to_string(),
            to: "Finalized".to_string(),
        };
        assert_eq!(err.to_string(), "invalid session transition: Idle -> Finalized");
    }
}
