//! # Platform Repository Trait
//!
//! 糖尿病データプラットフォームとのセッション操作を抽象化
//!
//! 5つのコア操作（authenticate / create_dataset / add_block /
//! finalize_dataset / end_session）に加え、CLIの `time` と `show` が使う
//! 参照系の2操作を定義する

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::dataset_info::DatasetInfo;
use crate::domain::entities::reading::GlucoseReading;
use crate::domain::error::PlatformError;

/// ログイン資格情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// デバイスデータ取得の絞り込み条件（ISO 8601形式の日時文字列）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDataQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// プラットフォームリポジトリ
///
/// 1つの論理セッションに対する操作の集合。実装は操作ごとに高々1つの
/// リクエストだけを発行し、リトライは行わない
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlatformRepository: Send + Sync {
    /// 資格情報を提示してユーザーIDを取得する
    ///
    /// # Errors
    ///
    /// 資格情報が拒否された場合に `PlatformError::Auth` を返す
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, PlatformError>;

    /// データセットを作成してデータセットIDを取得する
    async fn create_dataset(
        &self,
        user_id: &str,
        info: &DatasetInfo,
    ) -> Result<String, PlatformError>;

    /// リーディングの1ブロックをデータセットに追加する
    async fn add_block(
        &self,
        dataset_id: &str,
        readings: &[GlucoseReading],
    ) -> Result<(), PlatformError>;

    /// データセットをファイナライズする
    async fn finalize_dataset(&self, dataset_id: &str) -> Result<(), PlatformError>;

    /// 認証セッションを終了する
    ///
    /// ベストエフォート。呼び出し側はこの操作の失敗をワークフローの
    /// 結果として扱わない
    async fn end_session(&self) -> Result<(), PlatformError>;

    /// サーバー時刻を取得する（ログイン不要）
    async fn server_time(&self) -> Result<String, PlatformError>;

    /// ユーザーのデバイスデータを取得する
    async fn fetch_device_data(
        &self,
        user_id: &str,
        query: &DeviceDataQuery,
    ) -> Result<serde_json::Value, PlatformError>;
}
