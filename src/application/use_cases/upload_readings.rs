//! # Upload Readings Use Case
//!
//! リーディングアップロードユースケース
//!
//! プラットフォームに対する1つの論理セッションを駆動する:
//! ログイン → データセット作成 → ブロック逐次転送 → ファイナライズ →
//! ログアウト。各操作の完了が次の操作の前提条件であり、同時に2つの
//! リクエストが発行されることはない。リトライは一切行わない

use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};
use std::sync::Arc;

use crate::application::dto::upload_config::UploadConfig;
use crate::domain::entities::dataset_info::DatasetInfo;
use crate::domain::entities::reading::GlucoseReading;
use crate::domain::entities::upload_batch::UploadBatch;
use crate::domain::entities::upload_session::UploadSession;
use crate::domain::repositories::platform_repository::{Credentials, PlatformRepository};

/// アップロード結果のサマリー
#[derive(Debug, Clone)]
pub struct UploadSummary {
    /// アップロードされたリーディングの数
    pub uploaded_count: usize,
    /// 転送されたブロック数
    pub block_count: usize,
    /// 作成されたデータセットのID
    pub dataset_id: String,
}

/// リーディングアップロードユースケース
///
/// セッションの進行は `UploadSession` のステートマシンで追跡し、
/// 「どこで失敗しても認証済みセッションは必ず閉じる」ことを保証する
pub struct UploadReadingsUseCase<P: PlatformRepository> {
    platform: Arc<P>,
}

impl<P: PlatformRepository> UploadReadingsUseCase<P> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `platform` - プラットフォームリポジトリ
    pub fn new(platform: Arc<P>) -> Self {
        Self { platform }
    }

    /// リーディングをアップロードする
    ///
    /// # Arguments
    ///
    /// * `readings` - アップロードするリーディング（入力ファイルの行順）
    /// * `credentials` - ログイン資格情報
    /// * `config` - アップロード設定
    ///
    /// # Errors
    ///
    /// 認証・データセット作成・ブロック転送・ファイナライズのいずれかが
    /// 失敗した場合にエラーを返す。セッション終了の失敗は結果に含めない
    pub async fn execute(
        &self,
        readings: Vec<GlucoseReading>,
        credentials: &Credentials,
        config: &UploadConfig,
    ) -> Result<UploadSummary> {
        let mut session = UploadSession::new();

        // 認証失敗は致命的。セッションが存在しないため後始末も行わない
        let user_id = self
            .platform
            .authenticate(credentials)
            .await
            .context("authentication failed")?;
        session.authenticated(user_id.clone())?;

        let outcome = self
            .run_authenticated(&mut session, &user_id, readings, config)
            .await;

        // 成否にかかわらずセッションを終了する（ベストエフォート）
        if let Err(e) = self.platform.end_session().await {
            warn!("Failed to end platform session: {}", e);
        }
        session.closed()?;

        outcome
    }

    /// 認証済みセッション内の残りの連鎖を実行する
    ///
    /// 失敗した場合は必ずセッションをAbortedに遷移させてから返る
    async fn run_authenticated(
        &self,
        session: &mut UploadSession,
        user_id: &str,
        readings: Vec<GlucoseReading>,
        config: &UploadConfig,
    ) -> Result<UploadSummary> {
        let info = DatasetInfo::new(
            &config.device_serial_number,
            &config.timezone,
            &Local::now(),
        );

        let dataset_id = match self.platform.create_dataset(user_id, &info).await {
            Ok(id) => {
                session.dataset_created(id.clone())?;
                id
            }
            Err(e) => {
                session.aborted(None)?;
                return Err(e).context("failed to create dataset");
            }
        };

        let blocks = UploadBatch::new(readings).split_by_size(config.block_size);
        let total_blocks = blocks.len();
        let mut uploaded_count = 0usize;

        for (index, block) in blocks.iter().enumerate() {
            info!(
                "Uploading block {}/{} ({} readings)...",
                index + 1,
                total_blocks,
                block.len()
            );

            match self.platform.add_block(&dataset_id, block.readings()).await {
                Ok(()) => {
                    session.block_uploaded()?;
                    uploaded_count += block.len();
                }
                Err(e) => {
                    // ブロックが1つでも失敗したら残りは試行せず、
                    // ファイナライズも行わない
                    session.aborted(Some(index))?;
                    return Err(e).context(format!(
                        "failed to upload block {} of {}",
                        index + 1,
                        total_blocks
                    ));
                }
            }
        }

        if let Err(e) = self.platform.finalize_dataset(&dataset_id).await {
            session.aborted(None)?;
            return Err(e).context("failed to finalize dataset");
        }
        session.finalized()?;

        Ok(UploadSummary {
            uploaded_count,
            block_count: total_blocks,
            dataset_id,
        })
    }
}
