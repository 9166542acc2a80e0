//! # Parse Readings Use Case
//!
//! エクスポートのパースと正規化ユースケース

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::reading::GlucoseReading;
use crate::domain::repositories::export_repository::ExportRepository;
use crate::domain::services::normalizer::{NormalizeOutcome, ReadingNormalizer};

/// エクスポートパースユースケース
///
/// エクスポートファイルを読み込み、各行を正規化リーディングに変換する。
/// 出力の順序は入力ファイルの行順と一致する
pub struct ParseReadingsUseCase<E: ExportRepository> {
    export_repository: Arc<E>,
}

impl<E: ExportRepository> ParseReadingsUseCase<E> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `export_repository` - エクスポートリポジトリ
    pub fn new(export_repository: Arc<E>) -> Self {
        Self { export_repository }
    }

    /// エクスポートファイルをパースして正規化リーディングを返す
    ///
    /// 未対応のレコード種別は黙ってスキップされる。壊れた行
    /// （タイムスタンプ不正・測定値カラム欠落）は警告を出して
    /// スキップし、ファイル全体の処理は継続する
    ///
    /// # Arguments
    ///
    /// * `path` - エクスポートファイルのパス
    /// * `device_id` - リーディングに記録するデバイスID
    ///
    /// # Errors
    ///
    /// ファイル自体が読めない場合にエラーを返す
    pub async fn execute(&self, path: &Path, device_id: &str) -> Result<Vec<GlucoseReading>> {
        let rows = self
            .export_repository
            .read_rows(path)
            .await
            .context("failed to read export file")?;

        // エクスポートのタイムスタンプにはゾーン情報がない
        warn!(
            "Export timestamps carry no timezone; interpreting them in the host-local zone"
        );

        let mut readings = Vec::new();
        let mut skipped = 0usize;
        let mut malformed = 0usize;

        for (index, row) in rows.iter().enumerate() {
            match ReadingNormalizer::normalize(row, device_id) {
                Ok(NormalizeOutcome::Reading(reading)) => readings.push(reading),
                Ok(NormalizeOutcome::Skip) => skipped += 1,
                Err(e) => {
                    warn!("Skipping malformed row {}: {}", index + 1, e);
                    malformed += 1;
                }
            }
        }

        debug!(
            "Normalized {} readings ({} unsupported rows skipped, {} malformed rows dropped)",
            readings.len(),
            skipped,
            malformed
        );

        Ok(readings)
    }
}
