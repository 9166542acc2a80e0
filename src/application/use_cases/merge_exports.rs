//! # Merge Exports Use Case
//!
//! 複数エクスポートのマージと重複排除ユースケース

use anyhow::{Context, Result};
use log::debug;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::domain::repositories::export_repository::ExportRepository;
use crate::domain::services::deduplication::DeduplicationService;

/// エクスポート先頭のヘッダ行数（1行目: 所有者名、2行目: カラム名）
const HEADER_LINES: usize = 2;

/// エクスポートマージユースケース
///
/// 期間の重なった複数のエクスポートファイルを、重複行を落としながら
/// 1つのエクスポートにマージする。ヘッダは先頭ファイルのものを残すため、
/// 出力はそのまま `parse` / `upload` の入力として使える
pub struct MergeExportsUseCase<E: ExportRepository> {
    export_repository: Arc<E>,
}

impl<E: ExportRepository> MergeExportsUseCase<E> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `export_repository` - エクスポートリポジトリ
    pub fn new(export_repository: Arc<E>) -> Self {
        Self { export_repository }
    }

    /// エクスポートファイル群をマージする
    ///
    /// # Arguments
    ///
    /// * `paths` - マージ対象のファイル（指定順に処理される）
    ///
    /// # Returns
    ///
    /// 先頭ファイルのヘッダ行と、初出のデータ行を元の順序で並べたリスト
    ///
    /// # Errors
    ///
    /// いずれかのファイルの読み込みに失敗した場合にエラーを返す
    pub async fn execute(&self, paths: &[impl AsRef<Path>]) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for (file_index, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            let lines = self
                .export_repository
                .read_raw_lines(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;

            if file_index == 0 {
                merged.extend(lines.iter().take(HEADER_LINES).cloned());
            }

            let data_lines: Vec<String> = lines.into_iter().skip(HEADER_LINES).collect();
            let total = data_lines.len();
            let fresh = DeduplicationService::filter_new_lines(data_lines, &mut seen);

            debug!(
                "{}: kept {} of {} data lines",
                path.display(),
                fresh.len(),
                total
            );

            merged.extend(fresh);
        }

        Ok(merged)
    }
}
