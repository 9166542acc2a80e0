//! TSV Export Repository Implementation
//!
//! ExportRepositoryのTSVファイル実装
//!
//! リーダーのエクスポートは1行目が所有者名、2行目がカラム名、
//! 3行目以降がタブ区切りのデータという形式

use async_trait::async_trait;
use log::warn;
use std::path::Path;

use crate::domain::entities::reading::ExportRow;
use crate::domain::error::ExportError;
use crate::domain::repositories::export_repository::ExportRepository;

/// TSVファイルベースのエクスポートリポジトリ
pub struct TsvExportRepository;

impl TsvExportRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// チルダを展開したパス文字列を返す
    fn expand_path(path: &Path) -> String {
        shellexpand::tilde(&path.to_string_lossy().to_string()).to_string()
    }

    /// ファイル内容をパースして行を返す
    ///
    /// 個々の読めない行は警告を出してスキップする
    fn parse_rows(content: &str, path: &Path) -> Result<Vec<ExportRow>, ExportError> {
        // 1行目は所有者名のため読み飛ばす
        let body = match content.split_once('\n') {
            Some((_owner, rest)) => rest,
            None => "",
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ExportError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .clone();

        for required in ["Time", "Record Type"] {
            if !headers.iter().any(|h| h == required) {
                return Err(ExportError::Malformed {
                    path: path.to_path_buf(),
                    reason: format!("missing column '{}'", required),
                });
            }
        }

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize::<ExportRow>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => {
                    // 行単位の不正はファイル全体を失敗させない
                    warn!(
                        "Skipping unreadable row {} in {}: {}",
                        index + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(rows)
    }

    async fn read_content(&self, path: &Path) -> Result<String, ExportError> {
        let expanded = Self::expand_path(path);
        tokio::fs::read_to_string(&expanded)
            .await
            .map_err(|source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Default for TsvExportRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExportRepository for TsvExportRepository {
    async fn read_rows(&self, path: &Path) -> Result<Vec<ExportRow>, ExportError> {
        let content = self.read_content(path).await?;
        Self::parse_rows(&content, path)
    }

    async fn read_raw_lines(&self, path: &Path) -> Result<Vec<String>, ExportError> {
        let content = self.read_content(path).await?;
        Ok(content.lines().map(|line| line.to_string()).collect())
    }
}
