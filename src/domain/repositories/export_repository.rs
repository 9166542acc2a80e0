//! # Export Repository Trait
//!
//! リーダーのエクスポートファイルの読み込みを抽象化

use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::reading::ExportRow;
use crate::domain::error::ExportError;

/// エクスポートリポジトリ
///
/// TSVエクスポートファイルからの行の読み込みを担当するリポジトリ。
/// 行は必ず入力ファイルの出現順で返す
#[async_trait]
pub trait ExportRepository: Send + Sync {
    /// エクスポートファイルをパースして行を返す
    ///
    /// # Arguments
    ///
    /// * `path` - エクスポートファイルのパス
    ///
    /// # Returns
    ///
    /// ファイルの出現順に並んだ行のリスト
    ///
    /// # Errors
    ///
    /// ファイルが読めない、またはエクスポート形式として解釈できない場合に
    /// エラーを返す。個々の壊れた行はエラーにせず読み飛ばす
    async fn read_rows(&self, path: &Path) -> Result<Vec<ExportRow>, ExportError>;

    /// エクスポートファイルを生の行のまま返す
    ///
    /// マージ（重複排除）用。ヘッダ行も含めて全行を返す
    ///
    /// # Errors
    ///
    /// ファイルの読み込みに失敗した場合にエラーを返す
    async fn read_raw_lines(&self, path: &Path) -> Result<Vec<String>, ExportError>;
}
