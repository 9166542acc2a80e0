//! # Deduplication Service
//!
//! 重複排除サービス

use std::collections::HashSet;

/// 重複排除サービス
///
/// 複数のエクスポートファイルをマージする際の重複行を排除する
/// ビジネスロジック。リーダーは直近分を常に含んだエクスポートを
/// 出力するため、期間の重なったファイル同士には同一行が現れる
pub struct DeduplicationService;

impl DeduplicationService {
    /// 未出現の行だけを返す
    ///
    /// 行の順序は保たれる。`seen` は呼び出しをまたいで引き回すことで
    /// ファイル横断の重複を検出する
    ///
    /// # Arguments
    ///
    /// * `lines` - フィルタリング対象の行
    /// * `seen` - これまでに出現した行の集合（更新される）
    ///
    /// # Returns
    ///
    /// 初出の行のみを元の順序で並べたリスト
    pub fn filter_new_lines(lines: Vec<String>, seen: &mut HashSet<String>) -> Vec<String> {
        lines
            .into_iter()
            .filter(|line| seen.insert(line.clone()))
            .collect()
    }
}
