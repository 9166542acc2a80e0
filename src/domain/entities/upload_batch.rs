//! # UploadBatch Value Object
//!
//! アップロードバッチのバリューオブジェクト

use super::reading::GlucoseReading;

/// アップロードバッチ
///
/// 正規化済みリーディングの順序付きコレクションを表すバリューオブジェクト
#[derive(Debug, Clone)]
pub struct UploadBatch {
    readings: Vec<GlucoseReading>,
}

impl UploadBatch {
    /// 新しいアップロードバッチを作成
    ///
    /// # Arguments
    ///
    /// * `readings` - リーディングのベクター（入力ファイルの行順）
    pub fn new(readings: Vec<GlucoseReading>) -> Self {
        Self { readings }
    }

    /// バッチ内のリーディング数を返す
    #[inline]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// バッチが空かどうかを返す
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// リーディングへの参照を返す
    pub fn readings(&self) -> &[GlucoseReading] {
        &self.readings
    }

    /// リーディングの所有権を移動して返す
    pub fn into_readings(self) -> Vec<GlucoseReading> {
        self.readings
    }

    /// バッチを固定サイズのブロックに分割
    ///
    /// 元の順序を保った連続ブロックに分割する。最後のブロックだけが
    /// `block_size` より短くなり得る。空のバッチはブロックを生成しない
    ///
    /// # Arguments
    ///
    /// * `block_size` - 分割後の各ブロックのサイズ
    ///
    /// # Returns
    ///
    /// 分割されたブロックのベクター
    pub fn split_by_size(self, block_size: usize) -> Vec<UploadBatch> {
        if block_size == 0 {
            return vec![self];
        }

        self.readings
            .chunks(block_size)
            .map(|chunk| UploadBatch::new(chunk.to_vec()))
            .collect()
    }
}

impl From<Vec<GlucoseReading>> for UploadBatch {
    fn from(readings: Vec<GlucoseReading>) -> Self {
        Self::new(readings)
    }
}

impl From<UploadBatch> for Vec<GlucoseReading> {
    fn from(batch: UploadBatch) -> Self {
        batch.into_readings()
    }
}
