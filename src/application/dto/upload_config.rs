//! # Upload Configuration DTO
//!
//! アップロード設定のData Transfer Object

use crate::domain::entities::reading::device_id_for;

/// 1ブロックあたりのリーディング数
///
/// プラットフォームの公式アップローダーと同じ値
pub const DEFAULT_BLOCK_SIZE: usize = 1000;

/// アップロード設定
///
/// プラットフォームへのアップロードに必要な設定情報
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// リーダーのシリアル番号
    pub device_serial_number: String,
    /// データセットのメタデータに記録するゾーン名（例: "Europe/London"）
    pub timezone: String,
    /// ブロックサイズ
    pub block_size: usize,
}

impl UploadConfig {
    /// 新しいアップロード設定を作成します。
    ///
    /// ブロックサイズは既定値（1000）になります。
    ///
    /// # 例
    ///
    /// ```
    /// use libresync::application::dto::upload_config::UploadConfig;
    ///
    /// let config = UploadConfig::new(
    ///     "JCMY846-K1284".to_string(),
    ///     "Europe/London".to_string(),
    /// );
    ///
    /// assert_eq!(config.block_size, 1000);
    /// assert_eq!(config.device_id(), "AbbottFreeStyleLibre-JCMY846-K1284");
    /// ```
    pub fn new(device_serial_number: String, timezone: String) -> Self {
        Self {
            device_serial_number,
            timezone,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// この設定に対応するデバイスIDを返す
    pub fn device_id(&self) -> String {
        device_id_for(&self.device_serial_number)
    }
}
