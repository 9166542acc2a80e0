//! Tidepool Wire Models
//!
//! プラットフォームAPIのレスポンス形式

use serde::Deserialize;

/// ログインレスポンスのボディ
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub userid: String,
}

/// データセット作成レスポンス
///
/// upload APIは作成結果を `data` エンベロープに包んで返す
#[derive(Debug, Deserialize)]
pub struct DatasetEnvelope {
    pub data: DatasetData,
}

#[derive(Debug, Deserialize)]
pub struct DatasetData {
    pub id: String,
}

/// サーバー時刻レスポンス
#[derive(Debug, Deserialize)]
pub struct ServerTimeEnvelope {
    pub data: ServerTimeData,
}

#[derive(Debug, Deserialize)]
pub struct ServerTimeData {
    pub time: String,
}
