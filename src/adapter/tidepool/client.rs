//! Tidepool Client
//!
//! `PlatformRepository` のHTTP実装
//!
//! セッショントークンはログイン時にレスポンスヘッダから取り出して
//! クライアント内部に保持し、以降のリクエストに付与する

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use tokio::sync::Mutex;

use super::models::{DatasetEnvelope, LoginResponse, ServerTimeEnvelope};
use crate::domain::entities::dataset_info::DatasetInfo;
use crate::domain::entities::reading::GlucoseReading;
use crate::domain::error::PlatformError;
use crate::domain::repositories::platform_repository::{
    Credentials, DeviceDataQuery, PlatformRepository,
};

/// セッショントークンを運ぶHTTPヘッダ
pub const SESSION_TOKEN_HEADER: &str = "x-tidepool-session-token";

/// Tidepoolプラットフォームのクライアント
pub struct TidepoolClient {
    http: reqwest::Client,
    host: String,
    upload_host: String,
    data_host: String,
    session_token: Mutex<Option<String>>,
}

impl TidepoolClient {
    /// 新しいクライアントを作成
    ///
    /// # Arguments
    ///
    /// * `host` - APIエンドポイント（認証・時刻）
    /// * `upload_host` - upload APIエンドポイント（データセット操作）
    /// * `data_host` - data APIエンドポイント（デバイスデータ参照）
    pub fn new(host: String, upload_host: String, data_host: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            host,
            upload_host,
            data_host,
            session_token: Mutex::new(None),
        }
    }

    /// 保持中のセッショントークンを返す
    async fn session_token(&self, operation: &str) -> Result<String, PlatformError> {
        self.session_token
            .lock()
            .await
            .clone()
            .ok_or_else(|| PlatformError::response(operation, "no active session token"))
    }

    /// ステータスコードを検査し、失敗なら操作名付きのエラーに変換する
    fn check_status(operation: &str, response: Response) -> Result<Response, PlatformError> {
        match response.error_for_status() {
            Ok(response) => Ok(response),
            Err(e) => Err(PlatformError::request(operation, e)),
        }
    }
}

#[async_trait]
impl PlatformRepository for TidepoolClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, PlatformError> {
        let url = format!("{}/auth/login", self.host);

        let response = self
            .http
            .post(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| PlatformError::request("login", e))?;

        // 資格情報の拒否はリクエスト失敗と区別して扱う
        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN
        {
            return Err(PlatformError::Auth {
                username: credentials.username.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        let response = Self::check_status("login", response)?;

        let token = response
            .headers()
            .get(SESSION_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .ok_or_else(|| PlatformError::response("login", "missing session token header"))?;

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::response("login", e))?;

        *self.session_token.lock().await = Some(token);

        Ok(body.userid)
    }

    async fn create_dataset(
        &self,
        user_id: &str,
        info: &DatasetInfo,
    ) -> Result<String, PlatformError> {
        let url = format!("{}/v1/users/{}/datasets", self.upload_host, user_id);
        let token = self.session_token("create-dataset").await?;

        let response = self
            .http
            .post(&url)
            .header(SESSION_TOKEN_HEADER, token)
            .json(info)
            .send()
            .await
            .map_err(|e| PlatformError::request("create-dataset", e))?;
        let response = Self::check_status("create-dataset", response)?;

        let envelope: DatasetEnvelope = response
            .json()
            .await
            .map_err(|e| PlatformError::response("create-dataset", e))?;

        Ok(envelope.data.id)
    }

    async fn add_block(
        &self,
        dataset_id: &str,
        readings: &[GlucoseReading],
    ) -> Result<(), PlatformError> {
        let url = format!("{}/v1/datasets/{}/data", self.upload_host, dataset_id);
        let token = self.session_token("add-block").await?;

        let response = self
            .http
            .post(&url)
            .header(SESSION_TOKEN_HEADER, token)
            .json(readings)
            .send()
            .await
            .map_err(|e| PlatformError::request("add-block", e))?;
        Self::check_status("add-block", response)?;

        Ok(())
    }

    async fn finalize_dataset(&self, dataset_id: &str) -> Result<(), PlatformError> {
        let url = format!("{}/v1/datasets/{}", self.upload_host, dataset_id);
        let token = self.session_token("finalize-dataset").await?;

        let response = self
            .http
            .put(&url)
            .header(SESSION_TOKEN_HEADER, token)
            .json(&serde_json::json!({ "dataState": "closed" }))
            .send()
            .await
            .map_err(|e| PlatformError::request("finalize-dataset", e))?;
        Self::check_status("finalize-dataset", response)?;

        Ok(())
    }

    async fn end_session(&self) -> Result<(), PlatformError> {
        let url = format!("{}/auth/logout", self.host);
        let token = self.session_token("end-session").await?;

        let response = self
            .http
            .post(&url)
            .header(SESSION_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| PlatformError::request("end-session", e))?;
        Self::check_status("end-session", response)?;

        *self.session_token.lock().await = None;

        Ok(())
    }

    async fn server_time(&self) -> Result<String, PlatformError> {
        // サーバー時刻の取得にログインは不要
        let url = format!("{}/time", self.host);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PlatformError::request("server-time", e))?;
        let response = Self::check_status("server-time", response)?;

        let envelope: ServerTimeEnvelope = response
            .json()
            .await
            .map_err(|e| PlatformError::response("server-time", e))?;

        Ok(envelope.data.time)
    }

    async fn fetch_device_data(
        &self,
        user_id: &str,
        query: &DeviceDataQuery,
    ) -> Result<serde_json::Value, PlatformError> {
        let url = format!("{}/data/{}", self.data_host, user_id);
        let token = self.session_token("fetch-device-data").await?;

        let mut request = self.http.get(&url).header(SESSION_TOKEN_HEADER, token);
        if let Some(start_date) = &query.start_date {
            request = request.query(&[("startDate", start_date)]);
        }
        if let Some(end_date) = &query.end_date {
            request = request.query(&[("endDate", end_date)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::request("fetch-device-data", e))?;
        let response = Self::check_status("fetch-device-data", response)?;

        response
            .json()
            .await
            .map_err(|e| PlatformError::response("fetch-device-data", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> TidepoolClient {
        TidepoolClient::new(
            "https://api.example.org".to_string(),
            "https://uploads.example.org".to_string(),
            "https://api.example.org".to_string(),
        )
    }

    #[tokio::test]
    async fn test_session_token_missing_before_login() {
        let client = create_test_client();

        let err = client.session_token("create-dataset").await.unwrap_err();

        assert!(matches!(err, PlatformError::Response { .. }));
        assert!(err.to_string().contains("no active session token"));
    }

    #[tokio::test]
    async fn test_operations_fail_without_session() {
        // セッションが無い状態ではリクエストを発行する前に失敗する
        let client = create_test_client();

        assert!(client.create_dataset("user-1", &test_info()).await.is_err());
        assert!(client.add_block("dataset-1", &[]).await.is_err());
        assert!(client.finalize_dataset("dataset-1").await.is_err());
        assert!(client.end_session().await.is_err());
    }

    fn test_info() -> DatasetInfo {
        use chrono::{FixedOffset, NaiveDate, TimeZone};

        let tz = FixedOffset::east_opt(0).unwrap();
        let now = tz
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
            )
            .unwrap();
        DatasetInfo::new("JCMY846-K1284", "Europe/London", &now)
    }
}
