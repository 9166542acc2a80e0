//! # DatasetInfo Entity
//!
//! データセット作成時にプラットフォームへ送るメタデータレコード

use chrono::{DateTime, Offset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::reading::device_id_for;

/// プラットフォームに名乗るクライアント識別子
pub const CLIENT_NAME: &str = "io.libresync.uploader";

/// クライアントのバージョン（crateのバージョンをそのまま使う）
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// クライアント識別情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetClient {
    pub name: String,
    pub version: String,
}

/// データセットのメタデータ
///
/// ワイヤ形式はプラットフォームのupload API仕様に従いcamelCase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub client: DatasetClient,
    pub device_id: String,
    pub device_manufacturers: Vec<String>,
    pub device_model: String,
    pub device_serial_number: String,
    pub device_tags: Vec<String>,

    /// 作成時点のローカル時刻（オフセットなし）
    pub computer_time: String,
    pub conversion_offset: i64,

    /// 作成時点のローカル時刻（オフセット付き）
    pub time: String,

    /// IANAゾーン名（例: "Europe/London"）
    pub timezone: String,

    /// (UTC − ローカル) の分数
    pub timezone_offset: i32,

    pub time_processing: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub version: String,
}

impl DatasetInfo {
    /// 新しいデータセットメタデータを作成
    ///
    /// # Arguments
    ///
    /// * `device_serial_number` - リーダーのシリアル番号
    /// * `timezone` - データセットに記録するゾーン名
    /// * `now` - 取り込み時刻
    pub fn new<Tz: TimeZone>(
        device_serial_number: &str,
        timezone: &str,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let offset_minutes = now.offset().fix().local_minus_utc() / 60;

        Self {
            client: DatasetClient {
                name: CLIENT_NAME.to_string(),
                version: CLIENT_VERSION.to_string(),
            },
            device_id: device_id_for(device_serial_number),
            device_manufacturers: vec!["Abbott".to_string()],
            device_model: "FreeStyle Libre".to_string(),
            device_serial_number: device_serial_number.to_string(),
            device_tags: vec!["bgm".to_string(), "cgm".to_string()],
            computer_time: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            conversion_offset: 0,
            time: now.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
            timezone: timezone.to_string(),
            timezone_offset: -offset_minutes,
            time_processing: "utc-bootstrapping".to_string(),
            record_type: "upload".to_string(),
            version: CLIENT_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn create_test_info() -> DatasetInfo {
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

    #[test]
    fn test_dataset_info_fields() {
        let info = create_test_info();

        assert_eq!(info.device_id, "AbbottFreeStyleLibre-JCMY846-K1284");
        assert_eq!(info.device_serial_number, "JCMY846-K1284");
        assert_eq!(info.device_manufacturers, vec!["Abbott"]);
        assert_eq!(info.device_model, "FreeStyle Libre");
        assert_eq!(info.device_tags, vec!["bgm", "cgm"]);
        assert_eq!(info.timezone, "Europe/London");
        assert_eq!(info.timezone_offset, 0);
        assert_eq!(info.computer_time, "2024-03-01T09:30:00");
        assert_eq!(info.time, "2024-03-01T09:30:00+00:00");
    }

    #[test]
    fn test_dataset_info_wire_format() {
        let info = create_test_info();
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&info).unwrap()).unwrap();

        assert_eq!(json["type"], "upload");
        assert_eq!(json["timeProcessing"], "utc-bootstrapping");
        assert_eq!(json["client"]["name"], CLIENT_NAME);
        assert_eq!(json["deviceTags"][0], "bgm");
        assert_eq!(json["deviceTags"][1], "cgm");
        assert_eq!(json["conversionOffset"], 0);
    }
}
