//! # GlucoseReading Entity
//!
//! 正規化された血糖値リーディングのドメインエンティティ

use chrono::{DateTime, Offset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 測定値の単位（FreeStyle Libreのエクスポートは常に mmol/L）
pub const UNITS_MMOL_PER_L: &str = "mmol/L";

/// デバイスIDのプレフィックス
///
/// プラットフォーム上のデバイス識別子は、このプレフィックスにリーダーの
/// シリアル番号を連結したもの
pub const DEVICE_ID_PREFIX: &str = "AbbottFreeStyleLibre-";

/// シリアル番号からプラットフォーム用のデバイスIDを導出
pub fn device_id_for(serial_number: &str) -> String {
    format!("{}{}", DEVICE_ID_PREFIX, serial_number)
}

/// リーディングの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingType {
    /// センサーによる持続血糖測定（historic）
    Cbg,
    /// 自己測定血糖（スキャンまたは試験紙）
    Smbg,
}

/// smbgリーディングのサブ種別
///
/// キーが存在しないことが「試験紙による測定」を意味するため、
/// `Scanned` 以外のバリアントは定義しない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSubType {
    Scanned,
}

/// TSVエクスポートの生の1行
///
/// カラム名はリーダーのエクスポート形式そのまま。測定値カラムは
/// レコード種別によって埋まる場所が異なるため、全てOptionで受ける
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Time")]
    pub time: String,

    #[serde(rename = "Record Type")]
    pub record_type: String,

    #[serde(rename = "Historic Glucose (mmol/L)")]
    pub historic_glucose: Option<f64>,

    #[serde(rename = "Scan Glucose (mmol/L)")]
    pub scan_glucose: Option<f64>,

    #[serde(rename = "Strip Glucose (mmol/L)")]
    pub strip_glucose: Option<f64>,
}

/// 正規化された血糖値リーディング
///
/// プラットフォームのワイヤ形式（camelCase）でシリアライズされる。
/// `subType` はキーの有無自体に意味があるため、`None` の場合は
/// キーごと省略する（nullは出力しない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseReading {
    #[serde(rename = "type")]
    pub reading_type: ReadingType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<ReadingSubType>,

    pub value: f64,
    pub units: String,
    pub conversion_offset: i64,

    /// 秒精度のローカルタイムスタンプ（オフセットなし）
    pub device_time: String,

    /// 同じタイムスタンプにUTCオフセットを付与したもの
    pub time: String,

    /// (UTC − ローカル) の分数。UTCより進んだゾーンでは負になる
    pub timezone_offset: i32,

    pub device_id: String,
}

impl GlucoseReading {
    /// ローカル日時からリーディングを構築
    ///
    /// `deviceTime` / `time` / `timezoneOffset` は全て同じ日時から導出する
    ///
    /// # Arguments
    ///
    /// * `dt` - ゾーン解決済みのローカル日時
    /// * `reading_type` - リーディング種別
    /// * `sub_type` - サブ種別（scannedのみ）
    /// * `value` - 測定値（mmol/L）
    /// * `device_id` - デバイスID
    pub fn from_local<Tz: TimeZone>(
        dt: &DateTime<Tz>,
        reading_type: ReadingType,
        sub_type: Option<ReadingSubType>,
        value: f64,
        device_id: &str,
    ) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let offset_minutes = dt.offset().fix().local_minus_utc() / 60;

        Self {
            reading_type,
            sub_type,
            value,
            units: UNITS_MMOL_PER_L.to_string(),
            conversion_offset: 0,
            device_time: dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time: dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
            timezone_offset: -offset_minutes,
            device_id: device_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn fixed_reading(offset_seconds: i32) -> GlucoseReading {
        let tz = FixedOffset::east_opt(offset_seconds).unwrap();
        let naive = NaiveDate::from_ymd_opt(2019, 11, 5)
            .unwrap()
            .and_hms_opt(18, 48, 0)
            .unwrap();
        let dt = tz.from_local_datetime(&naive).unwrap();
        GlucoseReading::from_local(
            &dt,
            ReadingType::Cbg,
            None,
            4.2,
            "AbbottFreeStyleLibre-JCMY846-K1284",
        )
    }

    #[test]
    fn test_device_id_for() {
        assert_eq!(
            device_id_for("JCMY846-K1284"),
            "AbbottFreeStyleLibre-JCMY846-K1284"
        );
    }

    #[test]
    fn test_from_local_utc() {
        let reading = fixed_reading(0);

        assert_eq!(reading.device_time, "2019-11-05T18:48:00");
        assert_eq!(reading.time, "2019-11-05T18:48:00+00:00");
        assert_eq!(reading.timezone_offset, 0);
        assert_eq!(reading.units, "mmol/L");
        assert_eq!(reading.conversion_offset, 0);
    }

    #[test]
    fn test_from_local_ahead_of_utc() {
        // UTC+1では (UTC − local) = -60分
        let reading = fixed_reading(3600);

        assert_eq!(reading.device_time, "2019-11-05T18:48:00");
        assert_eq!(reading.time, "2019-11-05T18:48:00+01:00");
        assert_eq!(reading.timezone_offset, -60);
    }

    #[test]
    fn test_serialization_omits_sub_type_key() {
        let reading = fixed_reading(0);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&reading).unwrap()).unwrap();

        // subTypeはnullではなくキーごと存在しないこと
        assert!(json.get("subType").is_none());
        assert_eq!(json["type"], "cbg");
        assert_eq!(json["value"], 4.2);
        assert_eq!(json["deviceTime"], "2019-11-05T18:48:00");
        assert_eq!(json["conversionOffset"], 0);
        assert_eq!(json["deviceId"], "AbbottFreeStyleLibre-JCMY846-K1284");
    }

    #[test]
    fn test_serialization_includes_sub_type_when_scanned() {
        let mut reading = fixed_reading(0);
        reading.reading_type = ReadingType::Smbg;
        reading.sub_type = Some(ReadingSubType::Scanned);

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&reading).unwrap()).unwrap();

        assert_eq!(json["type"], "smbg");
        assert_eq!(json["subType"], "scanned");
    }

    #[test]
    fn test_deserialization_without_sub_type() {
        let json = r#"{
            "type": "smbg",
            "value": 5.1,
            "units": "mmol/L",
            "conversionOffset": 0,
            "deviceTime": "2019-11-05T18:48:00",
            "time": "2019-11-05T18:48:00+00:00",
            "timezoneOffset": 0,
            "deviceId": "AbbottFreeStyleLibre-X"
        }"#;

        let reading: GlucoseReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.reading_type, ReadingType::Smbg);
        assert!(reading.sub_type.is_none());
    }

    #[test]
    fn test_export_row_deserializes_from_tsv() {
        let tsv = "Time\tRecord Type\tHistoric Glucose (mmol/L)\tScan Glucose (mmol/L)\tStrip Glucose (mmol/L)\n2019/11/05 18:48\t0\t4.2\t\t\n";
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(tsv.as_bytes());

        let rows: Vec<ExportRow> = reader.deserialize().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].time, "2019/11/05 18:48");
        assert_eq!(rows[0].record_type, "0");
        assert_eq!(rows[0].historic_glucose, Some(4.2));
        assert!(rows[0].scan_glucose.is_none());
        assert!(rows[0].strip_glucose.is_none());
    }
}
