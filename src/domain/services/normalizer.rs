//! # Reading Normalizer
//!
//! 生のエクスポート行を正規化リーディングへ変換する純粋サービス
//!
//! レコード種別コードの対応:
//!
//! | コード | type | subType | 測定値カラム |
//! |--------|------|---------|--------------|
//! | "0"    | cbg  | なし    | Historic Glucose (mmol/L) |
//! | "1"    | smbg | scanned | Scan Glucose (mmol/L)     |
//! | "2"    | smbg | なし    | Strip Glucose (mmol/L)    |
//! | その他 | -    | -       | 行ごとスキップ             |
//!
//! 未対応コードは例外ではなく明示的な `Skip` として返すため、
//! 呼び出し側は必ずこの分岐を扱うことになる

use chrono::{Local, NaiveDateTime, TimeZone};
use std::fmt;

use crate::domain::entities::reading::{
    ExportRow, GlucoseReading, ReadingSubType, ReadingType,
};
use crate::domain::error::NormalizeError;

/// エクスポートのタイムスタンプ形式（スラッシュをダッシュに置換した後）
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 正規化の結果
///
/// `Skip` は「エラーではないが出力しない」ことを表す
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    Reading(GlucoseReading),
    Skip,
}

/// リーディング正規化サービス
///
/// 状態を持たない純粋関数の集合。同じ行からは常に同じリーディングが得られる
pub struct ReadingNormalizer;

impl ReadingNormalizer {
    /// 行を正規化する（実行環境のローカルゾーンで解釈）
    ///
    /// エクスポートのタイムスタンプにはゾーン情報がないため、ホストの
    /// ローカルゾーンで解釈する。ゾーンの扱いは呼び出し側が
    /// `normalize_in_zone` で明示することもできる
    pub fn normalize(
        row: &ExportRow,
        device_id: &str,
    ) -> Result<NormalizeOutcome, NormalizeError> {
        Self::normalize_in_zone(row, device_id, &Local)
    }

    /// 行を指定ゾーンで正規化する
    ///
    /// # Arguments
    ///
    /// * `row` - エクスポートの生の行
    /// * `device_id` - リーディングに記録するデバイスID
    /// * `tz` - タイムスタンプを解釈するゾーン
    ///
    /// # Errors
    ///
    /// ディスパッチ対象のレコード種別で測定値カラムが欠けている場合、
    /// またはタイムスタンプが解釈できない場合にエラーを返す
    pub fn normalize_in_zone<Tz: TimeZone>(
        row: &ExportRow,
        device_id: &str,
        tz: &Tz,
    ) -> Result<NormalizeOutcome, NormalizeError>
    where
        Tz::Offset: fmt::Display,
    {
        let (reading_type, sub_type, value, column) = match row.record_type.as_str() {
            "0" => (
                ReadingType::Cbg,
                None,
                row.historic_glucose,
                "Historic Glucose (mmol/L)",
            ),
            "1" => (
                ReadingType::Smbg,
                Some(ReadingSubType::Scanned),
                row.scan_glucose,
                "Scan Glucose (mmol/L)",
            ),
            "2" => (
                ReadingType::Smbg,
                None,
                row.strip_glucose,
                "Strip Glucose (mmol/L)",
            ),
            // 未対応のレコード種別は黙ってスキップ
            _ => return Ok(NormalizeOutcome::Skip),
        };

        let value = value.ok_or_else(|| NormalizeError::MissingValue {
            record_type: row.record_type.clone(),
            column,
        })?;

        let dt = Self::parse_timestamp(&row.time, tz)?;

        Ok(NormalizeOutcome::Reading(GlucoseReading::from_local(
            &dt,
            reading_type,
            sub_type,
            value,
            device_id,
        )))
    }

    /// `YYYY/MM/DD HH:mm` 形式のタイムスタンプを指定ゾーンで解釈する
    fn parse_timestamp<Tz: TimeZone>(
        raw: &str,
        tz: &Tz,
    ) -> Result<chrono::DateTime<Tz>, NormalizeError> {
        let dashed = raw.replace('/', "-");
        let naive = NaiveDateTime::parse_from_str(&dashed, TIMESTAMP_FORMAT).map_err(|e| {
            NormalizeError::InvalidTimestamp {
                value: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        // 夏時間の切り替えで曖昧になる時刻は早い方を採用する
        tz.from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| NormalizeError::InvalidTimestamp {
                value: raw.to_string(),
                reason: "timestamp does not exist in the target timezone".to_string(),
            })
    }
}
