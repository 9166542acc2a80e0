//! Workflow Orchestration
//!
//! ワークフローのオーケストレーション
//!
//! 診断メッセージはロガー（stderr）へ、データ出力はstdoutへ書く。
//! パイプでつないだ下流がデータと警告を混同しないようにするため

use anyhow::Result;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::adapter::repositories::tsv_export_repository::TsvExportRepository;
use crate::adapter::tidepool::client::TidepoolClient;
use crate::application::dto::upload_config::UploadConfig;
use crate::application::use_cases::merge_exports::MergeExportsUseCase;
use crate::application::use_cases::parse_readings::ParseReadingsUseCase;
use crate::application::use_cases::upload_readings::UploadReadingsUseCase;
use crate::domain::entities::reading::device_id_for;
use crate::domain::repositories::platform_repository::{
    Credentials, DeviceDataQuery, PlatformRepository,
};

use super::cli::{Args, Command};

/// N件のリーディングが何ブロックになるかを返す
pub fn planned_block_count(reading_count: usize, block_size: usize) -> usize {
    if block_size == 0 {
        return 1;
    }
    reading_count.div_ceil(block_size)
}

/// Libre同期ワークフロー
pub struct LibreSyncWorkflow;

impl LibreSyncWorkflow {
    /// 新しいワークフローを作成
    pub fn new() -> Self {
        Self
    }

    /// コマンドに応じたワークフローを実行
    pub async fn execute(&self, args: Args) -> Result<()> {
        match args.command.clone() {
            Command::Time => self.print_server_time(&args).await,
            Command::Show {
                start_date,
                end_date,
            } => self.show_device_data(&args, start_date, end_date).await,
            Command::Parse {
                tsv,
                device_serial_number,
            } => self.parse_export(&tsv, &device_serial_number).await,
            Command::Upload {
                tsv,
                device_serial_number,
                dry_run,
            } => {
                self.upload_export(&args, &tsv, &device_serial_number, dry_run)
                    .await
            }
            Command::Dedupe { files } => self.merge_exports(&files).await,
        }
    }

    fn client(&self, args: &Args) -> TidepoolClient {
        TidepoolClient::new(
            args.host.clone(),
            args.upload_host.clone(),
            args.data_host.clone(),
        )
    }

    /// 資格情報フラグを検証する。欠けている場合は操作者向けの警告を出す
    fn credentials(args: &Args) -> Option<Credentials> {
        let username = match &args.username {
            Some(username) => username.clone(),
            None => {
                warn!("Please specify --username");
                return None;
            }
        };
        let password = match &args.password {
            Some(password) => password.clone(),
            None => {
                warn!("Please specify --password");
                return None;
            }
        };
        Some(Credentials { username, password })
    }

    async fn print_server_time(&self, args: &Args) -> Result<()> {
        let client = self.client(args);

        let time = client.server_time().await?;
        println!("{}", time);

        Ok(())
    }

    async fn show_device_data(
        &self,
        args: &Args,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> Result<()> {
        let Some(credentials) = Self::credentials(args) else {
            return Ok(());
        };

        let client = self.client(args);
        let user_id = client.authenticate(&credentials).await?;

        let query = DeviceDataQuery {
            start_date,
            end_date,
        };
        let data = client.fetch_device_data(&user_id, &query).await?;
        println!("{}", serde_json::to_string_pretty(&data)?);

        // 参照だけでもセッションは閉じる（ベストエフォート）
        if let Err(e) = client.end_session().await {
            warn!("Failed to end platform session: {}", e);
        }

        Ok(())
    }

    async fn parse_export(&self, tsv: &str, device_serial_number: &str) -> Result<()> {
        let export_repo = Arc::new(TsvExportRepository::new());
        let parse_use_case = ParseReadingsUseCase::new(export_repo);

        let device_id = device_id_for(device_serial_number);
        let readings = parse_use_case.execute(Path::new(tsv), &device_id).await?;

        info!("Parsed {} readings from {}", readings.len(), tsv);
        println!("{}", serde_json::to_string_pretty(&readings)?);

        Ok(())
    }

    async fn upload_export(
        &self,
        args: &Args,
        tsv: &str,
        device_serial_number: &str,
        dry_run: bool,
    ) -> Result<()> {
        // ネットワークに触れる前に資格情報を検証する
        let credentials = if dry_run {
            None
        } else {
            match Self::credentials(args) {
                Some(credentials) => Some(credentials),
                None => return Ok(()),
            }
        };

        let export_repo = Arc::new(TsvExportRepository::new());
        let parse_use_case = ParseReadingsUseCase::new(export_repo);

        let config = UploadConfig::new(
            device_serial_number.to_string(),
            args.timezone.clone(),
        );
        let readings = parse_use_case
            .execute(Path::new(tsv), &config.device_id())
            .await?;

        println!("✓ Parsed {} readings from {}", readings.len(), tsv);

        if dry_run {
            println!("✓ Dry-run mode (not actually uploading)");
            println!(
                "  Would upload {} readings in {} blocks",
                readings.len(),
                planned_block_count(readings.len(), config.block_size)
            );
            return Ok(());
        }

        let Some(credentials) = credentials else {
            return Ok(());
        };
        let client = Arc::new(self.client(args));
        let upload_use_case = UploadReadingsUseCase::new(client);

        let summary = upload_use_case
            .execute(readings, &credentials, &config)
            .await?;

        println!(
            "✓ Uploaded {} readings in {} blocks to dataset {}",
            summary.uploaded_count, summary.block_count, summary.dataset_id
        );
        println!("✓ Upload complete!");

        Ok(())
    }

    async fn merge_exports(&self, files: &[String]) -> Result<()> {
        if files.is_empty() {
            warn!("Please specify at least one TSV file");
            return Ok(());
        }

        let export_repo = Arc::new(TsvExportRepository::new());
        let merge_use_case = MergeExportsUseCase::new(export_repo);

        let merged = merge_use_case.execute(files).await?;
        for line in merged {
            println!("{}", line);
        }

        Ok(())
    }
}

impl Default for LibreSyncWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
