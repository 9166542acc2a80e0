//! Libresync - FreeStyle Libre Uploader
//!
//! FreeStyle LibreのTSVエクスポートをTidepoolにアップロード

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// バイナリ側のモジュールツリーではテスト専用ヘルパーが未使用になるため抑制
#![allow(dead_code)]

use anyhow::Result;
use clap::Parser;

// Clean Architecture layers
mod adapter;
mod application;
mod domain;
mod driver;

use driver::{Args, LibreSyncWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 診断はstderrへ。--verboseでdebugレベルまで出す
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .init();

    let workflow = LibreSyncWorkflow::new();

    workflow.execute(args).await
}
