//! # UploadSession Entity
//!
//! 1回のアップロード呼び出しに対応する一時的なセッションエンティティ
//!
//! アップロードの連鎖は線形のステートマシンとして表現する:
//!
//! ```text
//! Idle -> Authenticated -> DatasetCreated -> Uploading(n) -> Finalized -+-> SessionClosed
//!                                                        \-> Aborted  -/
//! ```
//!
//! 「失敗時は残りブロックを中断し、それでもセッションは閉じる」という
//! 規則を、分岐ではなく遷移規則そのものとして保証する

use crate::domain::error::SessionStateError;

/// アップロードセッションの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 未認証
    Idle,
    /// 認証済み、データセット未作成
    Authenticated,
    /// データセット作成済み、転送前
    DatasetCreated,
    /// ブロック転送中。`next_block` は次に転送するブロックの添字
    Uploading { next_block: usize },
    /// 全ブロック転送済み、ファイナライズ完了
    Finalized,
    /// 途中で失敗し、以降の転送を放棄
    Aborted { failed_block: Option<usize> },
    /// プラットフォームとのセッション終了済み（成否を問わない終端状態）
    SessionClosed,
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Authenticated => "Authenticated",
            SessionState::DatasetCreated => "DatasetCreated",
            SessionState::Uploading { .. } => "Uploading",
            SessionState::Finalized => "Finalized",
            SessionState::Aborted { .. } => "Aborted",
            SessionState::SessionClosed => "SessionClosed",
        }
    }
}

/// アップロードセッション
///
/// `userId`・`datasetId`・進行状態を保持する。呼び出しの開始時に作成され、
/// 成否にかかわらず終了時に破棄される
#[derive(Debug, Clone)]
pub struct UploadSession {
    state: SessionState,
    user_id: Option<String>,
    dataset_id: Option<String>,
}

impl UploadSession {
    /// 新しいセッションを作成（Idle状態）
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            user_id: None,
            dataset_id: None,
        }
    }

    /// 現在の状態を返す
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 認証済みユーザーIDを返す
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// 作成済みデータセットIDを返す
    pub fn dataset_id(&self) -> Option<&str> {
        self.dataset_id.as_deref()
    }

    /// 転送済みブロック数を返す
    pub fn blocks_uploaded(&self) -> usize {
        match self.state {
            SessionState::Uploading { next_block } => next_block,
            _ => 0,
        }
    }

    fn invalid(&self, to: &SessionState) -> SessionStateError {
        SessionStateError {
            from: self.state.name().to_string(),
            to: to.name().to_string(),
        }
    }

    /// Idle -> Authenticated
    pub fn authenticated(&mut self, user_id: String) -> Result<(), SessionStateError> {
        match self.state {
            SessionState::Idle => {
                self.user_id = Some(user_id);
                self.state = SessionState::Authenticated;
                Ok(())
            }
            _ => Err(self.invalid(&SessionState::Authenticated)),
        }
    }

    /// Authenticated -> DatasetCreated
    pub fn dataset_created(&mut self, dataset_id: String) -> Result<(), SessionStateError> {
        match self.state {
            SessionState::Authenticated => {
                self.dataset_id = Some(dataset_id);
                self.state = SessionState::DatasetCreated;
                Ok(())
            }
            _ => Err(self.invalid(&SessionState::DatasetCreated)),
        }
    }

    /// DatasetCreated | Uploading(n) -> Uploading(n+1)
    pub fn block_uploaded(&mut self) -> Result<(), SessionStateError> {
        match self.state {
            SessionState::DatasetCreated => {
                self.state = SessionState::Uploading { next_block: 1 };
                Ok(())
            }
            SessionState::Uploading { next_block } => {
                self.state = SessionState::Uploading {
                    next_block: next_block + 1,
                };
                Ok(())
            }
            _ => Err(self.invalid(&SessionState::Uploading { next_block: 0 })),
        }
    }

    /// DatasetCreated | Uploading -> Finalized
    ///
    /// ブロックが0個の場合はDatasetCreatedから直接ファイナライズする
    pub fn finalized(&mut self) -> Result<(), SessionStateError> {
        match self.state {
            SessionState::DatasetCreated | SessionState::Uploading { .. } => {
                self.state = SessionState::Finalized;
                Ok(())
            }
            _ => Err(self.invalid(&SessionState::Finalized)),
        }
    }

    /// Authenticated | DatasetCreated | Uploading -> Aborted
    ///
    /// # Arguments
    ///
    /// * `failed_block` - 失敗したブロックの添字。ブロック転送以外の
    ///   ステップで失敗した場合は `None`
    pub fn aborted(&mut self, failed_block: Option<usize>) -> Result<(), SessionStateError> {
        match self.state {
            SessionState::Authenticated
            | SessionState::DatasetCreated
            | SessionState::Uploading { .. } => {
                self.state = SessionState::Aborted { failed_block };
                Ok(())
            }
            _ => Err(self.invalid(&SessionState::Aborted { failed_block })),
        }
    }

    /// Finalized | Aborted -> SessionClosed
    pub fn closed(&mut self) -> Result<(), SessionStateError> {
        match self.state {
            SessionState::Finalized | SessionState::Aborted { .. } => {
                self.state = SessionState::SessionClosed;
                Ok(())
            }
            _ => Err(self.invalid(&SessionState::SessionClosed)),
        }
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new()
    }
}
