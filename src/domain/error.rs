/// エラー型定義
///
/// Domain層の統一エラー型。thiserrorを使用して型安全なエラー処理を提供します。
///
/// # 設計方針
/// - unwrap()の使用を禁止し、明示的なエラーハンドリングを強制
/// - Result型でエラー伝播を明示化
/// - 回復可能性は呼び出し側の方針で決まる（ジェスチャキャンセルは継続、
///   判断エンジン初期化失敗はセッション開始失敗として外へ伝播）

use thiserror::Error;

/// Domain層の統一エラー型
#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum DomainError {
    /// フレーム取得関連のエラー
    #[error("Capture error: {0}")]
    Capture(String),

    /// 判断エンジン関連のエラー
    #[error("Decision error: {0}")]
    Decision(String),

    /// 入力注入（タップ/スワイプ）関連のエラー
    #[error("Injection error: {0}")]
    Injection(String),

    /// フォアグラウンド監視関連のエラー
    ///
    /// モニタループ内では「対象アプリは前面にいない」として扱われ、
    /// ループ自体は停止しない。
    #[error("Foreground observation error: {0}")]
    Foreground(String),

    /// 設定関連のエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 初期化エラー（セッション開始失敗、Non-recoverable）
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// その他のエラー
    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Domain層の統一Result型
pub type DomainResult<T> = Result<T, DomainError>;
