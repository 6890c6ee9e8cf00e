/// Port定義（Clean Architectureのインターフェース）
///
/// Domain層が外部実装に依存するための抽象trait。
/// Infrastructure層（またはホスト側アダプタ）がこれらを実装し、
/// Application層がDIで注入する。グローバルなシングルトン経由の
/// 参照は行わない（テストダブル差し替えのため）。

use crate::domain::codec::ActionCode;
use crate::domain::types::{Frame, Point};
use crate::domain::DomainResult;

/// キャプチャポート: 画面フレームの取得を抽象化
pub trait CapturePort: Send + Sync {
    /// フレームをキャプチャする
    ///
    /// # Returns
    /// - `Ok(Some(Frame))`: フレームの取得成功
    /// - `Ok(None)`: タイムアウト（フレーム更新なし、このティックはスキップ）
    /// - `Err(DomainError)`: 取得エラー（ログのみ、ループは継続）
    fn capture_frame(&mut self) -> DomainResult<Option<Frame>>;
}

/// 判断ポート: 外部判断エンジン（vision/AIモデル）を抽象化
///
/// フレーム → アクションコードが唯一のチャネル。エンジン内部の
/// 判断ロジックはこのコアの関知しない領域。
pub trait DecisionPort: Send + Sync {
    /// フレームから次のアクションコードを決定する
    ///
    /// # Returns
    /// - `Ok(ActionCode)`: 決定されたコード（0 = アクションなし）
    /// - `Err(DomainError)`: エンジン側エラー（このティックはスキップ）
    fn decide(&mut self, frame: &Frame) -> DomainResult<ActionCode>;

    /// エンジンへ設定を渡す（fire-and-forget、成否のみ返す）
    fn update_settings(&mut self, settings_json: &str) -> bool;

    /// 一時停止フラグをエンジンへ伝える（fire-and-forget、成否のみ返す）
    fn set_paused(&mut self, paused: bool) -> bool;
}

/// 入力注入ポート: ホストのジェスチャ実行を抽象化
///
/// 各呼び出しは完了シグナルを同期的に返す。呼び出したスレッドが
/// 完了まで待機する（suspend until true/false の契約）。
pub trait InputPort: Send + Sync {
    /// 1点タップを注入する
    ///
    /// # Returns
    /// - `Ok(true)`: ホストがジェスチャを受理・完了
    /// - `Ok(false)`: ホストによるキャンセル（UIが下で変化した等）
    /// - `Err(DomainError)`: 注入エラー（キャンセルと同様にスキップ継続）
    fn tap(&mut self, x: i32, y: i32, duration_ms: u64) -> DomainResult<bool>;

    /// パス指定のスワイプを注入する
    ///
    /// # Arguments
    /// - `path`: 通過点列（始点・中間点・終点）
    /// - `duration_ms`: ストローク全体の持続時間
    fn swipe(&mut self, path: &[Point], duration_ms: u64) -> DomainResult<bool>;
}

/// フォアグラウンド観測ポート: ホストの前面プロセス状態を抽象化
///
/// ポーリング前提（push/イベントインターフェースは仮定しない）。
pub trait ForegroundPort: Send + Sync {
    /// 対象アプリがフォアグラウンドにいるか確認する
    ///
    /// エラーは監視側で「前面にいない」として扱われる。
    fn is_target_foreground(&mut self) -> DomainResult<bool>;
}
