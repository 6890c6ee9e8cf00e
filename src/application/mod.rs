//! Application Layer
//!
//! セッション制御、ジェスチャ実行、フォアグラウンド監視などの
//! ユースケースを実装します。
//!
//! ## モジュール構成
//! - `orchestrator`: キャプチャ → 判断 → 実行のティックループとセッション寿命管理
//! - `executor`: アクション1件のジェスチャ計画展開と直列実行
//! - `monitor`: ステルス状態マシンとフォアグラウンドポーリングループ
//! - `runtime_state`: ロックフリーの共有フラグ（一時停止/停止/ステルス）
//! - `stats`: 統計情報管理（アクション数、キャンセル数、レイテンシ）

pub mod executor;
pub mod monitor;
pub mod orchestrator;
pub mod runtime_state;
pub mod stats;
