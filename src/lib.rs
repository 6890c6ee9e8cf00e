//! GrandMarionette - Library
//!
//! 画面自動化エージェントの実行コア。外部判断エンジンが決定した
//! アクションコードを、人間らしいタイミング・座標の入力シーケンスへ
//! 変換して実行し、並行してホストのフォアグラウンド状態を監視して
//! ステルス挙動を切り替える。
//!
//! このライブラリターゲットは、バイナリターゲット（schema生成など）と
//! 統合テストからプロジェクトのモジュールにアクセスするために
//! 提供されています。

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;
