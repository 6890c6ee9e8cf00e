//! Infrastructure層: 外部技術の統合
//!
//! Domain層のtraitを実装するアダプタ群。実ホスト（画面キャプチャAPI・
//! アクセシビリティ入力注入・vision/AIエンジン）への接続はホスト側で
//! 実装されるため、このリポジトリには開発・テスト用のモックアダプタを
//! 置く。

pub mod mock_capture;
pub mod mock_decision;
pub mod mock_foreground;
pub mod mock_input;
