/// モックフォアグラウンド観測アダプタ
///
/// テスト・開発用のフォアグラウンド観測実装。共有フラグの値を
/// そのまま返す。実ホストではUsageStats/ActivityManager相当が
/// このポートを実装する。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::domain::{DomainResult, ForegroundPort};

/// モックフォアグラウンド観測アダプタ
pub struct MockForegroundAdapter {
    foreground: Arc<AtomicBool>,
}

impl MockForegroundAdapter {
    /// 新しいアダプタを作成（初期状態: 前面にいない）
    pub fn new() -> Self {
        Self {
            foreground: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 観測値を外部から切り替えるためのフラグハンドルを取得
    #[allow(dead_code)] // テストと開発用UIが使用
    pub fn foreground_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.foreground)
    }
}

impl Default for MockForegroundAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ForegroundPort for MockForegroundAdapter {
    fn is_target_foreground(&mut self) -> DomainResult<bool> {
        Ok(self.foreground.load(Ordering::Relaxed))
    }
}
