/// モック入力注入アダプタ
///
/// テスト・開発用の入力注入実装。ジェスチャをログと内部バッファへ
/// 記録するのみで、実際の入力注入は行わない。実ホストでは
/// アクセシビリティサービス相当がこのポートを実装する。

use std::sync::{Arc, Mutex};

use crate::domain::{DomainResult, InputPort, Point};

/// 記録されたジェスチャ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedGesture {
    Tap { x: i32, y: i32, duration_ms: u64 },
    Swipe { path: Vec<Point>, duration_ms: u64 },
}

/// モック入力注入アダプタ
pub struct MockInputAdapter {
    gestures: Arc<Mutex<Vec<RecordedGesture>>>,
    /// trueの場合、全ジェスチャをキャンセル扱い（Ok(false)）で返す
    cancel_all: bool,
}

impl MockInputAdapter {
    /// 新しいモック入力アダプタを作成（全ジェスチャ受理）
    pub fn new() -> Self {
        Self {
            gestures: Arc::new(Mutex::new(Vec::new())),
            cancel_all: false,
        }
    }

    /// 全ジェスチャをキャンセルするアダプタを作成（異常系テスト用）
    #[allow(dead_code)]
    pub fn cancelling() -> Self {
        Self {
            gestures: Arc::new(Mutex::new(Vec::new())),
            cancel_all: true,
        }
    }

    /// 記録バッファへの共有ハンドルを取得
    #[allow(dead_code)] // テストが注入結果の検証に使用
    pub fn gesture_log(&self) -> Arc<Mutex<Vec<RecordedGesture>>> {
        Arc::clone(&self.gestures)
    }
}

impl Default for MockInputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockInputAdapter {
    fn tap(&mut self, x: i32, y: i32, duration_ms: u64) -> DomainResult<bool> {
        #[cfg(debug_assertions)]
        tracing::debug!("MockInput: tap at ({}, {}) for {}ms", x, y, duration_ms);

        self.gestures
            .lock()
            .unwrap()
            .push(RecordedGesture::Tap { x, y, duration_ms });

        Ok(!self.cancel_all)
    }

    fn swipe(&mut self, path: &[Point], duration_ms: u64) -> DomainResult<bool> {
        #[cfg(debug_assertions)]
        tracing::debug!(
            "MockInput: swipe through {} points for {}ms",
            path.len(),
            duration_ms
        );

        self.gestures.lock().unwrap().push(RecordedGesture::Swipe {
            path: path.to_vec(),
            duration_ms,
        });

        Ok(!self.cancel_all)
    }
}
