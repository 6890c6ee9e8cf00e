//! ランタイム状態管理（Application層）
//!
//! 一時停止・停止要求・ステルス状態をスレッド間で共有します。
//! `Arc<AtomicBool>`を使用したロックフリー設計により、
//! 読み取り側スレッド（キャプチャ/実行ループ・モニタループ）は
//! 数CPUサイクルで状態を確認できます。
//!
//! # 書き込み責務
//! - `paused` / `stopping`: 制御側（UI・セッション所有者）のみ
//! - `stealth_active`: ForegroundMonitorのみ
//! - メモリオーダー: Relaxed - 厳密な順序保証は不要（少し古い値でも無害）

use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc,
};

use crate::domain::types::StealthState;

/// ランタイム状態（スレッド間で共有、ロックフリー）
#[derive(Clone)]
pub struct RuntimeState {
    /// 一時停止フラグ（ティックは継続、デコード済みアクションは破棄）
    paused: Arc<AtomicBool>,
    /// セッション停止要求
    stopping: Arc<AtomicBool>,
    /// ステルス状態の正本（ForegroundMonitorのみが書き込む）
    stealth_active: Arc<AtomicBool>,
    /// 完了バトル数（休憩判定のチェックポイント）
    battles_completed: Arc<AtomicU32>,
}

impl RuntimeState {
    /// 新しいRuntimeStateを作成（非停止・非一時停止・ステルス無効）
    pub fn new() -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(false)),
            stopping: Arc::new(AtomicBool::new(false)),
            stealth_active: Arc::new(AtomicBool::new(false)),
            battles_completed: Arc::new(AtomicU32::new(0)),
        }
    }

    // ===== 高速読み取り =====

    /// 一時停止中か確認（ロックフリー）
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// 停止要求済みか確認（ロックフリー）
    #[inline]
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Relaxed)
    }

    /// 現在のステルス状態を取得
    #[inline]
    pub fn stealth_state(&self) -> StealthState {
        StealthState::from_foreground(self.stealth_active.load(Ordering::Relaxed))
    }

    /// 完了バトル数を取得
    #[inline]
    pub fn battles_completed(&self) -> u32 {
        self.battles_completed.load(Ordering::Relaxed)
    }

    // ===== 書き込み =====

    /// 一時停止フラグを設定
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    /// セッション停止を要求
    pub fn request_stop(&self) {
        self.stopping.store(true, Ordering::Relaxed);
    }

    /// ステルス状態を書き込む（ForegroundMonitor専用）
    pub fn set_stealth_state(&self, state: StealthState) {
        self.stealth_active
            .store(state.is_active(), Ordering::Relaxed);
    }

    /// バトル完了を記録（新しい累計を返す）
    ///
    /// リザルト画面の検出はプレゼンテーション層の責務。
    #[allow(dead_code)] // プレゼンテーション層から呼ばれる
    pub fn record_battle_completed(&self) -> u32 {
        self.battles_completed.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = RuntimeState::new();
        assert!(!state.is_paused());
        assert!(!state.is_stopping());
        assert_eq!(state.stealth_state(), StealthState::Inactive);
        assert_eq!(state.battles_completed(), 0);
    }

    #[test]
    fn test_pause_toggle() {
        let state = RuntimeState::new();

        state.set_paused(true);
        assert!(state.is_paused());

        state.set_paused(false);
        assert!(!state.is_paused());
    }

    #[test]
    fn test_stop_request_is_visible_to_clones() {
        let state = RuntimeState::new();
        let clone = state.clone();

        state.request_stop();
        assert!(clone.is_stopping());
    }

    #[test]
    fn test_stealth_state_write() {
        let state = RuntimeState::new();

        state.set_stealth_state(StealthState::Active);
        assert_eq!(state.stealth_state(), StealthState::Active);

        state.set_stealth_state(StealthState::Inactive);
        assert_eq!(state.stealth_state(), StealthState::Inactive);
    }

    #[test]
    fn test_battle_counter() {
        let state = RuntimeState::new();

        assert_eq!(state.record_battle_completed(), 1);
        assert_eq!(state.record_battle_completed(), 2);
        assert_eq!(state.battles_completed(), 2);
    }
}
