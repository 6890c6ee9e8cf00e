//! フォアグラウンド監視モジュール（Application層）
//!
//! 対象アプリの前面遷移をポーリングで観測し、ステルス状態マシンを
//! 駆動します。このループはジェスチャ実行とは独立した並行タスクで、
//! 実行中のジェスチャにブロックされることはありません（検出リスクと
//! 入力実行は直交する関心事）。
//!
//! 状態遷移はエッジごとにちょうど1回だけイベントとして配信されます
//! （安定状態の間は重複配信なし）。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::application::runtime_state::RuntimeState;
use crate::domain::ports::ForegroundPort;
use crate::domain::types::StealthState;

/// 停止フラグ確認のスライス間隔
///
/// ポーリング間隔（既定5秒）をそのまま眠ると停止要求への反応が
/// 遅れるため、短いスライスに分割する。
const STOP_CHECK_SLICE: Duration = Duration::from_millis(50);

/// ステルス状態のエッジ検出器
///
/// 前回の観測値と比較して、状態が変化した瞬間のみ遷移を返します。
/// 初期状態はInactive。
#[derive(Debug)]
pub struct StealthEdgeDetector {
    state: StealthState,
}

impl StealthEdgeDetector {
    /// 新しい検出器を作成（初期状態Inactive）
    pub fn new() -> Self {
        Self {
            state: StealthState::Inactive,
        }
    }

    /// 現在の状態を取得
    #[allow(dead_code)]
    pub fn state(&self) -> StealthState {
        self.state
    }

    /// 観測値を与え、状態遷移があれば新しい状態を返す
    ///
    /// # Returns
    /// - `Some(state)`: エッジ検出（遷移先の状態）
    /// - `None`: 状態は安定（遷移なし）
    pub fn observe(&mut self, target_foreground: bool) -> Option<StealthState> {
        let next = StealthState::from_foreground(target_foreground);
        if next == self.state {
            None
        } else {
            self.state = next;
            Some(next)
        }
    }
}

impl Default for StealthEdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// フォアグラウンド監視ループ
pub struct ForegroundMonitor<F: ForegroundPort> {
    foreground: Arc<Mutex<F>>,
    detector: StealthEdgeDetector,
    poll_interval: Duration,
    runtime_state: RuntimeState,
    events_tx: Sender<StealthState>,
}

impl<F: ForegroundPort> ForegroundMonitor<F> {
    /// 新しい監視ループを作成
    pub fn new(
        foreground: Arc<Mutex<F>>,
        poll_interval: Duration,
        runtime_state: RuntimeState,
        events_tx: Sender<StealthState>,
    ) -> Self {
        Self {
            foreground,
            detector: StealthEdgeDetector::new(),
            poll_interval,
            runtime_state,
            events_tx,
        }
    }

    /// 監視ループを実行（ブロッキング、停止要求まで継続）
    pub fn run(mut self) {
        tracing::info!(
            "Foreground monitor started with poll interval: {:?}",
            self.poll_interval
        );

        while !self.runtime_state.is_stopping() {
            self.poll_once();
            self.sleep_until_next_poll();
        }

        tracing::info!("Foreground monitor stopped");
    }

    /// 1回のポーリングと状態マシン駆動
    fn poll_once(&mut self) {
        let observed = {
            let mut guard = self.foreground.lock().unwrap();
            guard.is_target_foreground()
        };

        // 観測エラーは「前面にいない」として扱い、ループは止めない
        let foreground = match observed {
            Ok(value) => value,
            Err(e) => {
                #[cfg(debug_assertions)]
                tracing::warn!("Foreground observation failed: {:?}", e);
                #[cfg(not(debug_assertions))]
                let _ = e;

                false
            }
        };

        if let Some(transition) = self.detector.observe(foreground) {
            self.runtime_state.set_stealth_state(transition);

            tracing::info!(
                "Stealth state changed: {:?} (target foreground: {})",
                transition,
                foreground
            );

            // プレゼンテーション層が購読していなくても監視は継続する
            let _ = self.events_tx.send(transition);
        }
    }

    /// 次のポーリングまでスリープ（停止要求には即応）
    fn sleep_until_next_poll(&self) {
        let mut remaining = self.poll_interval;
        while !remaining.is_zero() && !self.runtime_state.is_stopping() {
            let slice = remaining.min(STOP_CHECK_SLICE);
            std::thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::DomainResult;
    use std::collections::VecDeque;

    struct ScriptedForeground {
        script: VecDeque<DomainResult<bool>>,
    }

    impl ScriptedForeground {
        fn new(script: Vec<DomainResult<bool>>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl ForegroundPort for ScriptedForeground {
        fn is_target_foreground(&mut self) -> DomainResult<bool> {
            self.script.pop_front().unwrap_or(Ok(false))
        }
    }

    #[test]
    fn test_edge_detector_initial_state() {
        let detector = StealthEdgeDetector::new();
        assert_eq!(detector.state(), StealthState::Inactive);
    }

    #[test]
    fn test_edge_detector_emits_once_per_edge() {
        let mut detector = StealthEdgeDetector::new();

        // [false, false, true, true, false] -> ちょうど2遷移
        assert_eq!(detector.observe(false), None);
        assert_eq!(detector.observe(false), None);
        assert_eq!(detector.observe(true), Some(StealthState::Active));
        assert_eq!(detector.observe(true), None);
        assert_eq!(detector.observe(false), Some(StealthState::Inactive));
    }

    #[test]
    fn test_monitor_emits_transitions_and_updates_state() {
        let script = vec![Ok(false), Ok(true), Ok(true), Ok(false)];
        let foreground = Arc::new(Mutex::new(ScriptedForeground::new(script)));
        let runtime_state = RuntimeState::new();
        let (tx, rx) = crossbeam_channel::unbounded();

        let mut monitor = ForegroundMonitor::new(
            foreground,
            Duration::from_millis(1),
            runtime_state.clone(),
            tx,
        );

        for _ in 0..4 {
            monitor.poll_once();
        }

        let events: Vec<StealthState> = rx.try_iter().collect();
        assert_eq!(events, vec![StealthState::Active, StealthState::Inactive]);
        assert_eq!(runtime_state.stealth_state(), StealthState::Inactive);
    }

    #[test]
    fn test_observation_error_is_treated_as_background() {
        let script = vec![
            Ok(true),
            Err(DomainError::Foreground("host api".to_string())),
            Ok(true),
        ];
        let foreground = Arc::new(Mutex::new(ScriptedForeground::new(script)));
        let runtime_state = RuntimeState::new();
        let (tx, rx) = crossbeam_channel::unbounded();

        let mut monitor = ForegroundMonitor::new(
            foreground,
            Duration::from_millis(1),
            runtime_state.clone(),
            tx,
        );

        monitor.poll_once(); // true -> Active
        monitor.poll_once(); // Err -> Inactive扱い
        monitor.poll_once(); // true -> Active

        let events: Vec<StealthState> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                StealthState::Active,
                StealthState::Inactive,
                StealthState::Active
            ]
        );
    }

    #[test]
    fn test_monitor_loop_stops_on_request() {
        let foreground = Arc::new(Mutex::new(ScriptedForeground::new(vec![])));
        let runtime_state = RuntimeState::new();
        let (tx, _rx) = crossbeam_channel::unbounded();

        let monitor = ForegroundMonitor::new(
            foreground,
            Duration::from_secs(5),
            runtime_state.clone(),
            tx,
        );

        let handle = std::thread::spawn(move || monitor.run());

        // 長いポーリング間隔の途中でも停止要求に即応する
        std::thread::sleep(Duration::from_millis(100));
        runtime_state.request_stop();

        handle.join().expect("monitor thread should stop cleanly");
    }
}
