//! セッション制御モジュール（Application層）
//!
//! キャプチャ → 判断 → デコード → 人間化 → 実行のパイプラインを
//! ティック駆動で回し、フォアグラウンド監視を独立スレッドとして
//! 並走させます。
//!
//! ## 並行性モデル
//! アクティブなセッションにつき2つの協調ループが走ります:
//! - キャプチャ/実行ループ（このモジュール、ブロッキング）
//! - フォアグラウンド監視ループ（`monitor`モジュール、別スレッド）
//!
//! 共有される可変状態は`RuntimeState`のアトミックフラグのみで、
//! ロックは各ポートの`Arc<Mutex<_>>`に閉じています。
//!
//! ## 順序保証
//! アクションはデコードされた順に厳密に実行され、前のジェスチャの
//! 完了シグナルを受け取るまで次のアクションは開始されません。
//! 停止時は実行中のジェスチャをドレインしてから各スレッドをjoinします。

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::application::executor::GestureExecutor;
use crate::application::monitor::ForegroundMonitor;
use crate::application::runtime_state::RuntimeState;
use crate::application::stats::{StatKind, StatsCollector};
use crate::domain::codec;
use crate::domain::config::AppConfig;
use crate::domain::humanize::Humanizer;
use crate::domain::layout::ScreenGeometry;
use crate::domain::ports::{CapturePort, DecisionPort, ForegroundPort, InputPort};
use crate::domain::types::StealthState;
use crate::domain::{DomainError, DomainResult};

/// 停止フラグ確認のスライス間隔
const STOP_CHECK_SLICE: Duration = Duration::from_millis(20);

/// セッション設定
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// キャプチャティック間隔（約10Hz）
    pub tick_interval: Duration,
    /// フォアグラウンドポーリング間隔
    pub poll_interval: Duration,
    /// 統計出力間隔
    pub stats_interval: Duration,
    /// タップ精度
    pub tap_accuracy: f64,
    /// 実デバイス解像度
    pub geometry: ScreenGeometry,
    /// セッション開始時に判断エンジンへ渡す設定JSON
    pub settings_json: Option<String>,
}

impl SessionConfig {
    /// アプリケーション設定から変換
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            tick_interval: config.pipeline.tick_interval(),
            poll_interval: config.monitor.poll_interval(),
            stats_interval: config.pipeline.stats_interval(),
            tap_accuracy: config.humanize.tap_accuracy,
            geometry: config.device.clone().into(),
            settings_json: config.decision.settings_json.clone(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// 自動化セッション（パイプライン全体の所有者）
pub struct Session<C, D, I, F>
where
    C: CapturePort,
    D: DecisionPort,
    I: InputPort,
    F: ForegroundPort,
{
    capture: Arc<Mutex<C>>,
    decision: Arc<Mutex<D>>,
    executor: GestureExecutor<I>,
    foreground: Arc<Mutex<F>>,
    runtime_state: RuntimeState,
    stats: StatsCollector,
    config: SessionConfig,
    stealth_tx: Sender<StealthState>,
    stealth_rx: Option<Receiver<StealthState>>,
    /// 一時停止フラグのエッジ検出用（判断エンジンへの転送）
    last_paused: bool,
    /// 休憩判定済みのバトル数
    last_break_check: u32,
}

impl<C, D, I, F> Session<C, D, I, F>
where
    C: CapturePort + 'static,
    D: DecisionPort + 'static,
    I: InputPort + 'static,
    F: ForegroundPort + 'static,
{
    /// 新しいセッションを作成
    pub fn new(
        capture: C,
        decision: D,
        input: I,
        foreground: F,
        humanizer: Humanizer,
        config: SessionConfig,
    ) -> Self {
        let (stealth_tx, stealth_rx) = crossbeam_channel::unbounded();
        let executor =
            GestureExecutor::new(input, humanizer, config.geometry, config.tap_accuracy);

        Self {
            capture: Arc::new(Mutex::new(capture)),
            decision: Arc::new(Mutex::new(decision)),
            executor,
            foreground: Arc::new(Mutex::new(foreground)),
            runtime_state: RuntimeState::new(),
            stats: StatsCollector::new(config.stats_interval),
            config,
            stealth_tx,
            stealth_rx: Some(stealth_rx),
            last_paused: false,
            last_break_check: 0,
        }
    }

    /// セッション制御用の共有状態を取得（pause/resume/stop）
    #[allow(dead_code)] // 制御側（UI層・テスト）が使用
    pub fn runtime_state(&self) -> RuntimeState {
        self.runtime_state.clone()
    }

    /// ステルス遷移イベントの受信側を取り出す（プレゼンテーション層用）
    ///
    /// 2回目以降の呼び出しはNoneを返す。
    pub fn take_stealth_events(&mut self) -> Option<Receiver<StealthState>> {
        self.stealth_rx.take()
    }

    /// セッションを実行する（ブロッキング、停止要求まで継続）
    ///
    /// # Returns
    /// - `Ok(())`: 停止要求による正常終了
    /// - `Err(DomainError::Initialization)`: 判断エンジンの初期化失敗
    ///   （セッションは開始されない）
    pub fn run(mut self) -> DomainResult<()> {
        // 判断エンジンへ初期設定を適用（拒否はセッション開始失敗として外へ）
        if let Some(settings_json) = self.config.settings_json.clone() {
            let accepted = {
                let mut guard = self.decision.lock().unwrap();
                guard.update_settings(&settings_json)
            };
            if !accepted {
                return Err(DomainError::Initialization(
                    "Decision engine rejected initial settings".to_string(),
                ));
            }
        }

        // フォアグラウンド監視を独立スレッドで開始
        let monitor = ForegroundMonitor::new(
            Arc::clone(&self.foreground),
            self.config.poll_interval,
            self.runtime_state.clone(),
            self.stealth_tx.clone(),
        );
        let monitor_handle = std::thread::Builder::new()
            .name("foreground-monitor".to_string())
            .spawn(move || monitor.run())
            .map_err(|e| {
                DomainError::Initialization(format!("Failed to spawn monitor thread: {}", e))
            })?;

        tracing::info!(
            "Session started: tick={:?}, poll={:?}, device={}x{}",
            self.config.tick_interval,
            self.config.poll_interval,
            self.config.geometry.width,
            self.config.geometry.height
        );

        self.capture_execute_loop();

        // 実行中のジェスチャはexecuteの戻りでドレイン済み。監視スレッドをjoin
        if monitor_handle.join().is_err() {
            tracing::error!("Foreground monitor thread panicked during shutdown");
        }

        tracing::info!("Session stopped");
        Ok(())
    }

    /// キャプチャ/実行ループ本体
    fn capture_execute_loop(&mut self) {
        while !self.runtime_state.is_stopping() {
            let tick_started = Instant::now();

            self.forward_pause_flag();
            self.maybe_take_break();
            self.run_tick();

            if self.stats.should_report() {
                self.stats.report_and_reset();
            }

            // ティック周期の残り時間をスリープ（停止要求には即応）
            let elapsed = tick_started.elapsed();
            if let Some(remaining) = self.config.tick_interval.checked_sub(elapsed) {
                self.sleep_responsive(remaining);
            }
        }
    }

    /// 1ティック分のパイプライン処理
    fn run_tick(&mut self) {
        // キャプチャ（フレームなしはこのティックをスキップ）
        let captured = {
            let mut guard = self.capture.lock().unwrap();
            guard.capture_frame()
        };
        let frame = match captured {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                #[cfg(debug_assertions)]
                tracing::warn!("Capture error: {:?}", e);
                #[cfg(not(debug_assertions))]
                let _ = e;
                return;
            }
        };

        // 判断エンジン呼び出し
        let decide_started = Instant::now();
        let decided = {
            let mut guard = self.decision.lock().unwrap();
            guard.decide(&frame)
        };
        let code = match decided {
            Ok(code) => code,
            Err(e) => {
                #[cfg(debug_assertions)]
                tracing::warn!("Decision error: {:?}", e);
                #[cfg(not(debug_assertions))]
                let _ = e;
                return;
            }
        };
        self.stats
            .record_duration(StatKind::Decide, decide_started.elapsed());

        // デコード（全域、失敗しない）
        let action = codec::decode(code);
        if action.is_none() {
            return;
        }

        // 一時停止中はティックを続けつつアクションのみ破棄する
        if self.runtime_state.is_paused() {
            self.stats.record_discarded();
            #[cfg(debug_assertions)]
            tracing::debug!("Paused - discarding action: {:?}", action);
            return;
        }

        #[cfg(debug_assertions)]
        tracing::debug!("Executing action: {:?} (code: 0x{:016X})", action, code);

        // 実行（前のジェスチャ完了まで次のティックは始まらない）
        let _span = crate::logging::SpanTimer::new("execute_action");
        let execute_started = Instant::now();
        let summary = self.executor.execute(&action);
        self.stats
            .record_duration(StatKind::Execute, execute_started.elapsed());
        self.stats
            .record_duration(StatKind::EndToEnd, frame.timestamp.elapsed());
        self.stats.record_action(action.kind());
        self.stats.record_gestures(summary.issued, summary.cancelled);
    }

    /// 一時停止フラグの変化を判断エンジンへ転送（fire-and-forget）
    fn forward_pause_flag(&mut self) {
        let paused = self.runtime_state.is_paused();
        if paused != self.last_paused {
            self.last_paused = paused;
            tracing::info!("Session {}", if paused { "paused" } else { "resumed" });

            let accepted = {
                let mut guard = self.decision.lock().unwrap();
                guard.set_paused(paused)
            };
            if !accepted {
                tracing::warn!("Decision engine did not acknowledge pause flag");
            }
        }
    }

    /// バトル区切りでの休憩判定
    ///
    /// 5バトルごとのチェックポイントにつき1回だけ判定する。
    fn maybe_take_break(&mut self) {
        let battles = self.runtime_state.battles_completed();
        if battles == self.last_break_check {
            return;
        }
        self.last_break_check = battles;

        if self.executor.humanizer_mut().should_take_break(battles) {
            let duration_ms = self.executor.humanizer_mut().break_duration();
            tracing::info!(
                "Taking a break: {}ms after {} battles",
                duration_ms,
                battles
            );
            self.sleep_responsive(Duration::from_millis(duration_ms));
        }
    }

    /// 停止要求に即応するスリープ
    fn sleep_responsive(&self, duration: Duration) {
        let mut remaining = duration;
        while !remaining.is_zero() && !self.runtime_state.is_stopping() {
            let slice = remaining.min(STOP_CHECK_SLICE);
            std::thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }
    }
}
