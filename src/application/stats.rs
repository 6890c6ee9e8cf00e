//! 統計情報管理モジュール
//!
//! アクション実行数、キャンセル数、各処理段階のレイテンシなどの
//! 統計を収集・出力します。

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// 統計情報の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// 判断エンジンの応答時間
    Decide,
    /// ジェスチャ実行時間（人間化ディレイ込み）
    Execute,
    /// エンドツーエンドのレイテンシ（キャプチャ→実行完了）
    EndToEnd,
}

/// パーセンタイル統計値
#[derive(Debug, Clone)]
pub struct PercentileStats {
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub count: usize,
}

/// 統計情報コレクター
#[derive(Debug)]
pub struct StatsCollector {
    /// アクション種別ごとの実行数
    executed_actions: HashMap<&'static str, u64>,
    /// 一時停止中に破棄されたアクション数
    discarded_actions: u64,
    /// 注入されたジェスチャ数（タップ/スワイプ）
    injected_gestures: u64,
    /// ホストにキャンセルされたジェスチャ数
    cancelled_gestures: u64,
    /// 各処理段階の所要時間（最大1000サンプル保持）
    durations: HashMap<StatKind, VecDeque<Duration>>,
    /// 最後の統計出力時刻
    last_report: Instant,
    /// 統計出力間隔
    report_interval: Duration,
}

impl StatsCollector {
    /// 最大サンプル保持数（パーセンタイル計算用）
    const MAX_DURATION_SAMPLES: usize = 1000;

    /// 新しいStatsCollectorを作成
    ///
    /// # Arguments
    /// * `report_interval` - 統計出力間隔（例: 10秒）
    pub fn new(report_interval: Duration) -> Self {
        Self {
            executed_actions: HashMap::new(),
            discarded_actions: 0,
            injected_gestures: 0,
            cancelled_gestures: 0,
            durations: HashMap::new(),
            last_report: Instant::now(),
            report_interval,
        }
    }

    /// アクション実行を記録
    pub fn record_action(&mut self, kind: &'static str) {
        *self.executed_actions.entry(kind).or_insert(0) += 1;
    }

    /// 一時停止中の破棄を記録
    pub fn record_discarded(&mut self) {
        self.discarded_actions += 1;
    }

    /// ジェスチャ注入結果を記録
    pub fn record_gestures(&mut self, issued: u32, cancelled: u32) {
        self.injected_gestures += issued as u64;
        self.cancelled_gestures += cancelled as u64;
    }

    /// 処理時間を記録
    pub fn record_duration(&mut self, kind: StatKind, duration: Duration) {
        let queue = self.durations.entry(kind).or_default();
        queue.push_back(duration);

        // 最大サンプル数を超えたら古いデータを破棄
        if queue.len() > Self::MAX_DURATION_SAMPLES {
            queue.pop_front();
        }
    }

    /// 実行済みアクション総数
    pub fn total_executed(&self) -> u64 {
        self.executed_actions.values().sum()
    }

    /// 破棄されたアクション数
    #[allow(dead_code)]
    pub fn discarded(&self) -> u64 {
        self.discarded_actions
    }

    /// キャンセルされたジェスチャ数
    #[allow(dead_code)]
    pub fn cancelled(&self) -> u64 {
        self.cancelled_gestures
    }

    /// パーセンタイル統計を計算
    ///
    /// # Returns
    /// パーセンタイル統計値。データがない場合は None
    pub fn percentile_stats(&self, kind: StatKind) -> Option<PercentileStats> {
        let queue = self.durations.get(&kind)?;
        if queue.is_empty() {
            return None;
        }

        let mut sorted: Vec<Duration> = queue.iter().copied().collect();
        sorted.sort();

        let count = sorted.len();
        let p50 = sorted[count * 50 / 100];
        let p95 = sorted[count * 95 / 100];
        let p99 = sorted[count * 99 / 100];

        Some(PercentileStats {
            p50,
            p95,
            p99,
            count,
        })
    }

    /// 統計レポートを出力すべきか判定
    pub fn should_report(&self) -> bool {
        self.last_report.elapsed() >= self.report_interval
    }

    /// 統計レポートを出力してタイマーをリセット
    #[cfg(debug_assertions)]
    pub fn report_and_reset(&mut self) {
        use tracing::info;

        info!("=== Session Statistics ===");
        info!(
            "Actions: executed={}, discarded={}",
            self.total_executed(),
            self.discarded_actions
        );
        info!(
            "Gestures: injected={}, cancelled={}",
            self.injected_gestures, self.cancelled_gestures
        );

        let mut kinds: Vec<_> = self.executed_actions.iter().collect();
        kinds.sort();
        for (kind, count) in kinds {
            info!("  {}: {}", kind, count);
        }

        for kind in [StatKind::Decide, StatKind::Execute, StatKind::EndToEnd] {
            if let Some(stats) = self.percentile_stats(kind) {
                info!(
                    "{:?}: p50={:.2}ms, p95={:.2}ms, p99={:.2}ms (n={})",
                    kind,
                    stats.p50.as_secs_f64() * 1000.0,
                    stats.p95.as_secs_f64() * 1000.0,
                    stats.p99.as_secs_f64() * 1000.0,
                    stats.count
                );
            }
        }

        info!("==========================");

        self.last_report = Instant::now();
    }

    /// Release build用のダミー実装
    #[cfg(not(debug_assertions))]
    pub fn report_and_reset(&mut self) {
        self.last_report = Instant::now();
    }
}
