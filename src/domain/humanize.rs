/// 人間挙動シミュレーション（anti-detection）
///
/// 自動化されたアクションに現実的なタイミング・座標のばらつきを
/// 注入する。固定ディレイと正確すぎる座標はボット検出の最有力
/// シグナルであり、すべての入力は統計的に手動操作と区別できない
/// 必要がある。
///
/// 乱数源は明示的に注入される（シード固定可能）。統計的性質は
/// 固定シードのテストで決定的に検証できる。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::types::Point;

/// 反応時間レンジ（ミリ秒）
const MIN_REACTION_TIME_MS: u64 = 180;
const MAX_REACTION_TIME_MS: u64 = 350;

/// 視覚処理時間レンジ
const MIN_PROCESSING_TIME_MS: u64 = 100;
const MAX_PROCESSING_TIME_MS: u64 = 300;

/// タップ持続時間レンジ（指が画面に触れている時間）
const MIN_TAP_DURATION_MS: u64 = 50;
const MAX_TAP_DURATION_MS: u64 = 150;

/// ためらい（hesitation）の発生確率と持続時間レンジ
const HESITATION_PROBABILITY: f32 = 0.05;
const MIN_HESITATION_MS: u64 = 200;
const MAX_HESITATION_MS: u64 = 800;

/// マイクロポーズの発生確率と持続時間レンジ
const MICRO_PAUSE_PROBABILITY: f32 = 0.08;
const MIN_MICRO_PAUSE_MS: u64 = 500;
const MAX_MICRO_PAUSE_MS: u64 = 2000;

/// 休憩の発生確率（5バトルごとのチェックポイントで判定）と持続時間レンジ
const BREAK_PROBABILITY: f32 = 0.15;
const BREAK_CHECKPOINT_INTERVAL: u32 = 5;
const MIN_BREAK_MS: u64 = 3000;
const MAX_BREAK_MS: u64 = 10_000;

/// スワイプ端点の精度（始点は丁寧、終点は雑になる）
const SWIPE_START_ACCURACY: f64 = 0.95;
const SWIPE_END_ACCURACY: f64 = 0.85;

/// スワイプ持続時間: 150ms + 0.3ms/px、上限400ms
const SWIPE_BASE_DURATION_MS: f64 = 150.0;
const SWIPE_DURATION_PER_PX: f64 = 0.3;
const SWIPE_MAX_DURATION_MS: f64 = 400.0;

/// スワイプ中間点のオフセットレンジ（直線パス回避）
const SWIPE_CURVE_OFFSET: i32 = 20;

/// タップ位置オフセットの倍率と下限
const OFFSET_SCALE_PER_INACCURACY: f64 = 30.0;
const MIN_OFFSET_MAGNITUDE: f64 = 2.0;

/// 精度からオフセット強度を導出
///
/// `max(2, round((1 - accuracy) * 30))`。accuracy=1.0でも強度2が残り、
/// 完全に同一の座標を繰り返すことはない。
pub fn offset_magnitude(accuracy: f64) -> f64 {
    ((1.0 - accuracy) * OFFSET_SCALE_PER_INACCURACY)
        .round()
        .max(MIN_OFFSET_MAGNITUDE)
}

/// 人間化済みタップ（実行1回分の短命な値）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanizedTap {
    /// タップ座標（人間化済み、画面境界へのクランプは呼び出し側の責任）
    pub x: i32,
    pub y: i32,
    /// タップ持続時間（ミリ秒）
    pub duration_ms: u64,
}

/// 人間化済みスワイプ（中間点付きの曲線パス）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanizedSwipe {
    pub start: Point,
    /// 中間点（完全な直線パスを避けるための曲線制御点）
    pub mid: Point,
    pub end: Point,
    pub duration_ms: u64,
}

/// タイミング・座標のばらつき生成器
pub struct Humanizer {
    rng: StdRng,
}

impl Humanizer {
    /// エントロピーシードで作成
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 固定シードで作成（統計的性質のテスト用）
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// アクション前のディレイ
    ///
    /// 反応時間 + 視覚処理時間 + まれなためらい。上限クランプなし。
    pub fn action_delay(&mut self) -> u64 {
        let reaction = self
            .rng
            .gen_range(MIN_REACTION_TIME_MS..MAX_REACTION_TIME_MS);
        let processing = self
            .rng
            .gen_range(MIN_PROCESSING_TIME_MS..MAX_PROCESSING_TIME_MS);

        let hesitation = if self.rng.gen::<f32>() < HESITATION_PROBABILITY {
            self.rng.gen_range(MIN_HESITATION_MS..MAX_HESITATION_MS)
        } else {
            0
        };

        reaction + processing + hesitation
    }

    /// 同一ターン内の連続アクション間のディレイ
    pub fn consecutive_delay(&mut self) -> u64 {
        self.rng.gen_range(80..250)
    }

    /// タップ保持時間
    pub fn tap_duration(&mut self) -> u64 {
        self.rng
            .gen_range(MIN_TAP_DURATION_MS..MAX_TAP_DURATION_MS)
    }

    /// カード選択のディレイ（1枚目は考える時間が長い）
    pub fn card_selection_delay(&mut self, is_first: bool) -> u64 {
        if is_first {
            self.rng.gen_range(300..800)
        } else {
            self.consecutive_delay()
        }
    }

    /// 確認操作前のディレイ（重要なタップの前に人間は一拍置く）
    pub fn confirmation_delay(&mut self) -> u64 {
        self.rng.gen_range(150..400)
    }

    /// タップ位置を人間化する
    ///
    /// accuracy ∈ (0, 1]。オフセットは正規分布（平均0、スケール=強度/2）
    /// から抽出。画面境界へのクランプは行わない。
    pub fn humanize_position(&mut self, x: i32, y: i32, accuracy: f64) -> Point {
        let scale = offset_magnitude(accuracy) / 2.0;
        let (gx, gy) = self.gaussian_pair();

        Point::new(
            x + (gx * scale).round() as i32,
            y + (gy * scale).round() as i32,
        )
    }

    /// 人間化済みタップを生成
    pub fn humanize_tap(&mut self, x: i32, y: i32, accuracy: f64) -> HumanizedTap {
        let position = self.humanize_position(x, y, accuracy);
        HumanizedTap {
            x: position.x,
            y: position.y,
            duration_ms: self.tap_duration(),
        }
    }

    /// 人間化済みスワイプを生成
    ///
    /// 始点・終点をそれぞれ精度0.95/0.85で人間化し、距離に応じた
    /// 持続時間と曲線用の中間点を付与する。
    pub fn humanize_swipe(
        &mut self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
    ) -> HumanizedSwipe {
        let start = self.humanize_position(start_x, start_y, SWIPE_START_ACCURACY);
        let end = self.humanize_position(end_x, end_y, SWIPE_END_ACCURACY);

        // 距離は人間化前の端点で計算
        let dx = (end_x - start_x) as f64;
        let dy = (end_y - start_y) as f64;
        let distance = (dx * dx + dy * dy).sqrt();

        let base = SWIPE_BASE_DURATION_MS + SWIPE_DURATION_PER_PX * distance;
        // 長距離スワイプでは上限400msが基準を下回るため、基準まで戻す
        let upper = (base * 1.3).min(SWIPE_MAX_DURATION_MS).max(base);
        let duration_ms = if upper > base {
            self.rng.gen_range(base..upper).round() as u64
        } else {
            base.round() as u64
        };

        // 中間点: 人間化済み端点の中点 + 両軸同一の一様オフセット
        let curve = self
            .rng
            .gen_range(-SWIPE_CURVE_OFFSET..=SWIPE_CURVE_OFFSET);
        let mid = Point::new(
            (start.x + end.x) / 2 + curve,
            (start.y + end.y) / 2 + curve,
        );

        HumanizedSwipe {
            start,
            mid,
            end,
            duration_ms,
        }
    }

    /// マイクロポーズを入れるべきか
    pub fn should_micro_pause(&mut self) -> bool {
        self.rng.gen::<f32>() < MICRO_PAUSE_PROBABILITY
    }

    /// マイクロポーズの持続時間
    pub fn micro_pause_duration(&mut self) -> u64 {
        self.rng.gen_range(MIN_MICRO_PAUSE_MS..MAX_MICRO_PAUSE_MS)
    }

    /// バトル完了後に休憩すべきか
    ///
    /// 5バトルごとのチェックポイントでのみ、確率15%で真になる。
    pub fn should_take_break(&mut self, battles_completed: u32) -> bool {
        if battles_completed > 0 && battles_completed % BREAK_CHECKPOINT_INTERVAL == 0 {
            self.rng.gen::<f32>() < BREAK_PROBABILITY
        } else {
            false
        }
    }

    /// 休憩の持続時間
    pub fn break_duration(&mut self) -> u64 {
        self.rng.gen_range(MIN_BREAK_MS..MAX_BREAK_MS)
    }

    /// 標準正規分布に従う独立な2値を生成
    ///
    /// Box-Muller変換の極形式。単位正方形内の2座標の平方和が
    /// 0または1以上になる退化ケースは棄却して引き直す。
    fn gaussian_pair(&mut self) -> (f64, f64) {
        loop {
            let u = self.rng.gen::<f64>() * 2.0 - 1.0;
            let v = self.rng.gen::<f64>() * 2.0 - 1.0;
            let s = u * u + v * v;

            if s > 0.0 && s < 1.0 {
                let factor = (-2.0 * s.ln() / s).sqrt();
                return (u * factor, v * factor);
            }
        }
    }
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_delay_bounds() {
        let mut humanizer = Humanizer::with_seed(1);

        for _ in 0..1000 {
            let delay = humanizer.action_delay();
            // 最小: 180 + 100、最大: 349 + 299 + 799
            assert!(delay >= MIN_REACTION_TIME_MS + MIN_PROCESSING_TIME_MS);
            assert!(delay < MAX_REACTION_TIME_MS + MAX_PROCESSING_TIME_MS + MAX_HESITATION_MS);
        }
    }

    #[test]
    fn test_consecutive_delay_bounds() {
        let mut humanizer = Humanizer::with_seed(2);

        for _ in 0..1000 {
            let delay = humanizer.consecutive_delay();
            assert!((80..250).contains(&delay));
        }
    }

    #[test]
    fn test_tap_duration_bounds() {
        let mut humanizer = Humanizer::with_seed(3);

        for _ in 0..1000 {
            let duration = humanizer.tap_duration();
            assert!((MIN_TAP_DURATION_MS..MAX_TAP_DURATION_MS).contains(&duration));
        }
    }

    #[test]
    fn test_card_selection_delay_branches() {
        let mut humanizer = Humanizer::with_seed(4);

        for _ in 0..100 {
            let first = humanizer.card_selection_delay(true);
            assert!((300..800).contains(&first));

            let rest = humanizer.card_selection_delay(false);
            assert!((80..250).contains(&rest));
        }
    }

    #[test]
    fn test_offset_magnitude_law() {
        // max(2, round((1 - accuracy) * 30))
        assert_eq!(offset_magnitude(1.0), 2.0);
        assert_eq!(offset_magnitude(0.95), 2.0);
        assert_eq!(offset_magnitude(0.9), 3.0);
        assert_eq!(offset_magnitude(0.85), 5.0);
        assert_eq!(offset_magnitude(0.5), 15.0);
        assert_eq!(offset_magnitude(0.1), 27.0);
    }

    #[test]
    fn test_humanize_position_has_variance() {
        let mut humanizer = Humanizer::with_seed(5);

        let positions: Vec<Point> = (0..100)
            .map(|_| humanizer.humanize_position(500, 500, 0.9))
            .collect();

        // 毎回同じ座標になってはいけない
        let first = positions[0];
        assert!(positions.iter().any(|p| *p != first));
    }

    #[test]
    fn test_humanize_position_centered_on_target() {
        let mut humanizer = Humanizer::with_seed(6);

        let n = 2000;
        let (mut sum_x, mut sum_y) = (0f64, 0f64);
        for _ in 0..n {
            let p = humanizer.humanize_position(500, 500, 0.9);
            sum_x += (p.x - 500) as f64;
            sum_y += (p.y - 500) as f64;
        }

        // 平均0の正規分布: サンプル平均はターゲット近傍に収束する
        assert!((sum_x / n as f64).abs() < 1.0);
        assert!((sum_y / n as f64).abs() < 1.0);
    }

    #[test]
    fn test_swipe_duration_zero_distance() {
        let mut humanizer = Humanizer::with_seed(7);

        for _ in 0..500 {
            let swipe = humanizer.humanize_swipe(300, 300, 300, 300);
            // 距離0: base=150、上限=min(195, 400)=195
            assert!((150..=195).contains(&swipe.duration_ms));
        }
    }

    #[test]
    fn test_swipe_duration_within_envelope() {
        let mut humanizer = Humanizer::with_seed(8);

        for _ in 0..500 {
            let swipe = humanizer.humanize_swipe(960, 800, 960, 400);
            // 距離400: base=270、上限=min(351, 400)=351
            assert!((270..=351).contains(&swipe.duration_ms));
        }
    }

    #[test]
    fn test_swipe_long_distance_degrades_to_base() {
        let mut humanizer = Humanizer::with_seed(9);

        // 距離1000: base=450 > 400 のため持続時間は基準値そのもの
        let swipe = humanizer.humanize_swipe(0, 0, 1000, 0);
        assert_eq!(swipe.duration_ms, 450);
    }

    #[test]
    fn test_swipe_mid_point_near_midpoint() {
        let mut humanizer = Humanizer::with_seed(10);

        for _ in 0..100 {
            let swipe = humanizer.humanize_swipe(100, 100, 500, 500);
            let mid_x = (swipe.start.x + swipe.end.x) / 2;
            let mid_y = (swipe.start.y + swipe.end.y) / 2;

            let dx = swipe.mid.x - mid_x;
            let dy = swipe.mid.y - mid_y;
            // 両軸に同一オフセットが加算されている
            assert_eq!(dx, dy);
            assert!((-20..=20).contains(&dx));
        }
    }

    #[test]
    fn test_micro_pause_duration_bounds() {
        let mut humanizer = Humanizer::with_seed(11);

        for _ in 0..200 {
            let duration = humanizer.micro_pause_duration();
            assert!((MIN_MICRO_PAUSE_MS..MAX_MICRO_PAUSE_MS).contains(&duration));
        }
    }

    #[test]
    fn test_micro_pause_probability() {
        let mut humanizer = Humanizer::with_seed(12);

        let trials = 10_000;
        let hits = (0..trials)
            .filter(|_| humanizer.should_micro_pause())
            .count();

        // 8% ± 2%
        let rate = hits as f64 / trials as f64;
        assert!(
            (0.06..=0.10).contains(&rate),
            "micro pause rate out of range: {}",
            rate
        );
    }

    #[test]
    fn test_break_only_at_checkpoints() {
        let mut humanizer = Humanizer::with_seed(13);

        // 正の5の倍数以外では常にfalse
        for n in [0u32, 1, 2, 3, 4, 6, 7, 11, 13, 101] {
            for _ in 0..100 {
                assert!(!humanizer.should_take_break(n));
            }
        }
    }

    #[test]
    fn test_break_probability_at_checkpoint() {
        let mut humanizer = Humanizer::with_seed(14);

        let trials = 10_000;
        let hits = (0..trials)
            .filter(|_| humanizer.should_take_break(5))
            .count();

        // 15% ± 2%
        let rate = hits as f64 / trials as f64;
        assert!(
            (0.13..=0.17).contains(&rate),
            "break rate out of range: {}",
            rate
        );
    }

    #[test]
    fn test_break_duration_bounds() {
        let mut humanizer = Humanizer::with_seed(15);

        for _ in 0..200 {
            let duration = humanizer.break_duration();
            assert!((MIN_BREAK_MS..MAX_BREAK_MS).contains(&duration));
        }
    }

    #[test]
    fn test_seeded_humanizer_is_deterministic() {
        let mut a = Humanizer::with_seed(42);
        let mut b = Humanizer::with_seed(42);

        for _ in 0..100 {
            assert_eq!(a.action_delay(), b.action_delay());
            assert_eq!(
                a.humanize_position(100, 200, 0.9),
                b.humanize_position(100, 200, 0.9)
            );
        }
    }
}
