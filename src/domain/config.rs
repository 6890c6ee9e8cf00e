//! 設定管理
//!
//! TOML設定ファイルの読み込みとDomain型への変換。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::layout::ScreenGeometry;
use crate::domain::{DomainError, DomainResult};

/// アプリケーション設定のルート構造
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// デバイス設定
    pub device: DeviceConfig,
    /// パイプライン設定
    pub pipeline: PipelineConfig,
    /// フォアグラウンド監視設定
    pub monitor: MonitorConfig,
    /// 人間化設定
    pub humanize: HumanizeConfig,
    /// 判断エンジン設定
    #[serde(default)]
    pub decision: DecisionConfig,
}

/// デバイス設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeviceConfig {
    /// 画面幅（ピクセル）
    ///
    /// レイアウト座標は1920x1080基準で記述され、この解像度へ
    /// 線形スケーリングされる
    pub width: u32,

    /// 画面高さ（ピクセル）
    pub height: u32,
}

impl DeviceConfig {
    /// デフォルトの画面幅
    pub const DEFAULT_WIDTH: u32 = 1920;
    /// デフォルトの画面高さ
    pub const DEFAULT_HEIGHT: u32 = 1080;
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

impl From<DeviceConfig> for ScreenGeometry {
    fn from(config: DeviceConfig) -> Self {
        ScreenGeometry::new(config.width, config.height)
    }
}

/// パイプライン設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineConfig {
    /// キャプチャティック間隔（ミリ秒）
    ///
    /// キャプチャ → 判断 → 実行ループの周期。
    /// デフォルト: 100ms（約10Hz）
    pub tick_interval_ms: u64,

    /// 統計情報の出力間隔（秒）
    pub stats_interval_sec: u64,
}

impl PipelineConfig {
    /// デフォルトのティック間隔（約10Hz）
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
    /// デフォルトの統計出力間隔（秒）
    pub const DEFAULT_STATS_INTERVAL_SEC: u64 = 10;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            stats_interval_sec: Self::DEFAULT_STATS_INTERVAL_SEC,
        }
    }
}

impl PipelineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_sec)
    }
}

/// フォアグラウンド監視設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MonitorConfig {
    /// 前面プロセス状態のポーリング間隔（ミリ秒）
    ///
    /// デフォルト: 5000ms
    pub poll_interval_ms: u64,
}

impl MonitorConfig {
    /// デフォルトのポーリング間隔
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 人間化設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HumanizeConfig {
    /// タップ精度（0.0-1.0、1.0が最も正確）
    ///
    /// 位置オフセットの強度は (1 - accuracy) * 30（下限2）で導出される。
    /// デフォルト: 0.9
    pub tap_accuracy: f64,

    /// 乱数シード（省略時はエントロピーから初期化）
    ///
    /// 固定するとタイミング・座標のばらつきが再現可能になる（検証用）
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl HumanizeConfig {
    /// デフォルトのタップ精度
    pub const DEFAULT_TAP_ACCURACY: f64 = 0.9;
}

impl Default for HumanizeConfig {
    fn default() -> Self {
        Self {
            tap_accuracy: Self::DEFAULT_TAP_ACCURACY,
            rng_seed: None,
        }
    }
}

/// 判断エンジン設定
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DecisionConfig {
    /// スクリプト（モックアダプタが順に返すアクションコード）
    ///
    /// 16進（"0x..."）または10進の64bit整数文字列。
    /// 実エンジン接続時は無視される
    #[serde(default)]
    pub script: Vec<String>,

    /// セッション開始時にエンジンへ渡す設定JSON（省略可）
    #[serde(default)]
    pub settings_json: Option<String>,
}

/// アクションコード文字列をパースする（"0x..."の16進または10進）
pub fn parse_action_code(text: &str) -> DomainResult<u64> {
    let trimmed = text.trim();
    let parsed = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u64>()
    };

    parsed.map_err(|e| {
        DomainError::Configuration(format!("Invalid action code '{}': {}", text, e))
    })
}

impl AppConfig {
    /// TOMLファイルから設定を読み込む
    #[allow(dead_code)]
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| DomainError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// デフォルト設定をTOMLファイルに書き出す
    #[allow(dead_code)]
    pub fn write_default<P: AsRef<Path>>(path: P) -> DomainResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            DomainError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)
            .map_err(|e| DomainError::Configuration(format!("Failed to write config file: {}", e)))
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> DomainResult<()> {
        // デバイス解像度の検証
        if self.device.width == 0 || self.device.height == 0 {
            return Err(DomainError::Configuration(
                "Device width and height must be greater than 0".to_string(),
            ));
        }

        // ティック間隔の検証
        if self.pipeline.tick_interval_ms == 0 {
            return Err(DomainError::Configuration(
                "Tick interval must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.stats_interval_sec == 0 {
            return Err(DomainError::Configuration(
                "Stats interval must be greater than 0".to_string(),
            ));
        }

        // ポーリング間隔の検証
        if self.monitor.poll_interval_ms == 0 {
            return Err(DomainError::Configuration(
                "Monitor poll interval must be greater than 0".to_string(),
            ));
        }

        // タップ精度は(0, 1]
        let accuracy = self.humanize.tap_accuracy;
        if !(accuracy > 0.0 && accuracy <= 1.0) {
            return Err(DomainError::Configuration(
                "Tap accuracy must be in (0.0, 1.0]".to_string(),
            ));
        }

        // スクリプトの各エントリがパース可能なこと
        for entry in &self.decision.script {
            parse_action_code(entry)?;
        }

        Ok(())
    }
}
