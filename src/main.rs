mod application;
mod domain;
mod infrastructure;
mod logging;

use crate::application::orchestrator::{Session, SessionConfig};
use crate::domain::config::AppConfig;
use crate::domain::humanize::Humanizer;
use crate::infrastructure::mock_capture::MockCaptureAdapter;
use crate::infrastructure::mock_decision::ScriptedDecisionAdapter;
use crate::infrastructure::mock_foreground::MockForegroundAdapter;
use crate::infrastructure::mock_input::MockInputAdapter;
use crate::logging::init_logging;
use std::path::PathBuf;

fn main() {
    // ログシステムの初期化（非同期ファイル出力）
    let log_dir = PathBuf::from("logs");
    let _guard = init_logging("info", false, Some(log_dir));
    // 注意: _guardはmain終了まで保持する必要がある（Dropでログスレッドが終了）

    tracing::info!("GrandMarionette starting...");

    match run() {
        Ok(_) => {
            tracing::info!("GrandMarionette terminated gracefully.");
        }
        Err(e) => {
            tracing::error!("Fatal error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// アプリケーションのメイン処理
fn run() -> anyhow::Result<()> {
    // 設定ファイルの読み込み（存在しない場合はデフォルト設定を使用）
    let config = match AppConfig::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("Loaded configuration from config.toml");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config.toml: {:?}, using defaults", e);
            AppConfig::default()
        }
    };

    // 設定の検証
    config.validate()?;

    tracing::info!("Configuration validated successfully");
    tracing::info!(
        "Device: {}x{}, tick={}ms, monitor poll={}ms",
        config.device.width,
        config.device.height,
        config.pipeline.tick_interval_ms,
        config.monitor.poll_interval_ms
    );

    // アダプタの初期化（実ホスト接続はホスト側実装に差し替わる）
    tracing::info!("Initializing mock capture adapter...");
    let capture = MockCaptureAdapter::default();

    tracing::info!(
        "Initializing scripted decision adapter ({} actions)...",
        config.decision.script.len()
    );
    let decision = ScriptedDecisionAdapter::from_config(&config.decision)?;

    tracing::info!("Initializing mock input adapter...");
    let input = MockInputAdapter::new();

    tracing::info!("Initializing mock foreground adapter...");
    let foreground = MockForegroundAdapter::new();

    // 人間化シミュレータ（シード指定があれば再現可能モード）
    let humanizer = match config.humanize.rng_seed {
        Some(seed) => {
            tracing::info!("Humanizer seeded with {} (reproducible mode)", seed);
            Humanizer::with_seed(seed)
        }
        None => Humanizer::new(),
    };

    let session_config = SessionConfig::from_app_config(&config);

    tracing::info!("Starting session: capture/execute loop + foreground monitor");

    // セッションの起動（ブロッキング）
    let mut session = Session::new(
        capture,
        decision,
        input,
        foreground,
        humanizer,
        session_config,
    );

    // ステルス遷移のシンク（本来はUI層が購読する）
    if let Some(events) = session.take_stealth_events() {
        std::thread::spawn(move || {
            for state in events.iter() {
                tracing::info!("Presentation sink: stealth state -> {:?}", state);
            }
        });
    }

    session.run()?;

    Ok(())
}
