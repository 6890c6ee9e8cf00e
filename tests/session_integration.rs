//! セッション統合テスト
//!
//! モックアダプタを組み合わせたエンドツーエンドのパイプライン検証。
//! アクションコード → デコード → 人間化 → 入力注入、および
//! フォアグラウンド監視のイベント配信を実プロセス構成で確認します。

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use GrandMarionette::application::orchestrator::{Session, SessionConfig};
use GrandMarionette::domain::codec;
use GrandMarionette::domain::humanize::Humanizer;
use GrandMarionette::domain::layout::ScreenGeometry;
use GrandMarionette::domain::types::{Action, StealthState};
use GrandMarionette::infrastructure::mock_capture::MockCaptureAdapter;
use GrandMarionette::infrastructure::mock_decision::ScriptedDecisionAdapter;
use GrandMarionette::infrastructure::mock_foreground::MockForegroundAdapter;
use GrandMarionette::infrastructure::mock_input::{MockInputAdapter, RecordedGesture};

/// テスト用の短周期セッション設定
fn fast_config() -> SessionConfig {
    SessionConfig {
        tick_interval: Duration::from_millis(5),
        poll_interval: Duration::from_millis(5),
        stats_interval: Duration::from_secs(60),
        tap_accuracy: 0.9,
        geometry: ScreenGeometry::reference(),
        settings_json: None,
    }
}

fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[test]
fn test_select_cards_code_executes_three_taps() {
    // カード[2, 0, 4]の選択コード
    let code: u64 = 0x0200_0404;
    assert_eq!(
        codec::decode(code),
        Action::SelectCards { cards: [2, 0, 4] }
    );

    let input = MockInputAdapter::new();
    let log = input.gesture_log();

    let session = Session::new(
        MockCaptureAdapter::new(8, 8),
        ScriptedDecisionAdapter::new(vec![code]),
        input,
        MockForegroundAdapter::new(),
        Humanizer::with_seed(42),
        fast_config(),
    );

    let runtime_state = session.runtime_state();
    let handle = std::thread::spawn(move || session.run());

    assert!(
        wait_until(Duration::from_secs(15), || log.lock().unwrap().len() >= 3),
        "expected three card taps"
    );

    runtime_state.request_stop();
    handle.join().unwrap().unwrap();

    // 基準1920幅のカード中心（人間化オフセット込み）に3連タップ
    let recorded = log.lock().unwrap();
    let expected_x = [930, 330, 1530];
    for (gesture, expected) in recorded.iter().zip(expected_x) {
        match gesture {
            RecordedGesture::Tap { x, y, duration_ms } => {
                assert!((x - expected).abs() <= 12, "tap x={} expected~{}", x, expected);
                assert!((y - 880).abs() <= 12, "tap y={}", y);
                // タップ保持時間は[50, 150)
                assert!((50..150).contains(duration_ms));
            }
            other => panic!("Expected tap, got {:?}", other),
        }
    }
}

#[test]
fn test_actions_execute_in_decoded_order() {
    // Attackボタン → カード選択の順でスクリプト
    let script = vec![
        codec::encode(&Action::TapAttack),
        codec::encode(&Action::SelectCards { cards: [0, 1, 2] }),
    ];

    let input = MockInputAdapter::new();
    let log = input.gesture_log();

    let session = Session::new(
        MockCaptureAdapter::new(8, 8),
        ScriptedDecisionAdapter::new(script),
        input,
        MockForegroundAdapter::new(),
        Humanizer::with_seed(7),
        fast_config(),
    );

    let runtime_state = session.runtime_state();
    let handle = std::thread::spawn(move || session.run());

    assert!(
        wait_until(Duration::from_secs(20), || log.lock().unwrap().len() >= 4),
        "expected attack tap followed by three card taps"
    );

    runtime_state.request_stop();
    handle.join().unwrap().unwrap();

    let recorded = log.lock().unwrap();
    // 先頭はAttackボタン(1700, 500)近傍
    match &recorded[0] {
        RecordedGesture::Tap { x, y, .. } => {
            assert!((x - 1700).abs() <= 12);
            assert!((y - 500).abs() <= 12);
        }
        other => panic!("Expected tap, got {:?}", other),
    }
    // 続く3タップはカード列（y~880）
    for gesture in recorded.iter().skip(1).take(3) {
        match gesture {
            RecordedGesture::Tap { y, .. } => assert!((y - 880).abs() <= 12),
            other => panic!("Expected tap, got {:?}", other),
        }
    }
}

#[test]
fn test_cancelled_gestures_do_not_abort_sequence() {
    // 全ジェスチャがホストにキャンセルされても列は最後まで実行される
    let input = MockInputAdapter::cancelling();
    let log = input.gesture_log();

    let session = Session::new(
        MockCaptureAdapter::new(8, 8),
        ScriptedDecisionAdapter::new(vec![codec::encode(&Action::SelectCards {
            cards: [0, 1, 2],
        })]),
        input,
        MockForegroundAdapter::new(),
        Humanizer::with_seed(9),
        fast_config(),
    );

    let runtime_state = session.runtime_state();
    let handle = std::thread::spawn(move || session.run());

    assert!(
        wait_until(Duration::from_secs(15), || log.lock().unwrap().len() >= 3),
        "cancelled taps should still be attempted in order"
    );

    runtime_state.request_stop();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_stealth_monitor_emits_one_event_per_edge() {
    let foreground = MockForegroundAdapter::new();
    let flag = foreground.foreground_flag();

    let mut session = Session::new(
        MockCaptureAdapter::new(8, 8),
        ScriptedDecisionAdapter::new(vec![]),
        MockInputAdapter::new(),
        foreground,
        Humanizer::with_seed(11),
        fast_config(),
    );

    let events = session.take_stealth_events().expect("events receiver");
    assert!(session.take_stealth_events().is_none());

    let runtime_state = session.runtime_state();
    let handle = std::thread::spawn(move || session.run());

    // 前面へ遷移 → Activeイベントがちょうど1回
    flag.store(true, Ordering::Relaxed);
    let event = events
        .recv_timeout(Duration::from_secs(5))
        .expect("expected Active transition");
    assert_eq!(event, StealthState::Active);

    // 安定している間は追加イベントなし
    assert!(events.recv_timeout(Duration::from_millis(200)).is_err());

    // 背面へ遷移 → Inactiveイベント
    flag.store(false, Ordering::Relaxed);
    let event = events
        .recv_timeout(Duration::from_secs(5))
        .expect("expected Inactive transition");
    assert_eq!(event, StealthState::Inactive);

    runtime_state.request_stop();
    handle.join().unwrap().unwrap();

    // 停止までに余分なエッジは発生していない
    assert!(events.try_recv().is_err());
}

#[test]
fn test_paused_session_keeps_ticking_without_input() {
    let input = MockInputAdapter::new();
    let log = input.gesture_log();

    // 尽きないスクリプト
    let script = vec![codec::encode(&Action::TapAttack); 50_000];

    let session = Session::new(
        MockCaptureAdapter::new(8, 8),
        ScriptedDecisionAdapter::new(script),
        input,
        MockForegroundAdapter::new(),
        Humanizer::with_seed(13),
        fast_config(),
    );

    let runtime_state = session.runtime_state();
    runtime_state.set_paused(true);

    let handle = std::thread::spawn(move || session.run());

    // 一時停止中は入力ゼロ
    std::thread::sleep(Duration::from_millis(400));
    assert_eq!(log.lock().unwrap().len(), 0);

    // 再開で次のデコード済みアクションが実行される
    runtime_state.set_paused(false);
    assert!(
        wait_until(Duration::from_secs(15), || !log.lock().unwrap().is_empty()),
        "expected execution after resume"
    );

    runtime_state.request_stop();
    handle.join().unwrap().unwrap();
}
