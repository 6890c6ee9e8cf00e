/// コア型定義
///
/// Domain層の中心となるデータ構造。
/// パイプライン全体（キャプチャ → 判断 → デコード → 実行）で共有される型。

use std::time::Instant;

/// 画面上の1点（ピクセル座標）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// 新しい座標を作成
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// キャプチャされたフレームデータ
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Frame {
    /// フレーム取得時刻
    pub timestamp: Instant,
    /// フレーム画像データ（RGBA形式、連続メモリ）
    pub data: Vec<u8>,
    /// 画像の幅
    pub width: u32,
    /// 画像の高さ
    pub height: u32,
}

impl Frame {
    /// 新しいフレームを作成
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            timestamp: Instant::now(),
            data,
            width,
            height,
        }
    }
}

/// 判断エンジンが決定する実行アクション（閉じたバリアント集合）
///
/// アクションコード（u64）からデコードされ、1回の実行後に破棄される。
/// 座標はすべて1920x1080基準解像度上の値で、実行時にデバイス解像度へ
/// スケーリングされる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 何もしない（デフォルト/アイドル）
    None,
    /// 1点タップ
    Tap { x: i32, y: i32 },
    /// スワイプ（始点・終点・持続時間）
    Swipe {
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        duration_ms: u32,
    },
    /// 指定時間の待機（入力なし）
    Wait { duration_ms: u32 },
    /// カードを順番に選択（常にちょうど3枚、インデックス5以上はNP列）
    SelectCards { cards: [u8; 3] },
    /// スキル使用（サーヴァント0-2、スキル0-2、対象は任意）
    UseSkill {
        servant: u8,
        skill: u8,
        target: Option<u8>,
    },
    /// 宝具使用（サーヴァント0-2）
    UseNp { servant: u8 },
    /// 敵をターゲット（0-2）
    TargetEnemy { enemy: u8 },
    /// Attackボタンをタップしてカード選択へ
    TapAttack,
    /// マスタースキル使用（メニュー展開を伴う）
    UseMasterSkill { skill: u8, target: Option<u8> },
}

impl Action {
    /// アイドルアクションか判定
    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }

    /// 統計・ログ用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Tap { .. } => "tap",
            Action::Swipe { .. } => "swipe",
            Action::Wait { .. } => "wait",
            Action::SelectCards { .. } => "select_cards",
            Action::UseSkill { .. } => "use_skill",
            Action::UseNp { .. } => "use_np",
            Action::TargetEnemy { .. } => "target_enemy",
            Action::TapAttack => "tap_attack",
            Action::UseMasterSkill { .. } => "use_master_skill",
        }
    }
}

/// ステルス状態（ForegroundMonitorのみが書き込む）
///
/// 対象アプリがフォアグラウンドにいる間はActive。
/// エージェント1インスタンスにつき正本は1つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StealthState {
    /// 対象アプリは前面にいない（通常動作）
    Inactive,
    /// 対象アプリが前面にいる（可視フットプリントを最小化）
    Active,
}

impl StealthState {
    /// フォアグラウンド観測値から状態を導出
    pub fn from_foreground(foreground: bool) -> Self {
        if foreground {
            StealthState::Active
        } else {
            StealthState::Inactive
        }
    }

    /// ステルス動作中か
    pub fn is_active(&self) -> bool {
        matches!(self, StealthState::Active)
    }
}
