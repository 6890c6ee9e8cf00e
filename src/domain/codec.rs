/// アクションコード変換（ActionCodec）
///
/// 判断エンジン境界を越える唯一の値である64bit整数コードと
/// `Action`の相互変換。レイアウトは判断エンジン側と一致必須。
///
/// # コード構造（64bit）
/// - Bits 0-7: アクション種別タグ
/// - Bits 8-63: 種別ごとのペイロード
///
/// # 失敗ポリシー
/// `decode`は全域関数：どのビットパターンも必ず何らかの`Action`に
/// デコードされる（未知タグは`None`）。範囲外のペイロードは例外ではなく
/// ビットレイアウトによる決定的なマスク/切り捨てで処理する。
/// well-formedなコードを発行する責任は判断エンジン側にある。

use crate::domain::types::Action;

/// 64bit固定幅のアクションコード
pub type ActionCode = u64;

/// アクション種別タグ（判断エンジン側の定数と一致必須）
pub mod tags {
    pub const NONE: u8 = 0;
    pub const TAP: u8 = 1;
    pub const SWIPE: u8 = 2;
    pub const WAIT: u8 = 3;
    pub const SELECT_CARDS: u8 = 4;
    pub const USE_SKILL: u8 = 5;
    pub const USE_NP: u8 = 6;
    pub const TARGET_ENEMY: u8 = 7;
    pub const TAP_ATTACK: u8 = 8;
    pub const USE_MASTER_SKILL: u8 = 9;
}

/// 24bit座標フィールドのマスク（Tap用）
const COORD24_MASK: u64 = 0xFF_FFFF;

/// 12bit座標フィールドのマスク（Swipe用、4座標 + 持続時間で56bitを充填）
const COORD12_MASK: u64 = 0xFFF;

/// 「対象なし」を表す番兵値
const NO_TARGET: u8 = 0xFF;

/// Swipe持続時間の量子化単位（ミリ秒）
const SWIPE_DURATION_UNIT_MS: u32 = 10;

/// コードから種別タグを取り出す
pub fn tag_of(code: ActionCode) -> u8 {
    (code & 0xFF) as u8
}

/// アクションコードをデコードする（全域関数）
pub fn decode(code: ActionCode) -> Action {
    let byte = |shift: u32| ((code >> shift) & 0xFF) as u8;

    match tag_of(code) {
        tags::TAP => Action::Tap {
            x: ((code >> 32) & COORD24_MASK) as i32,
            y: ((code >> 8) & COORD24_MASK) as i32,
        },

        tags::SWIPE => Action::Swipe {
            start_x: ((code >> 52) & COORD12_MASK) as i32,
            start_y: ((code >> 40) & COORD12_MASK) as i32,
            end_x: ((code >> 28) & COORD12_MASK) as i32,
            end_y: ((code >> 16) & COORD12_MASK) as i32,
            duration_ms: byte(8) as u32 * SWIPE_DURATION_UNIT_MS,
        },

        tags::WAIT => Action::Wait {
            duration_ms: ((code >> 8) & 0xFFFF_FFFF) as u32,
        },

        // タグの上に3バイト、先頭カードが最上位
        tags::SELECT_CARDS => Action::SelectCards {
            cards: [byte(24), byte(16), byte(8)],
        },

        tags::USE_SKILL => Action::UseSkill {
            servant: byte(24),
            skill: byte(16),
            target: decode_target(byte(8)),
        },

        tags::USE_NP => Action::UseNp { servant: byte(8) },

        tags::TARGET_ENEMY => Action::TargetEnemy { enemy: byte(8) },

        tags::TAP_ATTACK => Action::TapAttack,

        tags::USE_MASTER_SKILL => Action::UseMasterSkill {
            skill: byte(16),
            target: decode_target(byte(8)),
        },

        // 未知タグはNoneへ（タグ0を含む）
        _ => Action::None,
    }
}

/// アクションをコードへエンコードする
///
/// 判断エンジンが発行しうるすべての値について`decode`の左逆写像になる。
/// 宣言レンジを超えるフィールドはレイアウトどおりにマスクされる。
pub fn encode(action: &Action) -> ActionCode {
    match action {
        Action::None => 0,

        Action::Tap { x, y } => {
            ((*x as u64 & COORD24_MASK) << 32)
                | ((*y as u64 & COORD24_MASK) << 8)
                | tags::TAP as u64
        }

        Action::Swipe {
            start_x,
            start_y,
            end_x,
            end_y,
            duration_ms,
        } => {
            // 持続時間は10ms単位へ量子化、255単位（2550ms）で飽和
            let duration_units =
                (*duration_ms / SWIPE_DURATION_UNIT_MS).min(0xFF) as u64;
            ((*start_x as u64 & COORD12_MASK) << 52)
                | ((*start_y as u64 & COORD12_MASK) << 40)
                | ((*end_x as u64 & COORD12_MASK) << 28)
                | ((*end_y as u64 & COORD12_MASK) << 16)
                | (duration_units << 8)
                | tags::SWIPE as u64
        }

        Action::Wait { duration_ms } => {
            ((*duration_ms as u64) << 8) | tags::WAIT as u64
        }

        Action::SelectCards { cards } => {
            ((cards[0] as u64) << 24)
                | ((cards[1] as u64) << 16)
                | ((cards[2] as u64) << 8)
                | tags::SELECT_CARDS as u64
        }

        Action::UseSkill {
            servant,
            skill,
            target,
        } => {
            ((*servant as u64) << 24)
                | ((*skill as u64) << 16)
                | ((encode_target(*target) as u64) << 8)
                | tags::USE_SKILL as u64
        }

        Action::UseNp { servant } => {
            ((*servant as u64) << 8) | tags::USE_NP as u64
        }

        Action::TargetEnemy { enemy } => {
            ((*enemy as u64) << 8) | tags::TARGET_ENEMY as u64
        }

        Action::TapAttack => tags::TAP_ATTACK as u64,

        Action::UseMasterSkill { skill, target } => {
            ((*skill as u64) << 16)
                | ((encode_target(*target) as u64) << 8)
                | tags::USE_MASTER_SKILL as u64
        }
    }
}

fn decode_target(byte: u8) -> Option<u8> {
    if byte == NO_TARGET {
        None
    } else {
        Some(byte)
    }
}

fn encode_target(target: Option<u8>) -> u8 {
    target.unwrap_or(NO_TARGET)
}
