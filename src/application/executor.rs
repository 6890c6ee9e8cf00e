//! ジェスチャ実行モジュール（Application層）
//!
//! デコード済みアクション1件を、人間化とデバイススケーリングを適用した
//! 入力注入呼び出しの列へ変換して実行します。
//!
//! # 実行計画（plan）と実行（execute）の分離
//! アクションはまず`GestureStep`の列（タップ/スワイプ/ディレイ）へ
//! 展開され、その後1ステップずつ順番に実行されます。計画段階は
//! 入力ポートに触れないため、タイミング・座標の性質を高速に検証できます。
//!
//! # 直列実行の保証
//! 実行は`&mut self`を要求し、各注入呼び出しの完了シグナル
//! （true/false）を受け取ってから次のステップへ進みます。
//! 同一インスタンスで2つの入力シーケンスが交錯することはありません。

use std::time::Duration;

use crate::domain::humanize::Humanizer;
use crate::domain::layout::{card_slot, ScreenGeometry, UiElement};
use crate::domain::ports::InputPort;
use crate::domain::types::{Action, Point};

/// 実行計画の1ステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureStep {
    /// 1点タップ（座標は人間化・スケーリング済み）
    Tap { point: Point, duration_ms: u64 },
    /// 曲線スワイプ（始点・中間点・終点）
    Swipe {
        start: Point,
        mid: Point,
        end: Point,
        duration_ms: u64,
    },
    /// 入力なしの待機
    Delay { duration_ms: u64 },
}

/// 1アクション分の実行結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// 注入を試みたジェスチャ数
    pub issued: u32,
    /// ホストにキャンセルされた（または失敗した）ジェスチャ数
    pub cancelled: u32,
}

/// ジェスチャ実行エンジン
pub struct GestureExecutor<I: InputPort> {
    input: I,
    humanizer: Humanizer,
    geometry: ScreenGeometry,
    tap_accuracy: f64,
}

impl<I: InputPort> GestureExecutor<I> {
    /// 新しい実行エンジンを作成
    ///
    /// # Arguments
    /// - `input`: 入力注入ケイパビリティ（構築時に明示的に注入）
    /// - `humanizer`: タイミング・座標のばらつき生成器
    /// - `geometry`: 実デバイス解像度
    /// - `tap_accuracy`: タップ精度 (0, 1]
    pub fn new(input: I, humanizer: Humanizer, geometry: ScreenGeometry, tap_accuracy: f64) -> Self {
        Self {
            input,
            humanizer,
            geometry,
            tap_accuracy,
        }
    }

    /// 休憩・バトル間隔判定のためのシミュレータへのアクセス
    pub fn humanizer_mut(&mut self) -> &mut Humanizer {
        &mut self.humanizer
    }

    /// アクションを実行計画へ展開する
    ///
    /// 座標の人間化は1920x1080基準空間で行い、その後デバイス解像度へ
    /// スケーリングする。
    pub fn plan(&mut self, action: &Action) -> Vec<GestureStep> {
        let mut steps = Vec::new();

        match action {
            Action::None => return steps,

            Action::Wait { duration_ms } => {
                steps.push(GestureStep::Delay {
                    duration_ms: *duration_ms as u64,
                });
                return steps;
            }

            _ => {}
        }

        // まれに入力前の「ながら見」ポーズを挟む
        if self.humanizer.should_micro_pause() {
            steps.push(GestureStep::Delay {
                duration_ms: self.humanizer.micro_pause_duration(),
            });
        }

        match action {
            Action::Tap { x, y } => {
                steps.push(self.reaction_delay());
                steps.push(self.tap_at(Point::new(*x, *y)));
            }

            Action::TapAttack => {
                steps.push(self.reaction_delay());
                steps.push(self.tap_element(UiElement::AttackButton));
            }

            Action::TargetEnemy { enemy } => {
                steps.push(self.reaction_delay());
                steps.push(self.tap_element(UiElement::Enemy(*enemy)));
            }

            Action::UseNp { servant } => {
                steps.push(self.reaction_delay());
                steps.push(self.tap_element(UiElement::Np(*servant)));
            }

            Action::SelectCards { cards } => {
                // 1枚目は考える時間、以降は連続アクション間隔
                for (i, card) in cards.iter().enumerate() {
                    steps.push(GestureStep::Delay {
                        duration_ms: self.humanizer.card_selection_delay(i == 0),
                    });
                    steps.push(self.tap_element(card_slot(*card)));
                }
            }

            Action::UseSkill {
                servant,
                skill,
                target,
            } => {
                steps.push(self.reaction_delay());
                steps.push(self.tap_element(UiElement::Skill {
                    servant: *servant,
                    skill: *skill,
                }));
                if let Some(target) = target {
                    steps.push(GestureStep::Delay {
                        duration_ms: self.humanizer.confirmation_delay(),
                    });
                    steps.push(self.tap_element(UiElement::SkillTarget(*target)));
                }
            }

            Action::UseMasterSkill { skill, target } => {
                steps.push(self.reaction_delay());
                // スキル本体の前にメニュー展開タップが必要
                steps.push(self.tap_element(UiElement::MasterSkillMenu));
                steps.push(GestureStep::Delay {
                    duration_ms: self.humanizer.consecutive_delay() * 2,
                });
                steps.push(self.tap_element(UiElement::MasterSkill(*skill)));
                if let Some(target) = target {
                    steps.push(GestureStep::Delay {
                        duration_ms: self.humanizer.confirmation_delay(),
                    });
                    steps.push(self.tap_element(UiElement::SkillTarget(*target)));
                }
            }

            Action::Swipe {
                start_x,
                start_y,
                end_x,
                end_y,
                duration_ms,
            } => {
                steps.push(self.reaction_delay());
                let swipe = self
                    .humanizer
                    .humanize_swipe(*start_x, *start_y, *end_x, *end_y);
                // プロトコルが持続時間を運んでいる場合はそちらを優先
                let duration = if *duration_ms > 0 {
                    *duration_ms as u64
                } else {
                    swipe.duration_ms
                };
                steps.push(GestureStep::Swipe {
                    start: self.geometry.scale_point(swipe.start),
                    mid: self.geometry.scale_point(swipe.mid),
                    end: self.geometry.scale_point(swipe.end),
                    duration_ms: duration,
                });
            }

            // NoneとWaitは先頭で処理済み
            Action::None | Action::Wait { .. } => unreachable!(),
        }

        steps
    }

    /// アクションを実行する（計画展開 + 直列実行、ブロッキング）
    pub fn execute(&mut self, action: &Action) -> ExecutionSummary {
        let plan = self.plan(action);
        self.execute_plan(&plan)
    }

    /// 実行計画を1ステップずつ処理する
    ///
    /// キャンセルされたジェスチャは記録して次のステップへ進む。
    /// 盲目的なリトライはスキップより検出されやすい。
    fn execute_plan(&mut self, plan: &[GestureStep]) -> ExecutionSummary {
        let mut summary = ExecutionSummary::default();

        for step in plan {
            match step {
                GestureStep::Delay { duration_ms } => {
                    std::thread::sleep(Duration::from_millis(*duration_ms));
                }

                GestureStep::Tap { point, duration_ms } => {
                    summary.issued += 1;
                    let result = self.input.tap(point.x, point.y, *duration_ms);
                    self.note_completion("tap", result, &mut summary);
                }

                GestureStep::Swipe {
                    start,
                    mid,
                    end,
                    duration_ms,
                } => {
                    summary.issued += 1;
                    let path = [*start, *mid, *end];
                    let result = self.input.swipe(&path, *duration_ms);
                    self.note_completion("swipe", result, &mut summary);
                }
            }
        }

        summary
    }

    /// 完了シグナルを記録する
    fn note_completion(
        &mut self,
        gesture: &'static str,
        result: crate::domain::DomainResult<bool>,
        summary: &mut ExecutionSummary,
    ) {
        match result {
            Ok(true) => {}
            Ok(false) => {
                summary.cancelled += 1;
                #[cfg(debug_assertions)]
                tracing::warn!("Gesture cancelled by host: {}", gesture);
                #[cfg(not(debug_assertions))]
                let _ = gesture;
            }
            Err(e) => {
                summary.cancelled += 1;
                #[cfg(debug_assertions)]
                tracing::warn!("Gesture injection failed ({}): {:?}", gesture, e);
                #[cfg(not(debug_assertions))]
                let _ = (gesture, e);
            }
        }
    }

    /// アクション前の反応ディレイ
    fn reaction_delay(&mut self) -> GestureStep {
        GestureStep::Delay {
            duration_ms: self.humanizer.action_delay(),
        }
    }

    /// UI要素への人間化済みタップ
    fn tap_element(&mut self, element: UiElement) -> GestureStep {
        self.tap_at(self.geometry.reference_point(element))
    }

    /// 基準座標への人間化済みタップ（人間化→スケーリングの順）
    fn tap_at(&mut self, reference: Point) -> GestureStep {
        let tap = self
            .humanizer
            .humanize_tap(reference.x, reference.y, self.tap_accuracy);
        GestureStep::Tap {
            point: self.geometry.scale_point(Point::new(tap.x, tap.y)),
            duration_ms: tap.duration_ms,
        }
    }
}
