/// スクリプト判断アダプタ
///
/// 設定ファイルに列挙されたアクションコードを順番に返す判断エンジンの
/// スタンドイン。実エンジン（vision/AIモデル）はホスト側で同じポートを
/// 実装する。スクリプトを使い切った後はアイドルコード（0）を返し続ける。

use std::collections::VecDeque;

use crate::domain::config::{parse_action_code, DecisionConfig};
use crate::domain::{ActionCode, DecisionPort, DomainResult, Frame};

/// スクリプト判断アダプタ
pub struct ScriptedDecisionAdapter {
    script: VecDeque<ActionCode>,
    exhausted_logged: bool,
}

impl ScriptedDecisionAdapter {
    /// コード列から作成
    pub fn new(script: Vec<ActionCode>) -> Self {
        Self {
            script: script.into(),
            exhausted_logged: false,
        }
    }

    /// 設定のスクリプト欄（16進/10進文字列）から作成
    pub fn from_config(config: &DecisionConfig) -> DomainResult<Self> {
        let script = config
            .script
            .iter()
            .map(|entry| parse_action_code(entry))
            .collect::<DomainResult<Vec<ActionCode>>>()?;

        Ok(Self::new(script))
    }

    /// 残りスクリプト長
    #[allow(dead_code)]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DecisionPort for ScriptedDecisionAdapter {
    fn decide(&mut self, _frame: &Frame) -> DomainResult<ActionCode> {
        match self.script.pop_front() {
            Some(code) => Ok(code),
            None => {
                if !self.exhausted_logged {
                    self.exhausted_logged = true;
                    tracing::info!("Decision script exhausted - idling");
                }
                Ok(0)
            }
        }
    }

    fn update_settings(&mut self, settings_json: &str) -> bool {
        #[cfg(debug_assertions)]
        tracing::debug!("MockDecision: settings updated ({} bytes)", settings_json.len());
        #[cfg(not(debug_assertions))]
        let _ = settings_json;

        true
    }

    fn set_paused(&mut self, paused: bool) -> bool {
        #[cfg(debug_assertions)]
        tracing::debug!("MockDecision: paused={}", paused);
        #[cfg(not(debug_assertions))]
        let _ = paused;

        true
    }
}
