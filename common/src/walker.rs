//! 書き換え状態機械
//!
//! 文書の要素を文書順に1つずつ受け取り、どの Bind 要素をどの値に
//! 書き換えるかを決める。XMLの読み書きには関与しない。
//!
//! ## 状態遷移
//! - `Group` 出現で `Outside → InGroup`（以後戻らない）
//! - グループ内の `Text` で照合し、一致なら `Matched(key)`、不一致なら `InGroup`
//! - `Matched(key)` 中の `Bind` はバインド値が空でなければ書き換え
//! - 次の `Text` で一致状態は必ず解除される

use crate::label_table::{normalize_label, LabelTable};
use crate::matcher;
use indexmap::IndexSet;

/// 要素の種別（タグ名で判定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Group,
    Text,
    Bind,
    Other,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Group" => ElementKind::Group,
            "Text" => ElementKind::Text,
            "Bind" => ElementKind::Bind,
            _ => ElementKind::Other,
        }
    }
}

/// 走査状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TraversalState {
    /// まだグループに入っていない
    #[default]
    Outside,
    /// グループ内、一致中のテキストなし
    InGroup,
    /// グループ内、直前のテキストがキーに一致
    Matched(String),
}

impl TraversalState {
    pub fn in_group(&self) -> bool {
        !matches!(self, TraversalState::Outside)
    }

    pub fn matched_key(&self) -> Option<&str> {
        match self {
            TraversalState::Matched(key) => Some(key),
            _ => None,
        }
    }
}

/// 1要素を処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 何もしない
    Skip,
    /// テキストがキーに一致した
    Matched { key: String },
    /// テキストに一致するラベルがない
    Unmatched { candidate: String },
    /// Bind の Name を `value` に書き換える
    Rewrite { key: String, value: String },
    /// 一致したがバインド値が空なので書き換えない
    Suppressed { key: String },
}

/// 走査の集計
#[derive(Debug, Clone, Default)]
pub struct WalkSummary {
    /// 1回以上書き込まれたキー
    pub used: IndexSet<String>,
    /// テキストに一致したキー（書き込みの有無を問わない）
    pub matched: IndexSet<String>,
    /// 一致したがバインド値が空で書き込まれなかったキー
    pub suppressed: IndexSet<String>,
    /// 一致しなかった文書側のテキスト名（正規化済み）
    pub unmatched_names: IndexSet<String>,
}

/// 状態機械本体
pub struct Walker<'t> {
    table: &'t LabelTable,
    state: TraversalState,
    summary: WalkSummary,
}

impl<'t> Walker<'t> {
    pub fn new(table: &'t LabelTable) -> Self {
        Self {
            table,
            state: TraversalState::Outside,
            summary: WalkSummary::default(),
        }
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    /// 要素を1つ処理する
    ///
    /// `name` は要素の Name 属性（なければ `None`）。
    pub fn visit(&mut self, kind: ElementKind, name: Option<&str>) -> Step {
        match kind {
            ElementKind::Group => {
                if self.state == TraversalState::Outside {
                    self.state = TraversalState::InGroup;
                }
                Step::Skip
            }
            ElementKind::Text if self.state.in_group() => self.visit_text(name.unwrap_or("")),
            ElementKind::Bind => self.visit_bind(),
            _ => Step::Skip,
        }
    }

    fn visit_text(&mut self, name: &str) -> Step {
        // 前のテキストの一致は持ち越さない
        self.state = TraversalState::InGroup;

        let candidate = normalize_label(name);
        match matcher::best_match(&candidate, self.table.keys()) {
            Some(m) => {
                let key = m.key.to_string();
                tracing::debug!(candidate = %candidate, key = %key, score = m.score, "text matched");
                self.summary.matched.insert(key.clone());
                self.state = TraversalState::Matched(key.clone());
                Step::Matched { key }
            }
            None => {
                if !candidate.is_empty() {
                    tracing::debug!(candidate = %candidate, "text unmatched");
                    self.summary.unmatched_names.insert(candidate.clone());
                }
                Step::Unmatched { candidate }
            }
        }
    }

    fn visit_bind(&mut self) -> Step {
        let Some(key) = self.state.matched_key() else {
            return Step::Skip;
        };
        let key = key.to_string();
        let value = self.table.bind_for(&key).unwrap_or("");

        if value.is_empty() {
            tracing::debug!(key = %key, "empty bind value, rewrite suppressed");
            self.summary.suppressed.insert(key.clone());
            return Step::Suppressed { key };
        }

        self.summary.used.insert(key.clone());
        Step::Rewrite {
            key,
            value: value.to_string(),
        }
    }

    /// 走査を終えて集計を返す
    pub fn finish(mut self) -> WalkSummary {
        // 別のBindで書き込まれたキーは空値扱いにしない
        let used = &self.summary.used;
        self.summary.suppressed.retain(|k| !used.contains(k));
        self.summary
    }
}
