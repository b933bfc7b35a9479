//! あいまい照合モジュール
//!
//! Ratcliff/Obershelp 方式の類似度（2·M / 全長）でラベルを照合する。
//! M は最長一致ブロックを再帰的に探索した一致文字数の合計。

use crate::label_table::normalize_label;
use std::collections::HashMap;

/// 一致とみなす類似度の下限
pub const SIMILARITY_CUTOFF: f64 = 0.85;

/// 照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub key: &'a str,
    pub score: f64,
}

/// 候補名に最も近い既知キーを返す
///
/// 候補は `normalize_label` で正規化してから比較する。
/// 同点の場合は `known_keys` の列挙順で先のものを採用。
pub fn best_match<'a, I>(candidate: &str, known_keys: I) -> Option<MatchResult<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    best_match_with_cutoff(candidate, known_keys, SIMILARITY_CUTOFF)
}

pub fn best_match_with_cutoff<'a, I>(
    candidate: &str,
    known_keys: I,
    cutoff: f64,
) -> Option<MatchResult<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidate: Vec<char> = normalize_label(candidate).chars().collect();
    let index = CharIndex::new(&candidate);

    let mut best: Option<MatchResult<'a>> = None;
    for key in known_keys {
        let key_chars: Vec<char> = key.chars().collect();

        // 長さだけで上限を出せるので、明らかに届かないものは省略
        if length_bound(key_chars.len(), candidate.len()) < cutoff {
            continue;
        }

        let score = ratio_with_index(&key_chars, &candidate, &index);
        if score < cutoff {
            continue;
        }
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(MatchResult { key, score });
        }
    }

    best
}

/// 2文字列の類似度 [0, 1]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let index = CharIndex::new(&b);
    ratio_with_index(&a, &b, &index)
}

fn length_bound(la: usize, lb: usize) -> f64 {
    let total = la + lb;
    if total == 0 {
        return 1.0;
    }
    2.0 * la.min(lb) as f64 / total as f64
}

fn ratio_with_index(a: &[char], b: &[char], index: &CharIndex) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_chars(a, b, index);
    2.0 * matches as f64 / total as f64
}

/// 第2系列の文字 → 出現位置（昇順）
struct CharIndex {
    positions: HashMap<char, Vec<usize>>,
}

impl CharIndex {
    fn new(b: &[char]) -> Self {
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            positions.entry(*ch).or_default().push(j);
        }
        Self { positions }
    }
}

/// 一致ブロックの文字数合計
fn matching_chars(a: &[char], b: &[char], index: &CharIndex) -> usize {
    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, index, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// a[alo..ahi] と b[blo..bhi] の最長一致 (i, j, 長さ)
///
/// 同じ長さなら a 側、次に b 側で最も早い位置を返す。
fn longest_match(
    a: &[char],
    index: &CharIndex,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // j → a[..i] と b[..=j] の末尾一致長
    let mut run: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next_run: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = index.positions.get(&a[i]) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        run = next_run;
    }

    (best_i, best_j, best_k)
}
