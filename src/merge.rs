//! 優先度（`message_ordinal`）に基づくテンプレートのマージ
//!
//! 優先度なしのレイヤーが最も低く、優先度ありは値の小さい順に並べてから
//! 左から順に上書きしていく。同じ優先度同士は発見順を保つため、
//! 後に見つかったものが勝つ。

use std::collections::HashMap;

use crate::bundle::{
    ORDINAL_KEY,
    TemplateBundle,
    parse_ordinal,
};

/// マージ結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTemplates {
    /// キー → テンプレート（予約キーは含まない）
    pub entries: HashMap<String, String>,
    /// マージに参加したレイヤーの最大の優先度
    pub ordinal: Option<i32>,
}

/// 優先度つきのレイヤー列をマージする
///
/// `ordinal` が `None` のレイヤーは、エントリに `message_ordinal` キーがあれば
/// その値を優先度として使う。予約キーは結果から必ず取り除かれる。
pub fn merge_layers<I>(layers: I) -> MergedTemplates
where
    I: IntoIterator<Item = (Option<i32>, HashMap<String, String>)>,
{
    let mut layers: Vec<(Option<i32>, HashMap<String, String>)> = layers
        .into_iter()
        .map(|(ordinal, mut entries)| {
            let declared = entries.remove(ORDINAL_KEY);
            let ordinal = ordinal.or_else(|| {
                let value = declared?;
                let parsed = parse_ordinal(&value);
                if parsed.is_none() {
                    tracing::warn!(value = %value, "Ignoring malformed message ordinal");
                }
                parsed
            });
            (ordinal, entries)
        })
        .collect();

    // Option の順序では None < Some なので、優先度なしが先頭に来る（安定ソート）
    layers.sort_by_key(|(ordinal, _)| *ordinal);

    let ordinal = layers.last().and_then(|(ordinal, _)| *ordinal);
    let mut entries = HashMap::new();
    for (_, layer) in layers {
        entries.extend(layer);
    }

    MergedTemplates { entries, ordinal }
}

/// 発見順に並んだバンドルを 1 つのマッピングにマージする
///
/// 空の入力は空のマッピングになる。
#[must_use]
pub fn merge_bundles(bundles: Vec<TemplateBundle>) -> MergedTemplates {
    merge_layers(bundles.into_iter().map(|bundle| {
        let (_, ordinal, entries) = bundle.into_parts();
        (ordinal, entries)
    }))
}
