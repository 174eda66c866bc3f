//! バッキングソース 1 つ分をパースしたテンプレートバンドル
//!
//! 対応するファイル形式:
//! - `.properties` 形式（`key=value`）
//! - ネストした JSON（キー区切り文字で平坦化）
//! - 1 ファイル = 1 テンプレート（1 行目に優先度の宣言を置ける）

mod json;
mod properties;

use std::collections::HashMap;

pub use json::flatten_json;
pub use properties::parse_properties;

use crate::locale::split_file_locale;
use crate::locator::{
    ResourceError,
    SourceId,
};

/// ソース内で優先度を宣言する予約キー
pub const ORDINAL_KEY: &str = "message_ordinal";

/// 優先度の値を解析する
#[must_use]
pub fn parse_ordinal(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// バッキングソースのファイル形式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleFormat {
    /// `key=value` 形式
    Properties,
    /// ネストした JSON オブジェクト
    Json {
        /// 平坦化に使うキー区切り文字
        key_separator: String,
    },
    /// ファイル本文がそのまま 1 つのテンプレートになる形式
    ///
    /// キーはロケールとサフィックスを除いたファイル名。
    TemplateFile {
        /// テンプレートファイルのサフィックス
        suffix: String,
    },
}

impl BundleFormat {
    /// 生テキストをパースしてバンドルを作る
    ///
    /// # Errors
    /// テキストが形式として不正な場合、または優先度が整数でない場合
    pub fn parse(&self, source: SourceId, text: &str) -> Result<TemplateBundle, ResourceError> {
        match self {
            Self::Properties => {
                let entries = parse_properties(text).map_err(|message| ResourceError::Parse {
                    source_id: source.clone(),
                    message,
                })?;
                TemplateBundle::from_entries(source, entries)
            }
            Self::Json { key_separator } => {
                let json: serde_json::Value =
                    serde_json::from_str(text).map_err(|e| ResourceError::Parse {
                        source_id: source.clone(),
                        message: format!("Failed to parse JSON: {e}"),
                    })?;
                TemplateBundle::from_entries(source, flatten_json(&json, key_separator, None))
            }
            Self::TemplateFile { suffix } => Ok(parse_template_file(source, text, suffix)),
        }
    }
}

/// バッキングソース 1 つ分のキー → テンプレートの対応と優先度
///
/// 構築後は不変。再読み込みのたびに作られ、マージ後に破棄される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBundle {
    /// 読み込み元
    source: SourceId,
    /// 宣言された優先度
    ordinal: Option<i32>,
    /// キー → テンプレート
    entries: HashMap<String, String>,
}

impl TemplateBundle {
    #[must_use]
    pub const fn new(
        source: SourceId,
        ordinal: Option<i32>,
        entries: HashMap<String, String>,
    ) -> Self {
        Self { source, ordinal, entries }
    }

    /// パース済みのエントリから `message_ordinal` を取り出してバンドルを作る
    ///
    /// 予約キーはエントリから取り除かれ、解決可能なキーとしては残らない。
    ///
    /// # Errors
    /// `message_ordinal` の値が整数でない場合
    pub fn from_entries(
        source: SourceId,
        mut entries: HashMap<String, String>,
    ) -> Result<Self, ResourceError> {
        let ordinal = match entries.remove(ORDINAL_KEY) {
            Some(value) => Some(parse_ordinal(&value).ok_or_else(|| {
                ResourceError::InvalidOrdinal { source_id: source.clone(), value }
            })?),
            None => None,
        };

        Ok(Self { source, ordinal, entries })
    }

    #[must_use]
    pub const fn source(&self) -> &SourceId {
        &self.source
    }

    #[must_use]
    pub const fn ordinal(&self) -> Option<i32> {
        self.ordinal
    }

    #[must_use]
    pub const fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub(crate) fn into_parts(self) -> (SourceId, Option<i32>, HashMap<String, String>) {
        (self.source, self.ordinal, self.entries)
    }
}

/// `message_ordinal = 10` 形式の行なら優先度を返す
///
/// 行頭の空白は許さず、値は数字のみ。
fn ordinal_declaration(line: &str) -> Option<i32> {
    let (name, value) = line.split_once('=')?;
    if name.trim_end() != ORDINAL_KEY {
        return None;
    }
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// 1 ファイル = 1 テンプレートのソースをパースする
///
/// 1 行目が優先度の宣言なら、それ以降がテンプレート本文になる。
/// 宣言だけで本文のないファイルはキーを持たないバンドルになる。
fn parse_template_file(source: SourceId, text: &str, suffix: &str) -> TemplateBundle {
    let (key, _) = split_file_locale(source.file_name(), suffix);
    let (first_line, rest) = text.split_once('\n').map_or((text, None), |(f, r)| (f, Some(r)));

    let Some(ordinal) = ordinal_declaration(first_line.trim_end_matches('\r')) else {
        return TemplateBundle::new(source, None, HashMap::from([(key, text.to_string())]));
    };

    let body = rest.unwrap_or_default();
    if body.is_empty() {
        tracing::debug!(source = %source, "Template file only declares an ordinal");
        return TemplateBundle::new(source, Some(ordinal), HashMap::new());
    }

    TemplateBundle::new(source, Some(ordinal), HashMap::from([(key, body.to_string())]))
}
