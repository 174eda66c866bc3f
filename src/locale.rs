//! ロケールの解析とフォールバックチェーン
//!
//! ロケールは `unic_langid::LanguageIdentifier` をそのまま使い、
//! ロケール非依存のデフォルトは `None` で表す。

use std::str::FromStr;

use thiserror::Error;
use unic_langid::LanguageIdentifier;

/// 言語 + 任意の地域などからなるロケール識別子
pub type Locale = LanguageIdentifier;

/// ロケールタグの解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid locale tag '{tag}'")]
pub struct LocaleError {
    /// 解析できなかったタグ
    pub tag: String,
}

/// ロケールタグを解析する
///
/// `pt-BR` と `pt_BR` のどちらの表記も受け付ける。
///
/// # Errors
/// タグが BCP 47 の言語識別子として不正な場合
pub fn parse_locale(tag: &str) -> Result<Locale, LocaleError> {
    let normalized = tag.trim().replace('_', "-");
    LanguageIdentifier::from_str(&normalized).map_err(|_| LocaleError { tag: tag.to_string() })
}

/// ファイル名に埋め込む形式に変換する（例: `pt-BR` → `pt_BR`）
#[must_use]
pub fn file_fragment(locale: &Locale) -> String {
    locale.to_string().replace('-', "_")
}

/// ログやエラーメッセージ用の表示名
#[must_use]
pub fn locale_label(locale: Option<&Locale>) -> String {
    locale.map_or_else(|| "default".to_string(), ToString::to_string)
}

/// ファイル名の断片をロケールとして解釈する
///
/// 言語サブタグが 2〜3 文字で、かつ [`file_fragment`] の正規形
/// （`pt_BR`、`zh_Hant_TW`）と完全に一致するものだけを受け付ける。
/// `email` や `user_ID` の `ID` はロケールにならない。
fn parse_fragment(fragment: &str) -> Option<Locale> {
    if fragment.is_empty() || fragment.contains('.') {
        return None;
    }
    let locale = parse_locale(fragment).ok()?;
    let language_len = locale.language.as_str().len();
    ((2..=3).contains(&language_len) && file_fragment(&locale) == fragment).then_some(locale)
}

/// ファイル名をベース名とロケールに分割する
///
/// `suffix` を取り除いた後、左から順に `_` で区切って残りがロケールとして
/// 解釈できる最初の位置で分割する。ロケールが見つからなければ
/// ベース名全体と `None`（デフォルトロケール）を返す。
///
/// ロケールは常に末尾の `_` 区切りの断片から取るため、正規形のロケールと
/// 同じ綴りで終わる名前は区別できない。`user_id.html` はベース名 `user`、
/// ロケール `id`（インドネシア語）になる。その場合は `user-id.html` のように
/// `_` 以外で区切る。
///
/// # Examples
/// - `messages_pt_BR.properties` → (`messages`, `pt-BR`)
/// - `welcome_email_fr.html` → (`welcome_email`, `fr`)
/// - `messages.properties` → (`messages`, None)
#[must_use]
pub fn split_file_locale(file_name: &str, suffix: &str) -> (String, Option<Locale>) {
    let stem = if suffix.is_empty() {
        file_name
    } else {
        file_name.strip_suffix(suffix).unwrap_or(file_name)
    };

    for (index, _) in stem.match_indices('_') {
        let (base, rest) = stem.split_at(index);
        if base.is_empty() {
            continue;
        }
        let Some(fragment) = rest.strip_prefix('_') else {
            continue;
        };
        if let Some(locale) = parse_fragment(fragment) {
            return (base.to_string(), Some(locale));
        }
    }

    (stem.to_string(), None)
}

/// 指定ロケールから徐々に一般化したフォールバックチェーンを作る
///
/// バリアント → 地域 → 文字体系の順に落としていき、最後に
/// ロケール非依存のデフォルト（`None`）で終わる。
///
/// `zh-Hant-TW` → `[zh-Hant-TW, zh-Hant, zh, None]`
#[must_use]
pub fn fallback_chain(locale: Option<&Locale>) -> Vec<Option<Locale>> {
    let mut chain = Vec::new();

    if let Some(requested) = locale {
        let mut current = requested.clone();
        chain.push(Some(current.clone()));

        loop {
            if current.variants().next().is_some() {
                current.clear_variants();
            } else if current.region.is_some() {
                current.region = None;
            } else if current.script.is_some() {
                current.script = None;
            } else {
                break;
            }
            chain.push(Some(current.clone()));
        }
    }

    chain.push(None);
    chain
}
