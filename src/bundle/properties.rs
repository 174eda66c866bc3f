//! `.properties` 形式のパーサー
//!
//! - `#` / `!` で始まる行はコメント
//! - キーと値の区切りは最初のエスケープされていない `=` / `:` / 空白
//! - 行末の `\` で次の行に継続（継続行の先頭の空白は除去）
//! - `\t` `\n` `\r` `\f` `\uXXXX` のエスケープ
//! - 同じキーが複数回現れた場合は後勝ち

use std::collections::HashMap;

/// `.properties` 形式のテキストをキー → 値のマップにする
///
/// # Errors
/// `\u` エスケープが不正な場合（エラーメッセージに行番号を含む）
pub fn parse_properties(text: &str) -> Result<HashMap<String, String>, String> {
    let mut entries = HashMap::new();

    for (line_number, line) in logical_lines(text) {
        let (raw_key, raw_value) = split_key_value(&line);
        let key = unescape(raw_key).map_err(|e| format!("line {line_number}: {e}"))?;
        let value = unescape(raw_value).map_err(|e| format!("line {line_number}: {e}"))?;
        entries.insert(key, value);
    }

    Ok(entries)
}

/// 行末が継続を表すか（末尾の `\` が奇数個）
fn is_continued(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// コメントと空行を除き、継続行を連結した論理行を返す
///
/// 各論理行には開始行の行番号（1 始まり）を添える。
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_start();

        let (line_number, mut buffer) = match current.take() {
            Some(pending) => pending,
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        if is_continued(line) {
            buffer.push_str(line.strip_suffix('\\').unwrap_or(line));
            current = Some((line_number, buffer));
        } else {
            buffer.push_str(line);
            lines.push((line_number, buffer));
        }
    }

    if let Some(pending) = current {
        lines.push(pending);
    }

    lines
}

/// 論理行をエスケープ解除前のキーと値に分ける
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;

    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                let (key, rest) = line.split_at(index);
                let mut rest = rest.chars();
                rest.next();
                return (key, rest.as_str().trim_start());
            }
            ' ' | '\t' | '\u{000C}' => {
                let (key, rest) = line.split_at(index);
                let rest = rest.trim_start();
                let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
                return (key, rest.trim_start());
            }
            _ => {}
        }
    }

    (line, "")
}

/// バックスラッシュエスケープを解除する
fn unescape(raw: &str) -> Result<String, String> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("Malformed \\uxxxx encoding: '\\u{hex}'"))?;
                result.push(decoded);
            }
            Some(other) => result.push(other),
            None => {}
        }
    }

    Ok(result)
}
