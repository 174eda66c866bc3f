//! `${...}` 式のパーサー
//!
//! 式の中に別の式を入れ子にできる（`${labels.${kind}}`）。
//! 式の中の対応する `{` `}` は式の本文として扱う。
//! `{` が続かない `$` と、式の外の `}` はただの文字。

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// テンプレートの構文エラー（オフセットはバイト単位）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSyntaxError {
    #[error("unterminated expression starting at byte {offset}")]
    Unterminated { offset: usize },

    #[error("empty expression at byte {offset}")]
    EmptyExpression { offset: usize },

    #[error("expression at byte {offset} is nested deeper than {limit} levels")]
    NestingTooDeep { offset: usize, limit: usize },
}

/// 式の入れ子の上限
pub const MAX_NESTING_DEPTH: usize = 32;

/// テンプレートの構成要素
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// そのまま出力する文字列
    Literal(String),
    /// 式。本文は入れ子の式を含みうる
    Expression(Vec<Segment>),
}

/// パース済みテンプレート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// トップレベルのセグメント列
    segments: Vec<Segment>,
}

impl ParsedTemplate {
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// トップレベルの式の数
    #[must_use]
    pub fn expression_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Expression(_))).count()
    }
}

/// テンプレートをパースする
///
/// # Errors
/// 閉じられていない式、空の式、または [`MAX_NESTING_DEPTH`] を超える入れ子がある場合
pub fn parse_template(template: &str) -> Result<ParsedTemplate, TemplateSyntaxError> {
    let mut parser = Parser { chars: template.char_indices().peekable() };
    let segments = parser.parse_segments(None, 0)?;
    Ok(ParsedTemplate { segments })
}

/// 再帰下降パーサー
struct Parser<'a> {
    /// 残りの入力
    chars: Peekable<CharIndices<'a>>,
}

impl Parser<'_> {
    /// セグメント列をパースする
    ///
    /// `expression_start` が `Some` なら式の本文の中にいて、対応する `}` で戻る。
    /// `nesting` は現在の式の入れ子の深さ（トップレベルは 0）。
    fn parse_segments(
        &mut self,
        expression_start: Option<usize>,
        nesting: usize,
    ) -> Result<Vec<Segment>, TemplateSyntaxError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut braces = 0usize;

        while let Some((offset, c)) = self.chars.next() {
            match c {
                '$' if self.chars.peek().is_some_and(|(_, next)| *next == '{') => {
                    self.chars.next();
                    flush_literal(&mut literal, &mut segments);

                    if nesting >= MAX_NESTING_DEPTH {
                        return Err(TemplateSyntaxError::NestingTooDeep {
                            offset,
                            limit: MAX_NESTING_DEPTH,
                        });
                    }
                    let inner = self.parse_segments(Some(offset), nesting + 1)?;
                    if is_blank(&inner) {
                        return Err(TemplateSyntaxError::EmptyExpression { offset });
                    }
                    segments.push(Segment::Expression(inner));
                }
                '{' if expression_start.is_some() => {
                    braces += 1;
                    literal.push(c);
                }
                '}' if expression_start.is_some() => {
                    if braces == 0 {
                        flush_literal(&mut literal, &mut segments);
                        return Ok(segments);
                    }
                    braces -= 1;
                    literal.push(c);
                }
                _ => literal.push(c),
            }
        }

        if let Some(offset) = expression_start {
            return Err(TemplateSyntaxError::Unterminated { offset });
        }

        flush_literal(&mut literal, &mut segments);
        Ok(segments)
    }
}

/// たまった文字列をリテラルとして確定する
fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

/// 式の本文が空白だけか
fn is_blank(segments: &[Segment]) -> bool {
    segments.iter().all(|s| matches!(s, Segment::Literal(text) if text.trim().is_empty()))
}
