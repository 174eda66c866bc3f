//! 解決済みテンプレートの `${...}` 式を展開する
//!
//! テンプレートのパース結果はテンプレート文字列をキーに [`ParseCache`] へ
//! 保存され、同じテンプレートは束縛が変わっても再パースされない。

mod evaluator;
mod parse_cache;
mod parser;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use evaluator::{
    Bindings,
    EvaluationError,
    ExpressionEvaluator,
    PathEvaluator,
};
pub use parse_cache::ParseCache;
pub use parser::{
    MAX_NESTING_DEPTH,
    ParsedTemplate,
    Segment,
    TemplateSyntaxError,
    parse_template,
};

/// 展開失敗の原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolationErrorKind {
    #[error(transparent)]
    Syntax(#[from] TemplateSyntaxError),

    #[error("expression '{expression}' failed: {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvaluationError,
    },
}

/// メッセージの展開エラー
///
/// 原因となったキーとテンプレートを保持する。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot interpolate message '{key}' (template: \"{template}\"): {kind}")]
pub struct InterpolationError {
    pub key: String,
    pub template: String,
    #[source]
    pub kind: InterpolationErrorKind,
}

/// テンプレート展開器
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    /// 共有のパースキャッシュ
    cache: Arc<ParseCache>,
}

impl Interpolator {
    #[must_use]
    pub const fn new(cache: Arc<ParseCache>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// テンプレートを展開する
    ///
    /// トップレベルの式ごとに `resolve` を呼び、その値の文字列表現で置き換える。
    /// 入れ子の式は内側から順に評価され、結果が外側の式の本文に埋め込まれる。
    ///
    /// # Errors
    /// 構文エラー、または `resolve` が失敗した場合。途中までの結果は返さない。
    pub fn interpolate<F>(
        &self,
        key: &str,
        template: &str,
        mut resolve: F,
    ) -> Result<String, InterpolationError>
    where
        F: FnMut(&str) -> Result<Value, EvaluationError>,
    {
        let error = |kind: InterpolationErrorKind| InterpolationError {
            key: key.to_string(),
            template: template.to_string(),
            kind,
        };

        let parsed = self.cache.get_or_parse(template).map_err(|e| error(e.into()))?;

        let mut message = String::with_capacity(template.len());
        render(parsed.segments(), &mut resolve, &mut message).map_err(error)?;

        tracing::trace!(key, template, message = %message, "Interpolated message");
        Ok(message)
    }

    /// 評価器と束縛を使ってテンプレートを展開する
    ///
    /// # Errors
    /// [`Interpolator::interpolate`] と同じ
    pub fn interpolate_with(
        &self,
        key: &str,
        template: &str,
        evaluator: &dyn ExpressionEvaluator,
        bindings: &Bindings,
    ) -> Result<String, InterpolationError> {
        self.interpolate(key, template, |expression| evaluator.evaluate(expression, bindings))
    }
}

/// セグメント列を展開して `out` に追加する
fn render<F>(
    segments: &[Segment],
    resolve: &mut F,
    out: &mut String,
) -> Result<(), InterpolationErrorKind>
where
    F: FnMut(&str) -> Result<Value, EvaluationError>,
{
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Expression(inner) => {
                let mut expression = String::new();
                render(inner, resolve, &mut expression)?;

                match resolve(&expression) {
                    Ok(value) => push_value(out, &value),
                    Err(source) => {
                        return Err(InterpolationErrorKind::Evaluation { expression, source });
                    }
                }
            }
        }
    }
    Ok(())
}

/// 値の文字列表現を追加する（文字列は引用符なし、null は空文字）
fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::String(text) => out.push_str(text),
        Value::Null => {}
        other => out.push_str(&other.to_string()),
    }
}
