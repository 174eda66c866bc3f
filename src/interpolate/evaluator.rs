//! 式を値に評価する外部コラボレーターの契約と、既定の実装

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// 呼び出し元が与える変数束縛
pub type Bindings = HashMap<String, Value>;

/// 式の評価エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("unknown binding '{expression}'")]
    UnknownBinding { expression: String },

    #[error("failed to evaluate '{expression}': {message}")]
    Failed { expression: String, message: String },
}

/// 式の本文と束縛から値を得る
///
/// 束縛が固定なら純粋であること。入れ子の式は評価済みの文字列として渡される。
pub trait ExpressionEvaluator: Send + Sync {
    /// # Errors
    /// 式を評価できない場合
    fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<Value, EvaluationError>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&str, &Bindings) -> Result<Value, EvaluationError> + Send + Sync,
{
    fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<Value, EvaluationError> {
        self(expression, bindings)
    }
}

/// ドット区切りのパスで束縛を辿る既定の評価器
///
/// `user.name` はオブジェクトのフィールド、`items.0` は配列の要素を表す。
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEvaluator;

impl ExpressionEvaluator for PathEvaluator {
    fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<Value, EvaluationError> {
        let path = expression.trim();
        let unknown = || EvaluationError::UnknownBinding { expression: path.to_string() };

        let mut segments = path.split('.').map(str::trim);
        let root = segments.next().filter(|s| !s.is_empty()).ok_or_else(unknown)?;
        let mut value = bindings.get(root).ok_or_else(unknown)?;

        for segment in segments {
            value = match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
            .ok_or_else(unknown)?;
        }

        Ok(value.clone())
    }
}
