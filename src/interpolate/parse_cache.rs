//! テンプレート文字列をキーにしたパース結果のキャッシュ

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use parking_lot::RwLock;

use super::parser::{
    ParsedTemplate,
    TemplateSyntaxError,
    parse_template,
};

/// テンプレート文字列 → パース済みテンプレート
///
/// 同じテンプレートを同時にパースした場合は先に登録した方が使われる。
/// パース結果はテンプレート文字列だけで決まるので、どちらを採っても同じ。
#[derive(Debug, Default)]
pub struct ParseCache {
    /// パース済みテンプレート
    entries: RwLock<HashMap<String, Arc<ParsedTemplate>>>,
    /// これまでに実行したパースの回数
    parse_count: AtomicUsize,
}

impl ParseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュ済みならそれを返し、なければパースして登録する
    ///
    /// # Errors
    /// テンプレートの構文が不正な場合（不正なテンプレートはキャッシュしない）
    pub fn get_or_parse(&self, template: &str) -> Result<Arc<ParsedTemplate>, TemplateSyntaxError> {
        if let Some(parsed) = self.entries.read().get(template) {
            return Ok(Arc::clone(parsed));
        }

        self.parse_count.fetch_add(1, Ordering::Relaxed);
        let parsed = Arc::new(parse_template(template)?);

        let mut entries = self.entries.write();
        Ok(Arc::clone(entries.entry(template.to_string()).or_insert(parsed)))
    }

    /// テンプレートのパース結果を破棄する
    ///
    /// 破棄した場合は `true`
    pub fn evict(&self, template: &str) -> bool {
        self.entries.write().remove(template).is_some()
    }

    #[must_use]
    pub fn contains(&self, template: &str) -> bool {
        self.entries.read().contains_key(template)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// パースを実行した回数（キャッシュヒットは数えない）
    #[must_use]
    pub fn parse_count(&self) -> usize {
        self.parse_count.load(Ordering::Relaxed)
    }
}
