//! 複数のメッセージソースの集約
//!
//! 各ソースのロケール別マッピングを、ソースごとの優先度で再びマージする。
//! マージ結果はロケールごとに [`LocaleTemplateCache`] へメモ化され、
//! ソースと同じ再読み込み方針に従う。

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::cache::{
    CachePolicy,
    Clock,
    LoadedTemplates,
    LocaleTemplateCache,
    MergedMapping,
    TemplateLoader,
};
use crate::interpolate::ParseCache;
use crate::locale::{
    Locale,
    locale_label,
};
use crate::locator::ResourceError;
use crate::merge::merge_layers;
use crate::source::MessageSource;

/// 全ソースを問い合わせてマージするローダー
#[derive(Debug, Clone)]
pub struct SourcesLoader {
    /// 登録順のソース
    sources: Vec<Arc<dyn MessageSource>>,
}

impl TemplateLoader for SourcesLoader {
    /// 各ソースを鮮度に関係なく取り直してマージする
    ///
    /// ソース側の読み込み時刻は集約側より後になるため、ソースのキャッシュを
    /// そのまま使うと、集約側が古くなった時点でソースはまだ新しく、
    /// 変更の反映が 1 周期遅れる。
    fn load(&self, locale: Option<&Locale>) -> Result<LoadedTemplates, ResourceError> {
        let mut layers = Vec::with_capacity(self.sources.len());
        let mut sources = BTreeSet::new();

        for source in &self.sources {
            let mapping = source.refresh(locale)?;
            tracing::debug!(
                source = source.name(),
                locale = %locale_label(locale),
                ordinal = ?mapping.ordinal(),
                keys = mapping.len(),
                "Collected messages from source"
            );
            sources.extend(mapping.sources().iter().cloned());
            layers.push((mapping.ordinal(), mapping.entries().clone()));
        }

        let merged = merge_layers(layers);
        Ok(LoadedTemplates { entries: merged.entries, ordinal: merged.ordinal, sources })
    }
}

/// フォールバックチェーンで見つかったテンプレート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// 見つかったロケール（`None` はデフォルト）
    pub locale: Option<Locale>,
    pub template: String,
}

/// 独立したメッセージソースを優先度順に集約する
#[derive(Debug)]
pub struct SourceAggregator {
    /// ロケールごとのマージ結果
    cache: LocaleTemplateCache<SourcesLoader>,
}

impl SourceAggregator {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn MessageSource>>, policy: CachePolicy) -> Self {
        let names: Vec<&str> = sources.iter().map(|source| source.name()).collect();
        tracing::info!(sources = ?names, "Registered message sources");

        Self { cache: LocaleTemplateCache::new(SourcesLoader { sources }, policy) }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache = self.cache.with_clock(clock);
        self
    }

    #[must_use]
    pub fn with_parse_cache(mut self, parse_cache: Arc<ParseCache>) -> Self {
        self.cache = self.cache.with_parse_cache(parse_cache);
        self
    }

    /// 登録済みのソース
    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn MessageSource>] {
        &self.cache.loader().sources
    }

    /// 全ソースをマージした、ロケールのテンプレート（展開前）
    ///
    /// # Errors
    /// いずれかのソースの読み込みに失敗した場合
    pub fn merged_messages(
        &self,
        locale: Option<&Locale>,
    ) -> Result<Arc<MergedMapping>, ResourceError> {
        self.cache.get(locale)
    }

    /// フォールバックチェーンを順に辿ってテンプレートを探す
    ///
    /// チェーンがデフォルト（`None`）を含まない場合は末尾に補う。
    /// どのロケールにもなければ `Ok(None)`。
    ///
    /// # Errors
    /// 辿った途中でソースの読み込みに失敗した場合
    pub fn resolve_template(
        &self,
        key: &str,
        chain: &[Option<Locale>],
    ) -> Result<Option<ResolvedTemplate>, ResourceError> {
        let needs_default = !chain.iter().any(Option::is_none);
        let locales = chain.iter().map(Option::as_ref).chain(needs_default.then_some(None));

        for locale in locales {
            let mapping = self.merged_messages(locale)?;
            if let Some(template) = mapping.get(key) {
                tracing::trace!(key, locale = %locale_label(locale), "Resolved template");
                return Ok(Some(ResolvedTemplate {
                    locale: locale.cloned(),
                    template: template.to_string(),
                }));
            }
        }

        Ok(None)
    }
}
