//! メッセージソース
//!
//! ソースはロケールごとのマージ済みテンプレートを返す。
//! [`BundleMessageSource`] はロケーターで見つけたバンドルを読み込み、
//! 優先度順にマージして自分の [`LocaleTemplateCache`] に保持する。

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::bundle::BundleFormat;
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
use crate::locator::{
    ResourceError,
    ResourceLocator,
};
use crate::merge::merge_bundles;

/// 独立したメッセージの提供元
pub trait MessageSource: Send + Sync + fmt::Debug {
    /// ログ用の名前
    fn name(&self) -> &str;

    /// ロケールのマージ済みテンプレート（展開前）
    ///
    /// # Errors
    /// バッキングソースの読み込みに失敗した場合
    fn messages(&self, locale: Option<&Locale>) -> Result<Arc<MergedMapping>, ResourceError>;

    /// キャッシュの鮮度に関係なく、バッキングソースから取り直す
    ///
    /// 集約側のキャッシュが古くなったときに呼ばれる。キャッシュを持たない
    /// ソースは [`MessageSource::messages`] のままでよい。
    ///
    /// # Errors
    /// バッキングソースの読み込みに失敗した場合
    fn refresh(&self, locale: Option<&Locale>) -> Result<Arc<MergedMapping>, ResourceError> {
        self.messages(locale)
    }
}

/// 論理リソース名のバンドルを探して読み込み、マージするローダー
#[derive(Debug, Clone)]
pub struct BundleLoader {
    /// バッキングストレージ
    locator: Arc<dyn ResourceLocator>,
    /// 論理リソース名（この順にバンドルを探す）
    resource_names: Vec<String>,
    /// バンドルの形式
    format: BundleFormat,
}

impl BundleLoader {
    #[must_use]
    pub fn new(
        locator: Arc<dyn ResourceLocator>,
        resource_names: Vec<String>,
        format: BundleFormat,
    ) -> Self {
        Self { locator, resource_names, format }
    }

    #[must_use]
    pub const fn locator(&self) -> &Arc<dyn ResourceLocator> {
        &self.locator
    }

    #[must_use]
    pub fn resource_names(&self) -> &[String] {
        &self.resource_names
    }

    #[must_use]
    pub const fn format(&self) -> &BundleFormat {
        &self.format
    }
}

impl TemplateLoader for BundleLoader {
    fn load(&self, locale: Option<&Locale>) -> Result<LoadedTemplates, ResourceError> {
        let mut bundles = Vec::new();
        let mut sources = BTreeSet::new();

        for name in &self.resource_names {
            for source in self.locator.locate(name, locale)? {
                let text = self.locator.read(&source)?;
                let bundle = self.format.parse(source.clone(), &text)?;
                tracing::debug!(
                    source = %source,
                    ordinal = ?bundle.ordinal(),
                    keys = bundle.entries().len(),
                    "Parsed message bundle"
                );
                bundles.push(bundle);
                sources.insert(source);
            }
        }

        if bundles.is_empty() {
            tracing::debug!(
                locale = %locale_label(locale),
                names = ?self.resource_names,
                "No message bundles found"
            );
        }

        let merged = merge_bundles(bundles);
        // テンプレートファイルの序数はキーごとの優先度で、ソース全体の優先度にはしない
        let ordinal = match self.format {
            BundleFormat::TemplateFile { .. } => None,
            BundleFormat::Properties | BundleFormat::Json { .. } => merged.ordinal,
        };
        Ok(LoadedTemplates { entries: merged.entries, ordinal, sources })
    }
}

/// バンドルファイルを元にしたメッセージソース
#[derive(Debug)]
pub struct BundleMessageSource {
    /// ログ用の名前
    name: String,
    /// ロケールごとのキャッシュ
    cache: LocaleTemplateCache<BundleLoader>,
}

impl BundleMessageSource {
    #[must_use]
    pub fn new(name: impl Into<String>, loader: BundleLoader, policy: CachePolicy) -> Self {
        Self { name: name.into(), cache: LocaleTemplateCache::new(loader, policy) }
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

    #[must_use]
    pub const fn cache(&self) -> &LocaleTemplateCache<BundleLoader> {
        &self.cache
    }
}

impl MessageSource for BundleMessageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn messages(&self, locale: Option<&Locale>) -> Result<Arc<MergedMapping>, ResourceError> {
        self.cache.get(locale)
    }

    fn refresh(&self, locale: Option<&Locale>) -> Result<Arc<MergedMapping>, ResourceError> {
        self.cache.refresh(locale)
    }
}
