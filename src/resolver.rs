//! メッセージ解決のファサード
//!
//! 設定からソース・集約・展開器を組み立て、
//! `(キー, フォールバックチェーン, 束縛)` から最終的なメッセージを返す。

use std::fmt;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use crate::aggregator::SourceAggregator;
use crate::cache::MergedMapping;
use crate::config::{
    ConfigError,
    ConfigManager,
    ResolverSettings,
};
use crate::error::MessageError;
use crate::interpolate::{
    Bindings,
    ExpressionEvaluator,
    Interpolator,
    ParseCache,
    PathEvaluator,
};
use crate::locale::{
    Locale,
    locale_label,
};
use crate::locator::{
    DirectoryLocator,
    FsLocator,
};
use crate::source::{
    BundleLoader,
    BundleMessageSource,
    MessageSource,
};

/// メッセージリゾルバー
pub struct MessageResolver {
    /// ソースの集約
    aggregator: SourceAggregator,
    /// テンプレート展開器
    interpolator: Interpolator,
    /// 式の評価器
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl MessageResolver {
    /// 既定の評価器（[`PathEvaluator`]）で作成する
    #[must_use]
    pub fn new(aggregator: SourceAggregator, interpolator: Interpolator) -> Self {
        Self { aggregator, interpolator, evaluator: Arc::new(PathEvaluator) }
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// 読み込み済みの設定から作成する
    ///
    /// # Errors
    /// [`MessageResolver::from_settings`] と同じ
    pub fn from_config(config: &ConfigManager) -> Result<Self, MessageError> {
        let config_dir = config.config_dir().cloned().unwrap_or_else(|| PathBuf::from("."));
        Self::from_settings(&config_dir, config.get_settings())
    }

    /// 設定からソースを組み立てる
    ///
    /// 登録されるソース:
    /// - `bundles`: `resourceRoots` のバンドル
    /// - `extended:<dir>`: `extendedDirectories` ごとのオーバーレイ
    /// - `templates`: `templateDirectories` 全体の 1 ファイル 1 テンプレート。
    ///   ソースとしての序数を持たないため、序数を宣言したバンドルより常に低い
    ///
    /// 相対パスは `config_dir` を基準に解決する。
    ///
    /// # Errors
    /// 設定が不正な場合は [`MessageError::Configuration`]
    pub fn from_settings(
        config_dir: &Path,
        settings: &ResolverSettings,
    ) -> Result<Self, MessageError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let policy = settings.cache_policy();
        let parse_cache = Arc::new(ParseCache::new());
        let bundle_format = settings.bundle_format();

        let bundle_source = |name: String, roots: Vec<PathBuf>| -> Arc<dyn MessageSource> {
            let loader = BundleLoader::new(
                Arc::new(FsLocator::new(roots, settings.file_suffix.clone())),
                settings.base_names.clone(),
                bundle_format.clone(),
            );
            Arc::new(
                BundleMessageSource::new(name, loader, policy)
                    .with_parse_cache(Arc::clone(&parse_cache)),
            )
        };

        let mut sources = vec![bundle_source(
            "bundles".to_string(),
            settings.resource_roots.iter().map(|root| config_dir.join(root)).collect(),
        )];

        for dir in &settings.extended_directories {
            sources.push(bundle_source(format!("extended:{dir}"), vec![config_dir.join(dir)]));
        }

        // 全ディレクトリのファイルを 1 つのソースでマージし、キーごとに序数で競わせる
        if !settings.template_directories.is_empty() {
            let loader = BundleLoader::new(
                Arc::new(DirectoryLocator::new(settings.template_file_suffix.clone())),
                settings
                    .template_directories
                    .iter()
                    .map(|dir| config_dir.join(dir).to_string_lossy().into_owned())
                    .collect(),
                settings.template_format(),
            );
            sources.push(Arc::new(
                BundleMessageSource::new("templates", loader, policy)
                    .with_parse_cache(Arc::clone(&parse_cache)),
            ));
        }

        let aggregator =
            SourceAggregator::new(sources, policy).with_parse_cache(Arc::clone(&parse_cache));

        Ok(Self::new(aggregator, Interpolator::new(parse_cache)))
    }

    #[must_use]
    pub const fn aggregator(&self) -> &SourceAggregator {
        &self.aggregator
    }

    #[must_use]
    pub const fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    /// 全ソースをマージした、ロケールのテンプレート（展開前）
    ///
    /// # Errors
    /// ソースの読み込みに失敗した場合
    pub fn merged_messages(
        &self,
        locale: Option<&Locale>,
    ) -> Result<Arc<MergedMapping>, MessageError> {
        Ok(self.aggregator.merged_messages(locale)?)
    }

    /// メッセージを解決して展開する
    ///
    /// `required` が `false` なら、キーが見つからないときに `Ok(None)` を返す。
    ///
    /// # Errors
    /// - ソースの読み込みに失敗した場合
    /// - `required` でキーが見つからない場合は [`MessageError::MissingKey`]
    /// - 展開に失敗した場合
    pub fn resolve(
        &self,
        key: &str,
        chain: &[Option<Locale>],
        bindings: &Bindings,
        required: bool,
    ) -> Result<Option<String>, MessageError> {
        let Some(resolved) = self.aggregator.resolve_template(key, chain)? else {
            if required {
                return Err(MessageError::MissingKey {
                    key: key.to_string(),
                    locales: searched_locales(chain),
                });
            }
            tracing::debug!(key, "Message not found");
            return Ok(None);
        };

        let message = self.interpolator.interpolate_with(
            key,
            &resolved.template,
            self.evaluator.as_ref(),
            bindings,
        )?;

        Ok(Some(message))
    }

    /// 必須のメッセージを解決して展開する
    ///
    /// # Errors
    /// [`MessageResolver::resolve`] と同じ
    pub fn get(
        &self,
        key: &str,
        chain: &[Option<Locale>],
        bindings: &Bindings,
    ) -> Result<String, MessageError> {
        self.resolve(key, chain, bindings, true)?.ok_or_else(|| MessageError::MissingKey {
            key: key.to_string(),
            locales: searched_locales(chain),
        })
    }
}

impl fmt::Debug for MessageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageResolver")
            .field("aggregator", &self.aggregator)
            .field("interpolator", &self.interpolator)
            .finish_non_exhaustive()
    }
}

/// 実際に探したロケールの一覧（デフォルトを補ったものを含む）
fn searched_locales(chain: &[Option<Locale>]) -> Vec<String> {
    let mut locales: Vec<String> = chain.iter().map(|locale| locale_label(locale.as_ref())).collect();
    if !chain.iter().any(Option::is_none) {
        locales.push(locale_label(None));
    }
    locales
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::{
        Value,
        json,
    };

    use super::*;
    use crate::bundle::BundleFormat;
    use crate::cache::CachePolicy;
    use crate::interpolate::EvaluationError;
    use crate::locale::{
        fallback_chain,
        parse_locale,
    };
    use crate::test_utils::MemoryLocator;

    fn resolver_over(locator: &Arc<MemoryLocator>) -> MessageResolver {
        let loader = BundleLoader::new(
            locator.clone(),
            vec!["messages".to_string()],
            BundleFormat::Properties,
        );
        let source: Arc<dyn MessageSource> =
            Arc::new(BundleMessageSource::new("memory", loader, CachePolicy::never_reload()));
        MessageResolver::new(
            SourceAggregator::new(vec![source], CachePolicy::never_reload()),
            Interpolator::default(),
        )
    }

    fn name(value: &str) -> Bindings {
        Bindings::from([("name".to_string(), json!(value))])
    }

    #[googletest::test]
    fn resolves_and_interpolates() {
        let locator = Arc::new(MemoryLocator::new());
        locator.insert("messages.properties", "welcome=Hi ${name}");
        let resolver = resolver_over(&locator);

        let message = resolver.get("welcome", &fallback_chain(None), &name("Ana")).unwrap();

        expect_that!(message, eq("Hi Ana"));
    }

    #[googletest::test]
    fn optional_lookup_of_missing_key_is_none() {
        let locator = Arc::new(MemoryLocator::new());
        locator.insert("messages.properties", "welcome=Hi");
        let resolver = resolver_over(&locator);

        let message = resolver.resolve("absent", &[None], &Bindings::new(), false).unwrap();

        expect_that!(message, none());
    }

    #[googletest::test]
    fn required_lookup_of_missing_key_is_an_error() {
        let locator = Arc::new(MemoryLocator::new());
        let resolver = resolver_over(&locator);
        let pt_br = parse_locale("pt-BR").unwrap();

        let result = resolver.resolve("absent", &[Some(pt_br)], &Bindings::new(), true);

        expect_that!(
            matches!(
                result,
                Err(MessageError::MissingKey { ref key, ref locales })
                    if key == "absent" && *locales == ["pt-BR", "default"]
            ),
            eq(true)
        );
    }

    #[googletest::test]
    fn interpolation_failure_is_surfaced() {
        let locator = Arc::new(MemoryLocator::new());
        locator.insert("messages.properties", "welcome=Hi ${missing}");
        let resolver = resolver_over(&locator);

        let result = resolver.get("welcome", &[None], &name("Ana"));

        let Err(MessageError::Interpolation(error)) = result else {
            panic!("expected interpolation error, got {result:?}");
        };
        expect_that!(error.key, eq("welcome"));
        expect_that!(error.template, eq("Hi ${missing}"));
    }

    #[rstest]
    fn custom_evaluator_is_used() {
        let locator = Arc::new(MemoryLocator::new());
        locator.insert("messages.properties", "shout=${name}!");
        let upper = |expression: &str, bindings: &Bindings| -> Result<Value, EvaluationError> {
            let value = bindings.get(expression).and_then(Value::as_str).unwrap_or_default();
            Ok(json!(value.to_uppercase()))
        };
        let resolver = resolver_over(&locator).with_evaluator(Arc::new(upper));

        let message = resolver.get("shout", &[None], &name("ana")).unwrap();

        assert_eq!(message, "ANA!");
    }

    #[rstest]
    fn searched_locales_appends_default() {
        let pt = parse_locale("pt").unwrap();

        assert_eq!(searched_locales(&[Some(pt.clone())]), vec!["pt", "default"]);
        assert_eq!(searched_locales(&[Some(pt), None]), vec!["pt", "default"]);
    }

    #[rstest]
    fn invalid_settings_are_rejected_at_construction() {
        let settings = ResolverSettings { base_names: vec![], ..ResolverSettings::default() };

        let result = MessageResolver::from_settings(Path::new("."), &settings);

        assert!(matches!(
            result,
            Err(MessageError::Configuration(ConfigError::ValidationErrors(_)))
        ));
    }
}
