//! ロケールごとのマージ済みテンプレートのキャッシュ
//!
//! # 状態遷移
//!
//! `Unloaded → Loaded → (Stale ⇄ Loaded)`
//!
//! - 初回アクセスで読み込み、`last_load` を記録する
//! - `reload_interval > 0` かつ前回の確認から `reload_interval` 以上経っていれば Stale
//! - `reload_interval == 0` なら一度読み込んだ後は再読み込みしない
//!
//! # ロック
//!
//! ロケールごとにスロットを持ち、読み込みと差し替えはスロットの
//! `reload` ロックの中で行う。新鮮なエントリの読み出しは `reload` を待たない。
//! 別ロケールの再読み込みは互いをブロックしない。

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::fmt;
use std::sync::Arc;
use std::time::{
    Duration,
    Instant,
};

use parking_lot::{
    Mutex,
    RwLock,
};

use crate::interpolate::ParseCache;
use crate::locale::{
    Locale,
    locale_label,
};
use crate::locator::{
    ResourceError,
    SourceId,
};

/// 現在時刻の取得元
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// `Instant::now()` を返す時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 手動で進める時計
#[derive(Debug)]
pub struct ManualClock {
    /// 作成時刻
    origin: Instant,
    /// 進めた量
    offset: Mutex<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now(), offset: Mutex::new(Duration::ZERO) }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

/// 再読み込みの方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// 再読み込みの間隔（0 なら初回以降は再読み込みしない）
    pub reload_interval: Duration,
    /// 再読み込みに失敗したとき、古いマッピングを返すか
    pub serve_stale_on_error: bool,
}

impl CachePolicy {
    #[must_use]
    pub const fn never_reload() -> Self {
        Self { reload_interval: Duration::ZERO, serve_stale_on_error: true }
    }

    #[must_use]
    pub const fn reload_every(interval: Duration) -> Self {
        Self { reload_interval: interval, serve_stale_on_error: true }
    }

    /// 前回の確認から間隔が経過したか
    fn is_stale(&self, checked_at: Instant, now: Instant) -> bool {
        !self.reload_interval.is_zero()
            && now.saturating_duration_since(checked_at) >= self.reload_interval
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::never_reload()
    }
}

/// ローダーが 1 回の読み込みで返す内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedTemplates {
    /// キー → テンプレート
    pub entries: HashMap<String, String>,
    /// マージされたソースの最大の優先度
    pub ordinal: Option<i32>,
    /// 読み込んだソース
    pub sources: BTreeSet<SourceId>,
}

/// ロケールを指定してテンプレートを読み込む
pub trait TemplateLoader: Send + Sync + fmt::Debug {
    /// # Errors
    /// バッキングソースの探索・読み込み・解析に失敗した場合
    fn load(&self, locale: Option<&Locale>) -> Result<LoadedTemplates, ResourceError>;
}

/// 1 ロケール分のマージ済みテンプレート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedMapping {
    /// 対象ロケール（`None` は既定）
    locale: Option<Locale>,
    /// キー → テンプレート
    entries: HashMap<String, String>,
    /// マージされたソースの最大の優先度
    ordinal: Option<i32>,
    /// 読み込んだソース
    sources: BTreeSet<SourceId>,
    /// 読み込み時刻
    loaded_at: Instant,
}

impl MergedMapping {
    /// キャッシュを通さずにマッピングを作る
    ///
    /// 独自の [`MessageSource`](crate::source::MessageSource) 向け。
    /// `entries` に `message_ordinal` を含めると、ソース間のマージで優先度として使われる。
    #[must_use]
    pub fn new(locale: Option<Locale>, entries: HashMap<String, String>) -> Self {
        Self { locale, entries, ordinal: None, sources: BTreeSet::new(), loaded_at: Instant::now() }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub const fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    #[must_use]
    pub const fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    #[must_use]
    pub const fn ordinal(&self) -> Option<i32> {
        self.ordinal
    }

    #[must_use]
    pub const fn sources(&self) -> &BTreeSet<SourceId> {
        &self.sources
    }

    #[must_use]
    pub const fn loaded_at(&self) -> Instant {
        self.loaded_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// ロケールのキャッシュ状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Unloaded,
    Loaded,
    Stale,
}

/// キャッシュエントリ。差し替えのみで、共有後に書き換えない
#[derive(Debug)]
struct CacheEntry {
    /// 現在のマッピング
    mapping: Arc<MergedMapping>,
    /// 最後に読み込みに成功した時刻
    last_load: Instant,
    /// 最後に読み込みを試みた時刻（失敗を含む）
    checked_at: Instant,
}

/// ロケール 1 つ分のスロット
#[derive(Debug, Default)]
struct LocaleSlot {
    /// 読み込みと差し替えを直列化する
    reload: Mutex<()>,
    /// 現在のエントリ
    entry: RwLock<Option<Arc<CacheEntry>>>,
}

impl LocaleSlot {
    /// 現在のエントリを取り出す
    fn current(&self) -> Option<Arc<CacheEntry>> {
        self.entry.read().clone()
    }
}

/// 再読み込みで変化したキー
#[derive(Debug, Default, PartialEq, Eq)]
struct TemplateDiff {
    /// 追加されたキーの数
    added: usize,
    /// 削除されたキーの数
    removed: usize,
    /// テンプレートが変わったキーの数
    changed: usize,
    /// 削除・変更されたキーの古いテンプレート
    stale_templates: Vec<String>,
}

/// 古いマッピングと新しいマッピングの差分を取る
fn diff_templates(old: &HashMap<String, String>, new: &HashMap<String, String>) -> TemplateDiff {
    let mut diff = TemplateDiff::default();

    for (key, old_template) in old {
        match new.get(key) {
            None => {
                diff.removed += 1;
                diff.stale_templates.push(old_template.clone());
            }
            Some(template) if template != old_template => {
                diff.changed += 1;
                diff.stale_templates.push(old_template.clone());
            }
            Some(_) => {}
        }
    }
    diff.added = new.keys().filter(|key| !old.contains_key(*key)).count();

    diff
}

/// ロケールごとのテンプレートキャッシュ
pub struct LocaleTemplateCache<L> {
    /// テンプレートの読み込み元
    loader: L,
    /// 再読み込みの方針
    policy: CachePolicy,
    /// 鮮度の判定に使う時計
    clock: Arc<dyn Clock>,
    /// 変更・削除されたテンプレートのパース結果を破棄する先
    parse_cache: Option<Arc<ParseCache>>,
    /// ロケール → スロット
    slots: RwLock<HashMap<Option<Locale>, Arc<LocaleSlot>>>,
}

impl<L: TemplateLoader> LocaleTemplateCache<L> {
    #[must_use]
    pub fn new(loader: L, policy: CachePolicy) -> Self {
        Self {
            loader,
            policy,
            clock: Arc::new(SystemClock),
            parse_cache: None,
            slots: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_parse_cache(mut self, parse_cache: Arc<ParseCache>) -> Self {
        self.parse_cache = Some(parse_cache);
        self
    }

    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    #[must_use]
    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// ロケールの現在の状態
    #[must_use]
    pub fn state(&self, locale: Option<&Locale>) -> CacheState {
        let Some(entry) = self.existing_slot(locale).and_then(|slot| slot.current()) else {
            return CacheState::Unloaded;
        };
        if self.policy.is_stale(entry.checked_at, self.clock.now()) {
            CacheState::Stale
        } else {
            CacheState::Loaded
        }
    }

    /// ロケールのマージ済みテンプレートを返す
    ///
    /// 未読み込みなら読み込み、古くなっていれば再読み込みする。
    /// 同じロケールの再読み込みが重なった場合、後から来た呼び出しは
    /// 先の読み込みの完了を待ってその結果を使う。
    ///
    /// # Errors
    /// 初回の読み込みに失敗した場合。再読み込みの失敗は
    /// `serve_stale_on_error` が `false` のときだけ返す（古いエントリは残る）。
    pub fn get(&self, locale: Option<&Locale>) -> Result<Arc<MergedMapping>, ResourceError> {
        let slot = self.slot(locale);

        if let Some(entry) = slot.current()
            && !self.policy.is_stale(entry.checked_at, self.clock.now())
        {
            return Ok(Arc::clone(&entry.mapping));
        }

        let _reload = slot.reload.lock();

        // 待っている間に他の呼び出しが読み込みを終えていればそれを使う
        let previous = slot.current();
        let now = self.clock.now();
        if let Some(entry) = &previous
            && !self.policy.is_stale(entry.checked_at, now)
        {
            return Ok(Arc::clone(&entry.mapping));
        }

        self.reload(&slot, locale, previous, now)
    }

    /// 鮮度に関係なくロケールを読み込み直す
    ///
    /// 上位のキャッシュが古くなったときに、下位の内容を確実に取り直すために使う。
    ///
    /// # Errors
    /// [`LocaleTemplateCache::get`] と同じ
    pub fn refresh(&self, locale: Option<&Locale>) -> Result<Arc<MergedMapping>, ResourceError> {
        let slot = self.slot(locale);
        let _reload = slot.reload.lock();

        let previous = slot.current();
        self.reload(&slot, locale, previous, self.clock.now())
    }

    /// 読み込みを行い、失敗時は方針に従って古いエントリを返す
    ///
    /// 呼び出し側が `slot.reload` を保持していること。
    fn reload(
        &self,
        slot: &LocaleSlot,
        locale: Option<&Locale>,
        previous: Option<Arc<CacheEntry>>,
        now: Instant,
    ) -> Result<Arc<MergedMapping>, ResourceError> {
        match self.loader.load(locale) {
            Ok(loaded) => Ok(self.install(slot, locale, previous.as_deref(), loaded, now)),
            Err(error) => {
                let Some(entry) = previous else {
                    return Err(error);
                };

                *slot.entry.write() = Some(Arc::new(CacheEntry {
                    mapping: Arc::clone(&entry.mapping),
                    last_load: entry.last_load,
                    checked_at: now,
                }));

                if self.policy.serve_stale_on_error {
                    tracing::warn!(
                        locale = %locale_label(locale),
                        %error,
                        "Reload failed, serving previously loaded messages"
                    );
                    Ok(Arc::clone(&entry.mapping))
                } else {
                    Err(error)
                }
            }
        }
    }

    /// 読み込んだ内容でエントリを差し替え、変化したテンプレートのパース結果を破棄する
    fn install(
        &self,
        slot: &LocaleSlot,
        locale: Option<&Locale>,
        previous: Option<&CacheEntry>,
        loaded: LoadedTemplates,
        now: Instant,
    ) -> Arc<MergedMapping> {
        let last_load = previous.map_or(now, |entry| entry.last_load.max(now));
        let diff = previous
            .map(|entry| diff_templates(entry.mapping.entries(), &loaded.entries))
            .unwrap_or_default();

        if loaded.entries.is_empty() {
            tracing::debug!(locale = %locale_label(locale), "Not found messages for locale");
        }

        let mapping = Arc::new(MergedMapping {
            locale: locale.cloned(),
            entries: loaded.entries,
            ordinal: loaded.ordinal,
            sources: loaded.sources,
            loaded_at: last_load,
        });

        *slot.entry.write() = Some(Arc::new(CacheEntry {
            mapping: Arc::clone(&mapping),
            last_load,
            checked_at: last_load,
        }));

        if let Some(parse_cache) = &self.parse_cache {
            for template in &diff.stale_templates {
                parse_cache.evict(template);
            }
        }

        tracing::debug!(
            locale = %locale_label(locale),
            keys = mapping.len(),
            added = diff.added,
            removed = diff.removed,
            changed = diff.changed,
            reload = previous.is_some(),
            "Loaded messages"
        );

        mapping
    }

    /// 作成済みのスロットを探す
    fn existing_slot(&self, locale: Option<&Locale>) -> Option<Arc<LocaleSlot>> {
        self.slots.read().get(&locale.cloned()).cloned()
    }

    /// スロットを取得し、なければ作る
    fn slot(&self, locale: Option<&Locale>) -> Arc<LocaleSlot> {
        if let Some(slot) = self.existing_slot(locale) {
            return slot;
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(locale.cloned()).or_default())
    }
}

impl<L: fmt::Debug> fmt::Debug for LocaleTemplateCache<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleTemplateCache")
            .field("loader", &self.loader)
            .field("policy", &self.policy)
            .field("clock", &self.clock)
            .field("locales", &self.slots.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::locale::parse_locale;

    /// 差し替え可能な内容を返し、呼ばれた回数を数えるローダー
    #[derive(Debug, Default)]
    struct ScriptedLoader {
        /// `None` なら読み込みに失敗する
        entries: Mutex<Option<HashMap<String, String>>>,
        loads: AtomicUsize,
    }

    impl ScriptedLoader {
        fn with(entries: &[(&str, &str)]) -> Self {
            let loader = Self::default();
            loader.set(entries);
            loader
        }

        fn set(&self, entries: &[(&str, &str)]) {
            *self.entries.lock() =
                Some(entries.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect());
        }

        fn fail(&self) {
            *self.entries.lock() = None;
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl TemplateLoader for ScriptedLoader {
        fn load(&self, _locale: Option<&Locale>) -> Result<LoadedTemplates, ResourceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let entries = self.entries.lock().clone().ok_or_else(|| ResourceError::Locate {
                name: "scripted".to_string(),
                message: "backing store offline".to_string(),
            })?;
            Ok(LoadedTemplates { entries, ..LoadedTemplates::default() })
        }
    }

    fn cache_with(
        loader: ScriptedLoader,
        policy: CachePolicy,
    ) -> (LocaleTemplateCache<ScriptedLoader>, Arc<ManualClock>, Arc<ParseCache>) {
        let clock = Arc::new(ManualClock::new());
        let parse_cache = Arc::new(ParseCache::new());
        let cache = LocaleTemplateCache::new(loader, policy)
            .with_clock(clock.clone())
            .with_parse_cache(Arc::clone(&parse_cache));
        (cache, clock, parse_cache)
    }

    #[googletest::test]
    fn first_access_loads_and_stamps() {
        let (cache, _clock, _) =
            cache_with(ScriptedLoader::with(&[("greeting", "Hello")]), CachePolicy::never_reload());

        expect_that!(cache.state(None), eq(CacheState::Unloaded));
        let mapping = cache.get(None).unwrap();

        expect_that!(mapping.get("greeting"), some(eq("Hello")));
        expect_that!(mapping.locale(), none());
        expect_that!(cache.state(None), eq(CacheState::Loaded));
        expect_that!(cache.loader().loads(), eq(1));
    }

    #[googletest::test]
    fn zero_interval_never_reloads() {
        let (cache, clock, _) =
            cache_with(ScriptedLoader::with(&[("k", "v1")]), CachePolicy::never_reload());
        cache.get(None).unwrap();

        cache.loader().set(&[("k", "v2")]);
        clock.advance(Duration::from_secs(60 * 60 * 24 * 365));

        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v1")));
        expect_that!(cache.loader().loads(), eq(1));
        expect_that!(cache.state(None), eq(CacheState::Loaded));
    }

    #[googletest::test]
    fn reload_only_after_interval_elapses() {
        let policy = CachePolicy::reload_every(Duration::from_secs(30));
        let (cache, clock, _) = cache_with(ScriptedLoader::with(&[("k", "v1")]), policy);
        cache.get(None).unwrap();

        cache.loader().set(&[("k", "v2")]);
        clock.advance(Duration::from_secs(29));
        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v1")));
        expect_that!(cache.loader().loads(), eq(1));

        clock.advance(Duration::from_secs(1));
        expect_that!(cache.state(None), eq(CacheState::Stale));
        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v2")));
        expect_that!(cache.loader().loads(), eq(2));
    }

    #[googletest::test]
    fn refresh_reloads_a_fresh_entry() {
        let (cache, _clock, parse_cache) =
            cache_with(ScriptedLoader::with(&[("k", "v1 ${x}")]), CachePolicy::never_reload());
        cache.get(None).unwrap();
        parse_cache.get_or_parse("v1 ${x}").unwrap();

        cache.loader().set(&[("k", "v2 ${x}")]);
        let mapping = cache.refresh(None).unwrap();

        expect_that!(mapping.get("k"), some(eq("v2 ${x}")));
        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v2 ${x}")));
        expect_that!(cache.loader().loads(), eq(2));
        expect_that!(parse_cache.contains("v1 ${x}"), eq(false));
    }

    #[googletest::test]
    fn failed_refresh_serves_previous_mapping() {
        let (cache, _clock, _) =
            cache_with(ScriptedLoader::with(&[("k", "v1")]), CachePolicy::never_reload());
        cache.get(None).unwrap();

        cache.loader().fail();

        expect_that!(cache.refresh(None).unwrap().get("k"), some(eq("v1")));
        expect_that!(cache.loader().loads(), eq(2));
    }

    #[googletest::test]
    fn last_load_never_goes_backwards() {
        let policy = CachePolicy::reload_every(Duration::from_secs(1));
        let (cache, clock, _) = cache_with(ScriptedLoader::with(&[("k", "v")]), policy);

        let first = cache.get(None).unwrap().loaded_at();
        clock.advance(Duration::from_secs(5));
        let second = cache.get(None).unwrap().loaded_at();

        expect_that!(second > first, eq(true));
    }

    #[googletest::test]
    fn diff_update_evicts_removed_and_changed_templates() {
        let policy = CachePolicy::reload_every(Duration::from_secs(10));
        let (cache, clock, parse_cache) = cache_with(
            ScriptedLoader::with(&[("k", "bye ${x}"), ("m", "old ${x}"), ("n", "same ${x}")]),
            policy,
        );
        cache.get(None).unwrap();
        for template in ["bye ${x}", "old ${x}", "same ${x}"] {
            parse_cache.get_or_parse(template).unwrap();
        }

        cache.loader().set(&[("m", "new ${x}"), ("n", "same ${x}")]);
        clock.advance(Duration::from_secs(10));
        let mapping = cache.get(None).unwrap();

        expect_that!(mapping.get("k"), none());
        expect_that!(mapping.get("m"), some(eq("new ${x}")));
        expect_that!(mapping.get("n"), some(eq("same ${x}")));
        expect_that!(parse_cache.contains("bye ${x}"), eq(false));
        expect_that!(parse_cache.contains("old ${x}"), eq(false));
        expect_that!(parse_cache.contains("same ${x}"), eq(true));
    }

    #[googletest::test]
    fn failed_reload_serves_stale_and_waits_for_next_interval() {
        let policy = CachePolicy::reload_every(Duration::from_secs(10));
        let (cache, clock, _) = cache_with(ScriptedLoader::with(&[("k", "v1")]), policy);
        cache.get(None).unwrap();

        cache.loader().fail();
        clock.advance(Duration::from_secs(10));
        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v1")));
        expect_that!(cache.loader().loads(), eq(2));

        // 失敗した試行も間隔の起点になる
        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v1")));
        expect_that!(cache.loader().loads(), eq(2));

        cache.loader().set(&[("k", "v2")]);
        clock.advance(Duration::from_secs(10));
        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v2")));
    }

    #[googletest::test]
    fn failed_reload_surfaces_error_when_stale_serving_disabled() {
        let policy = CachePolicy {
            reload_interval: Duration::from_secs(10),
            serve_stale_on_error: false,
        };
        let (cache, clock, _) = cache_with(ScriptedLoader::with(&[("k", "v1")]), policy);
        cache.get(None).unwrap();

        cache.loader().fail();
        clock.advance(Duration::from_secs(10));

        expect_that!(cache.get(None).is_err(), eq(true));
        // 古いエントリは有効なまま残る
        expect_that!(cache.get(None).unwrap().get("k"), some(eq("v1")));
    }

    #[googletest::test]
    fn failed_first_load_is_an_error() {
        let loader = ScriptedLoader::default();
        loader.fail();
        let (cache, _, _) = cache_with(loader, CachePolicy::never_reload());

        let result = cache.get(None);

        expect_that!(matches!(result, Err(ResourceError::Locate { .. })), eq(true));
        expect_that!(cache.state(None), eq(CacheState::Unloaded));
    }

    #[rstest]
    fn locales_are_cached_independently() {
        let (cache, _, _) =
            cache_with(ScriptedLoader::with(&[("k", "v")]), CachePolicy::never_reload());
        let pt_br = parse_locale("pt-BR").unwrap();

        cache.get(None).unwrap();
        cache.get(Some(&pt_br)).unwrap();
        cache.get(Some(&pt_br)).unwrap();

        assert_eq!(cache.loader().loads(), 2);
        assert_eq!(cache.get(Some(&pt_br)).unwrap().locale(), Some(&pt_br));
    }

    #[googletest::test]
    fn concurrent_first_access_loads_once() {
        let (cache, _, _) =
            cache_with(ScriptedLoader::with(&[("k", "v")]), CachePolicy::never_reload());
        let barrier = Barrier::new(16);

        std::thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    barrier.wait();
                    assert_eq!(cache.get(None).unwrap().get("k"), Some("v"));
                });
            }
        });

        expect_that!(cache.loader().loads(), eq(1));
    }

    #[rstest]
    fn diff_counts_changes() {
        let old = HashMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
        ]);
        let new = HashMap::from([
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "30".to_string()),
            ("d".to_string(), "4".to_string()),
        ]);

        let mut diff = diff_templates(&old, &new);
        diff.stale_templates.sort();

        assert_eq!(
            diff,
            TemplateDiff {
                added: 1,
                removed: 1,
                changed: 1,
                stale_templates: vec!["1".to_string(), "3".to_string()],
            }
        );
    }
}
