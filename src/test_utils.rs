//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]

use std::collections::BTreeMap;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use parking_lot::RwLock;

use crate::locale::{
    Locale,
    file_fragment,
    split_file_locale,
};
use crate::locator::{
    ResourceError,
    ResourceLocator,
    SourceId,
};

/// メモリ上のファイルを返すロケーター
///
/// パスは `/` 区切りで、拡張子を除いたパスが次のどちらかなら見つかる。
/// - `name` または `name_<locale>` と一致するか、`/` の後に続いて終わる
/// - `name/` の直下にあり、ファイル名のロケールが要求されたロケールと一致する
///
/// 返す順序はパスの辞書順。`locate` と `read` の呼び出し回数を数える。
#[derive(Debug, Default)]
pub(crate) struct MemoryLocator {
    /// パス → 内容
    files: RwLock<BTreeMap<String, String>>,
    /// `locate` の呼び出し回数
    locates: AtomicUsize,
    /// `read` の呼び出し回数
    reads: AtomicUsize,
}

impl MemoryLocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// ファイルを追加または上書きする
    pub(crate) fn insert(&self, path: &str, text: &str) {
        self.files.write().insert(path.to_string(), text.to_string());
    }

    /// ファイルを削除する
    pub(crate) fn remove(&self, path: &str) {
        self.files.write().remove(path);
    }

    pub(crate) fn locate_count(&self) -> usize {
        self.locates.load(Ordering::SeqCst)
    }

    pub(crate) fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

/// `name` と `name_<locale>` のどちらかに一致するか
fn matches_bundle(stem: &str, name: &str, locale: Option<&Locale>) -> bool {
    let expected = locale.map_or_else(
        || name.to_string(),
        |locale| format!("{name}_{}", file_fragment(locale)),
    );
    stem == expected || stem.ends_with(&format!("/{expected}"))
}

/// `name/` の直下にあり、ロケールが一致するか
fn matches_directory(path: &str, name: &str, locale: Option<&Locale>) -> bool {
    let Some((dir, file)) = path.rsplit_once('/') else {
        return false;
    };
    let extension = file.rfind('.').map_or("", |index| file.split_at(index).1);
    dir == name && split_file_locale(file, extension).1.as_ref() == locale
}

impl ResourceLocator for MemoryLocator {
    fn locate(&self, name: &str, locale: Option<&Locale>) -> Result<Vec<SourceId>, ResourceError> {
        self.locates.fetch_add(1, Ordering::SeqCst);

        let files = self.files.read();
        Ok(files
            .keys()
            .filter(|path| {
                let stem = path.rfind('.').map_or(path.as_str(), |index| path.split_at(index).0);
                matches_bundle(stem, name, locale) || matches_directory(path, name, locale)
            })
            .map(SourceId::new)
            .collect())
    }

    fn read(&self, source: &SourceId) -> Result<String, ResourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        self.files.read().get(source.as_str()).cloned().ok_or_else(|| ResourceError::Io {
            source_id: source.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}
