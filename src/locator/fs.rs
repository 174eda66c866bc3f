//! ファイルシステム上のメッセージリソースを扱う `ResourceLocator` 実装

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use super::{
    ResourceError,
    ResourceLocator,
    SourceId,
};
use crate::locale::{
    Locale,
    file_fragment,
    split_file_locale,
};

/// ロケール付きのファイル名を作る
///
/// - `("messages", None, ".properties")` → `messages.properties`
/// - `("messages", pt-BR, ".properties")` → `messages_pt_BR.properties`
#[must_use]
pub fn localized_file_name(base_name: &str, locale: Option<&Locale>, suffix: &str) -> String {
    locale.map_or_else(
        || format!("{base_name}{suffix}"),
        |locale| format!("{base_name}_{}{suffix}", file_fragment(locale)),
    )
}

/// ソースを UTF-8 テキストとして読む
fn read_source(source: &SourceId) -> Result<String, ResourceError> {
    tracing::debug!(source = %source, "Loading messages from file");
    std::fs::read_to_string(source.as_str())
        .map_err(|e| ResourceError::Io { source_id: source.clone(), source: e })
}

/// パスからソース識別子を作る
fn source_id(path: &Path) -> SourceId {
    SourceId::new(path.to_string_lossy())
}

/// ベース名 + ロケール + サフィックスでファイルを探す
///
/// 複数のルートを設定順に探し、見つかったものをすべて返す。
/// 同じ名前のファイルが複数ルートにある場合、発見順はルートの順序になる。
#[derive(Debug, Clone)]
pub struct FsLocator {
    /// 探索するルートディレクトリ
    roots: Vec<PathBuf>,
    /// ファイル名のサフィックス（例: `.properties`）
    suffix: String,
}

impl FsLocator {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, suffix: impl Into<String>) -> Self {
        Self { roots, suffix: suffix.into() }
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ResourceLocator for FsLocator {
    fn locate(&self, name: &str, locale: Option<&Locale>) -> Result<Vec<SourceId>, ResourceError> {
        let file_name = localized_file_name(name, locale, &self.suffix);

        Ok(self
            .roots
            .iter()
            .map(|root| root.join(&file_name))
            .filter(|path| path.is_file())
            .map(|path| source_id(&path))
            .collect())
    }

    fn read(&self, source: &SourceId) -> Result<String, ResourceError> {
        read_source(source)
    }
}

/// ディレクトリを走査し、ファイル名に埋め込まれたロケールで絞り込む
///
/// `locate` の `name` は走査するディレクトリのパス。
/// 1 ファイル = 1 テンプレートのソースで使う。
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    /// テンプレートファイルのサフィックス（空なら全ファイル）
    suffix: String,
}

impl DirectoryLocator {
    #[must_use]
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl ResourceLocator for DirectoryLocator {
    fn locate(&self, name: &str, locale: Option<&Locale>) -> Result<Vec<SourceId>, ResourceError> {
        let directory = Path::new(name);
        if !directory.is_dir() {
            tracing::debug!(directory = %directory.display(), "Template directory not found");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for result in WalkBuilder::new(directory)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
        {
            let entry = result.map_err(|e| ResourceError::Locate {
                name: name.to_string(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                tracing::debug!(path = ?entry.path(), "Skipping non UTF-8 file name");
                continue;
            };
            if !file_name.ends_with(&self.suffix) {
                continue;
            }

            let (_, file_locale) = split_file_locale(file_name, &self.suffix);
            if file_locale.as_ref() == locale {
                found.push(source_id(entry.path()));
            }
        }

        Ok(found)
    }

    fn read(&self, source: &SourceId) -> Result<String, ResourceError> {
        read_source(source)
    }
}
