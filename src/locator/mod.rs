//! メッセージのバッキングストレージを探して読み込む外部コラボレーター
//!
//! コアはこのトレイト越しにしかストレージに触れない。
//! ファイルシステム向けの実装は [`fs`] にある。

mod fs;

use std::fmt;

use thiserror::Error;

pub use fs::{
    DirectoryLocator,
    FsLocator,
    localized_file_name,
};

use crate::locale::Locale;

/// バッキングソースの識別子（ファイルパスや URI など）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(String);

impl SourceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 識別子の最後のパス要素
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// バッキングソースの探索・読み込み・解析に関するエラー
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Failed to read message source '{source_id}': {source}")]
    Io {
        source_id: SourceId,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to locate resources for '{name}': {message}")]
    Locate { name: String, message: String },

    #[error("Failed to parse message source '{source_id}': {message}")]
    Parse { source_id: SourceId, message: String },

    #[error("Invalid message ordinal '{value}' in '{source_id}'")]
    InvalidOrdinal { source_id: SourceId, value: String },
}

/// 論理リソース名とロケールからソースを探し、その内容を読む
///
/// `locate` はある時点で同じ名前・ロケールに対して決定的な結果を返すこと。
/// 返す順序がバンドルの発見順になり、同じ優先度同士のタイブレークに使われる。
pub trait ResourceLocator: Send + Sync + fmt::Debug {
    /// # Errors
    /// ストレージの列挙に失敗した場合
    fn locate(&self, name: &str, locale: Option<&Locale>) -> Result<Vec<SourceId>, ResourceError>;

    /// # Errors
    /// ソースが読めない場合は [`ResourceError::Io`]
    fn read(&self, source: &SourceId) -> Result<String, ResourceError>;
}
