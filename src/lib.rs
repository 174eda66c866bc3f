//! i18n-message-resolver
//!
//! 複数のメッセージソースからロケール別のテンプレートを集め、優先度でマージし、
//! キャッシュした上で `${...}` 式を展開して最終的なメッセージを返す。

pub mod aggregator;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod locale;
pub mod locator;
pub mod merge;
pub mod resolver;
pub mod source;

#[cfg(test)]
mod test_utils;

pub use error::MessageError;
pub use resolver::MessageResolver;
