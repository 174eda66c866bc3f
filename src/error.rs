//! メッセージ解決のエラー

use thiserror::Error;

use crate::config::ConfigError;
use crate::interpolate::InterpolationError;
use crate::locator::ResourceError;

/// メッセージ解決の失敗
#[derive(Error, Debug)]
pub enum MessageError {
    /// バッキングソースの読み込みに失敗した
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// フォールバックチェーンのどのロケールにもキーがない
    #[error("No message found for key '{key}' in locales [{}]", .locales.join(", "))]
    MissingKey { key: String, locales: Vec<String> },

    /// テンプレートの展開に失敗した
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// 設定が不正
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn missing_key_lists_searched_locales() {
        let error = MessageError::MissingKey {
            key: "welcome".to_string(),
            locales: vec!["pt-BR".to_string(), "pt".to_string(), "default".to_string()],
        };

        assert_eq!(
            error.to_string(),
            "No message found for key 'welcome' in locales [pt-BR, pt, default]"
        );
    }
}
