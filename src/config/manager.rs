//! 設定管理を行うモジュール

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    ResolverSettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".i18n-messages.json";

/// 検証済みの設定と、相対パスの基準になるディレクトリを保持する
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: ResolverSettings,

    /// 設定ファイルのあるディレクトリ
    config_dir: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: ResolverSettings::default(), config_dir: None }
    }

    /// 設定を読み込む
    ///
    /// 設定ファイルがなければデフォルト値を使う。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, config_dir: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings from: {:?}", config_dir);

        let settings = match &config_dir {
            Some(dir) => read_settings_file(dir)?.unwrap_or_default(),
            None => ResolverSettings::default(),
        };

        self.update_settings(settings)?;
        self.config_dir = config_dir;

        Ok(())
    }

    /// 設定を検証してから差し替える
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn update_settings(&mut self, new_settings: ResolverSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &ResolverSettings {
        &self.current_settings
    }

    /// 設定ファイルのディレクトリを取得
    #[must_use]
    pub const fn config_dir(&self) -> Option<&PathBuf> {
        self.config_dir.as_ref()
    }
}

/// `dir` の設定ファイルを読む。ファイルがなければ `None`
fn read_settings_file(dir: &Path) -> Result<Option<ResolverSettings>, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(None);
        }
        Err(error) => return Err(error.into()),
    };

    let settings = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), ?settings, "Loaded configuration file");
    Ok(Some(settings))
}
