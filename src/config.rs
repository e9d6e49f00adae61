// config.rs — viewer settings from photosphere.json + command line
//
// Precedence (later wins):
// - built-in defaults
// - config file (--config <path>, else ./photosphere.json if present)
// - env PHOTOSPHERE_LANG
// - CLI: --image <path>, --lang <code>

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ViewerError};

pub const DEFAULT_CONFIG_FILE: &str = "photosphere.json";
pub const DEFAULT_IMAGE: &str = "assets/square_small.jpeg";
pub const LANG_ENV: &str = "PHOTOSPHERE_LANG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub image: PathBuf,
    pub lang: String,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::from(DEFAULT_IMAGE),
            lang: "en".to_string(),
            window_width: 1280,
            window_height: 720,
            vsync: true,
        }
    }
}

/// `--flag value` pairs pulled out of argv.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub image: Option<PathBuf>,
    pub lang: Option<String>,
}

impl CliArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut out = CliArgs::default();
        let mut it = args.into_iter();
        while let Some(a) = it.next() {
            match a.as_str() {
                "--config" => out.config = it.next().map(PathBuf::from),
                "--image" => out.image = it.next().map(PathBuf::from),
                "--lang" => out.lang = it.next(),
                _ => {}
            }
        }
        out
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ViewerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the effective config. An explicit `--config` must load; the default file is optional.
    pub fn resolve(cli: &CliArgs, env_lang: Option<String>) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(lang) = env_lang.filter(|v| !v.trim().is_empty()) {
            config.lang = lang;
        }
        if let Some(lang) = &cli.lang {
            config.lang = lang.clone();
        }
        if let Some(image) = &cli.image {
            config.image = image.clone();
        }
        Ok(config)
    }

    pub fn load() -> Result<Self> {
        let cli = CliArgs::parse(std::env::args().skip(1));
        Self::resolve(&cli, std::env::var(LANG_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags() {
        let cli = CliArgs::parse(args(&["--image", "pano.jpg", "--lang", "fr", "--bogus"]));
        assert_eq!(cli.image, Some(PathBuf::from("pano.jpg")));
        assert_eq!(cli.lang.as_deref(), Some("fr"));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_flag_without_value_is_ignored() {
        let cli = CliArgs::parse(args(&["--lang"]));
        assert_eq!(cli.lang, None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ViewerConfig = serde_json::from_str(r#"{ "window_width": 640 }"#).unwrap();
        assert_eq!(config.window_width, 640);
        assert_eq!(config.window_height, 720);
        assert_eq!(config.image, PathBuf::from(DEFAULT_IMAGE));
    }

    #[test]
    fn test_cli_overrides_file_and_env() {
        let path = std::env::temp_dir().join(format!("photosphere-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "lang": "ja", "image": "from_file.png", "vsync": false }"#)
            .unwrap();

        let cli = CliArgs {
            config: Some(path.clone()),
            image: Some(PathBuf::from("cli.png")),
            lang: None,
        };
        let config = ViewerConfig::resolve(&cli, Some("ko".to_string())).unwrap();
        assert_eq!(config.image, PathBuf::from("cli.png"));
        assert_eq!(config.lang, "ko");
        assert!(!config.vsync);

        let cli = CliArgs {
            lang: Some("ru".to_string()),
            ..cli
        };
        let config = ViewerConfig::resolve(&cli, Some("ko".to_string())).unwrap();
        assert_eq!(config.lang, "ru");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let cli = CliArgs {
            config: Some(PathBuf::from("/nonexistent/photosphere.json")),
            ..Default::default()
        };
        assert!(matches!(
            ViewerConfig::resolve(&cli, None),
            Err(ViewerError::Io { .. })
        ));
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let path = std::env::temp_dir().join(format!("photosphere-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = ViewerConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ViewerError::Config { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
