use crate::api::ai::DEFAULT_AI_MODEL;
use crate::error::{AppError, AppResult};
use crate::models::Visibility;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Публикация GitHub проектов в LinkedIn из командной строки.
#[derive(Debug, Parser)]
#[command(name = "gloss", version, about)]
pub struct Config {
    /// Каталог зашифрованного хранилища учётных данных
    #[arg(long, env = "GLOSS_STORAGE_DIR", default_value = ".gloss")]
    pub storage_dir: PathBuf,

    /// Модель chat completion для генерации постов
    #[arg(long, env = "GLOSS_AI_MODEL", default_value = DEFAULT_AI_MODEL)]
    pub ai_model: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Сохранить учётные данные GitHub, LinkedIn и AI сервиса
    Login {
        #[arg(long, env = "GLOSS_GITHUB_USERNAME")]
        github_username: String,

        /// Personal access token GitHub (достаточно scope repo:read)
        #[arg(long, env = "GLOSS_GITHUB_TOKEN")]
        github_token: String,

        /// Токен LinkedIn со scope w_member_social и r_liteprofile
        #[arg(long, env = "GLOSS_LINKEDIN_TOKEN")]
        linkedin_token: String,

        /// API ключ OpenRouter
        #[arg(long, env = "GLOSS_AI_KEY")]
        ai_key: String,
    },

    /// Удалить сохранённые учётные данные
    Logout,

    /// Показать репозитории пользователя с найденными медиа
    Repos,

    /// Диагностическое сканирование медиа репозитория
    Scan {
        /// Имя репозитория (или owner/name для чужого репозитория)
        repo: String,
    },

    /// Сгенерировать черновик поста без публикации
    Generate {
        repo: String,

        /// Детальный промпт вместо быстрого
        #[arg(long)]
        detailed: bool,
    },

    /// Опубликовать пост о репозитории в LinkedIn
    Share {
        repo: String,

        /// Свой текст поста вместо AI генерации
        #[arg(long)]
        text: Option<String>,

        /// Имена изображений репозитория для прикрепления (по умолчанию все)
        #[arg(long = "media")]
        media: Vec<String>,

        /// Локальные файлы для загрузки (изображения или видео)
        #[arg(long = "file")]
        local_files: Vec<PathBuf>,

        #[arg(long, value_enum, default_value = "public")]
        visibility: Visibility,

        /// Собрать пост из метаданных репозитория, без AI
        #[arg(long)]
        skip_ai: bool,
    },
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(AppError::Config("storage directory cannot be empty".to_string()));
        }
        if self.ai_model.trim().is_empty() {
            return Err(AppError::Config("AI model cannot be empty".to_string()));
        }

        if let Command::Share {
            text, local_files, ..
        } = &self.command
        {
            if text.as_deref().is_some_and(|t| t.trim().is_empty()) {
                return Err(AppError::Config("custom post text cannot be empty".to_string()));
            }
            for path in local_files {
                if path.as_os_str().is_empty() {
                    return Err(AppError::Config("local file path cannot be empty".to_string()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_command_parses_with_defaults() {
        let config = Config::parse_from(["gloss", "share", "my-repo"]);
        config.validate().unwrap();

        match config.command {
            Command::Share {
                repo,
                text,
                media,
                local_files,
                visibility,
                skip_ai,
            } => {
                assert_eq!(repo, "my-repo");
                assert!(text.is_none());
                assert!(media.is_empty());
                assert!(local_files.is_empty());
                assert_eq!(visibility, Visibility::Public);
                assert!(!skip_ai);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn share_accepts_repeated_media_and_file_flags() {
        let config = Config::parse_from([
            "gloss",
            "share",
            "my-repo",
            "--media",
            "a.png",
            "--media",
            "b.png",
            "--file",
            "/tmp/demo.mp4",
            "--visibility",
            "connections",
        ]);

        match config.command {
            Command::Share {
                media,
                local_files,
                visibility,
                ..
            } => {
                assert_eq!(media, vec!["a.png", "b.png"]);
                assert_eq!(local_files, vec![PathBuf::from("/tmp/demo.mp4")]);
                assert_eq!(visibility, Visibility::Connections);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn empty_custom_text_fails_validation() {
        let config = Config::parse_from(["gloss", "share", "my-repo", "--text", "  "]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn login_parses_all_four_credentials() {
        let config = Config::parse_from([
            "gloss",
            "login",
            "--github-username",
            "octocat",
            "--github-token",
            "ghp_x",
            "--linkedin-token",
            "li_x",
            "--ai-key",
            "sk-or-x",
        ]);
        config.validate().unwrap();

        assert!(matches!(config.command, Command::Login { .. }));
    }
}
