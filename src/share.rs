use crate::api::ai::AiClient;
use crate::api::github::GitHubClient;
use crate::api::linkedin::LinkedInClient;
use crate::error::{AppError, AppResult};
use crate::models::{Credentials, GeneratedPost, PublishedPost, Repository, Visibility};
use crate::session::ShareSession;
use crate::text;
use std::path::PathBuf;
use tracing::{info, warn};

const MAX_HASHTAGS: usize = 10;

/// Параметры настраиваемой публикации.
pub struct ShareOptions {
    pub repo_name: String,
    /// Свой текст поста вместо AI генерации
    pub text: Option<String>,
    /// Имена найденных в репозитории изображений для прикрепления;
    /// пустой список при quick share означает "все предложенные"
    pub media: Vec<String>,
    /// Локальные файлы пользователя (изображения или видео)
    pub local_files: Vec<PathBuf>,
    pub visibility: Visibility,
    /// Пропустить AI и собрать пост из метаданных репозитория
    pub skip_ai: bool,
}

/// Быстрая публикация: репозиторий, AI черновик, все предложенные
/// изображения, публичная видимость. Один вызов без настройки.
pub async fn run_quick_share(
    credentials: &Credentials,
    repo_name: &str,
    visibility: Visibility,
    ai_model: &str,
) -> AppResult<PublishedPost> {
    let options = ShareOptions {
        repo_name: repo_name.to_string(),
        text: None,
        media: Vec::new(),
        local_files: Vec::new(),
        visibility,
        skip_ai: false,
    };
    run_custom_share(credentials, options, ai_model).await
}

/// Полный цикл публикации: загрузка репозитория, составление текста,
/// последовательная выгрузка медиа в LinkedIn и публикация UGC поста.
/// Сбой загрузки отдельного изображения логируется и поглощается, пост
/// выходит с теми ассетами, что загрузились.
pub async fn run_custom_share(
    credentials: &Credentials,
    options: ShareOptions,
    ai_model: &str,
) -> AppResult<PublishedPost> {
    let github = GitHubClient::new(credentials.github.access_token.clone());
    let repo = find_repository(&github, &credentials.github.username, &options.repo_name).await?;

    // Текст поста: свой > AI черновик > сборка из метаданных
    let draft = if let Some(custom_text) = &options.text {
        GeneratedPost {
            content: text::clean_linkedin_text(custom_text),
            hashtags: Vec::new(),
            suggested_media: repo.media.images.clone(),
        }
    } else if options.skip_ai {
        metadata_post(&repo)
    } else {
        let ai = AiClient::new(credentials.ai.api_key.clone(), ai_model)?;
        ai.generate_post(&repo, true).await?
    };

    let hashtags = merge_hashtags(draft.hashtags.clone(), text::generate_hashtags(&repo));
    let post_text = compose_post_text(&draft.content, &hashtags);

    let linkedin = LinkedInClient::new(credentials.linkedin.access_token.clone())?;
    let session = ShareSession::new();
    let author_urn = session.author_urn(&linkedin).await?;

    // Изображения репозитория: либо выбранные по имени, либо все предложенные
    let selected: Vec<_> = if options.media.is_empty() {
        draft.suggested_media.iter().collect()
    } else {
        draft
            .suggested_media
            .iter()
            .filter(|image| options.media.iter().any(|name| name == &image.name))
            .collect()
    };

    for image in selected {
        match linkedin
            .upload_from_url(&image.download_url, &image.name, &author_urn)
            .await
        {
            Ok(asset) => session.record_upload(asset).await,
            Err(e) => warn!("Skipping image {}: {}", image.name, e),
        }
    }

    // Локальные файлы не поглощают ошибки: пользователь указал их явно
    for path in &options.local_files {
        let asset = linkedin.upload_from_local_file(path, &author_urn).await?;
        session.record_upload(asset).await;
    }

    let assets = session.uploaded_assets().await;
    info!(
        "Publishing {} with {} media assets",
        repo.full_name,
        assets.len()
    );

    let published = linkedin
        .publish(&author_urn, &post_text, &assets, options.visibility)
        .await?;
    Ok(published)
}

/// Только генерация черновика без публикации (команда `generate`).
pub async fn run_generate(
    credentials: &Credentials,
    repo_name: &str,
    detailed: bool,
    ai_model: &str,
) -> AppResult<GeneratedPost> {
    let github = GitHubClient::new(credentials.github.access_token.clone());
    let repo = find_repository(&github, &credentials.github.username, repo_name).await?;

    let ai = AiClient::new(credentials.ai.api_key.clone(), ai_model)?;
    let mut draft = ai.generate_post(&repo, !detailed).await?;
    draft.hashtags = merge_hashtags(draft.hashtags, text::generate_hashtags(&repo));
    Ok(draft)
}

async fn find_repository(
    github: &GitHubClient,
    username: &str,
    repo_name: &str,
) -> AppResult<Repository> {
    let repos = github.list_repositories(username).await?;
    repos
        .into_iter()
        .find(|repo| repo.name.eq_ignore_ascii_case(repo_name))
        .ok_or_else(|| {
            AppError::Custom(format!(
                "Repository '{}' not found among repositories of {}",
                repo_name, username
            ))
        })
}

/// Пост без AI: описание, ссылка и резервные хештеги из метаданных.
fn metadata_post(repo: &Repository) -> GeneratedPost {
    let description = repo
        .description
        .as_deref()
        .unwrap_or("An open source project worth checking out");
    let content = format!(
        "🚀 {}\n\n{}\n\nCheck it out on GitHub: {}",
        repo.name, description, repo.html_url
    );

    GeneratedPost {
        content,
        hashtags: text::generate_hashtags(repo),
        suggested_media: repo.media.images.clone(),
    }
}

/// Слияние хештегов: сначала основной набор, затем резервный,
/// дедупликация без учёта регистра, общий лимит 10.
fn merge_hashtags(primary: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result: Vec<String> = Vec::new();

    for tag in primary.into_iter().chain(fallback) {
        let key = tag.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            result.push(tag);
        }
        if result.len() == MAX_HASHTAGS {
            break;
        }
    }
    result
}

/// Итоговый текст: контент с Unicode форматированием, пустая строка,
/// хештеги в одну строку. Без хештегов - только контент.
fn compose_post_text(content: &str, hashtags: &[String]) -> String {
    let formatted = text::format_linkedin_text(content);
    if hashtags.is_empty() {
        formatted
    } else {
        format!("{}\n\n{}", formatted, hashtags.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_hashtags_prefer_primary_and_dedup_case_insensitively() {
        let primary = vec!["#Rust".to_string(), "#cli".to_string()];
        let fallback = vec!["#rust".to_string(), "#opensource".to_string()];

        let merged = merge_hashtags(primary, fallback);

        assert_eq!(merged, vec!["#Rust", "#cli", "#opensource"]);
    }

    #[test]
    fn merged_hashtags_are_capped_at_ten() {
        let primary: Vec<String> = (0..8).map(|i| format!("#a{}", i)).collect();
        let fallback: Vec<String> = (0..8).map(|i| format!("#b{}", i)).collect();

        let merged = merge_hashtags(primary, fallback);

        assert_eq!(merged.len(), 10);
        assert_eq!(merged[0], "#a0");
        assert_eq!(merged[9], "#b1");
    }

    #[test]
    fn post_text_appends_hashtags_after_blank_line() {
        let text = compose_post_text("Great tool", &["#rust".to_string(), "#cli".to_string()]);
        assert_eq!(text, "Great tool\n\n#rust #cli");
    }

    #[test]
    fn post_text_without_hashtags_has_no_trailing_whitespace() {
        assert_eq!(compose_post_text("Just text", &[]), "Just text");
    }
}
