use super::RetryPolicy;
use crate::error::AiError;
use crate::models::{GeneratedPost, Repository};
use fancy_regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_AI_API_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_AI_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";

const TIMEOUT_SECS: u64 = 30;
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

/// Заголовки атрибуции OpenRouter
const REFERER: &str = "https://github.com/gloss-app/gloss";
const APP_TITLE: &str = "GLOSS - GitHub LinkedIn Open Source Sharing";

const SYSTEM_PROMPT: &str = "You are a professional LinkedIn content creator. \
Generate engaging posts about GitHub projects that highlight key features, \
technical stack, and value proposition. Keep posts under 1300 characters and \
include relevant hashtags.";

pub struct AiClient {
    http_client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl AiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }
        if !api_key.starts_with("sk-") {
            warn!("API key does not start with sk-, check your OpenRouter key");
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(super::USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(AiClient {
            http_client,
            api_key,
            model: model.into(),
            base_url: DEFAULT_AI_API_URL.to_string(),
            retry_policy: RetryPolicy::rate_limit_backoff(),
        })
    }

    /// Генерирует черновик поста. Повторы только на 429 (2s, 4s выдержки),
    /// 401/403 и прочие ошибки - немедленный отказ без повтора.
    pub async fn generate_post(
        &self,
        repo: &Repository,
        quick_share: bool,
    ) -> Result<GeneratedPost, AiError> {
        let prompt = build_prompt(repo, quick_share);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                "Starting AI completion call (attempt {}/{})",
                attempt, self.retry_policy.max_attempts
            );

            match self.request_completion(&prompt).await {
                Ok(raw) => {
                    let hashtags = extract_hashtags(&raw);
                    let content = strip_hashtags(&raw);

                    info!("AI completion successful on attempt {}", attempt);
                    return Ok(GeneratedPost {
                        content,
                        hashtags,
                        // Все найденные изображения, без ограничения количества
                        suggested_media: repo.media.images.clone(),
                    });
                }
                Err(e) => {
                    let retryable = error_status(&e)
                        .is_some_and(|status| self.retry_policy.is_retryable(status));
                    if !retryable || !self.retry_policy.has_attempts_left(attempt) {
                        return Err(e);
                    }

                    let wait = self.retry_policy.backoff(attempt);
                    warn!(
                        "Rate limit hit, waiting {}s before retry...",
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    async fn request_completion(&self, prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(classify_status(status.as_u16(), message));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AiError::InvalidResponse("no choices in completion".to_string()));
        }

        Ok(content)
    }
}

/// Единственная точка классификации ответов AI сервиса.
fn classify_status(status: u16, message: String) -> AiError {
    match status {
        401 => AiError::AuthExpired,
        403 => AiError::AuthForbidden,
        429 => AiError::RateLimited,
        _ => AiError::Unknown { status, message },
    }
}

/// HTTP статус, породивший ошибку; сетевые ошибки и таймауты статуса не
/// имеют и повтору не подлежат.
fn error_status(error: &AiError) -> Option<u16> {
    match error {
        AiError::AuthExpired => Some(401),
        AiError::AuthForbidden => Some(403),
        AiError::RateLimited => Some(429),
        AiError::Unknown { status, .. } => Some(*status),
        _ => None,
    }
}

/// Промпт из метаданных репозитория. Быстрый вариант короче, детальный
/// добавляет наличие README и дату последнего обновления. Оба требуют
/// markdown **bold**/*italic*, который перед публикацией преобразуется
/// в Unicode форматирование LinkedIn.
fn build_prompt(repo: &Repository, quick_share: bool) -> String {
    let stats = format!(
        "⭐ {} stars, 🍴 {} forks",
        repo.stargazers_count, repo.forks_count
    );
    let tech = repo
        .language
        .as_deref()
        .map(|language| format!("Built with {}", language))
        .unwrap_or_default();
    let topics = if repo.topics.is_empty() {
        String::new()
    } else {
        format!("Topics: {}", repo.topics.join(", "))
    };
    let description = repo
        .description
        .as_deref()
        .unwrap_or("No description provided");
    let homepage = repo.homepage.as_deref().unwrap_or("None");

    if quick_share {
        format!(
            "Generate a professional LinkedIn post for this GitHub project:\n\n\
Project: {}\n\
Description: {}\n\
GitHub URL: {}\n\
{}\n{}\n{}\n\
Homepage: {}\n\n\
Create an engaging post that highlights the project's value and technical aspects. \
Include the GitHub URL in the post and relevant hashtags.\n\n\
IMPORTANT FORMATTING GUIDELINES:\n\
- Use **bold text** for important project features (will be converted to LinkedIn bold formatting)\n\
- Use *italic text* for emphasis (will be converted to LinkedIn italic formatting)\n\
- Structure content with clear sections using emojis as separators\n\
- Keep it professional and engaging for developer audience\n\
- Include clickable GitHub URL prominently\n\
- Make the post visually appealing with proper formatting",
            repo.name, description, repo.html_url, stats, tech, topics, homepage
        )
    } else {
        let readme_available = if repo.readme.is_some() { "Yes" } else { "No" };
        format!(
            "Generate a detailed LinkedIn post for this GitHub project that I can customize:\n\n\
Project: {}\n\
Description: {}\n\
GitHub URL: {}\n\
{}\n{}\n{}\n\
README available: {}\n\
Recent activity: Last updated {}\n\n\
Create a comprehensive post that showcases the project's features, technical \
implementation, and potential impact. Make sure to include the GitHub URL so people \
can check out the project. Make it engaging and professional.\n\n\
IMPORTANT FORMATTING GUIDELINES:\n\
- Use **bold text** for key features and important points (will be converted to LinkedIn bold formatting)\n\
- Use *italic text* for emphasis and technical terms (will be converted to LinkedIn italic formatting)\n\
- Structure content with clear sections using emojis as visual separators\n\
- Keep it professional yet engaging for developer audience\n\
- Include clickable GitHub URL prominently in the post\n\
- Make the content visually appealing with proper LinkedIn formatting",
            repo.name,
            description,
            repo.html_url,
            stats,
            tech,
            topics,
            readme_available,
            repo.updated_at.format("%Y-%m-%d")
        )
    }
}

fn hashtag_regex() -> Regex {
    Regex::new(r"#\w+").expect("static hashtag pattern")
}

/// Все #word токены ответа, в нижнем регистре. Дедупликация и лимит -
/// забота вызывающей стороны.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    hashtag_regex()
        .find_iter(content)
        .flatten()
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Убирает #word токены из тела поста, чтобы хештеги не дублировались.
pub fn strip_hashtags(content: &str) -> String {
    hashtag_regex()
        .replace_all(content, "")
        .trim()
        .to_string()
}

// === Типы запроса/ответа chat completion ===

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
