use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credentials not found. Run `gloss login` first")]
    NotLoggedIn,

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    LinkedIn(#[from] LinkedInError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Custom(s)
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::Custom(s.to_string())
    }
}

/// Ошибки GitHub API. Производятся единственной функцией классификации
/// в api/github.rs.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub authentication failed (HTTP 401) even without token: {0}")]
    AuthExpired(String),

    #[error("GitHub access forbidden (HTTP 403): {0}. Rate limit may be exhausted or the token may lack permissions")]
    AuthForbidden(String),

    #[error("GitHub rate limit exceeded (HTTP 429). Please try again in a few minutes")]
    RateLimited,

    #[error("GitHub rejected the request (HTTP 400): {0}")]
    BadRequest(String),

    #[error("GitHub resource not found (HTTP 404): {0}")]
    NotFound(String),

    #[error("GitHub network error: {0}")]
    Network(String),

    #[error("Timeout waiting for GitHub response")]
    Timeout,

    #[error("GitHub API error (HTTP {status}): {message}")]
    Unknown { status: u16, message: String },
}

/// Ошибки LinkedIn API с текстом рекомендаций для пользователя.
#[derive(Debug, Error)]
pub enum LinkedInError {
    #[error("LinkedIn access token is required")]
    MissingToken,

    #[error("LinkedIn author URN is required")]
    MissingAuthorUrn,

    #[error("{0}")]
    MissingInput(String),

    #[error("Invalid author URN format: {0}. Author URN must be in format: urn:li:person:<userId>")]
    InvalidAuthorUrn(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    FileTooLarge(String),

    #[error("Failed to download media: {0}")]
    Download(String),

    #[error("Failed to get LinkedIn user profile from all endpoints. Required scopes: w_member_social, r_liteprofile. Generate a new token with these scopes and try again")]
    ProfileUnavailable,

    #[error("LinkedIn access token is invalid or expired (HTTP 401). Please update your LinkedIn access token")]
    AuthExpired,

    #[error("LinkedIn API access forbidden (HTTP 403): token lacks required permissions. Regenerate the token with w_member_social and r_liteprofile scopes")]
    AuthForbidden,

    #[error("LinkedIn API request format error (HTTP 400): {0}")]
    BadRequest(String),

    #[error("LinkedIn network error: {0}")]
    Network(String),

    #[error("Timeout waiting for LinkedIn response")]
    Timeout,

    #[error("LinkedIn API error (HTTP {status}): {message}")]
    Unknown { status: u16, message: String },
}

/// Ошибки AI сервиса (OpenRouter-совместимый chat completion API).
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API key is required")]
    MissingApiKey,

    #[error("AI API key is invalid (HTTP 401). Please check your OpenRouter API key")]
    AuthExpired,

    #[error("AI API access denied (HTTP 403). Check the permissions of your API key")]
    AuthForbidden,

    #[error("AI API rate limit exceeded. Please try again in a few minutes, your free tier daily limit may be exhausted")]
    RateLimited,

    #[error("AI service returned an empty or malformed response: {0}")]
    InvalidResponse(String),

    #[error("AI service error: {0}")]
    Network(String),

    #[error("Timeout waiting for AI service response")]
    Timeout,

    #[error("AI service error (HTTP {status}): {message}")]
    Unknown { status: u16, message: String },
}
