use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Учётные данные пользователя: GitHub + LinkedIn + AI ключ.
/// Хранятся одним зашифрованным блобом через CredentialStore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub github: GithubCredentials,
    pub linkedin: LinkedInCredentials,
    pub ai: AiCredentials,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GithubCredentials {
    pub username: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkedInCredentials {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiCredentials {
    pub api_key: String,
}

/// Репозиторий GitHub вместе с производными полями обогащения
/// (readme, languages, media, releases). Снимок одного цикла загрузки.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub watchers_count: u64,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(rename = "private")]
    pub is_private: bool,
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub has_pages: bool,
    pub license: Option<License>,

    // Производные поля, заполняются при обогащении
    #[serde(default)]
    pub languages: HashMap<String, u64>,
    #[serde(default)]
    pub media: RepositoryMedia,
    #[serde(default)]
    pub releases: Vec<Release>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<Readme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
    pub spdx_id: Option<String>,
}

/// README из GitHub API (контент в base64).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Readme {
    pub content: String,
    pub encoding: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

/// Элемент ответа GitHub contents API (файл или каталог).
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub download_url: Option<String>,
    pub size: Option<u64>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

/// Медиа-файл, найденный сканером в репозитории. Тип выводится только
/// из расширения, никогда из содержимого.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    pub name: String,
    pub path: String,
    pub download_url: String,
    pub size: u64,
    pub extension: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,

    // Поля диагностической проверки доступности (HEAD запрос)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_error: Option<String>,
}

/// Плоская классификация найденных файлов по трём категориям.
/// Дубликаты имён из разных каталогов сохраняются независимо.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryMedia {
    pub images: Vec<MediaFile>,
    pub videos: Vec<MediaFile>,
    pub documents: Vec<MediaFile>,
}

impl RepositoryMedia {
    pub fn total(&self) -> usize {
        self.images.len() + self.videos.len() + self.documents.len()
    }
}

/// Отчёт диагностического сканирования медиа (команда `scan`).
#[derive(Debug, Clone, Serialize)]
pub struct MediaScanReport {
    pub repository: String,
    pub media_found: RepositoryMedia,
    pub directories_scanned: Vec<DirectoryScan>,
    pub errors: Vec<DirectoryScan>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryScan {
    pub path: String,
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Success,
    Error,
}

/// Явная категория загруженного в LinkedIn файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaCategory {
    #[serde(rename = "IMAGE")]
    Image,
    #[serde(rename = "VIDEO")]
    Video,
}

/// Зарегистрированный и загруженный в LinkedIn медиа-ассет.
/// Неизменяем, живёт в рамках одной сессии публикации.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedAsset {
    pub asset_id: String,
    pub file_name: String,
    pub file_size: u64,
    /// Исходный MIME тип, если известен
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Рецепт LinkedIn: feedshare-image или feedshare-video
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MediaCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
}

/// Сгенерированный AI черновик поста.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPost {
    pub content: String,
    pub hashtags: Vec<String>,
    pub suggested_media: Vec<MediaFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Visibility {
    #[value(name = "public")]
    Public,
    #[value(name = "connections")]
    Connections,
}

impl Visibility {
    /// Значение для com.linkedin.ugc.MemberNetworkVisibility
    pub fn as_member_network_visibility(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Connections => "CONNECTIONS",
        }
    }
}

/// Результат публикации UGC поста.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPost {
    /// id поста, если LinkedIn его вернул (заголовок x-restli-id или тело)
    pub id: Option<String>,
    pub share_url: String,
}
