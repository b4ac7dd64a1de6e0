use crate::error::GitHubError;
use crate::media::{self, FileClass};
use crate::models::{
    ContentsEntry, DirectoryScan, MediaFile, MediaScanReport, Readme, Release, Repository,
    RepositoryMedia, ScanStatus,
};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const GITHUB_API_URL: &str = "https://api.github.com";
const TIMEOUT_SECS: u64 = 10;
const HEAD_PROBE_TIMEOUT_SECS: u64 = 5;
const REPOS_PER_PAGE: u32 = 100;
const RELEASES_PER_PAGE: u32 = 10;
const IMAGE_PROBE_LIMIT: usize = 3;

/// Фиксированный порядок каталогов для поиска медиа, корень первым.
const SCAN_DIRECTORIES: &[&str] = &[
    "",
    "images",
    "assets",
    "public",
    "static",
    "media",
    "screenshots",
    "docs",
];

pub struct GitHubClient {
    http_client: Client,
    access_token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, GITHUB_API_URL)
    }

    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(super::USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        GitHubClient {
            http_client,
            access_token: access_token.into(),
            base_url: base_url.into(),
        }
    }

    fn get(&self, url: &str, with_auth: bool) -> reqwest::RequestBuilder {
        let mut request = self
            .http_client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");

        if with_auth && !self.access_token.is_empty() {
            request = request.header("Authorization", format!("token {}", self.access_token));
        }

        request
    }

    /// Протокол auth-fallback: запрос с токеном, на ровно HTTP 401 -
    /// один повтор того же запроса без заголовка Authorization
    /// (публичные репозитории доступны и с просроченным токеном).
    /// Любая другая ошибка уходит вызывающему без повтора.
    async fn get_with_auth_fallback(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Response, GitHubError> {
        let response = self
            .get(url, true)
            .query(query)
            .send()
            .await
            .map_err(map_network_error)?;

        if response.status() == StatusCode::UNAUTHORIZED && !self.access_token.is_empty() {
            debug!("Retrying request without authentication for public repo: {}", url);
            return self
                .get(url, false)
                .query(query)
                .send()
                .await
                .map_err(map_network_error);
        }

        Ok(response)
    }

    /// Список репозиториев пользователя с последовательным обогащением
    /// каждого (README, языки, медиа, релизы).
    pub async fn list_repositories(&self, username: &str) -> Result<Vec<Repository>, GitHubError> {
        let url = format!("{}/users/{}/repos", self.base_url, username);
        let query = [
            ("sort", "updated".to_string()),
            ("per_page", REPOS_PER_PAGE.to_string()),
            ("type", "owner".to_string()),
        ];

        debug!("Fetching repositories for user: {}", username);

        let response = self.get_with_auth_fallback(&url, &query).await?;
        if !response.status().is_success() {
            error!("Repository listing returned status: {}", response.status());
            return Err(api_error(response).await);
        }

        let repos: Vec<Repository> = parse_json(response).await?;
        info!("Fetched {} repositories for {}", repos.len(), username);

        // Обогащение строго последовательное: один awaited вызов за другим,
        // чтобы не упираться в rate limit GitHub
        let mut projects = Vec::with_capacity(repos.len());
        for mut repo in repos {
            self.enrich(&mut repo).await;
            projects.push(repo);
        }

        Ok(projects)
    }

    /// Четыре независимых под-запроса; сбой любого из них заменяется
    /// пустым значением и не прерывает ни репозиторий, ни весь список.
    async fn enrich(&self, repo: &mut Repository) {
        match self.get_readme(&repo.full_name).await {
            Ok(readme) => repo.readme = Some(readme),
            Err(e) => {
                warn!("No readme for {}: {}", repo.full_name, e);
                repo.readme = None;
            }
        }

        match self.get_languages(&repo.full_name).await {
            Ok(languages) => repo.languages = languages,
            Err(e) => {
                warn!("No languages for {}: {}", repo.full_name, e);
                repo.languages = HashMap::new();
            }
        }

        repo.media = self.scan_media(&repo.full_name).await.media_found;

        match self.get_releases(&repo.full_name).await {
            Ok(releases) => repo.releases = releases,
            Err(e) => {
                warn!("No releases for {}: {}", repo.full_name, e);
                repo.releases = Vec::new();
            }
        }
    }

    pub async fn get_readme(&self, full_name: &str) -> Result<Readme, GitHubError> {
        let url = format!("{}/repos/{}/readme", self.base_url, full_name);
        let response = self.get_with_auth_fallback(&url, &[]).await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        parse_json(response).await
    }

    pub async fn get_languages(
        &self,
        full_name: &str,
    ) -> Result<HashMap<String, u64>, GitHubError> {
        let url = format!("{}/repos/{}/languages", self.base_url, full_name);
        let response = self.get_with_auth_fallback(&url, &[]).await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        parse_json(response).await
    }

    pub async fn get_releases(&self, full_name: &str) -> Result<Vec<Release>, GitHubError> {
        let url = format!("{}/repos/{}/releases", self.base_url, full_name);
        let query = [("per_page", RELEASES_PER_PAGE.to_string())];
        let response = self.get_with_auth_fallback(&url, &query).await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        parse_json(response).await
    }

    /// Сканирует фиксированный список каталогов и классифицирует файлы
    /// по расширению. 404 - норма (каталога нет), прочие ошибки попадают
    /// в отчёт, но не останавливают обход остальных каталогов.
    pub async fn scan_media(&self, full_name: &str) -> MediaScanReport {
        let mut report = MediaScanReport {
            repository: full_name.to_string(),
            media_found: RepositoryMedia::default(),
            directories_scanned: Vec::new(),
            errors: Vec::new(),
            recommendations: Vec::new(),
        };

        for dir in SCAN_DIRECTORIES {
            let label = if dir.is_empty() { "root" } else { dir };
            let url = format!("{}/repos/{}/contents/{}", self.base_url, full_name, dir);
            debug!("Scanning directory: {} - {}", label, url);

            let response = match self.get_with_auth_fallback(&url, &[]).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Error scanning {}: {}", label, e);
                    report.errors.push(DirectoryScan {
                        path: label.to_string(),
                        status: ScanStatus::Error,
                        file_count: None,
                        status_code: None,
                        error: Some(e.to_string()),
                    });
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                debug!("Directory {} not found (404) - this is normal", label);
                continue;
            }
            if !status.is_success() {
                let e = api_error(response).await;
                warn!("Error scanning {}: {}", label, e);
                report.errors.push(DirectoryScan {
                    path: label.to_string(),
                    status: ScanStatus::Error,
                    file_count: None,
                    status_code: Some(status.as_u16()),
                    error: Some(e.to_string()),
                });
                continue;
            }

            // Contents API возвращает массив для каталога и объект для
            // одиночного файла; второй случай пропускаем
            let listing: Value = match response.json().await {
                Ok(listing) => listing,
                Err(e) => {
                    warn!("Cannot parse contents of {}: {}", label, e);
                    continue;
                }
            };
            let Some(entries) = listing.as_array() else {
                continue;
            };

            report.directories_scanned.push(DirectoryScan {
                path: label.to_string(),
                status: ScanStatus::Success,
                file_count: Some(entries.len()),
                status_code: None,
                error: None,
            });

            for raw in entries {
                let Ok(entry) = serde_json::from_value::<ContentsEntry>(raw.clone()) else {
                    continue;
                };
                if entry.entry_type != "file" {
                    continue;
                }
                classify_entry(&entry, &mut report.media_found, &mut report.recommendations);
            }
        }

        report
    }

    /// Диагностический вариант сканирования: тот же обход плюс проверка
    /// доступности первых трёх изображений HEAD-запросом и итоговые
    /// рекомендации.
    pub async fn media_diagnostics(&self, full_name: &str) -> MediaScanReport {
        let mut report = self.scan_media(full_name).await;

        if !report.media_found.images.is_empty() {
            debug!("Testing image accessibility for {}", full_name);
        }

        let mut probe_recommendations = Vec::new();
        for image in report.media_found.images.iter_mut().take(IMAGE_PROBE_LIMIT) {
            match self
                .http_client
                .head(&image.download_url)
                .timeout(Duration::from_secs(HEAD_PROBE_TIMEOUT_SECS))
                .send()
                .await
            {
                Ok(response) => {
                    image.accessible = Some(true);
                    image.content_type = header_value(&response, "content-type");
                    image.content_length = header_value(&response, "content-length");
                }
                Err(e) => {
                    image.accessible = Some(false);
                    image.access_error = Some(e.to_string());
                    probe_recommendations
                        .push(format!("Image {} may not be accessible: {}", image.name, e));
                }
            }
        }
        report.recommendations.extend(probe_recommendations);

        if report.media_found.images.is_empty() {
            report.recommendations.push(
                "No images found in common directories. Check if images are in other folders."
                    .to_string(),
            );
        }
        if report.errors.len() > report.directories_scanned.len() / 2 {
            report.recommendations.push(
                "Many directory access errors. Check if the repository is public and token has correct permissions."
                    .to_string(),
            );
        }

        report
    }
}

/// Раскладывает файл по категориям отчёта; SVG исключается из изображений
/// и даёт ровно одну рекомендацию.
fn classify_entry(entry: &ContentsEntry, media: &mut RepositoryMedia, recommendations: &mut Vec<String>) {
    let class = media::classify(&entry.name);

    let kind = match class {
        FileClass::Media(kind) => kind,
        FileClass::UnsupportedSvg => {
            recommendations.push(format!(
                "SVG file {} found but not supported by LinkedIn (use PNG/JPG instead)",
                entry.name
            ));
            return;
        }
        FileClass::Ignored => return,
    };

    let file = MediaFile {
        name: entry.name.clone(),
        path: entry.path.clone(),
        download_url: entry.download_url.clone().unwrap_or_default(),
        size: entry.size.unwrap_or(0),
        extension: media::file_extension(&entry.name),
        kind,
        html_url: entry.html_url.clone(),
        accessible: None,
        content_type: None,
        content_length: None,
        access_error: None,
    };

    debug!("Found file: {} ({})", file.name, file.extension);

    match kind {
        crate::models::MediaKind::Image => media.images.push(file),
        crate::models::MediaKind::Video => media.videos.push(file),
        crate::models::MediaKind::Document => media.documents.push(file),
    }
}

fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn map_network_error(e: reqwest::Error) -> GitHubError {
    if e.is_timeout() {
        GitHubError::Timeout
    } else {
        GitHubError::Network(e.to_string())
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, GitHubError> {
    let status = response.status().as_u16();
    response.json().await.map_err(|e| GitHubError::Unknown {
        status,
        message: format!("cannot parse response body: {}", e),
    })
}

/// Единственная точка классификации ответов GitHub в типизированную ошибку.
async fn api_error(response: Response) -> GitHubError {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    classify_status(status.as_u16(), message)
}

fn classify_status(status: u16, message: String) -> GitHubError {
    match status {
        401 => GitHubError::AuthExpired(message),
        403 => GitHubError::AuthForbidden(message),
        429 => GitHubError::RateLimited,
        400 => GitHubError::BadRequest(message),
        404 => GitHubError::NotFound(message),
        _ => GitHubError::Unknown { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{http_response, serve_responses};
    use crate::models::MediaKind;

    fn entry(name: &str) -> ContentsEntry {
        ContentsEntry {
            name: name.to_string(),
            path: format!("assets/{}", name),
            entry_type: "file".to_string(),
            download_url: Some(format!("https://raw.example.com/assets/{}", name)),
            size: Some(1024),
            html_url: None,
        }
    }

    #[test]
    fn svg_is_excluded_and_yields_one_recommendation() {
        let mut media = RepositoryMedia::default();
        let mut recommendations = Vec::new();

        classify_entry(&entry("logo.svg"), &mut media, &mut recommendations);

        assert!(media.images.is_empty());
        assert!(media.videos.is_empty());
        assert!(media.documents.is_empty());
        assert_eq!(recommendations.len(), 1);
        assert!(recommendations[0].contains("logo.svg"));
        assert!(recommendations[0].contains("not supported by LinkedIn"));
    }

    #[test]
    fn unknown_extension_lands_in_no_category() {
        let mut media = RepositoryMedia::default();
        let mut recommendations = Vec::new();

        classify_entry(&entry("build.gradle"), &mut media, &mut recommendations);

        assert_eq!(media.total(), 0);
        assert!(recommendations.is_empty());
    }

    #[test]
    fn files_carry_lowercased_extension_and_kind() {
        let mut media = RepositoryMedia::default();
        let mut recommendations = Vec::new();

        classify_entry(&entry("Screenshot.PNG"), &mut media, &mut recommendations);
        classify_entry(&entry("demo.mp4"), &mut media, &mut recommendations);
        classify_entry(&entry("README"), &mut media, &mut recommendations);

        assert_eq!(media.images.len(), 1);
        assert_eq!(media.images[0].extension, "png");
        assert_eq!(media.images[0].kind, MediaKind::Image);
        assert_eq!(media.videos.len(), 1);
        assert_eq!(media.documents.len(), 1);
        assert_eq!(media.documents[0].extension, "readme");
    }

    #[test]
    fn duplicate_names_from_different_directories_are_kept() {
        let mut media = RepositoryMedia::default();
        let mut recommendations = Vec::new();

        let mut first = entry("banner.png");
        first.path = "banner.png".to_string();
        let mut second = entry("banner.png");
        second.path = "images/banner.png".to_string();

        classify_entry(&first, &mut media, &mut recommendations);
        classify_entry(&second, &mut media, &mut recommendations);

        assert_eq!(media.images.len(), 2);
        assert_ne!(media.images[0].path, media.images[1].path);
    }

    #[tokio::test]
    async fn unauthorized_request_retries_exactly_once_without_token() {
        let (base_url, requests) = serve_responses(vec![
            http_response("401 Unauthorized", r#"{"message":"Bad credentials"}"#),
            http_response("200 OK", "[]"),
        ])
        .await;

        let client = GitHubClient::with_base_url("expired-token", &base_url);
        let url = format!("{}/users/octocat/repos", base_url);
        let response = client.get_with_auth_fallback(&url, &[]).await.unwrap();

        assert_eq!(response.status().as_u16(), 200);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0]
            .to_lowercase()
            .contains("authorization: token expired-token"));
        assert!(!requests[1].to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn server_errors_get_no_anonymous_retry() {
        let (base_url, requests) = serve_responses(vec![http_response(
            "500 Internal Server Error",
            r#"{"message":"boom"}"#,
        )])
        .await;

        let client = GitHubClient::with_base_url("valid-token", &base_url);
        let url = format!("{}/users/octocat/repos", base_url);
        let response = client.get_with_auth_fallback(&url, &[]).await.unwrap();

        assert_eq!(response.status().as_u16(), 500);
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn anonymous_client_never_retries_on_401() {
        let (base_url, requests) = serve_responses(vec![http_response(
            "401 Unauthorized",
            r#"{"message":"Requires authentication"}"#,
        )])
        .await;

        let client = GitHubClient::with_base_url("", &base_url);
        let url = format!("{}/users/octocat/repos", base_url);
        let response = client.get_with_auth_fallback(&url, &[]).await.unwrap();

        assert_eq!(response.status().as_u16(), 401);
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn status_classification_is_exhaustive() {
        assert!(matches!(
            classify_status(401, "bad creds".into()),
            GitHubError::AuthExpired(_)
        ));
        assert!(matches!(
            classify_status(403, "forbidden".into()),
            GitHubError::AuthForbidden(_)
        ));
        assert!(matches!(classify_status(429, "slow down".into()), GitHubError::RateLimited));
        assert!(matches!(
            classify_status(404, "missing".into()),
            GitHubError::NotFound(_)
        ));
        assert!(matches!(
            classify_status(500, "boom".into()),
            GitHubError::Unknown { status: 500, .. }
        ));
    }
}
