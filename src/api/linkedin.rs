use crate::error::LinkedInError;
use crate::media;
use crate::models::{MediaCategory, PublishedPost, UploadedAsset, Visibility};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const LINKEDIN_API_URL: &str = "https://api.linkedin.com/v2";
const RESTLI_HEADER: &str = "X-Restli-Protocol-Version";
const RESTLI_VERSION: &str = "2.0.0";
const AUTHOR_URN_PREFIX: &str = "urn:li:person:";

/// Порядок обхода профильных эндпоинтов: первый успешный побеждает.
const PROFILE_ENDPOINTS: &[&str] = &["userinfo", "me", "people/~"];

const PROFILE_TIMEOUT_SECS: u64 = 15;
const REGISTER_TIMEOUT_SECS: u64 = 15;
const DOWNLOAD_TIMEOUT_SECS: u64 = 15;
const UPLOAD_TIMEOUT_SECS: u64 = 30;
const POST_TIMEOUT_SECS: u64 = 15;

const MAX_IMAGE_BYTES: u64 = 100 * 1024 * 1024; // 100MB
const MAX_VIDEO_BYTES: u64 = 5 * 1024 * 1024 * 1024; // 5GB, лимит LinkedIn

const SUPPORTED_IMAGE_FORMATS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const SUPPORTED_VIDEO_FORMATS: &[&str] = &["mp4", "mov", "avi", "webm"];

const RECIPE_IMAGE: &str = "feedshare-image";
const RECIPE_VIDEO: &str = "feedshare-video";

pub struct LinkedInClient {
    http_client: Client,
    access_token: String,
    base_url: String,
}

/// Категория медиа для UGC поста: на один пост ровно одна категория.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMediaCategory {
    None,
    Image,
    Video,
}

impl ShareMediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareMediaCategory::None => "NONE",
            ShareMediaCategory::Image => "IMAGE",
            ShareMediaCategory::Video => "VIDEO",
        }
    }
}

/// Результат валидации локального файла до каких-либо сетевых вызовов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileSpec {
    pub mime: &'static str,
    pub media_type: &'static str,
    pub category: MediaCategory,
}

impl LinkedInClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, LinkedInError> {
        Self::with_base_url(access_token, LINKEDIN_API_URL)
    }

    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LinkedInError> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(LinkedInError::MissingToken);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(POST_TIMEOUT_SECS))
            .user_agent(super::USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(LinkedInClient {
            http_client,
            access_token,
            base_url: base_url.into(),
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Обходит три профильных эндпоинта по порядку; ответ с полем `sub`
    /// (OpenID) или `id` (legacy) даёт urn:li:person:<id>. Отказ каждого
    /// эндпоинта логируется и поглощается; ошибка наружу - только когда
    /// не сработали все три.
    pub async fn resolve_author_urn(&self) -> Result<String, LinkedInError> {
        for endpoint in PROFILE_ENDPOINTS {
            let url = format!("{}/{}", self.base_url, endpoint);
            debug!("Attempting to get profile from: {}", url);

            let response = match self
                .http_client
                .get(&url)
                .header("Authorization", self.bearer())
                .header("Content-Type", "application/json")
                .header(RESTLI_HEADER, RESTLI_VERSION)
                .timeout(Duration::from_secs(PROFILE_TIMEOUT_SECS))
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Failed to get profile from {}: {}", url, e);
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                if status.as_u16() == 403 {
                    error!(
                        "403 Forbidden for {}: check token scopes, w_member_social and r_liteprofile required",
                        url
                    );
                } else {
                    warn!("Failed to get profile from {}: HTTP {}", url, status);
                }
                continue;
            }

            let profile: Value = match response.json().await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!("Cannot parse profile from {}: {}", url, e);
                    continue;
                }
            };

            if let Some(user_id) = extract_member_id(&profile) {
                let author_urn = format!("{}{}", AUTHOR_URN_PREFIX, user_id);
                info!("Author URN obtained: {}", author_urn);
                return Ok(author_urn);
            }
        }

        error!("Failed to get LinkedIn user profile from all endpoints");
        Err(LinkedInError::ProfileUnavailable)
    }

    /// Первая фаза протокола загрузки: регистрация намерения, в ответ -
    /// короткоживущий upload URL и id ассета.
    async fn register_upload(
        &self,
        author_urn: &str,
        media_type: &str,
    ) -> Result<(String, String), LinkedInError> {
        let payload = json!({
            "registerUploadRequest": {
                "recipes": [format!("urn:li:digitalmediaRecipe:{}", media_type)],
                "owner": author_urn,
                "serviceRelationships": [{
                    "relationshipType": "OWNER",
                    "identifier": "urn:li:userGeneratedContent",
                }],
            },
        });

        debug!("Registering upload for: {}", media_type);

        let response = self
            .http_client
            .post(format!("{}/assets?action=registerUpload", self.base_url))
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .header(RESTLI_HEADER, RESTLI_VERSION)
            .timeout(Duration::from_secs(REGISTER_TIMEOUT_SECS))
            .json(&payload)
            .send()
            .await
            .map_err(map_network_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LinkedInError::Network(format!("cannot parse register response: {}", e)))?;

        let upload_url = body["value"]["uploadMechanism"]
            ["com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest"]["uploadUrl"]
            .as_str()
            .ok_or_else(|| LinkedInError::Network("no upload URL in register response".to_string()))?
            .to_string();
        let asset_id = body["value"]["asset"]
            .as_str()
            .ok_or_else(|| LinkedInError::Network("no asset ID in register response".to_string()))?
            .to_string();

        debug!("Upload URL received, asset ID: {}", asset_id);
        Ok((upload_url, asset_id))
    }

    /// Вторая фаза: бинарная выгрузка по полученному upload URL.
    async fn upload_binary(
        &self,
        upload_url: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), LinkedInError> {
        let response = self
            .http_client
            .post(upload_url)
            .header("Authorization", self.bearer())
            .header("Content-Type", content_type)
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .body(data)
            .send()
            .await
            .map_err(map_network_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Загрузка изображения, размещённого на GitHub: скачивает бинарь по
    /// download_url и проводит его через двухфазный протокол LinkedIn.
    /// SVG отсекается дважды: по расширению и по content-type скачанного
    /// ответа (расширение может врать).
    pub async fn upload_from_url(
        &self,
        download_url: &str,
        file_name: &str,
        author_urn: &str,
    ) -> Result<UploadedAsset, LinkedInError> {
        if download_url.trim().is_empty() {
            return Err(LinkedInError::MissingInput("image URL is required".to_string()));
        }
        validate_author_urn(author_urn)?;

        if media::file_extension(file_name) == "svg" {
            return Err(LinkedInError::UnsupportedFormat(
                "SVG files are not supported by LinkedIn. Please use PNG, JPG, or GIF format instead"
                    .to_string(),
            ));
        }

        debug!("Downloading image from GitHub: {}", download_url);

        let response = self
            .http_client
            .get(download_url)
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| LinkedInError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LinkedInError::Download(format!(
                "HTTP {} while fetching {}",
                response.status(),
                download_url
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        if content_type.contains("svg") {
            return Err(LinkedInError::UnsupportedFormat(
                "SVG format detected and not supported by LinkedIn".to_string(),
            ));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| LinkedInError::Download(e.to_string()))?
            .to_vec();

        debug!("Image downloaded: {} bytes ({})", data.len(), content_type);

        if data.len() as u64 > MAX_IMAGE_BYTES {
            return Err(LinkedInError::FileTooLarge(
                "Image too large: maximum image size is 100MB".to_string(),
            ));
        }

        let (upload_url, asset_id) = self.register_upload(author_urn, RECIPE_IMAGE).await?;
        let file_size = data.len() as u64;
        self.upload_binary(&upload_url, data, &content_type).await?;

        info!("GitHub image {} uploaded to LinkedIn: {}", file_name, asset_id);

        Ok(UploadedAsset {
            asset_id,
            file_name: file_name.to_string(),
            file_size,
            file_type: Some(content_type),
            media_type: RECIPE_IMAGE.to_string(),
            category: None,
            original_url: Some(download_url.to_string()),
        })
    }

    /// Загрузка локального файла пользователя. Формат и лимиты размера
    /// проверяются по метаданным до единого сетевого вызова.
    pub async fn upload_from_local_file(
        &self,
        path: &Path,
        author_urn: &str,
    ) -> Result<UploadedAsset, LinkedInError> {
        validate_author_urn(author_urn)?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LinkedInError::MissingInput("no file provided".to_string()))?
            .to_string();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| LinkedInError::MissingInput(format!("cannot read file {}: {}", file_name, e)))?;
        let file_size = metadata.len();

        let spec = validate_local_file(&file_name, file_size)?;

        debug!(
            "Uploading local file: {} ({} bytes, {})",
            file_name, file_size, spec.mime
        );

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| LinkedInError::MissingInput(format!("cannot read file {}: {}", file_name, e)))?;

        let (upload_url, asset_id) = self.register_upload(author_urn, spec.media_type).await?;
        self.upload_binary(&upload_url, data, spec.mime).await?;

        info!("Local file {} uploaded to LinkedIn: {}", file_name, asset_id);

        Ok(UploadedAsset {
            asset_id,
            file_name,
            file_size,
            file_type: Some(spec.mime.to_string()),
            media_type: spec.media_type.to_string(),
            category: Some(spec.category),
            original_url: None,
        })
    }

    /// Публикует UGC пост с уже загруженными ассетами.
    pub async fn publish(
        &self,
        author_urn: &str,
        text: &str,
        assets: &[UploadedAsset],
        visibility: Visibility,
    ) -> Result<PublishedPost, LinkedInError> {
        validate_author_urn(author_urn)?;

        let (category, selected) = resolve_media_category(assets);
        let payload = build_post_payload(author_urn, text, category, &selected, visibility);

        debug!(
            "Publishing UGC post: category {}, {} media entries",
            category.as_str(),
            selected.len()
        );

        let response = self
            .http_client
            .post(format!("{}/ugcPosts", self.base_url))
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .header(RESTLI_HEADER, RESTLI_VERSION)
            .timeout(Duration::from_secs(POST_TIMEOUT_SECS))
            .json(&payload)
            .send()
            .await
            .map_err(map_network_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        // id поста: заголовок x-restli-id приоритетнее тела ответа
        let header_id = response
            .headers()
            .get("x-restli-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let id = header_id.or_else(|| body["id"].as_str().map(str::to_string));

        let share_url = match &id {
            Some(id) => format!("https://www.linkedin.com/feed/update/{}", id),
            None => "https://www.linkedin.com/feed/".to_string(),
        };

        info!("Successfully published to LinkedIn: {}", share_url);
        Ok(PublishedPost { id, share_url })
    }
}

/// id участника из ответа профиля: `sub` (OpenID) приоритетнее `id` (legacy).
pub fn extract_member_id(profile: &Value) -> Option<String> {
    field_as_string(&profile["sub"]).or_else(|| field_as_string(&profile["id"]))
}

fn field_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn validate_author_urn(author_urn: &str) -> Result<(), LinkedInError> {
    if author_urn.trim().is_empty() {
        return Err(LinkedInError::MissingAuthorUrn);
    }
    if !author_urn.starts_with(AUTHOR_URN_PREFIX) {
        return Err(LinkedInError::InvalidAuthorUrn(author_urn.to_string()));
    }
    Ok(())
}

/// Проверка локального файла: расширение против явных списков поддержки
/// и дифференцированные потолки размера, всё до сетевых вызовов.
pub fn validate_local_file(file_name: &str, file_size: u64) -> Result<LocalFileSpec, LinkedInError> {
    let extension = media::file_extension(file_name);

    if extension == "svg" {
        return Err(LinkedInError::UnsupportedFormat(
            "SVG files are not supported by LinkedIn. Please use PNG, JPG, or GIF format instead"
                .to_string(),
        ));
    }

    if SUPPORTED_IMAGE_FORMATS.contains(&extension.as_str()) {
        if file_size > MAX_IMAGE_BYTES {
            return Err(LinkedInError::FileTooLarge(
                "Image file too large: maximum image size is 100MB".to_string(),
            ));
        }
        return Ok(LocalFileSpec {
            mime: image_mime(&extension),
            media_type: RECIPE_IMAGE,
            category: MediaCategory::Image,
        });
    }

    if SUPPORTED_VIDEO_FORMATS.contains(&extension.as_str()) {
        if file_size > MAX_VIDEO_BYTES {
            return Err(LinkedInError::FileTooLarge(
                "Video file too large: maximum video size is 5GB".to_string(),
            ));
        }
        return Ok(LocalFileSpec {
            mime: video_mime(&extension),
            media_type: RECIPE_VIDEO,
            category: MediaCategory::Video,
        });
    }

    Err(LinkedInError::UnsupportedFormat(format!(
        "Unsupported media format: .{}. Supported image formats: JPG, JPEG, PNG, GIF, WEBP. Supported video formats: MP4, MOV, AVI, WEBM",
        extension
    )))
}

fn image_mime(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

fn video_mime(extension: &str) -> &'static str {
    match extension {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

fn is_video_asset(asset: &UploadedAsset) -> bool {
    asset.category == Some(MediaCategory::Video)
        || asset.media_type == RECIPE_VIDEO
        || asset
            .file_type
            .as_deref()
            .is_some_and(|file_type| file_type.starts_with("video/"))
}

fn is_image_asset(asset: &UploadedAsset) -> bool {
    asset.category == Some(MediaCategory::Image)
        || asset.media_type == RECIPE_IMAGE
        || asset
            .file_type
            .as_deref()
            .is_some_and(|file_type| file_type.starts_with("image/"))
}

/// Выбирает единственную категорию поста. LinkedIn не принимает видео и
/// изображения в одном UGC посте: при смешанном наборе побеждают видео,
/// изображения молча отбрасываются (текущее поведение, сознательно
/// сохранено).
pub fn resolve_media_category(assets: &[UploadedAsset]) -> (ShareMediaCategory, Vec<&UploadedAsset>) {
    let videos: Vec<&UploadedAsset> = assets.iter().filter(|a| is_video_asset(a)).collect();
    let images: Vec<&UploadedAsset> = assets.iter().filter(|a| is_image_asset(a)).collect();

    if !videos.is_empty() && !images.is_empty() {
        warn!(
            "Mixed media detected ({} images, {} videos): using VIDEO only, images are dropped",
            images.len(),
            videos.len()
        );
        return (ShareMediaCategory::Video, videos);
    }
    if !videos.is_empty() {
        return (ShareMediaCategory::Video, videos);
    }
    if !images.is_empty() {
        return (ShareMediaCategory::Image, images);
    }

    (ShareMediaCategory::None, Vec::new())
}

/// Собирает тело UGC поста по схеме LinkedIn; массив media присутствует
/// только когда есть ассеты выбранной категории.
pub fn build_post_payload(
    author_urn: &str,
    text: &str,
    category: ShareMediaCategory,
    assets: &[&UploadedAsset],
    visibility: Visibility,
) -> Value {
    let mut share_content = json!({
        "shareCommentary": { "text": text },
        "shareMediaCategory": category.as_str(),
    });

    if !assets.is_empty() {
        share_content["media"] = Value::Array(
            assets
                .iter()
                .map(|asset| {
                    json!({
                        "status": "READY",
                        "description": { "text": format!("Uploaded file: {}", asset.file_name) },
                        "media": asset.asset_id,
                        "title": { "text": asset.file_name },
                    })
                })
                .collect(),
        );
    }

    json!({
        "author": author_urn,
        "lifecycleState": "PUBLISHED",
        "specificContent": { "com.linkedin.ugc.ShareContent": share_content },
        "visibility": {
            "com.linkedin.ugc.MemberNetworkVisibility": visibility.as_member_network_visibility(),
        },
    })
}

fn map_network_error(e: reqwest::Error) -> LinkedInError {
    if e.is_timeout() {
        LinkedInError::Timeout
    } else {
        LinkedInError::Network(e.to_string())
    }
}

/// Единственная точка классификации ответов LinkedIn в типизированную ошибку.
async fn api_error(response: Response) -> LinkedInError {
    let status = response.status().as_u16();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        401 => LinkedInError::AuthExpired,
        403 => LinkedInError::AuthForbidden,
        400 => LinkedInError::BadRequest(message),
        _ => LinkedInError::Unknown { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{http_response, serve_responses};
    use serde_json::json;

    fn image_asset(name: &str) -> UploadedAsset {
        UploadedAsset {
            asset_id: format!("urn:li:digitalmediaAsset:img-{}", name),
            file_name: name.to_string(),
            file_size: 2048,
            file_type: Some("image/png".to_string()),
            media_type: "feedshare-image".to_string(),
            category: Some(MediaCategory::Image),
            original_url: None,
        }
    }

    fn video_asset(name: &str) -> UploadedAsset {
        UploadedAsset {
            asset_id: format!("urn:li:digitalmediaAsset:vid-{}", name),
            file_name: name.to_string(),
            file_size: 4096,
            file_type: Some("video/mp4".to_string()),
            media_type: "feedshare-video".to_string(),
            category: Some(MediaCategory::Video),
            original_url: None,
        }
    }

    #[test]
    fn member_id_prefers_sub_over_id() {
        let profile = json!({ "sub": "abc123", "id": "legacy456" });
        assert_eq!(extract_member_id(&profile), Some("abc123".to_string()));
    }

    #[test]
    fn member_id_falls_back_to_legacy_id() {
        let profile = json!({ "id": "legacy456" });
        assert_eq!(extract_member_id(&profile), Some("legacy456".to_string()));

        let numeric = json!({ "id": 42 });
        assert_eq!(extract_member_id(&numeric), Some("42".to_string()));
    }

    #[test]
    fn member_id_absent_when_profile_has_neither_field() {
        let profile = json!({ "firstName": "Ada" });
        assert_eq!(extract_member_id(&profile), None);
    }

    #[tokio::test]
    async fn resolver_walks_endpoints_until_one_yields_an_id() {
        let (base_url, requests) = serve_responses(vec![
            http_response("404 Not Found", "{}"),
            http_response("404 Not Found", "{}"),
            http_response("200 OK", r#"{"id":"xyz789"}"#),
        ])
        .await;

        let client = LinkedInClient::with_base_url("li-token", &base_url).unwrap();
        let urn = client.resolve_author_urn().await.unwrap();

        assert_eq!(urn, "urn:li:person:xyz789");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].starts_with("GET /userinfo"));
        assert!(requests[1].starts_with("GET /me"));
        assert!(requests[2].starts_with("GET /people/~"));
    }

    #[tokio::test]
    async fn resolver_failure_names_both_required_scopes() {
        let (base_url, requests) = serve_responses(vec![
            http_response("404 Not Found", "{}"),
            http_response("404 Not Found", "{}"),
            http_response("404 Not Found", "{}"),
        ])
        .await;

        let client = LinkedInClient::with_base_url("li-token", &base_url).unwrap();
        let err = client.resolve_author_urn().await.unwrap_err();

        assert!(matches!(err, LinkedInError::ProfileUnavailable));
        let message = err.to_string();
        assert!(message.contains("w_member_social"));
        assert!(message.contains("r_liteprofile"));
        assert_eq!(requests.lock().unwrap().len(), 3);
    }

    #[test]
    fn author_urn_format_is_enforced() {
        assert!(validate_author_urn("urn:li:person:abc123").is_ok());
        assert!(matches!(
            validate_author_urn(""),
            Err(LinkedInError::MissingAuthorUrn)
        ));
        assert!(matches!(
            validate_author_urn("urn:li:organization:99"),
            Err(LinkedInError::InvalidAuthorUrn(_))
        ));
    }

    #[test]
    fn mixed_media_keeps_only_videos() {
        let assets = vec![
            image_asset("a.png"),
            image_asset("b.png"),
            video_asset("demo.mp4"),
        ];

        let (category, selected) = resolve_media_category(&assets);

        assert_eq!(category, ShareMediaCategory::Video);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].file_name, "demo.mp4");
    }

    #[test]
    fn images_only_keeps_all_images() {
        let assets = vec![image_asset("a.png"), image_asset("b.png")];

        let (category, selected) = resolve_media_category(&assets);

        assert_eq!(category, ShareMediaCategory::Image);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn no_assets_means_category_none() {
        let (category, selected) = resolve_media_category(&[]);
        assert_eq!(category, ShareMediaCategory::None);
        assert!(selected.is_empty());
    }

    #[test]
    fn category_falls_back_to_media_type_then_mime() {
        let mut by_media_type = video_asset("clip.mov");
        by_media_type.category = None;
        let mut by_mime = video_asset("raw.webm");
        by_mime.category = None;
        by_mime.media_type = "something-else".to_string();

        let assets = vec![by_media_type, by_mime];
        let (category, selected) = resolve_media_category(&assets);

        assert_eq!(category, ShareMediaCategory::Video);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn payload_with_video_contains_exactly_the_video() {
        let video = video_asset("demo.mp4");
        let selected = vec![&video];
        let payload = build_post_payload(
            "urn:li:person:abc",
            "Check this out",
            ShareMediaCategory::Video,
            &selected,
            Visibility::Public,
        );

        let content = &payload["specificContent"]["com.linkedin.ugc.ShareContent"];
        assert_eq!(content["shareMediaCategory"], "VIDEO");
        let media = content["media"].as_array().unwrap();
        assert_eq!(media.len(), 1);
        assert_eq!(media[0]["media"], video.asset_id.as_str());
        assert_eq!(media[0]["status"], "READY");
        assert_eq!(media[0]["title"]["text"], "demo.mp4");
    }

    #[test]
    fn text_only_payload_has_no_media_array() {
        let payload = build_post_payload(
            "urn:li:person:abc",
            "Just text",
            ShareMediaCategory::None,
            &[],
            Visibility::Connections,
        );

        let content = &payload["specificContent"]["com.linkedin.ugc.ShareContent"];
        assert_eq!(content["shareMediaCategory"], "NONE");
        assert!(content.get("media").is_none());
        assert_eq!(payload["lifecycleState"], "PUBLISHED");
        assert_eq!(
            payload["visibility"]["com.linkedin.ugc.MemberNetworkVisibility"],
            "CONNECTIONS"
        );
    }

    #[test]
    fn local_image_over_100mb_is_rejected_before_any_network_call() {
        let result = validate_local_file("huge.png", 101 * 1024 * 1024);
        assert!(matches!(result, Err(LinkedInError::FileTooLarge(_))));
    }

    #[test]
    fn local_video_of_4gb_is_accepted() {
        let spec = validate_local_file("talk.mp4", 4 * 1024 * 1024 * 1024).unwrap();
        assert_eq!(spec.media_type, "feedshare-video");
        assert_eq!(spec.category, MediaCategory::Video);
        assert_eq!(spec.mime, "video/mp4");
    }

    #[test]
    fn local_svg_is_rejected() {
        assert!(matches!(
            validate_local_file("icon.svg", 10),
            Err(LinkedInError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn local_unknown_extension_is_rejected_even_with_small_size() {
        assert!(matches!(
            validate_local_file("slides.pptx", 10),
            Err(LinkedInError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn local_image_at_limit_is_accepted() {
        let spec = validate_local_file("ok.jpeg", 100 * 1024 * 1024).unwrap();
        assert_eq!(spec.media_type, "feedshare-image");
        assert_eq!(spec.mime, "image/jpeg");
    }
}
