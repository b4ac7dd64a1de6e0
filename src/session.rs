use crate::api::linkedin::LinkedInClient;
use crate::error::LinkedInError;
use crate::models::UploadedAsset;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

/// Состояние одной публикации: кэш author URN и накопитель загруженных
/// ассетов. URN разрешается строго один раз на сессию, сколько бы
/// загрузок его ни запрашивало; параллельные запросы ждут первый
/// результат вместо повторного похода в профильные эндпоинты.
pub struct ShareSession {
    author_urn: OnceCell<String>,
    uploaded_assets: Mutex<Vec<UploadedAsset>>,
}

impl ShareSession {
    pub fn new() -> Self {
        ShareSession {
            author_urn: OnceCell::new(),
            uploaded_assets: Mutex::new(Vec::new()),
        }
    }

    /// Возвращает кэшированный author URN, разрешая его через профильные
    /// эндпоинты при первом обращении. Неуспех не кэшируется: следующий
    /// вызов попробует снова.
    pub async fn author_urn(&self, client: &LinkedInClient) -> Result<String, LinkedInError> {
        let urn = self
            .author_urn
            .get_or_try_init(|| async {
                debug!("Author URN not cached yet, resolving profile");
                client.resolve_author_urn().await
            })
            .await?;
        Ok(urn.clone())
    }

    pub async fn record_upload(&self, asset: UploadedAsset) {
        let mut assets = self.uploaded_assets.lock().await;
        info!(
            "Asset recorded in session: {} ({})",
            asset.asset_id, asset.file_name
        );
        assets.push(asset);
    }

    pub async fn uploaded_assets(&self) -> Vec<UploadedAsset> {
        self.uploaded_assets.lock().await.clone()
    }
}

impl Default for ShareSession {
    fn default() -> Self {
        ShareSession::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaCategory;

    fn asset(name: &str) -> UploadedAsset {
        UploadedAsset {
            asset_id: format!("urn:li:digitalmediaAsset:{}", name),
            file_name: name.to_string(),
            file_size: 1024,
            file_type: Some("image/png".to_string()),
            media_type: "feedshare-image".to_string(),
            category: Some(MediaCategory::Image),
            original_url: None,
        }
    }

    #[tokio::test]
    async fn session_accumulates_uploads_in_order() {
        let session = ShareSession::new();
        session.record_upload(asset("first.png")).await;
        session.record_upload(asset("second.png")).await;

        let assets = session.uploaded_assets().await;
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].file_name, "first.png");
        assert_eq!(assets[1].file_name, "second.png");
    }

    #[tokio::test]
    async fn fresh_session_has_no_assets() {
        let session = ShareSession::new();
        assert!(session.uploaded_assets().await.is_empty());
    }
}
