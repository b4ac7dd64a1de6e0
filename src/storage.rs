// storage.rs - зашифрованное локальное хранилище учётных данных
//
// Шифрование здесь - только обфускация под фиксированным встроенным ключом,
// а не граница безопасности: ключ лежит в бинарнике. Не полагаться на него
// для конфиденциальности.

use crate::error::{AppError, AppResult};
use crate::models::Credentials;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

const STORAGE_KEY_PREFIX: &str = "gloss_";
const ENCRYPTION_KEY: &str = "gloss_secure_key_2024";
const NONCE_LEN: usize = 12;

const CREDENTIALS_KEY: &str = "credentials";

/// Файловое key-value хранилище с симметричным шифрованием значений.
/// Каждый ключ - отдельный файл `gloss_<key>` в каталоге хранилища.
pub struct SecureStorage {
    dir: PathBuf,
}

impl SecureStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SecureStorage { dir: dir.into() }
    }

    fn cipher() -> Aes256Gcm {
        // Ключ AES-256 выводится из фиксированной строки приложения
        let key_bytes = Sha256::digest(ENCRYPTION_KEY.as_bytes());
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", STORAGE_KEY_PREFIX, key))
    }

    fn encrypt(data: &[u8]) -> AppResult<String> {
        let cipher = Self::cipher();
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, data)
            .map_err(|e| AppError::Storage(format!("encryption failed: {}", e)))?;

        let mut blob = nonce.to_vec();
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    fn decrypt(encoded: &str) -> AppResult<Vec<u8>> {
        let blob = BASE64
            .decode(encoded.trim())
            .map_err(|e| AppError::Storage(format!("invalid storage encoding: {}", e)))?;

        if blob.len() < NONCE_LEN {
            return Err(AppError::Storage("stored blob too short".to_string()));
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let cipher = Self::cipher();
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| AppError::Storage(format!("decryption failed: {}", e)))
    }

    /// Сериализует, шифрует и записывает значение, перезаписывая прежнее.
    /// Ошибки логируются и поглощаются.
    pub fn set_item<T: Serialize>(&self, key: &str, value: &T) {
        let result = (|| -> AppResult<()> {
            fs::create_dir_all(&self.dir)?;
            let serialized = serde_json::to_vec(value)?;
            let encrypted = Self::encrypt(&serialized)?;
            fs::write(self.entry_path(key), encrypted)?;
            Ok(())
        })();

        if let Err(e) = result {
            error!("Error storing data under key '{}': {}", key, e);
        }
    }

    /// Читает, расшифровывает и десериализует значение. Любой сбой
    /// (нет файла, битые данные) даёт None с записью в лог, без паники.
    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let result = (|| -> AppResult<T> {
            let encoded = fs::read_to_string(&path)?;
            let decrypted = Self::decrypt(&encoded)?;
            Ok(serde_json::from_slice(&decrypted)?)
        })();

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Error retrieving data under key '{}': {}", key, e);
                None
            }
        }
    }

    pub fn remove_item(&self, key: &str) {
        let path = self.entry_path(key);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                error!("Error removing key '{}': {}", key, e);
            }
        }
    }

    /// Удаляет все записи с префиксом хранилища, не трогая чужие файлы.
    pub fn clear(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(STORAGE_KEY_PREFIX) {
                if let Err(e) = fs::remove_file(entry.path()) {
                    error!("Error clearing storage entry {:?}: {}", name, e);
                }
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Хранилище единственной записи с учётными данными.
pub struct CredentialStore {
    storage: SecureStorage,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CredentialStore {
            storage: SecureStorage::new(dir),
        }
    }

    pub fn save(&self, credentials: &Credentials) {
        self.storage.set_item(CREDENTIALS_KEY, credentials);
        debug!("Credentials saved to {:?}", self.storage.dir());
    }

    pub fn load(&self) -> Option<Credentials> {
        self.storage.get_item(CREDENTIALS_KEY)
    }

    pub fn clear(&self) {
        self.storage.clear();
        debug!("Credential storage cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiCredentials, GithubCredentials, LinkedInCredentials};

    fn sample_credentials() -> Credentials {
        Credentials {
            github: GithubCredentials {
                username: "octocat".to_string(),
                access_token: "ghp_test".to_string(),
            },
            linkedin: LinkedInCredentials {
                access_token: "li_test".to_string(),
            },
            ai: AiCredentials {
                api_key: "sk-or-test".to_string(),
            },
        }
    }

    #[test]
    fn round_trip_returns_deep_equal_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        let credentials = sample_credentials();
        store.save(&credentials);

        assert_eq!(store.load(), Some(credentials));
    }

    #[test]
    fn get_on_empty_store_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_then_get_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save(&sample_credentials());
        store.clear();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        let mut credentials = sample_credentials();
        store.save(&credentials);
        credentials.github.username = "hubber".to_string();
        store.save(&credentials);

        assert_eq!(store.load(), Some(credentials));
    }

    #[test]
    fn corrupt_blob_returns_none_instead_of_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        std::fs::write(dir.path().join("gloss_credentials"), "not base64 at all").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_leaves_foreign_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save(&sample_credentials());
        let foreign = dir.path().join("unrelated.txt");
        std::fs::write(&foreign, "keep me").unwrap();

        store.clear();

        assert!(foreign.exists());
        assert_eq!(store.load(), None);
    }
}
