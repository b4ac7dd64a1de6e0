// media.rs - классификация файлов репозитория по расширению

use crate::models::MediaKind;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "webm", "mkv", "flv"];
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "md", "readme"];

/// Результат классификации одного имени файла.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileClass {
    Media(MediaKind),
    /// SVG не поддерживается LinkedIn: исключается из изображений
    /// и порождает отдельную рекомендацию
    UnsupportedSvg,
    /// Расширение вне всех списков: файл не попадает ни в одну категорию
    Ignored,
}

/// Возвращает расширение в нижнем регистре. Для имени без точки
/// возвращается всё имя целиком: так "README" проходит по буквальной
/// проверке "readme" в списке документов.
pub fn file_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

/// Классифицирует файл исключительно по расширению, без чтения содержимого.
pub fn classify(name: &str) -> FileClass {
    let extension = file_extension(name);

    if extension == "svg" {
        return FileClass::UnsupportedSvg;
    }
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return FileClass::Media(MediaKind::Image);
    }
    if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        return FileClass::Media(MediaKind::Video);
    }
    if DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
        return FileClass::Media(MediaKind::Document);
    }

    FileClass::Ignored
}
