use crate::models::Repository;
use fancy_regex::{Captures, Regex};

const MAX_HASHTAGS: usize = 10;

/// Смещения блоков Mathematical Sans-Serif Bold в Unicode.
const BOLD_UPPER_BASE: u32 = 0x1D5D4;
const BOLD_LOWER_BASE: u32 = 0x1D5EE;
const BOLD_DIGIT_BASE: u32 = 0x1D7EC;

/// Смещения блоков Sans-Serif Bold Italic.
const BOLD_ITALIC_UPPER_BASE: u32 = 0x1D63C;
const BOLD_ITALIC_LOWER_BASE: u32 = 0x1D656;

fn shift_char(c: char, base: u32, start: char) -> char {
    char::from_u32(base + (c as u32 - start as u32)).unwrap_or(c)
}

fn to_unicode_bold(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'A'..='Z' => shift_char(c, BOLD_UPPER_BASE, 'A'),
            'a'..='z' => shift_char(c, BOLD_LOWER_BASE, 'a'),
            '0'..='9' => shift_char(c, BOLD_DIGIT_BASE, '0'),
            _ => c,
        })
        .collect()
}

fn to_unicode_bold_italic(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'A'..='Z' => shift_char(c, BOLD_ITALIC_UPPER_BASE, 'A'),
            'a'..='z' => shift_char(c, BOLD_ITALIC_LOWER_BASE, 'a'),
            _ => c,
        })
        .collect()
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static text pattern")
}

/// Преобразует markdown разметку AI черновика в то, что LinkedIn реально
/// отображает: **bold** в Unicode sans-serif bold, *italic* в bold italic,
/// ссылки [text](url) в "text url". LinkedIn не понимает markdown, но
/// отображает математические Unicode блоки.
pub fn format_linkedin_text(text: &str) -> String {
    let bold = regex(r"\*\*([^*]+)\*\*");
    let result = bold.replace_all(text, |caps: &Captures| to_unicode_bold(&caps[1]));

    let italic = regex(r"\*([^*]+)\*");
    let result = italic.replace_all(&result, |caps: &Captures| to_unicode_bold_italic(&caps[1]));

    let link = regex(r"\[([^\]]+)\]\(([^)]+)\)");
    let result = link.replace_all(&result, |caps: &Captures| {
        format!("{} {}", &caps[1], &caps[2])
    });

    result.into_owned()
}

/// Снимает markdown разметку целиком, без Unicode замен: заголовки,
/// жирность, код, ссылки. Лишние пустые строки схлопываются до двойного
/// перевода, повторные пробелы - до одного.
pub fn clean_linkedin_text(text: &str) -> String {
    let mut result = regex(r"(?m)^#{1,6}\s*").replace_all(text, "").into_owned();
    result = regex(r"\*\*([^*]+)\*\*").replace_all(&result, "$1").into_owned();
    result = regex(r"\*([^*]+)\*").replace_all(&result, "$1").into_owned();
    result = regex(r"`([^`]+)`").replace_all(&result, "$1").into_owned();
    result = regex(r"\[([^\]]+)\]\(([^)]+)\)")
        .replace_all(&result, "$1")
        .into_owned();
    result = regex(r"\n{3,}").replace_all(&result, "\n\n").into_owned();
    result = regex(r"[ \t]{2,}").replace_all(&result, " ").into_owned();
    result.trim().to_string()
}

fn hashtag_from(raw: &str) -> Option<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if stripped.is_empty() {
        None
    } else {
        Some(format!("#{}", stripped))
    }
}

/// Резервный набор хештегов из метаданных репозитория, когда AI
/// генерация пропущена: язык, первые три topic, базовые теги сообщества
/// плюс условные. Дедупликация без учёта регистра, максимум 10.
pub fn generate_hashtags(repo: &Repository) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(language) = repo.language.as_deref() {
        candidates.extend(hashtag_from(language));
    }
    for topic in repo.topics.iter().take(3) {
        candidates.extend(hashtag_from(topic));
    }

    candidates.push("#opensource".to_string());
    candidates.push("#development".to_string());
    candidates.push("#coding".to_string());

    if repo.homepage.as_deref().is_some_and(|h| !h.is_empty()) {
        candidates.push("#webapp".to_string());
    }
    if repo.has_pages {
        candidates.push("#github".to_string());
    }
    if repo.stargazers_count > 50 {
        candidates.push("#popular".to_string());
    }

    let mut seen: Vec<String> = Vec::new();
    let mut result: Vec<String> = Vec::new();
    for tag in candidates {
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

/// Человекочитаемый размер файла для логов и вывода команды scan.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.1} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes as u64)
    }
}
