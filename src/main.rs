use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod media;
mod models;
mod session;
mod share;
mod storage;
mod text;

use api::github::GitHubClient;
use config::{Command, Config};
use error::{AppError, AppResult};
use models::{AiCredentials, Credentials, GithubCredentials, LinkedInCredentials};
use storage::CredentialStore;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Инициализируем логирование
    init_tracing()?;

    // Парсим конфигурацию из CLI и env
    let config = Config::parse();

    // Валидируем конфигурацию
    config.validate()?;

    let store = CredentialStore::new(&config.storage_dir);

    match config.command {
        Command::Login {
            github_username,
            github_token,
            linkedin_token,
            ai_key,
        } => {
            let credentials = Credentials {
                github: GithubCredentials {
                    username: github_username,
                    access_token: github_token,
                },
                linkedin: LinkedInCredentials {
                    access_token: linkedin_token,
                },
                ai: AiCredentials { api_key: ai_key },
            };
            store.save(&credentials);
            println!("Credentials saved for GitHub user {}", credentials.github.username);
        }

        Command::Logout => {
            store.clear();
            println!("Credentials removed");
        }

        Command::Repos => {
            let credentials = load_credentials(&store)?;
            let github = GitHubClient::new(credentials.github.access_token.clone());
            let repos = github.list_repositories(&credentials.github.username).await?;

            println!("{} repositories:", repos.len());
            for repo in &repos {
                println!(
                    "  {} - ⭐ {} - {} - {} media files",
                    repo.name,
                    repo.stargazers_count,
                    repo.language.as_deref().unwrap_or("n/a"),
                    repo.media.total()
                );
                if let Some(description) = &repo.description {
                    println!("    {}", description);
                }
            }
        }

        Command::Scan { repo } => {
            let credentials = load_credentials(&store)?;
            let github = GitHubClient::new(credentials.github.access_token.clone());
            let full_name = qualify_repo(&credentials.github.username, &repo);

            let report = github.media_diagnostics(&full_name).await;
            print_scan_report(&report);
        }

        Command::Generate { repo, detailed } => {
            let credentials = load_credentials(&store)?;
            let draft =
                share::run_generate(&credentials, &repo, detailed, &config.ai_model).await?;

            println!("{}", draft.content);
            if !draft.hashtags.is_empty() {
                println!("\n{}", draft.hashtags.join(" "));
            }
            if !draft.suggested_media.is_empty() {
                println!("\nSuggested images:");
                for image in &draft.suggested_media {
                    println!("  {} ({})", image.name, text::format_file_size(image.size));
                }
            }
        }

        Command::Share {
            repo,
            text,
            media,
            local_files,
            visibility,
            skip_ai,
        } => {
            let credentials = load_credentials(&store)?;
            let options = share::ShareOptions {
                repo_name: repo,
                text,
                media,
                local_files,
                visibility,
                skip_ai,
            };

            let published =
                share::run_custom_share(&credentials, options, &config.ai_model).await?;
            println!("Published: {}", published.share_url);
        }
    }

    Ok(())
}

fn load_credentials(store: &CredentialStore) -> AppResult<Credentials> {
    store.load().ok_or(AppError::NotLoggedIn)
}

/// Имя вида owner/name остаётся как есть, короткое имя дополняется
/// именем пользователя из учётных данных.
fn qualify_repo(username: &str, repo: &str) -> String {
    if repo.contains('/') {
        repo.to_string()
    } else {
        format!("{}/{}", username, repo)
    }
}

fn print_scan_report(report: &models::MediaScanReport) {
    println!("Media scan of {}:", report.repository);
    println!(
        "  {} images, {} videos, {} documents",
        report.media_found.images.len(),
        report.media_found.videos.len(),
        report.media_found.documents.len()
    );

    for scan in &report.directories_scanned {
        println!(
            "  scanned {}: {} files",
            scan.path,
            scan.file_count.unwrap_or(0)
        );
    }
    for scan in &report.errors {
        println!(
            "  error in {}: {}",
            scan.path,
            scan.error.as_deref().unwrap_or("unknown")
        );
    }

    for image in &report.media_found.images {
        let access = match image.accessible {
            Some(true) => " [accessible]",
            Some(false) => " [not accessible]",
            None => "",
        };
        println!(
            "  image {} ({}){}",
            image.path,
            text::format_file_size(image.size),
            access
        );
    }

    if !report.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &report.recommendations {
            println!("  - {}", recommendation);
        }
    }
}

/// Инициализирует систему логирования с использованием tracing
fn init_tracing() -> AppResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .init();

    info!("Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_repo_name_is_qualified_with_username() {
        assert_eq!(qualify_repo("octocat", "demo"), "octocat/demo");
    }

    #[test]
    fn full_repo_name_is_left_untouched() {
        assert_eq!(qualify_repo("octocat", "torvalds/linux"), "torvalds/linux");
    }
}
