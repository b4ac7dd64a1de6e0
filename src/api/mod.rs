pub mod ai;
pub mod github;
pub mod linkedin;

use std::time::Duration;

pub const USER_AGENT: &str = "gloss/0.1";

/// Политика повторов для рискованных исходящих вызовов: фиксированное
/// число попыток, экспоненциальная выдержка, явный список статусов,
/// после которых есть смысл повторять.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub retryable_statuses: &'static [u16],
}

impl RetryPolicy {
    /// Политика AI генерации: 3 попытки, повтор только на 429,
    /// паузы 2s и 4s между попытками.
    pub fn rate_limit_backoff() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            retryable_statuses: &[429],
        }
    }

    /// Выдержка после неудачной попытки attempt (нумерация с 1):
    /// base * 2^attempt, то есть 2s, 4s, 8s при base = 1s.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Есть ли ещё попытки после неудачной attempt (нумерация с 1).
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Мини HTTP сервер для тестов клиентов: одно соединение - один
    /// заготовленный ответ, головы входящих запросов записываются для
    /// проверки заголовков и порядка обращений.
    pub async fn serve_responses(responses: Vec<String>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            head.extend_from_slice(&buf[..n]);
                            if head.windows(4).any(|window| window == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                seen.lock().unwrap().push(String::from_utf8_lossy(&head).to_string());
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (base_url, requests)
    }

    pub fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::rate_limit_backoff();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn only_listed_statuses_are_retryable() {
        let policy = RetryPolicy::rate_limit_backoff();
        assert!(policy.is_retryable(429));
        assert!(!policy.is_retryable(401));
        assert!(!policy.is_retryable(403));
        assert!(!policy.is_retryable(500));
    }

    #[test]
    fn attempt_budget_is_fixed() {
        let policy = RetryPolicy::rate_limit_backoff();
        assert!(policy.has_attempts_left(1));
        assert!(policy.has_attempts_left(2));
        assert!(!policy.has_attempts_left(3));
    }
}
