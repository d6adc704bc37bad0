use super::ui;
use crate::core::config::AppConfig;
use crate::core::error::ClientError;
use crate::providers::health::{self, ServiceHealth};
use anyhow::Result;
use futures::future::join;

fn status_line(name: &str, url: &str, result: &Result<ServiceHealth, ClientError>) -> String {
    let status = match result {
        Ok(health) if health.is_up() => ui::style_text("UP", ui::StyleType::Result),
        Ok(health) => ui::style_text(&health.status, ui::StyleType::Warning),
        Err(e) => ui::style_text(&format!("DOWN ({e})"), ui::StyleType::Error),
    };
    format!("{name:<12} {url:<32} {status}")
}

/// Probes both configured services concurrently.
pub async fn run(config: &AppConfig) -> Result<()> {
    let (catalog, conversion) = join(
        health::check(config.catalog_url()),
        health::check(config.conversion_url()),
    )
    .await;

    println!("{}", status_line("catalog", config.catalog_url(), &catalog));
    println!(
        "{}",
        status_line("conversion", config.conversion_url(), &conversion)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        let up = Ok(ServiceHealth {
            status: "UP".to_string(),
            service: None,
        });
        assert!(status_line("catalog", "http://x", &up).contains("UP"));

        let down = Err(ClientError::Status {
            status: 503,
            message: None,
        });
        assert!(status_line("catalog", "http://x", &down).contains("DOWN (HTTP error: 503)"));
    }
}
