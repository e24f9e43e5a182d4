use std::error::Error;

use oxyprobe::config::load_config;
use oxyprobe::run_probe;

const LABEL_WIDTH: usize = 16;

fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_config()?;
    let tags = config.tags();
    let label = if config.app.is_empty() {
        config.address.as_str()
    } else {
        config.app.as_str()
    };
    let label = to_fixed_width(label, LABEL_WIDTH);

    let result = run_probe(&config).await?;

    if result.is_healthy() {
        println!(
            "[{label}] ✅ URL: {}, Status: {}, Elapsed: {:.2}ms",
            config.address,
            result.http_status,
            result.response_time * 1000.0
        );
    } else {
        println!(
            "[{label}] ❌ URL: {}, Status: {}, Elapsed: {:.2}ms, data_match: {}, code_match: {}, time_match: {}{}",
            config.address,
            result.http_status,
            result.response_time * 1000.0,
            result.content_match,
            result.status_match,
            result.latency_match,
            result
                .message
                .as_deref()
                .map(|msg| format!(", msg: {msg}"))
                .unwrap_or_default()
        );
    }

    let fields = result
        .fields()
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .chain(
            config
                .echo_fields()
                .into_iter()
                .map(|(name, value)| format!("{name}={value:?}")),
        )
        .collect::<Vec<_>>()
        .join(",");
    log::info!("url_monitor tags={:?} fields={}", tags, fields);

    Ok(())
}
