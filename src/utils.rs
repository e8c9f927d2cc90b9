use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const PROJECT_NAME: &str = "airdrop_kit";

pub fn setup_logger() -> Result<()> {
    let colors = ColoredLevelConfig {
        trace: Color::Cyan,
        debug: Color::Magenta,
        info: Color::Green,
        warn: Color::Yellow,
        error: Color::BrightRed,
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                colors.color(record.level()),
                message
            ))
        })
        .chain(std::io::stdout())
        .level(LevelFilter::Error)
        .level_for(PROJECT_NAME, LevelFilter::Info)
        .level_for("find_nft_holders", LevelFilter::Info)
        .level_for("find_address_from_raw", LevelFilter::Info)
        .level_for("yearend_targets", LevelFilter::Info)
        .level_for("find_winner", LevelFilter::Info)
        .apply()?;

    Ok(())
}

/// Installs the process-wide recorder behind the `metrics` macros. Without it
/// every counter and gauge is a no-op. Call once, before fetching.
pub fn install_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

pub fn page_progress(total_pages: u32) -> Result<ProgressBar> {
    let bar = ProgressBar::new(total_pages as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pages")?
            .progress_chars("##-"),
    );
    Ok(bar)
}
