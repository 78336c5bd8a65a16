use crate::config::Config;
use tracing::info;
use colored::*;
use figlet_rs::FIGfont;

pub fn print_config(config: &Config) {
    // Credentials are never serialized
    let json = serde_json::to_string_pretty(config).unwrap_or_default();

    info!("\n{}: \n{}", String::from("[CONFIG]").blue().underline(), json.magenta());
}

fn print_banner(text: &str) {
    let font = FIGfont::standard().ok();
    match font.as_ref().and_then(|font| font.convert(text)) {
        Some(figure) => info!("\n{}", figure),
        None => info!("{}", text),
    }
}

pub fn print_app_starting() {
    print_banner("Scanner starting...");
}

pub fn print_scan_finished(pass: usize, opportunities: usize) {
    info!(
        "{} pass #{} finished, {} opportunities",
        String::from("[SCAN]").blue().underline(),
        pass,
        opportunities.to_string().bright_green().bold()
    );
}
