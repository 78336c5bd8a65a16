use std::sync::{ atomic::{ AtomicBool, Ordering }, Arc };

use crate::{
    arbitrage::scanner::{ ScanSettings, Scanner },
    config::Config,
    exchange::{ client::ExchangeClient, gate::GateClient },
    models::{ symbol_map::SymbolMap, triangle::Triangle },
    utils::console::{ print_app_starting, print_config, print_scan_finished },
    API_TIMEOUT,
};
use anyhow::{ anyhow, Context, Result };
use tracing::{ error, info, warn };

pub fn run_normal_mode(config: Config) -> Result<()> {
    // Display startup information
    print_app_starting();
    print_config(&config);

    let client: Arc<dyn ExchangeClient> = Arc::new(
        GateClient::new(config.api_key.clone(), config.api_secret.clone(), config.sandbox).context(
            "Failed to create Gate client"
        )?
    );

    info!("Using exchange: {}", client.name());

    if config.dispatch_orders {
        warn!("Order dispatch is ENABLED, profitable triangles will be traded");
    } else {
        info!("Order dispatch is disabled, opportunities are only reported");
    }

    // Scanning is strictly sequential, a single-threaded runtime is all it needs
    let rt = tokio::runtime::Builder
        ::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    ctrlc
        ::set_handler(move || {
            info!("Received Ctrl+C, finishing current triangle...");
            shutdown_clone.store(true, Ordering::Relaxed);
        })
        .context("Error setting Ctrl-C handler")?;

    rt.block_on(scan(client, &config, &shutdown))
}

/// Load the catalog once, then run one pass (or keep running in continuous mode)
async fn scan(client: Arc<dyn ExchangeClient>, config: &Config, shutdown: &AtomicBool) -> Result<()> {
    let triangles = load_triangles(client.as_ref(), &config.base_asset).await?;

    let exchange = client.name().to_string();
    let scanner = Scanner::new(client, ScanSettings::from(config));
    let mut pass = 0usize;

    loop {
        pass += 1;
        let summary = scanner.run_pass(&triangles, shutdown).await;
        print_scan_finished(pass, summary.opportunities.len());

        if summary.interrupted {
            info!("Pass #{} interrupted after {} triangles", pass, summary.triangles);
        }

        if summary.incomplete_dispatches > 0 {
            error!(
                "{} triangle(s) were only partially traded, check open orders on {}",
                summary.incomplete_dispatches,
                exchange
            );
        }

        if !config.continuous || shutdown.load(Ordering::Relaxed) {
            break;
        }
    }

    info!("Triangular scanner stopped");
    Ok(())
}

/// Fetch the market list and enumerate triangles; any failure here is fatal
async fn load_triangles(client: &dyn ExchangeClient, base_asset: &str) -> Result<Vec<Triangle>> {
    let symbols = match tokio::time::timeout(API_TIMEOUT, client.list_symbols()).await {
        Ok(Ok(symbols)) => symbols,
        Ok(Err(e)) => {
            error!("Failed to fetch symbols: {}", e);
            return Err(anyhow!("Failed to fetch symbols: {}", e));
        }
        Err(_) => {
            error!("Timed out while fetching symbols");
            return Err(anyhow!("Timed out while fetching symbols"));
        }
    };

    info!("✓ Fetched {} symbols from exchange", symbols.len());
    info!("Sample: {:?}", &symbols[..symbols.len().min(5)]);

    let symbol_map = SymbolMap::from_names(&symbols);
    if symbol_map.rejected() > 0 {
        warn!("{} malformed symbols were skipped", symbol_map.rejected());
    }
    if symbol_map.is_empty() {
        return Err(anyhow!("Exchange returned no usable symbols"));
    }
    info!("Catalog holds {} symbols", symbol_map.len());

    info!("Finding triangular arbitrage paths starting with {}...", base_asset);
    let triangles = symbol_map.find_triangles(base_asset);

    if triangles.is_empty() {
        warn!("No triangular paths found. Check the base asset configuration.");
        return Err(anyhow!("No triangular paths found for {}. Cannot continue.", base_asset));
    }

    let sample = triangles
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, t)|
            format!("{:3}. {} → {} → {}", i + 1, t.anchor_leg(), t.cross_leg(), t.closing_leg())
        )
        .collect::<Vec<_>>()
        .join("\n");

    info!("Found {} combinations. Sample paths: \n{}", triangles.len(), sample);

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mock_client::MockExchangeClient;

    #[tokio::test]
    async fn test_load_triangles() {
        let client = MockExchangeClient::new().with_symbols(&[
            "BTC/USDT",
            "ETH/BTC",
            "ETH/USDT",
            "BROKEN",
        ]);

        let triangles = load_triangles(&client, "USDT").await.unwrap();
        assert_eq!(triangles.len(), 1);
    }

    #[tokio::test]
    async fn test_no_triangles_is_fatal() {
        let client = MockExchangeClient::new().with_symbols(&["BTC/USDT", "ETH/USDT"]);
        assert!(load_triangles(&client, "USDT").await.is_err());
    }
}
