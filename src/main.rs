//! Service entrypoint: config, logging, database, reconciliation worker.
//!
//! The binary wires the engine against its mock rails; production
//! deployments inject the real rail clients from the outer service layer.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use pixramp::config::AppConfig;
use pixramp::conversion::{ConversionDb, SellOrchestrator};
use pixramp::customer::CustomerDirectory;
use pixramp::db::Database;
use pixramp::ledger::LedgerService;
use pixramp::payout::{PayoutDb, PayoutSaga};
use pixramp::rails::{
    BankRail, ChainClient, ExchangeClient, MockBankRail, MockExchange, MockPolygonChain,
    MockTronChain, Network,
};
use pixramp::recon::{ReconWorker, WebhookIntake};
use pixramp::wallet::WalletRepo;
use pixramp::{BuyOrchestrator, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::args().nth(1).unwrap_or_else(|| "dev".to_string());
    let config = AppConfig::load(&env);
    let _guard = logging::init_logging(&config);

    info!(env = %env, "Starting pixramp");

    let database = Database::connect(&config.postgres_url)
        .await
        .context("connecting to PostgreSQL")?;
    database.init_schema().await.context("applying schema")?;
    let pool = database.pool().clone();

    let ledger = Arc::new(LedgerService::new(pool.clone()));
    let conversions = Arc::new(ConversionDb::new(pool.clone()));
    let payouts = Arc::new(PayoutDb::new(pool.clone()));
    let wallets = Arc::new(WalletRepo::new(pool.clone()));
    let customers = Arc::new(CustomerDirectory::new(pool.clone()));

    let bank: Arc<dyn BankRail> = Arc::new(MockBankRail::new());
    let exchange: Arc<dyn ExchangeClient> = Arc::new(MockExchange::new());
    let mut chains: HashMap<Network, Arc<dyn ChainClient>> = HashMap::new();
    chains.insert(Network::Tron, Arc::new(MockTronChain::new()));
    chains.insert(Network::Polygon, Arc::new(MockPolygonChain::new()));

    let _buy = Arc::new(BuyOrchestrator::new(
        ledger.clone(),
        conversions.clone(),
        wallets.clone(),
        customers.clone(),
        bank.clone(),
        exchange.clone(),
        config.engine.clone(),
    ));
    let sell = Arc::new(SellOrchestrator::new(
        ledger.clone(),
        conversions.clone(),
        wallets.clone(),
        customers.clone(),
        exchange.clone(),
        chains,
        config.engine.clone(),
        config.matching.clone(),
    ));
    let saga = Arc::new(PayoutSaga::new(ledger.clone(), payouts, bank));
    let _webhooks = Arc::new(WebhookIntake::new(saga, ledger, customers));

    let worker = Arc::new(ReconWorker::new(
        conversions,
        sell,
        exchange,
        pool,
        config.poller.clone(),
        config.matching.clone(),
    ));

    let worker_handle = {
        let worker = worker.clone();
        tokio::spawn(async move { worker.run().await })
    };

    info!("Reconciliation worker running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("Shutting down");
    worker_handle.abort();

    Ok(())
}
