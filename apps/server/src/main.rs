#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use dotenvy::dotenv;
use sitzprobe::{LightningRpc, ProbeScheduler, ReportAggregator};
use tracing::{debug, info};

mod cli;
mod config;
mod error;
mod routes;

use cli::Cli;
use config::Config;
use error::AppError;
use logger::init_tracing;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_config(cli.config.as_ref())?;
    config.apply_cli(&cli);
    debug!("{config}");

    let probe_config = config.probe_config();
    let report = Arc::new(ReportAggregator::new(&probe_config));

    let node = Arc::new(LightningRpc::new(config.rpc_socket()));
    info!(socket = %node.socket_path().display(), "Probing node");
    let _scheduler = ProbeScheduler::new(node, report.clone(), &probe_config).spawn();

    let addr: SocketAddr = format!("{}:{}", config.http.bind, config.http.port).parse()?;
    run_server(addr, report).await
}

async fn run_server(addr: SocketAddr, report: Arc<ReportAggregator>) -> Result<(), AppError> {
    info!("Serving probe report on http://{addr}/report");
    let report = web::Data::from(report);

    HttpServer::new(move || App::new().app_data(report.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
