//! sitzprobe as a `lightningd` plugin.
//!
//! The node launches this binary and drives it over stdin/stdout, so every
//! log line goes to stderr.

use anyhow::Result;
use tracing::info;

mod plugin;

use logger::init_tracing;
use plugin::Plugin;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    info!("Starting sitzprobe plugin v{}", env!("CARGO_PKG_VERSION"));

    Plugin::default().run(tokio::io::stdin(), tokio::io::stdout()).await
}
