//! `lsp-core-server`: a thin CLI around [`lsp_core_server::Dispatcher`]
//! that picks one of the four transport bindings and runs it to
//! completion. No language plugins are registered here — embedding a
//! real language means calling [`lsp_core_registry::Languages::add_language`]
//! before [`lsp_core_server::Dispatcher::new`], which this binary has
//! nothing to plug in for on its own.

use clap::{Parser, ValueEnum};
use lsp_core_registry::Languages;
use lsp_core_server::{standard_handlers, Dispatcher};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Transport {
    Stdio,
    Tcp,
    Websocket,
    NodeIpc,
}

/// Generic Language Server Protocol framework core
#[derive(Parser, Debug)]
#[command(name = "lsp-core-server", version, about, long_about = None)]
struct Args {
    /// Transport to serve the protocol over
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Address to bind for --transport tcp or --transport websocket
    #[arg(long, default_value = "127.0.0.1:7658")]
    addr: String,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let languages = Arc::new(Languages::new());

    match args.transport {
        Transport::Stdio => {
            tracing::info!("lsp-core-server: serving stdio");
            let conn = lsp_core_transport::stdio::connection();
            let out = lsp_core_server::spawn_writer(conn.writer);
            let dispatcher = Dispatcher::new(languages, standard_handlers(), out);
            dispatcher.run(conn.reader).await;
        }
        Transport::Tcp => {
            tracing::info!(addr = %args.addr, "lsp-core-server: listening on tcp");
            let listener = lsp_core_transport::tcp::bind(&args.addr).await?;
            loop {
                let conn = lsp_core_transport::tcp::accept(&listener).await?;
                let languages = languages.clone();
                tokio::spawn(async move {
                    let out = lsp_core_server::spawn_writer(conn.writer);
                    let dispatcher = Dispatcher::new(languages, standard_handlers(), out);
                    dispatcher.run(conn.reader).await;
                });
            }
        }
        Transport::Websocket => {
            tracing::info!(addr = %args.addr, "lsp-core-server: listening on websocket");
            let listener = lsp_core_transport::tcp::bind(&args.addr).await?;
            loop {
                let (stream, _peer) = listener.accept().await?;
                let languages = languages.clone();
                tokio::spawn(async move {
                    let conn = match lsp_core_transport::websocket::accept(stream).await {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "websocket handshake failed");
                            return;
                        }
                    };
                    let out = lsp_core_server::spawn_writer(conn.writer);
                    let dispatcher = Dispatcher::new(languages, standard_handlers(), out);
                    dispatcher.run(conn.reader).await;
                });
            }
        }
        Transport::NodeIpc => {
            tracing::info!("lsp-core-server: attaching to Node IPC channel");
            let conn = lsp_core_transport::node_ipc::connection()?;
            let out = lsp_core_server::spawn_writer(conn.writer);
            let dispatcher = Dispatcher::new(languages, standard_handlers(), out);
            dispatcher.run(conn.reader).await;
        }
    }

    Ok(())
}
