use api::Database;
use core::{convert::Infallible, pin::pin};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, runtime::Runtime, signal};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port = env::var("PORT")?.parse()?;

    let runtime = Runtime::new()?;
    runtime.block_on(run(port))?;

    log::info!("Server shut down.");
    Ok(())
}

async fn run(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, port).into();
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on {addr}.");

    let db = Arc::new(Database::default());
    let mut stop = pin!(signal::ctrl_c());
    loop {
        let (stream, peer) = tokio::select! {
            biased;
            result = &mut stop => {
                result?;
                log::info!("Received Ctrl+C. No longer accepting connections.");
                break;
            }
            result = listener.accept() => match result {
                Ok(pair) => pair,
                Err(err) => {
                    log::error!("Failed to accept connection: {err}");
                    continue;
                }
            },
        };

        let outer = db.clone();
        let service = service_fn(move |req| {
            let inner = outer.clone();
            async move { Ok::<_, Infallible>(api::try_respond(req, &inner).await) }
        });

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                log::error!("Connection with {peer} failed: {err}");
            }
        });
    }

    Ok(())
}
