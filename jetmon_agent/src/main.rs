//! jetmon_agent entry point: parse args, start the sampler, serve HTTP(S).

use std::env;

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jetmon_agent::config::parse_args;
use jetmon_agent::http::router;
use jetmon_agent::sampler::spawn_sampler;
use jetmon_agent::state::AppState;
use jetmon_agent::tegrastats::is_jetson;
use jetmon_agent::tls::ensure_self_signed_cert;
use jetmon_agent::types::PlatformInfo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            if msg.starts_with("Usage:") {
                return Ok(());
            }
            std::process::exit(2);
        }
    };

    let platform = PlatformInfo::detect(is_jetson());
    info!(
        system = %platform.system,
        machine = %platform.machine,
        jetson = platform.is_jetson,
        "starting jetmon_agent"
    );

    let state = AppState::new(platform);
    let _sampler = spawn_sampler(state.clone(), cfg.sample_period);
    let app = router(state);
    let addr = cfg.addr();

    if cfg.enable_ssl {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let (cert, key) = ensure_self_signed_cert()?;
        let tls = RustlsConfig::from_pem_file(&cert, &key)
            .await
            .context("load TLS certificate")?;
        info!("jetmon_agent listening on https://{addr}");
        axum_server::bind_rustls(addr, tls)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind {addr}"))?;
        info!("jetmon_agent listening on http://{}", listener.local_addr()?);
        axum::serve(listener, app).await?;
    }
    Ok(())
}
