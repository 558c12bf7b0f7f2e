use std::sync::Arc;

use video_page::{config, discovery, logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    cfg.validate()?;
    logger::init(&cfg)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    match discovery::local_ipv4_addrs() {
        Ok(addrs) => logger::log_local_addresses(&addrs),
        Err(e) => logger::log_warning(&format!("Could not list local addresses: {e}")),
    }

    if !cfg.listing.root.is_dir() {
        logger::log_warning(&format!(
            "Serving root {} is not a readable directory; listings will fail",
            cfg.listing.root.display()
        ));
    }

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg));
    server::serve(listener, state, server::signal::wait_for_shutdown()).await?;

    logger::log_info("Server stopped");
    Ok(())
}
