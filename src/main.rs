use devserve::config::Config;
use devserve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Document root is fixed at launch
    let root = std::env::current_dir()?;

    // Create Tokio runtime, worker threads from config or CPU count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    // Bind before announcing; a busy port is fatal
    runtime.block_on(server::start(cfg, root))?;
    Ok(())
}
