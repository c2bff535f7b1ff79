use std::io;

use log::info;
use tokio::{net::TcpListener, signal};

use trainerd::{
    JpegCodec, Layout, Orchestrator, Server, StateStore,
    config::Config,
    external::{ScriptAugmenter, ScriptTrainer},
};

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let cfg = Config::from_env().map_err(io::Error::from)?;

    let orchestrator = Orchestrator::new(
        Layout::new(&cfg.data_dir),
        JpegCodec,
        ScriptAugmenter::new(&cfg.augment_script),
        ScriptTrainer::new(&cfg.train_script),
    );

    let store = StateStore::load(&cfg.state_path).await?;
    orchestrator.init_state(&store).await?;
    info!("working tree rehydrated under {}", cfg.data_dir.display());

    let listener = TcpListener::bind(&cfg.addr).await?;
    info!("listening at {}", cfg.addr);

    let server = Server::new(orchestrator, store, &cfg.state_path);

    tokio::select! {
        ret = server.serve(listener) => ret,
        _ = signal::ctrl_c() => {
            info!("received SIGTERM, shutting down");
            Ok(())
        }
    }
}
