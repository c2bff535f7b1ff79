use std::{io, path::PathBuf};

use log::{error, info, warn};
use tokio::net::{TcpListener, TcpStream};

use rpc::msg::{Command, Fault, FaultCode, Msg};

use crate::{
    codec::ImageCodec,
    error::ServiceErr,
    external::{Augmenter, Trainer},
    orchestrator::Orchestrator,
    state::StateStore,
};

/// The one method this service exposes.
pub const ACCEPT_IMAGE: &str = "acceptImage";

/// Serves the RPC surface: one connection and one call at a time, so
/// calls never race on the shared input file or working directories.
///
/// The store is persisted to `state_path` after every successful
/// training cycle and nowhere else.
pub struct Server<C, A, T> {
    orchestrator: Orchestrator<C, A, T>,
    store: StateStore,
    state_path: PathBuf,
}

impl<C, A, T> Server<C, A, T>
where
    C: ImageCodec,
    A: Augmenter,
    T: Trainer,
{
    pub fn new(
        orchestrator: Orchestrator<C, A, T>,
        store: StateStore,
        state_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            orchestrator,
            store,
            state_path: state_path.into(),
        }
    }

    /// Accepts connections on `listener` until the process is stopped.
    pub async fn serve(mut self, listener: TcpListener) -> io::Result<()> {
        loop {
            let (stream, addr) = listener.accept().await?;
            info!("client connected from {addr}");

            if let Err(e) = self.handle_connection(stream).await {
                warn!("connection from {addr} ended with {e}");
            }
        }
    }

    async fn handle_connection(&mut self, stream: TcpStream) -> io::Result<()> {
        let (rx, tx) = stream.into_split();
        let (mut rx, mut tx) = rpc::channel(rx, tx);
        let mut rx_buf = Vec::new();

        loop {
            let reply = match rx.recv_into(&mut rx_buf).await {
                Ok(Msg::Call { method, body }) => self.dispatch(&method, body).await,
                Ok(Msg::Control(Command::Disconnect)) => {
                    info!("client disconnected");
                    return Ok(());
                }
                Ok(msg) => {
                    warn!("expected Call, got {msg:?}");
                    Msg::Fault(Fault {
                        code: FaultCode::Internal,
                        detail: "expected a method call".to_string(),
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e),
            };

            tx.send(&reply).await?;
        }
    }

    /// Routes one call and translates its error kind to a wire fault.
    async fn dispatch(&mut self, method: &str, body: &[u8]) -> Msg<'static> {
        if method != ACCEPT_IMAGE {
            warn!("unknown method {method:?}");
            return Msg::Fault(Fault {
                code: FaultCode::UnknownMethod,
                detail: format!("unknown method {method}"),
            });
        }

        // An empty body is a call with no image supplied.
        let image = (!body.is_empty()).then_some(body);

        match self.orchestrator.accept_image(&mut self.store, image).await {
            Ok(()) => match self.store.save(&self.state_path).await {
                Ok(()) => Msg::Ok,
                Err(e) => {
                    error!("failed to persist state blob: {e}");
                    Msg::Fault(fault_for(&e))
                }
            },
            Err(e) => {
                warn!("{ACCEPT_IMAGE} failed: {e}");
                Msg::Fault(fault_for(&e))
            }
        }
    }
}

fn fault_for(err: &ServiceErr) -> Fault {
    let code = match err {
        ServiceErr::MissingImage => FaultCode::MissingImage,
        ServiceErr::InvalidImage(_) => FaultCode::InvalidImage,
        ServiceErr::TrainingFailed { .. } => FaultCode::TrainingFailed,
        ServiceErr::InvalidConfig(_) | ServiceErr::Io(_) => FaultCode::Internal,
    };

    Fault {
        code,
        detail: err.to_string(),
    }
}
