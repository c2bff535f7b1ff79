use std::{borrow::Cow, io, io::Cursor, path::Path};

use tokio::{
    fs,
    net::{TcpListener, TcpStream},
};

use rpc::msg::{Command, FaultCode, Msg};
use trainerd::{
    JpegCodec, Layout, Orchestrator, Server, StateStore,
    error::{Result, ServiceErr},
    external::{Augmenter, Trainer},
    server::ACCEPT_IMAGE,
};

fn sample_jpeg(seed: u8) -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 8, |x, y| image::Rgb([seed, x as u8, y as u8]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

struct FakeAugmenter;

impl Augmenter for FakeAugmenter {
    async fn augment(&self, _input_dir: &Path, aug_dir: &Path, _unaug_dir: &Path) -> Result<()> {
        fs::write(aug_dir.join("00.JPEG"), [0xAA; 4]).await?;
        Ok(())
    }
}

struct FakeTrainer {
    weights: Vec<u8>,
}

impl Trainer for FakeTrainer {
    async fn train(&self, _old_net: &Path, save_dir: &Path) -> Result<()> {
        fs::write(save_dir.join("adversarial.net"), &self.weights).await?;
        Ok(())
    }
}

struct FailingTrainer;

impl Trainer for FailingTrainer {
    async fn train(&self, _old_net: &Path, _save_dir: &Path) -> Result<()> {
        Err(ServiceErr::TrainingFailed { status: Some(1) })
    }
}

async fn call(
    tx: &mut rpc::RpcSender<tokio::net::tcp::OwnedWriteHalf>,
    rx: &mut rpc::RpcReceiver<tokio::net::tcp::OwnedReadHalf>,
    method: &str,
    body: &[u8],
) -> io::Result<Option<FaultCode>> {
    tx.send(&Msg::Call {
        method: Cow::Borrowed(method),
        body,
    })
    .await?;

    let mut buf = Vec::new();
    match rx.recv_into::<Msg>(&mut buf).await? {
        Msg::Ok => Ok(None),
        Msg::Fault(fault) => Ok(Some(fault.code)),
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn accept_image_over_the_wire() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let state_path = dir.path().join("state.json");

    let orch = Orchestrator::new(
        Layout::new(dir.path()),
        JpegCodec,
        FakeAugmenter,
        FakeTrainer {
            weights: vec![9, 9, 9],
        },
    );
    let store = StateStore::default();
    orch.init_state(&store).await.map_err(io::Error::from)?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = Server::new(orch, store, &state_path);
    let server_task = tokio::spawn(server.serve(listener));

    let stream = TcpStream::connect(addr).await?;
    let (rx, tx) = stream.into_split();
    let (mut rx, mut tx) = rpc::channel(rx, tx);

    // Valid image: accepted, state blob persisted.
    let fault = call(&mut tx, &mut rx, ACCEPT_IMAGE, &sample_jpeg(1)).await?;
    assert_eq!(fault, None);

    // Garbage body: rejected as an invalid image.
    let fault = call(&mut tx, &mut rx, ACCEPT_IMAGE, b"garbage").await?;
    assert_eq!(fault, Some(FaultCode::InvalidImage));

    // Empty body: the method was called with no image at all.
    let fault = call(&mut tx, &mut rx, ACCEPT_IMAGE, &[]).await?;
    assert_eq!(fault, Some(FaultCode::MissingImage));

    // Unregistered method name.
    let fault = call(&mut tx, &mut rx, "trainForever", &[]).await?;
    assert_eq!(fault, Some(FaultCode::UnknownMethod));

    tx.send(&Msg::Control(Command::Disconnect)).await?;
    server_task.abort();

    // The successful call persisted the gathered state.
    let persisted = StateStore::load(&state_path)
        .await
        .map_err(io::Error::from)?;
    assert_eq!(persisted.network(), Some(&[9u8, 9, 9][..]));
    assert_eq!(persisted.aug_images(), Some(&[vec![0xAA; 4]][..]));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn training_failure_reaches_the_client_as_a_typed_fault() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let state_path = dir.path().join("state.json");

    let orch = Orchestrator::new(
        Layout::new(dir.path()),
        JpegCodec,
        FakeAugmenter,
        FailingTrainer,
    );
    let store = StateStore::default();
    orch.init_state(&store).await.map_err(io::Error::from)?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_task = tokio::spawn(Server::new(orch, store, &state_path).serve(listener));

    let stream = TcpStream::connect(addr).await?;
    let (rx, tx) = stream.into_split();
    let (mut rx, mut tx) = rpc::channel(rx, tx);

    let fault = call(&mut tx, &mut rx, ACCEPT_IMAGE, &sample_jpeg(2)).await?;
    assert_eq!(fault, Some(FaultCode::TrainingFailed));

    tx.send(&Msg::Control(Command::Disconnect)).await?;
    server_task.abort();

    // Nothing was persisted for the failed cycle.
    assert!(!state_path.exists());

    Ok(())
}
