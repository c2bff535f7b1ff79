//! Sends one image file to a running trainerd instance.

use std::{borrow::Cow, env, io, process::ExitCode};

use tokio::{fs, net::TcpStream};

use rpc::msg::{Command, Msg};
use trainerd::server::ACCEPT_IMAGE;

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(addr), Some(path)) = (args.next(), args.next()) else {
        eprintln!("usage: submit <host:port> <image file>");
        return Ok(ExitCode::FAILURE);
    };

    let bytes = fs::read(&path).await?;

    let stream = TcpStream::connect(&addr).await?;
    let (rx, tx) = stream.into_split();
    let (mut rx, mut tx) = rpc::channel(rx, tx);

    let call = Msg::Call {
        method: Cow::Borrowed(ACCEPT_IMAGE),
        body: &bytes,
    };
    tx.send(&call).await?;

    let mut rx_buf = Vec::new();
    let code = match rx.recv_into::<Msg>(&mut rx_buf).await? {
        Msg::Ok => {
            println!("accepted {path}");
            ExitCode::SUCCESS
        }
        Msg::Fault(fault) => {
            eprintln!("rejected ({:?}): {}", fault.code, fault.detail);
            ExitCode::FAILURE
        }
        msg => {
            eprintln!("unexpected reply: {msg:?}");
            ExitCode::FAILURE
        }
    };

    tx.send(&Msg::Control(Command::Disconnect)).await?;
    Ok(code)
}
