use std::net::SocketAddr;
use std::sync::Arc;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::handler::RequestHandler;
use super::Result;

pub struct Listener {
    listener: TcpListener,
}

impl Listener {
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!(error = %e, addr, "포트 바인딩 실패");
            e
        })?;

        info!(addr = %listener.local_addr()?, "리스너 시작");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self, handler: Arc<RequestHandler>) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        if let Err(err) = handler.handle_connection(io).await {
                            error!(error = %err, "연결 처리 실패");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "연결 수락 실패");
                }
            }
        }
    }
}
