use tracing::error;

use h5bp_server::logging::init_logging;
use h5bp_server::server::Server;
use h5bp_server::settings::Settings;

#[tokio::main]
async fn main() {
    init_logging();

    let settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "설정 로드 실패");
            std::process::exit(1);
        }
    };

    let server = match Server::new(settings, None).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "서버 초기화 실패");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!(error = %e, "서버 실행 실패");
        std::process::exit(1);
    }
}
