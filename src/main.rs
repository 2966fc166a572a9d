use dotenvy::dotenv;

use origintrack::config;
use origintrack::runtime::run_server;
use origintrack::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    config::init_config();
    let config = config::get_config();

    // The guard must stay alive so buffered log lines are flushed on exit
    let _guard = init_logging(&config);

    run_server().await
}
