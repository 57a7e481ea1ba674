use velo_api::infrastructure::database::mysql::{init_mysql, init_schema};
use velo_api::logging::init_logging;
use velo_api::{create_app, AppError, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    init_logging(&config)?;

    tracing::info!(environment = %config.server.environment, "Starting GO Velo API");

    // 初始化数据库连接
    let db_pool = init_mysql(&config).await?;
    init_schema(&db_pool).await?;

    // 创建并启动服务器
    let addr = config.bind_addr();
    let app = create_app(AppState::new(config, db_pool)).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", &addr);

    axum::serve(listener, app).await?;
    Ok(())
}
