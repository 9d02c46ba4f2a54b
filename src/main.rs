use env_logger::Env;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use sheet_master_data::config::CONFIG;
use sheet_master_data::models::GameInfoTable;
use sheet_master_data::services::GoogleSheetService;
use sheet_master_data::utils::sheet_json::{convert_game_info, parameter_schema};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // CONFIG 初始化时会加载 .env
    CONFIG.validate()?;

    // 初始化日志
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    log::info!(
        "Fetching sheet '{}' from {}",
        CONFIG.sheet_name,
        CONFIG.base_url
    );

    let service = GoogleSheetService::new();
    let token = CancellationToken::new();

    // Ctrl+C 时取消进行中的请求
    let canceller = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("收到中断信号，取消请求");
            canceller.cancel();
        }
    });

    let Some(raw) = service
        .get_master_data_text(&CONFIG.sheet_name, &token)
        .await?
    else {
        log::warn!("未获取到数据");
        return Ok(());
    };

    if let Some(schema) = parameter_schema(&raw)? {
        for ((key, field_type), description) in schema
            .keys
            .iter()
            .zip(&schema.types)
            .zip(&schema.descriptions)
        {
            log::info!("{key}: {field_type} ({description})");
        }
    }

    let table: GameInfoTable<Value> = convert_game_info(&raw)?;
    log::info!("共 {} 行数据", table.game_info.len());
    println!("{}", serde_json::to_string_pretty(&table)?);

    Ok(())
}
