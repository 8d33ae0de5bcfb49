use anyhow::Context;
use clap::Parser;
use mealstretch::utils::error::{AppError, ErrorSeverity};
use mealstretch::utils::logger;
use mealstretch::{AppConfig, CliConfig, Command, MealStretchService, PlanRequest, SelectionStrategy};

fn exit_with(e: &AppError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,      // 輸入或無結果
        ErrorSeverity::Medium => 2,   // 上游錯誤，可重試
        ErrorSeverity::High => 1,     // 設定錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在時忽略
    dotenvy::dotenv().ok();

    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            exit_with(&e);
        }
    };
    if cli.verbose {
        tracing::debug!(
            "Config: server {}:{}, strategy {}, timeout {}s",
            config.server.host,
            config.server.port,
            config.selector.strategy,
            config.http.timeout_seconds
        );
    }

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = config.socket_addr().unwrap_or_else(|e| exit_with(&e));
            let service = MealStretchService::from_config(&config).unwrap_or_else(|e| exit_with(&e));

            tracing::info!("Starting MealStretch API");
            if let Err(e) = mealstretch::app::server::serve(service, addr).await {
                exit_with(&e);
            }
        }
        Command::Plan {
            budget,
            people,
            allergies,
            no_stove,
            region,
            mode,
        } => {
            let service = MealStretchService::from_config(&config).unwrap_or_else(|e| exit_with(&e));
            let strategy = match mode {
                Some(SelectionStrategy::Ranked { .. }) => SelectionStrategy::Ranked {
                    limit: config.selector.max_results.max(1),
                },
                Some(single) => single,
                None => service.strategy(),
            };
            let budget = mealstretch::utils::validation::validate_budget(budget)
                .unwrap_or_else(|e| exit_with(&e));
            let request = PlanRequest::new(budget, people)
                .with_allergies(allergies)
                .with_stove(!no_stove);

            let outcome = service
                .plan_for_region(&request, region, strategy)
                .unwrap_or_else(|e| exit_with(&e));
            let json = serde_json::to_string_pretty(outcome.selection.plans())
                .context("failed to serialize meal plans")?;
            println!("{}", json);
        }
        Command::Inventory => {
            let service = MealStretchService::from_config(&config).unwrap_or_else(|e| exit_with(&e));
            let json = serde_json::to_string_pretty(&service.inventory())
                .context("failed to serialize inventory")?;
            println!("{}", json);
        }
    }

    Ok(())
}
