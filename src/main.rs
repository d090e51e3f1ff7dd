use clap::Parser;
use nm_serviceability::core::pipeline::{render_outputs, SUMMARY_FILE};
use nm_serviceability::core::Pipeline;
use nm_serviceability::utils::error::DashboardError;
use nm_serviceability::utils::{logger, validation::Validate};
use nm_serviceability::{CliConfig, DashboardPipeline, EtlEngine, LocalStorage};

fn exit_with(e: &DashboardError) -> ! {
    tracing::error!(
        "❌ Dashboard build failed: {} (Severity: {:?})",
        e,
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}

async fn dry_run(pipeline: &impl Pipeline) -> Result<(), DashboardError> {
    let source = pipeline.extract().await?;
    let report = pipeline.transform(source).await?;
    let files = render_outputs(&report)?;

    if let Some((_, summary)) = files.iter().find(|(name, _)| *name == SUMMARY_FILE) {
        println!("{}", String::from_utf8_lossy(summary));
    }
    println!(
        "{} sites, {} countries, {} gateways, {} isotopes, {} serviceable sites",
        report.stats.total_sites,
        report.stats.countries,
        report.stats.gateways,
        report.stats.isotopes,
        report.stats.serviceable_sites
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting nm-serviceability");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let pipeline = DashboardPipeline::new(LocalStorage::default(), config);

    if cli.dry_run {
        tracing::info!("🔍 Dry run: nothing will be written");
        if let Err(e) = dry_run(&pipeline).await {
            exit_with(&e);
        }
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Dashboard data written");
            println!("✅ Dashboard data written to: {}", output_path);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
