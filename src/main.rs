use anyhow::Result;
use booklet_review::cli::Args;
use booklet_review::utils::logging;
use booklet_review::{App, Config};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置，命令行参数优先
    let mut config = Config::from_env();
    args.apply_overrides(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);

    config.validate()?;
    let plan = args.into_plan()?;

    // 初始化并运行应用
    let _outcome = App::initialize(config, plan)?.run().await?;

    Ok(())
}
