//! rsauthcharset 命令行工具
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rsauthcharset::{Charset, ConfigManager, CredentialDecoder, EncodingDetector, GlobalConfig, RuleLoader};

#[derive(Debug, Parser)]
#[command(name = "rsauthcharset", version, about = "判断浏览器编码 Basic 认证凭据所用的字符集")]
struct Cli {
    /// 配置文件（JSON，GlobalConfig 格式）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 自定义规则文件（JSON 数组），覆盖配置中的规则
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// 默认字符集，覆盖配置中的值
    #[arg(long = "default", global = true)]
    default_charset: Option<Charset>,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 检测 User-Agent 对应的字符集
    Detect {
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// 检测字符集并解码 Authorization 头
    Decode {
        #[arg(long)]
        authorization: String,
        #[arg(long)]
        user_agent: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn load_config(cli: &Cli) -> anyhow::Result<GlobalConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigManager::load_from_file(path)
            .await
            .with_context(|| format!("加载配置失败：{}", path.display()))?,
        None => ConfigManager::get_default(),
    };

    if let Some(path) = &cli.rules {
        let rule_lib = RuleLoader::load_from_file(path)
            .await
            .with_context(|| format!("加载规则失败：{}", path.display()))?;
        config.rules = Some(rule_lib.rules);
    }
    if let Some(charset) = cli.default_charset {
        config.default_charset = charset;
    }

    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli).await?;
    let detector = EncodingDetector::with_config(&config).context("构建检测器失败")?;

    match &cli.command {
        Command::Detect { user_agent } => {
            let user_agent = user_agent.as_deref();
            let family = detector.detect_family(user_agent).unwrap_or("-");
            println!("family={} charset={}", family, detector.detect(user_agent));
        }
        Command::Decode { authorization, user_agent } => {
            let charset = detector.detect(user_agent.as_deref());
            let creds = CredentialDecoder::decode(authorization, charset)
                .with_context(|| format!("按 {} 解码凭据失败", charset))?;
            println!(
                "charset={} username={} password_chars={}",
                charset,
                creds.username,
                creds.password.chars().count()
            );
        }
    }

    Ok(())
}
