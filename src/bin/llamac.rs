//! llamac CLI - 命令行入口
//!
//! 纯前端，无业务逻辑。只负责参数解析和调用 API。

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::Level;

use llamac::{
    api::{pipeline, FrontendError, PrintTaps},
    core::kit::generator::try_drain,
    core::logger::init_with_file,
    init_config,
    platform::{open_print_target, print_error_with_source},
    Config, LimitConfig, LogConfig, LogFormat, ScannerConfig,
};

#[derive(Parser)]
#[command(
    name = "llamac",
    about = "Llama compiler front end: include-resolving source scanner",
    version
)]
struct Cli {
    /// 源文件路径
    file: String,

    /// 日志级别 (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// 扫描器日志级别
    #[arg(long, value_enum)]
    log_scanner: Option<LogLevelArg>,

    /// 生成器日志级别
    #[arg(long, value_enum)]
    log_generator: Option<LogLevelArg>,

    /// 日志输出格式（同时决定错误报告格式）
    #[arg(long, value_enum, default_value = "pretty")]
    format: LogFormatArg,

    /// 日志同时输出到文件
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// 打印预处理后的源码（默认 stdout；指定文件须写成 `--print-source=FILE`）
    #[arg(long, value_name = "FILE", require_equals = true, num_args = 0..=1)]
    print_source: Option<Option<PathBuf>>,

    /// 每个扫描事件打印一行 JSON（默认 stdout）
    #[arg(long, value_name = "FILE", require_equals = true, num_args = 0..=1)]
    print_events: Option<Option<PathBuf>>,

    /// 根文件之上最多的 include 嵌套层数
    #[arg(long, value_name = "N", default_value_t = LimitConfig::default().max_include_depth)]
    max_include_depth: usize,

    /// 不检测循环 include（只靠嵌套上限兜底）
    #[arg(long)]
    no_cycle_check: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn main() {
    let cli = Cli::parse();

    // 初始化配置和日志
    let config = build_config(&cli);
    if init_config(config).is_err() {
        eprintln!("error: configuration already initialized");
        process::exit(1);
    }

    let format = match cli.format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    if let Err(e) = init_with_file(format, cli.log_file.as_ref()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }

    tracing::info!(target: "llamac::cli", file = %cli.file, "starting");

    match run(&cli) {
        Ok(events) => {
            tracing::info!(target: "llamac::cli", events, "done");
        }
        Err(e) => {
            report_error(&e, cli.format);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<usize, FrontendError> {
    let mut taps = PrintTaps::none();
    if let Some(target) = &cli.print_source {
        taps.source = Some(open_print_target(target.clone())?);
    }
    if let Some(target) = &cli.print_events {
        taps.events = Some(open_print_target(target.clone())?);
    }

    let stream = pipeline(&cli.file, taps)?;
    Ok(try_drain(stream)?)
}

fn report_error(e: &FrontendError, format: LogFormatArg) {
    if format == LogFormatArg::Json {
        match e.to_report().to_json() {
            Ok(json) => eprintln!("{}", json),
            Err(_) => print_error_with_source(e),
        }
    } else {
        print_error_with_source(e);
    }
}

fn build_config(cli: &Cli) -> Config {
    // 根据 -v 次数确定全局级别
    let global_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    Config {
        log: LogConfig {
            global: global_level,
            generator: cli.log_generator.map(to_tracing_level),
            scanner: cli.log_scanner.map(to_tracing_level),
        },
        limits: LimitConfig {
            max_include_depth: cli.max_include_depth,
        },
        scanner: ScannerConfig {
            detect_cycles: !cli.no_cycle_check,
        },
    }
}

fn to_tracing_level(level: LogLevelArg) -> Level {
    match level {
        LogLevelArg::Error => Level::ERROR,
        LogLevelArg::Warn => Level::WARN,
        LogLevelArg::Info => Level::INFO,
        LogLevelArg::Debug => Level::DEBUG,
        LogLevelArg::Trace => Level::TRACE,
    }
}
