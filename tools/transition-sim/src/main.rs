//! # Transition Sim
//!
//! 无头页面过渡模拟器：在本地静态站点目录上回放链接点击，
//! 输出每次过渡的事件（拦截、遮罩、预加载、导航、揭幕）。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p transition-sim -- run --site public --click /archive --click /
//! cargo run -p transition-sim -- run --site public --style blocks --instant --json
//! cargo run -p transition-sim -- check --site public
//!
//! # 或安装后直接使用
//! cargo install --path tools/transition-sim
//! tsim run --site public --start /about --click /archive
//! tsim check --site public
//! ```

mod check;
mod host;
mod site;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use page_transition::{
    ClickEvent, ClickOutcome, CoverStyle, FrameDriver, HostBindings, Router, TimelineDriver,
    TransitionConfig, TransitionController, TransitionEvent,
};
use tracing::{Level, warn};

use crate::check::check_site;
use crate::host::{FsFetcher, FsImageLoader, InstantDriver, SimDocument, SimRouter};
use crate::site::Site;

#[derive(Parser)]
#[command(name = "tsim")]
#[command(about = "页面过渡模拟器 - 在静态站点目录上回放链接点击")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Slide,
    Blocks,
}

impl From<StyleArg> for CoverStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Slide => CoverStyle::Slide,
            StyleArg::Blocks => CoverStyle::Blocks,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 回放一串链接点击
    Run {
        /// 站点目录
        #[arg(long)]
        site: PathBuf,

        /// 起始路由（默认：/）
        #[arg(long, default_value = "/")]
        start: String,

        /// 依次点击指向这些路由的链接
        #[arg(long = "click")]
        clicks: Vec<String>,

        /// 过渡配置文件（JSON）
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 遮罩样式预设（未指定配置文件时生效）
        #[arg(long, value_enum, default_value = "slide")]
        style: StyleArg,

        /// 模拟的网络延迟（毫秒）
        #[arg(long, default_value = "30")]
        latency_ms: u64,

        /// 签名路径长度
        #[arg(long, default_value = "1227")]
        logo_length: f32,

        /// 页面中没有签名路径
        #[arg(long)]
        no_logo: bool,

        /// 不等动画帧，直接跳到时间轴终点
        #[arg(long)]
        instant: bool,

        /// 固定随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 以 JSON 行输出事件
        #[arg(long)]
        json: bool,
    },

    /// 检查站内链接和图片引用
    Check {
        /// 站点目录
        #[arg(long)]
        site: PathBuf,

        /// 站点源（默认：http://localhost:3000）
        #[arg(long, default_value = "http://localhost:3000")]
        origin: String,
    },
}

/// 一次回放的结果
#[derive(Debug, Default)]
struct RunSummary {
    /// 路由历史（含起始路由）
    history: Vec<String>,
    /// 按发生顺序的全部控制器事件
    events: Vec<TransitionEvent>,
    /// 当前页面没有对应链接而跳过的点击
    skipped: Vec<String>,
}

struct RunOptions {
    site: PathBuf,
    start: String,
    clicks: Vec<String>,
    config: TransitionConfig,
    latency: Duration,
    logo_length: Option<f32>,
    instant: bool,
    seed: Option<u64>,
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(cli.command) {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn real_main(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            site,
            start,
            clicks,
            config,
            style,
            latency_ms,
            logo_length,
            no_logo,
            instant,
            seed,
            json,
        } => {
            let config = match config {
                Some(path) => TransitionConfig::load_strict(&path)
                    .with_context(|| format!("无法加载配置 {}", path.display()))?,
                None => TransitionConfig::preset(style.into()),
            };
            let summary = run_transitions(RunOptions {
                site,
                start,
                clicks,
                config,
                latency: Duration::from_millis(latency_ms),
                logo_length: (!no_logo).then_some(logo_length),
                instant,
                seed,
                json,
            })?;
            if !json {
                println!("路由历史: {}", summary.history.join(" → "));
            }
            Ok(())
        }
        Commands::Check { site, origin } => run_check(&site, &origin),
    }
}

fn run_transitions(options: RunOptions) -> anyhow::Result<RunSummary> {
    let RunOptions {
        site,
        start,
        clicks,
        config,
        latency,
        logo_length,
        instant,
        seed,
        json,
    } = options;

    let site = Rc::new(Site::open(&site)?);
    let origin = config.origin_url()?;

    let router = Rc::new(SimRouter::new(&start));
    let document = Rc::new(SimDocument::new(site.clone(), logo_length));
    document.render(&start)?;

    let driver: Rc<dyn TimelineDriver> = if instant {
        Rc::new(InstantDriver)
    } else {
        Rc::new(FrameDriver::new(config.frame_interval()))
    };

    let bindings = HostBindings {
        document: document.clone(),
        router: router.clone(),
        fetcher: Rc::new(FsFetcher::new(site.clone(), latency)),
        images: Rc::new(FsImageLoader::new(site, origin.clone(), latency)),
        driver,
    };
    let mut controller = TransitionController::new(config, bindings)?;
    if let Some(seed) = seed {
        controller = controller.with_seed(seed);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("无法创建 tokio 运行时")?;

    let mut summary = RunSummary::default();
    runtime.block_on(async {
        controller.mount().await;
        print_events(&controller, json, &mut summary.events)?;

        for target in &clicks {
            let Some(element) = document.element_for(&origin, target) else {
                warn!(page = %router.pathname(), target = %target, "当前页面没有指向该路由的站内链接，跳过");
                summary.skipped.push(target.clone());
                continue;
            };

            let started = Instant::now();
            let mut event = ClickEvent::new(element);
            match controller.click(&mut event).await {
                ClickOutcome::Navigated(path) => {
                    document.render(&path)?;
                    controller.mount().await;
                    print_events(&controller, json, &mut summary.events)?;
                    if !json {
                        println!("✅ {} ({:.2}s)", path, started.elapsed().as_secs_f32());
                    }
                }
                outcome => {
                    print_events(&controller, json, &mut summary.events)?;
                    if !json {
                        println!("-- {target}: {outcome:?}");
                    }
                }
            }
        }
        anyhow::Ok(())
    })?;

    summary.history = router.history();
    Ok(summary)
}

/// 输出并收集控制器事件
fn print_events(
    controller: &TransitionController,
    json: bool,
    sink: &mut Vec<TransitionEvent>,
) -> anyhow::Result<()> {
    for event in controller.take_events() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", describe(&event));
        }
        sink.push(event);
    }
    Ok(())
}

fn describe(event: &TransitionEvent) -> String {
    match event {
        TransitionEvent::Mounted { path, links } => format!("mount     {path} ({links} 个站内链接)"),
        TransitionEvent::Intercepted { path } => format!("intercept {path}"),
        TransitionEvent::Ignored { href, reason } => format!("ignore    {href} ({reason:?})"),
        TransitionEvent::CoverStarted { path } => format!("cover     {path}"),
        TransitionEvent::CoverFinished { path } => format!("covered   {path}"),
        TransitionEvent::PreloadSettled(report) => format!(
            "preload   {} {:?} ({}/{} 张图片, {} 失败)",
            report.path,
            report.outcome,
            report.images_loaded,
            report.images_found,
            report.images_failed
        ),
        TransitionEvent::Navigated { path } => format!("navigate  {path}"),
        TransitionEvent::Revealed { path } => format!("reveal    {path}"),
    }
}

fn run_check(site: &Path, origin: &str) -> anyhow::Result<()> {
    let site = Site::open(site)?;
    let origin = url::Url::parse(origin).with_context(|| format!("站点源无效: {origin}"))?;

    eprintln!("==> 检查站点 {}...\n", site.root().display());
    let report = check_site(&site, &origin)?;

    for broken in &report.broken_links {
        eprintln!("[ERROR] {}: 链接 {} 没有对应页面", broken.page, broken.target);
    }
    for missing in &report.missing_images {
        eprintln!("[ERROR] {}: 图片 {} 不存在", missing.page, missing.target);
    }

    println!(
        "{} 个页面，{} 个站内链接，{} 张本地图片",
        report.pages, report.links, report.images
    );

    if !report.is_ok() {
        anyhow::bail!(
            "发现 {} 个失效链接、{} 张缺失图片",
            report.broken_links.len(),
            report.missing_images.len()
        );
    }

    println!("✅ 检查通过");
    Ok(())
}
