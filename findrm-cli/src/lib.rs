use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use findrm_core::{
    OneOrMany, RemovalReport, RemoveOptions, RemovedPaths, TreeRemover, display_relative,
};

#[derive(Parser)]
#[command(name = "findrm")]
#[command(about = "Find and remove files and directories matching a set of filters")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List what would be removed without touching anything
    Find {
        /// Directory to search
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove matching files and directories
    Remove {
        /// Directory to search
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove everything below a directory, including the directory itself
    Purge {
        /// Directory to purge
        path: PathBuf,

        /// Dry run - show what would be removed
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// 过滤条件参数
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Directory names to remove ("*" for all, can be specified multiple times)
    #[arg(long = "dir", action = clap::ArgAction::Append)]
    pub dirs: Vec<String>,

    /// File names to remove ("*.*" for all, can be specified multiple times)
    #[arg(short = 'f', long = "files", action = clap::ArgAction::Append)]
    pub files: Vec<String>,

    /// Extensions to remove, including the dot (can be specified multiple times)
    #[arg(short = 'e', long = "ext", action = clap::ArgAction::Append)]
    pub extensions: Vec<String>,

    /// File names that are never removed (can be specified multiple times)
    #[arg(short = 'i', long = "ignore", action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Remove files whose name starts with this prefix
    #[arg(short = 'p', long)]
    pub prefix: Option<String>,

    /// Treat a single --dir / --files value as a regular expression
    #[arg(short = 'r', long)]
    pub regex: bool,

    /// Maximum depth (the starting directory is level 0)
    #[arg(short, long)]
    pub max_level: Option<usize>,

    /// Only remove entries not modified for this many seconds
    #[arg(short, long)]
    pub age: Option<u64>,

    /// Maximum number of files to remove
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Dry run - show what would be removed without removing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Load base options from a TOML file; command line flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Find {
            path,
            filters,
            json,
        } => handle_find_command(&path, &filters, json),
        Commands::Remove {
            path,
            filters,
            yes,
            json,
        } => handle_remove_command(&path, &filters, yes, json),
        Commands::Purge { path, dry_run, yes } => handle_purge_command(&path, dry_run, yes),
    }
}

/// 为所有 findrm crate 设置同一日志级别
fn log_filter(log_level: &str) -> String {
    ["findrm", "findrm_core", "findrm_cli"]
        .map(|target| format!("{target}={log_level}"))
        .join(",")
}

/// 运行删除器，出错时在上下文中附带出错的路径
fn run_remover(remover: &TreeRemover, path: &Path) -> Result<RemovalReport> {
    remover.remove_with_report(path).map_err(|err| {
        let context = format!("处理 {} 失败", err.path().unwrap_or(path).display());
        anyhow::Error::new(err).context(context)
    })
}

fn handle_find_command(path: &Path, filters: &FilterArgs, json: bool) -> Result<()> {
    let options = build_options(filters)?.with_test(true);
    let removed = run_remover(&TreeRemover::new(options), path)?.removed;

    if json {
        print_json(&removed)?;
    } else {
        display_removed(&removed, path, "Would remove");
    }
    Ok(())
}

fn handle_remove_command(path: &Path, filters: &FilterArgs, yes: bool, json: bool) -> Result<()> {
    let options = build_options(filters)?;

    if !options.test && !yes {
        // 先试运行，展示将要删除的内容
        let dry_run = TreeRemover::new(options.clone().with_test(true));
        let preview = run_remover(&dry_run, path)?.removed;
        if preview.is_empty() {
            println!("Nothing to remove.");
            return Ok(());
        }

        display_removed(&preview, path, "Will remove");
        if !confirm(&format!("Remove {} entries?", preview.len()))? {
            println!("Removal cancelled.");
            return Ok(());
        }
    }

    let report = run_remover(&TreeRemover::new(options), path)?;

    if json {
        print_json(&report.removed)?;
    } else {
        display_report(&report, path);
    }
    Ok(())
}

fn handle_purge_command(path: &Path, dry_run: bool, yes: bool) -> Result<()> {
    if !path.exists() {
        println!("Nothing to remove.");
        return Ok(());
    }

    if !dry_run && !yes && !confirm(&format!("Remove {} and everything in it?", path.display()))? {
        println!("Removal cancelled.");
        return Ok(());
    }

    let remover = TreeRemover::new(RemoveOptions::new().with_test(dry_run));
    let removed = remover.remove_all(path)?;

    let label = if dry_run { "Would remove" } else { "Removed" };
    display_removed(&removed, path, label);
    Ok(())
}

/// 合并配置文件和命令行参数
fn build_options(args: &FilterArgs) -> Result<RemoveOptions> {
    let mut options = match &args.config {
        Some(config) => RemoveOptions::load(config)
            .with_context(|| format!("加载配置文件失败: {}", config.display()))?,
        None => RemoveOptions::default(),
    };

    if let Some(dirs) = to_one_or_many(&args.dirs) {
        options.dir = Some(dirs);
    }
    if let Some(files) = to_one_or_many(&args.files) {
        options.files = Some(files);
    }
    if let Some(extensions) = to_one_or_many(&args.extensions) {
        options.extensions = Some(extensions);
    }
    if let Some(ignore) = to_one_or_many(&args.ignore) {
        options.ignore = Some(ignore);
    }
    if let Some(prefix) = &args.prefix {
        options.prefix = Some(prefix.clone());
    }
    if args.regex {
        options.regex = true;
    }
    if let Some(max_level) = args.max_level {
        options.max_level = Some(max_level);
    }
    if let Some(age) = args.age {
        options = options.with_age_seconds(age);
    }
    if let Some(limit) = args.limit {
        options.limit = Some(limit);
    }
    if args.dry_run {
        options.test = true;
    }

    debug!("使用选项: {:?}", options);
    Ok(options)
}

/// 单个值保持为字符串，以便正则匹配
fn to_one_or_many(values: &[String]) -> Option<OneOrMany> {
    match values {
        [] => None,
        [one] => Some(OneOrMany::One(one.clone())),
        many => Some(OneOrMany::Many(many.to_vec())),
    }
}

fn display_removed(removed: &RemovedPaths, base_path: &Path, label: &str) {
    if removed.is_empty() {
        println!("Nothing to remove.");
        return;
    }

    println!("{label} {} entries:", removed.len());
    for path in removed {
        println!("  {}", display_relative(path, base_path));
    }
}

fn display_report(report: &RemovalReport, base_path: &Path) {
    let label = if report.dry_run {
        "Would remove"
    } else {
        "Removed"
    };
    display_removed(&report.removed, base_path, label);

    if !report.failed.is_empty() {
        println!("\nFailed to remove {} entries:", report.failed.len());
        for path in &report.failed {
            println!("  - {}", display_relative(path, base_path));
        }
    }

    if !report.skipped.is_empty() {
        println!("Skipped {} unreadable entries.", report.skipped.len());
    }

    println!("Completed in {}ms", report.duration_ms);
}

fn print_json(removed: &RemovedPaths) -> Result<()> {
    let json = serde_json::to_string_pretty(removed).context("序列化结果失败")?;
    println!("{json}");
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("\n{question} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
