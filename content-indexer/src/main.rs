use std::fs;
use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use content_indexer::{anchor_headings, build_site, ContentError, IndexerError, SiteConfig};
use post_query::{execute, PostIndex, QueryParams};
use toc_wasm::extract_toc;

fn cli() -> Command {
    Command::new("博客内容索引生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("读取 Markdown 文章，生成文章索引、目录和订阅源")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("显示详细信息")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("build")
                .about("生成 posts_index.bin、toc/<slug>.json 和 feed.xml")
                .arg(
                    Arg::new("source")
                        .short('s')
                        .long("source")
                        .value_name("SOURCE_DIR")
                        .help("文章源目录路径，默认取配置中的 index.posts_dir"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("OUTPUT_DIR")
                        .help("索引输出目录路径")
                        .required(true),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("站点配置文件 (blog.toml)"),
                ),
        )
        .subcommand(
            Command::new("toc")
                .about("输出单个 Markdown 文件的目录 JSON")
                .arg(Arg::new("file").value_name("FILE").required(true)),
        )
        .subcommand(
            Command::new("query")
                .about("在已生成的索引上执行查询")
                .arg(
                    Arg::new("index")
                        .short('i')
                        .long("index")
                        .value_name("FILE")
                        .help("posts_index.bin 路径")
                        .required(true),
                )
                .arg(Arg::new("query").short('q').long("query").help("搜索关键词"))
                .arg(Arg::new("category").long("category").help("分类"))
                .arg(
                    Arg::new("tag")
                        .short('t')
                        .long("tag")
                        .help("标签，可重复，需全部匹配")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("排序方式")
                        .value_parser(["latest", "popular"]),
                )
                .arg(
                    Arg::new("page")
                        .short('p')
                        .long("page")
                        .value_parser(value_parser!(usize))
                        .help("页码（从 1 开始）"),
                )
                .arg(
                    Arg::new("per_page")
                        .long("per-page")
                        .value_parser(value_parser!(usize))
                        .help("每页条数，默认取配置中的 index.per_page"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("站点配置文件 (blog.toml)"),
                ),
        )
        .subcommand(
            Command::new("anchor")
                .about("按 Markdown 目录为渲染后的 HTML 标题写入 ID")
                .arg(
                    Arg::new("markdown")
                        .short('m')
                        .long("markdown")
                        .value_name("FILE")
                        .required(true),
                )
                .arg(Arg::new("html").long("html").value_name("FILE").required(true))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("输出文件，默认覆盖输入的 HTML"),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn required<'a>(matches: &'a ArgMatches, name: &'static str) -> Result<&'a String, IndexerError> {
    matches
        .get_one::<String>(name)
        .ok_or(IndexerError::MissingArgument(name))
}

fn read_text(path: &Path) -> Result<String, IndexerError> {
    fs::read_to_string(path).map_err(|source| {
        ContentError::Io {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn load_config(matches: &ArgMatches) -> Result<SiteConfig, IndexerError> {
    Ok(match matches.get_one::<String>("config") {
        Some(path) => SiteConfig::load(Path::new(path))?,
        None => SiteConfig::default(),
    })
}

fn run_build(matches: &ArgMatches) -> Result<(), IndexerError> {
    let config = load_config(matches)?;

    let source = matches
        .get_one::<String>("source")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.index.posts_dir.clone());
    let output = PathBuf::from(required(matches, "output")?);

    let report = build_site(&source, &output, &config)?;
    tracing::info!(
        posts = report.posts,
        headings = report.headings,
        bytes = report.index_bytes,
        index = %report.index_path.display(),
        feed = %report.feed_path.display(),
        "构建完成"
    );
    Ok(())
}

fn run_toc(matches: &ArgMatches) -> Result<(), IndexerError> {
    let markdown = read_text(Path::new(required(matches, "file")?))?;
    println!("{}", serde_json::to_string_pretty(&extract_toc(&markdown))?);
    Ok(())
}

/// 命令行参数优先，未指定每页条数时使用配置值
fn query_params(matches: &ArgMatches, config: &SiteConfig) -> QueryParams {
    let tags: Vec<String> = matches
        .get_many::<String>("tag")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    QueryParams {
        query: matches.get_one::<String>("query").cloned(),
        category: matches.get_one::<String>("category").cloned(),
        tags: Some(tags),
        sort: matches.get_one::<String>("sort").cloned(),
        page: matches.get_one::<usize>("page").copied(),
        per_page: Some(
            matches
                .get_one::<usize>("per_page")
                .copied()
                .unwrap_or(config.index.per_page),
        ),
    }
}

fn run_query(matches: &ArgMatches) -> Result<(), IndexerError> {
    let path = Path::new(required(matches, "index")?);
    let data = fs::read(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = PostIndex::decode(&data)?.into_store()?;
    let config = load_config(matches)?;

    let page = execute(store.all(), query_params(matches, &config))?;
    tracing::debug!(total = page.total, total_pages = page.total_pages, "查询完成");
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

fn run_anchor(matches: &ArgMatches) -> Result<(), IndexerError> {
    let markdown = read_text(Path::new(required(matches, "markdown")?))?;
    let html_path = PathBuf::from(required(matches, "html")?);
    let html = read_text(&html_path)?;

    let toc = extract_toc(&markdown);
    let (output, headings) = anchor_headings(&html, &toc)?;

    let mismatches = headings.iter().filter(|h| h.is_mismatch()).count();
    let target = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or(html_path);

    fs::write(&target, output).map_err(|source| IndexerError::Write {
        path: target.clone(),
        source,
    })?;
    tracing::info!(
        headings = headings.len(),
        mismatches,
        output = %target.display(),
        "标题 ID 已写入"
    );
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), IndexerError> {
    match matches.subcommand() {
        Some(("build", sub)) => run_build(sub),
        Some(("toc", sub)) => run_toc(sub),
        Some(("query", sub)) => run_query(sub),
        Some(("anchor", sub)) => run_anchor(sub),
        _ => Err(IndexerError::MissingArgument("command")),
    }
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}
