//! # menu-sim
//!
//! 导航菜单模拟器：在无头文档上挂载菜单，回放悬停 / resize / 选中事件，
//! 输出生成的标记和逐帧样式轨迹。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p menu-sim -- render --data menu.json
//! cargo run -p menu-sim -- render --data menu.json --active docs
//! cargo run -p menu-sim -- simulate --data menu.json --hover docs,blog --fps 30
//! cargo run -p menu-sim -- select --data menu.json home api missing
//! cargo run -p menu-sim -- --log-level debug simulate --options options.json
//! ```
//!
//! 布局由模拟器按文本长度粗略生成（菜单项从左到右排列，高 40px），
//! 只用于驱动动画，不代表真实渲染结果。

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use nav_menu::{
    BoxGeometry, Document, DomEvent, ElementId, MenuItemData, MenuOptions, NavMenu, markup,
    render_from_data,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 主菜单高度
const ITEM_HEIGHT: f64 = 40.0;
/// 子菜单项高度
const CHILD_ITEM_HEIGHT: f64 = 32.0;
/// 每个字符的估算宽度
const CHAR_WIDTH: f64 = 14.0;
/// 菜单项左右内边距之和
const ITEM_PADDING: f64 = 32.0;

#[derive(Parser)]
#[command(name = "menu-sim")]
#[command(about = "导航菜单模拟器 - 在无头文档上回放菜单事件")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 日志级别（可被 RUST_LOG 覆盖）
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

/// 菜单来源
#[derive(clap::Args)]
struct Source {
    /// 菜单数据 JSON（MenuItemData 数组），优先于配置中的 data
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// 组件配置 JSON
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// 主菜单宽度（像素）
    #[arg(long, default_value = "800")]
    width: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// 输出生成的菜单标记
    Render {
        #[command(flatten)]
        source: Source,

        /// 初始选中的菜单 ID
        #[arg(long)]
        active: Option<String>,
    },

    /// 按顺序悬停菜单项并输出逐帧样式
    Simulate {
        #[command(flatten)]
        source: Source,

        /// 依次悬停的一级菜单 ID（逗号分隔）
        #[arg(long, value_delimiter = ',', required = true)]
        hover: Vec<String>,

        /// 帧率
        #[arg(long, default_value = "60")]
        fps: f64,

        /// 每次进入 / 离开后停留的时间（毫秒）
        #[arg(long, default_value = "600")]
        hold_ms: f64,
    },

    /// 依次设置选中菜单并输出匹配结果
    Select {
        #[command(flatten)]
        source: Source,

        /// 菜单 ID 列表
        ids: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = real_main(cli.command) {
        eprintln!("menu-sim error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn real_main(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Render { source, active } => {
            let (mut doc, menu) = mount(&source)?;
            if let Some(menu_id) = active {
                menu.set_active_menu(&mut doc, &menu_id);
            }
            println!("{}", doc.outer_html(menu.container()));
        }
        Commands::Simulate {
            source,
            hover,
            fps,
            hold_ms,
        } => {
            if !fps.is_finite() || fps <= 0.0 {
                bail!("帧率必须是大于 0 的有限值: {}", fps);
            }
            check_hold_ms(hold_ms)?;
            let (mut doc, mut menu) = mount(&source)?;
            simulate(&mut doc, &mut menu, &hover, 1000.0 / fps, hold_ms)?;
        }
        Commands::Select { source, ids } => {
            let (mut doc, menu) = mount(&source)?;
            for menu_id in &ids {
                match menu.set_active_menu(&mut doc, menu_id) {
                    Some(found) => println!(
                        "{:<12} item={} child={}",
                        menu_id,
                        describe(&doc, found.item, markup::ITEM_VALUE),
                        describe(&doc, found.child_item, markup::CHILD_VALUE),
                    ),
                    None => println!("{:<12} (未找到)", menu_id),
                }
            }
        }
    }
    Ok(())
}

/// 停留时间必须是有限的非负值，否则逐帧推进无法结束
fn check_hold_ms(hold_ms: f64) -> anyhow::Result<()> {
    if !hold_ms.is_finite() || hold_ms < 0.0 {
        bail!("停留时间必须是有限的非负值: {}", hold_ms);
    }
    Ok(())
}

/// 读取配置与数据，生成结构、写入布局后挂载菜单
fn mount(source: &Source) -> anyhow::Result<(Document, NavMenu)> {
    let mut options = match &source.options {
        Some(path) => MenuOptions::load(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => MenuOptions::default(),
    };
    if let Some(path) = &source.data {
        options.data = Some(load_data(path)?);
    }
    let Some(data) = options.data.take() else {
        bail!("未提供菜单数据（--data 或配置中的 data）");
    };

    let mut doc = Document::new();
    let nav = doc.create_child(doc.body(), "nav");
    doc.set_attribute(nav, "id", "menu");
    render_from_data(&mut doc, nav, &data);
    apply_layout(&mut doc, nav, source.width);

    let menu = NavMenu::new(&mut doc, nav, options)?;
    info!(items = data.len(), "菜单已挂载");
    Ok((doc, menu))
}

fn load_data(path: &Path) -> anyhow::Result<Vec<MenuItemData>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取菜单数据失败: {}", path.display()))?;
    let data = serde_json::from_str(&content)
        .with_context(|| format!("解析菜单数据失败: {}", path.display()))?;
    Ok(data)
}

/// 按文本长度生成粗略布局
fn apply_layout(doc: &mut Document, nav: ElementId, main_width: f64) {
    let Some(main) = doc.find_first_by_class(nav, markup::MAIN) else {
        return;
    };
    doc.set_geometry(main, BoxGeometry::new(0.0, 0.0, main_width, ITEM_HEIGHT));

    let mut left = 0.0;
    for item in doc.find_all_by_class(main, markup::ITEM) {
        let width = text_width(doc, item, "vui-item-value-text");
        doc.set_geometry(item, BoxGeometry::new(left, 0.0, width, ITEM_HEIGHT));
        left += width;

        let Some(children) = doc.find_first_by_class(item, markup::CHILDREN) else {
            continue;
        };
        let rows = doc.find_all_by_class(children, markup::CHILD_ITEM);
        let child_width = rows
            .iter()
            .map(|row| text_width(doc, *row, "vui-child-value-text"))
            .fold(0.0, f64::max);
        let height = rows.len() as f64 * CHILD_ITEM_HEIGHT;
        doc.set_geometry(children, BoxGeometry::new(0.0, ITEM_HEIGHT, child_width, height));
    }
}

fn text_width(doc: &Document, root: ElementId, text_class: &str) -> f64 {
    let chars = doc
        .find_first_by_class(root, text_class)
        .and_then(|el| doc.element(el))
        .and_then(|el| el.text())
        .map_or(0, |text| text.chars().count());
    chars as f64 * CHAR_WIDTH + ITEM_PADDING
}

fn describe(doc: &Document, element: Option<ElementId>, value_class: &str) -> String {
    element
        .and_then(|el| doc.find_first_by_class(el, value_class))
        .and_then(|value| doc.attribute(value, markup::MENU_ID_ATTR))
        .unwrap_or("-")
        .to_string()
}

/// 回放悬停序列
fn simulate(
    doc: &mut Document,
    menu: &mut NavMenu,
    hover: &[String],
    frame_ms: f64,
    hold_ms: f64,
) -> anyhow::Result<()> {
    let container = menu.container();
    let bar = doc.find_first_by_class(container, markup::CURRENT_BAR);
    let mut now = 0.0;

    menu.dispatch(doc, &DomEvent::mouse_enter(container, now));
    for menu_id in hover {
        let Some(item) = menu.find_menu_by_id(doc, menu_id).and_then(|found| found.item) else {
            bail!("未找到菜单项: {}", menu_id);
        };
        let submenu = doc.find_first_by_class(item, markup::CHILDREN);

        println!("# enter {} @ {:.1}ms", menu_id, now);
        menu.dispatch(doc, &DomEvent::mouse_enter(item, now));
        now = run_frames(doc, menu, now, frame_ms, hold_ms, submenu, bar);

        println!("# leave {} @ {:.1}ms", menu_id, now);
        menu.dispatch(doc, &DomEvent::mouse_leave(item, now));
        now = run_frames(doc, menu, now, frame_ms, hold_ms, submenu, bar);
    }

    println!("# leave menu @ {:.1}ms", now);
    menu.dispatch(doc, &DomEvent::mouse_leave(container, now));
    while !menu.is_idle() {
        now += frame_ms;
        menu.tick(doc, now);
    }
    println!("# idle @ {:.1}ms", now);
    Ok(())
}

/// 逐帧推进 `hold_ms`，每个有动画的帧输出一行
fn run_frames(
    doc: &mut Document,
    menu: &mut NavMenu,
    start: f64,
    frame_ms: f64,
    hold_ms: f64,
    submenu: Option<ElementId>,
    bar: Option<ElementId>,
) -> f64 {
    let mut now = start;
    while now - start < hold_ms {
        now += frame_ms;
        if menu.tick(doc, now) == 0 {
            continue;
        }

        let mut line = format!("{:>8.1}ms", now);
        if let Some(submenu) = submenu {
            line.push_str(&format!(
                "  submenu: display={} height={}",
                doc.style(submenu, "display").unwrap_or("-"),
                doc.style(submenu, "height").unwrap_or("auto"),
            ));
        }
        if let Some(bar) = bar {
            line.push_str(&format!(
                "  bar: left={} width={}",
                doc.style(bar, "left").unwrap_or("-"),
                doc.style(bar, "width").unwrap_or("-"),
            ));
        }
        println!("{}", line);
    }
    now
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_ms_must_be_finite() {
        assert!(check_hold_ms(600.0).is_ok());
        assert!(check_hold_ms(0.0).is_ok());
        assert!(check_hold_ms(f64::INFINITY).is_err());
        assert!(check_hold_ms(f64::NAN).is_err());
        assert!(check_hold_ms(-1.0).is_err());
    }

    #[test]
    fn test_simulate_rejects_infinite_hold_before_running() {
        let args = ["menu-sim", "simulate", "--hover", "a", "--hold-ms", "inf"];
        let cli = Cli::try_parse_from(args).unwrap();

        let err = real_main(cli.command).unwrap_err();
        assert!(err.to_string().contains("停留时间"), "{err:#}");
    }
}
