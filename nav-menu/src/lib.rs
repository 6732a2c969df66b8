//! # Nav Menu
//!
//! 两级导航菜单组件：悬停展开子菜单、跟随悬停项的指示条、按 ID 设置选中项。
//!
//! ## 架构概述
//!
//! `nav-menu` 不依赖任何浏览器或渲染引擎。组件读写一棵无头元素树
//! （[`Document`]），由宿主派发事件并按帧驱动：
//!
//! ```text
//! Host                              NavMenu
//!   │                                  │
//!   │──── dispatch(DomEvent) ────────►│ 悬停 / 离开 / resize
//!   │                                  │   └── 启动补间动画
//!   │──── tick(timestamp) ───────────►│ 每帧推进动画、触发 resize 重算
//!   │                                  │
//!   │◄─── Document 内联样式 / 类名 ────│
//! ```
//!
//! ## 核心类型
//!
//! - [`NavMenu`]：菜单控制器
//! - [`MenuOptions`]：组件配置
//! - [`MenuItemData`]：声明式菜单数据
//! - [`AnimationScheduler`]：逐元素、可取消的补间动画调度器
//! - [`Document`]：无头元素树
//!
//! ## 使用示例
//!
//! ```ignore
//! use nav_menu::{Document, DomEvent, MenuItemData, MenuOptions, NavMenu};
//!
//! let mut doc = Document::new();
//! let nav = doc.create_child(doc.body(), "nav");
//! let options = MenuOptions::default().with_data(vec![
//!     MenuItemData::new("home", "Home"),
//!     MenuItemData::new("docs", "Docs").with_children(vec![MenuItemData::new("api", "API")]),
//! ]);
//! let mut menu = NavMenu::new(&mut doc, nav, options)?;
//!
//! // 宿主完成布局后写入几何信息，然后派发事件、逐帧驱动
//! menu.dispatch(&mut doc, &DomEvent::mouse_enter(item, now));
//! menu.tick(&mut doc, now + 16.0);
//! ```
//!
//! ## 模块结构
//!
//! - [`dom`]：元素树、事件、内联样式
//! - [`animation`]：缓动、帧队列、调度器、补间原语
//! - [`menu`]：菜单结构生成、子菜单定位、选中状态、控制器
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod animation;
pub mod config;
pub mod dom;
pub mod error;
pub mod menu;

// 重导出核心类型
pub use animation::{
    AnimationId, AnimationScheduler, Completion, EasingFunction, FadeDirection, FrameHandle,
    FrameQueue, FrameTask, SlideDirection, TickControl, ease_out_back,
};
pub use config::MenuOptions;
pub use dom::{
    BoxGeometry, Document, DomEvent, Element, ElementId, EventKind, EventTarget, ListenerId,
    Selector,
};
pub use error::{ConfigError, MenuError, MenuResult};
pub use menu::{MenuItemData, MenuMatch, NavMenu, RESIZE_DEBOUNCE_MS, markup, render_from_data};
