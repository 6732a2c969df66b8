//! # Menu 模块
//!
//! 导航菜单控制器。
//!
//! ## 初始化流程
//!
//! ```text
//! NavMenu::new
//!   ├── render_from_data         提供了 data 时先生成结构
//!   ├── create_current_bar       生成指示条（已存在时直接复用）
//!   ├── process_all_menu_items   定位子菜单 + 绑定菜单项事件
//!   ├── bind_child_values        绑定二级菜单悬停事件
//!   ├── 隐藏全部子菜单
//!   ├── 绑定 resize
//!   └── 应用 data-active-menu-id
//! ```
//!
//! 控制器不持有文档：宿主通过 [`NavMenu::dispatch`] 派发事件，
//! 每帧调用 [`NavMenu::tick`] 驱动动画与 resize 防抖。

mod builder;
mod geometry;
mod selection;

use std::collections::HashMap;

use tracing::{debug, info, warn};

pub use builder::{MenuItemData, render_from_data};
pub use geometry::{MainDimensions, clamp_submenu_left, layout_submenu, measure_natural};
pub use selection::{MenuMatch, clear_active, find_menu_by_id, set_active};

use crate::animation::AnimationScheduler;
use crate::config::MenuOptions;
use crate::dom::{Document, DomEvent, ElementId, EventKind, EventTarget, ListenerId, Selector};
use crate::error::{MenuError, MenuResult};

/// 标记约定（类名与属性名）
pub mod markup {
    pub const MAIN: &str = "vui-main";
    pub const ITEM: &str = "vui-item";
    pub const ITEM_VALUE: &str = "vui-item-value";
    pub const CHILDREN: &str = "vui-children";
    pub const CHILD_ITEM: &str = "vui-child-item";
    pub const CHILD_VALUE: &str = "vui-child-value";
    pub const CURRENT_BAR: &str = "vui-current-bar";
    pub const CURRENT_BAR_BOX: &str = "vui-current-bar-box";

    pub const ITEM_HOVER: &str = "vui-item-hover";
    pub const CHILD_HOVER: &str = "vui-child-hover";
    pub const ITEM_ACTIVE: &str = "vui-item-active";
    pub const CHILD_ACTIVE: &str = "vui-child-active";

    pub const MENU_ID_ATTR: &str = "data-menu-id";
    pub const ACTIVE_MENU_ATTR: &str = "data-active-menu-id";
}

/// resize 防抖时间（毫秒）
pub const RESIZE_DEBOUNCE_MS: f64 = 100.0;

/// 缓存的元素引用（非拥有）
#[derive(Debug, Default)]
struct ElementCache {
    main: Option<ElementId>,
    /// 首次处理时缓存，之后不再重新查询
    items: Option<Vec<ElementId>>,
    children: Vec<ElementId>,
    current_bar: Option<ElementId>,
    current_bar_box: Option<ElementId>,
}

/// 已安装监听器对应的处理逻辑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    ItemEnter(ElementId),
    ItemLeave(ElementId),
    ChildEnter(ElementId),
    ChildLeave(ElementId),
    MenuEnter,
    MenuLeave,
    Resize,
}

/// 导航菜单
pub struct NavMenu {
    container: ElementId,
    options: MenuOptions,
    scheduler: AnimationScheduler,
    cache: ElementCache,
    handlers: HashMap<ListenerId, Handler>,
    /// resize 防抖到期时间
    resize_deadline: Option<f64>,
    destroyed: bool,
}

impl std::fmt::Debug for NavMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavMenu")
            .field("container", &self.container)
            .field("listeners", &self.handlers.len())
            .field("scheduler", &self.scheduler)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl NavMenu {
    /// 在容器元素上创建菜单
    ///
    /// # 错误
    /// - 容器不在文档中：`MenuError::InvalidContainer`
    /// - 配置无效：`MenuError::Config`
    pub fn new(doc: &mut Document, container: ElementId, options: MenuOptions) -> MenuResult<Self> {
        if !doc.contains(container) {
            return Err(MenuError::InvalidContainer(container));
        }
        options.validate()?;

        let mut menu = Self {
            container,
            scheduler: AnimationScheduler::with_overshoot(options.ease_out_back_param),
            options,
            cache: ElementCache::default(),
            handlers: HashMap::new(),
            resize_deadline: None,
            destroyed: false,
        };

        if let Some(data) = menu.options.data.as_deref() {
            render_from_data(doc, container, data);
        }

        menu.init(doc);
        info!(%container, listeners = menu.handlers.len(), "菜单初始化完成");
        Ok(menu)
    }

    /// 按选择器（`#id` / `.class`）查找容器并创建菜单
    pub fn mount(doc: &mut Document, selector: &str, options: MenuOptions) -> MenuResult<Self> {
        let parsed = Selector::parse(selector).ok_or_else(|| MenuError::InvalidSelector {
            selector: selector.to_string(),
        })?;
        let container = doc
            .query_selector(doc.body(), &parsed)
            .ok_or_else(|| MenuError::SelectorNotFound {
                selector: selector.to_string(),
            })?;
        Self::new(doc, container, options)
    }

    fn init(&mut self, doc: &mut Document) {
        self.create_current_bar(doc);
        self.process_all_menu_items(doc, true);
        self.bind_child_values(doc);

        self.cache.children = doc.find_all_by_class(self.container, markup::CHILDREN);
        for child in &self.cache.children {
            doc.set_style(*child, "visibility", "visible");
            doc.set_style(*child, "display", "none");
        }

        self.listen(doc, EventTarget::Window, EventKind::Resize, Handler::Resize);

        let initial = doc
            .attribute(self.container, markup::ACTIVE_MENU_ATTR)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        if let Some(menu_id) = initial {
            self.set_active_menu(doc, &menu_id);
        }
    }

    fn listen(
        &mut self,
        doc: &mut Document,
        target: EventTarget,
        kind: EventKind,
        handler: Handler,
    ) {
        let id = doc.add_event_listener(target, kind);
        self.handlers.insert(id, handler);
    }

    // ========== 结构 ==========

    fn create_current_bar(&mut self, doc: &mut Document) {
        if !self.options.current_bar {
            return;
        }

        if let Some(existing) = doc.find_first_by_class(self.container, markup::CURRENT_BAR_BOX) {
            self.cache.current_bar_box = Some(existing);
            return;
        }

        let bar_box = doc.create_child(self.container, "div");
        doc.set_class_name(bar_box, markup::CURRENT_BAR_BOX);
        doc.set_style(bar_box, "display", "none");
        let bar = doc.create_child(bar_box, "div");
        doc.set_class_name(bar, markup::CURRENT_BAR);
        self.cache.current_bar_box = Some(bar_box);
        self.cache.current_bar = Some(bar);

        let container = EventTarget::Element(self.container);
        self.listen(doc, container, EventKind::MouseEnter, Handler::MenuEnter);
        self.listen(doc, container, EventKind::MouseLeave, Handler::MenuLeave);
    }

    fn main_dimensions(&mut self, doc: &Document) -> Option<MainDimensions> {
        if self.cache.main.is_none() {
            self.cache.main = doc.find_first_by_class(self.container, markup::MAIN);
        }
        let Some(main) = self.cache.main else {
            warn!(container = %self.container, "未找到主菜单元素 (.vui-main)");
            return None;
        };
        Some(MainDimensions::read(doc, main))
    }

    fn process_all_menu_items(&mut self, doc: &mut Document, bind_events: bool) {
        let Some(dims) = self.main_dimensions(doc) else {
            return;
        };

        let container = self.container;
        let items = self
            .cache
            .items
            .get_or_insert_with(|| doc.find_all_by_class(container, markup::ITEM))
            .clone();

        for item in items {
            layout_submenu(doc, item, dims);
            if bind_events {
                let target = EventTarget::Element(item);
                self.listen(doc, target, EventKind::MouseEnter, Handler::ItemEnter(item));
                self.listen(doc, target, EventKind::MouseLeave, Handler::ItemLeave(item));
            }
        }
    }

    fn bind_child_values(&mut self, doc: &mut Document) {
        for value in doc.find_all_by_class(self.container, markup::CHILD_VALUE) {
            let target = EventTarget::Element(value);
            self.listen(doc, target, EventKind::MouseEnter, Handler::ChildEnter(value));
            self.listen(doc, target, EventKind::MouseLeave, Handler::ChildLeave(value));
        }
    }

    // ========== 事件 ==========

    /// 派发宿主事件
    ///
    /// 只有匹配本菜单安装的监听器的事件才会生效。
    ///
    /// # 返回
    /// 执行的处理器数量
    pub fn dispatch(&mut self, doc: &mut Document, event: &DomEvent) -> usize {
        if self.destroyed {
            return 0;
        }
        self.scheduler.advance_clock(event.timestamp);

        let handlers: Vec<Handler> = doc
            .listeners_for(event.target, event.kind)
            .into_iter()
            .filter_map(|id| self.handlers.get(&id).copied())
            .collect();

        for handler in &handlers {
            self.handle(doc, *handler, event.timestamp);
        }
        handlers.len()
    }

    fn handle(&mut self, doc: &mut Document, handler: Handler, timestamp: f64) {
        match handler {
            Handler::ItemEnter(item) => self.on_item_enter(doc, item, timestamp),
            Handler::ItemLeave(item) => self.on_item_leave(doc, item, timestamp),
            Handler::ChildEnter(value) => doc.add_class(value, markup::CHILD_HOVER),
            Handler::ChildLeave(value) => doc.remove_class(value, markup::CHILD_HOVER),
            Handler::MenuEnter => {
                let bar_box = self.cache.current_bar_box;
                self.scheduler.fade_in(doc, bar_box, timestamp, self.options.duration);
            }
            Handler::MenuLeave => {
                let bar_box = self.cache.current_bar_box;
                self.scheduler.fade_out(doc, bar_box, timestamp, self.options.duration);
            }
            Handler::Resize => {
                // 连续 resize 只在最后一次之后触发一次重算
                self.resize_deadline = Some(timestamp + RESIZE_DEBOUNCE_MS);
            }
        }
    }

    fn on_item_enter(&mut self, doc: &mut Document, item: ElementId, timestamp: f64) {
        if let Some(child) = doc.find_first_by_class(item, markup::CHILDREN) {
            self.scheduler.slide_down(doc, Some(child), timestamp, self.options.duration);
        }
        if let Some(value) = doc.find_first_by_class(item, markup::ITEM_VALUE) {
            doc.add_class(value, markup::ITEM_HOVER);
        }
        self.animate_current_bar(doc, item, timestamp);
    }

    fn on_item_leave(&mut self, doc: &mut Document, item: ElementId, timestamp: f64) {
        let child = doc.find_first_by_class(item, markup::CHILDREN);
        let value = doc.find_first_by_class(item, markup::ITEM_VALUE);
        let has_child_items =
            child.is_some() && doc.find_first_by_class(item, markup::CHILD_ITEM).is_some();

        if has_child_items {
            self.scheduler.slide_up(
                doc,
                child,
                timestamp,
                self.options.duration / 2.0,
                Some(Box::new(move |doc: &mut Document| {
                    if let Some(value) = value {
                        doc.remove_class(value, markup::ITEM_HOVER);
                    }
                })),
            );
        } else if let Some(value) = value {
            doc.remove_class(value, markup::ITEM_HOVER);
        }
    }

    fn animate_current_bar(&mut self, doc: &mut Document, item: ElementId, timestamp: f64) {
        if !self.options.current_bar {
            return;
        }

        if self.cache.current_bar.is_none() {
            self.cache.current_bar = doc.find_first_by_class(self.container, markup::CURRENT_BAR);
        }
        let Some(bar) = self.cache.current_bar else {
            warn!(container = %self.container, "未找到指示条元素 (.vui-current-bar)");
            return;
        };

        let left = doc.geometry(item).left;
        let width = doc.offset_width(item);
        self.scheduler.animate(
            doc,
            Some(bar),
            timestamp,
            &[("left", left), ("width", width)],
            self.options.current_bar_duration,
            Some(self.options.easing.as_str()),
            None,
        );
    }

    // ========== 帧驱动 ==========

    /// 执行一帧：推进动画，并在防抖到期时重算子菜单位置
    ///
    /// # 返回
    /// 本帧执行的动画任务数量
    pub fn tick(&mut self, doc: &mut Document, timestamp: f64) -> usize {
        if self.destroyed {
            return 0;
        }

        let frames = self.scheduler.run_frame(doc, timestamp);

        if self.resize_deadline.is_some_and(|deadline| timestamp >= deadline) {
            self.resize_deadline = None;
            self.handle_resize(doc);
        }

        frames
    }

    fn handle_resize(&mut self, doc: &mut Document) {
        if !doc.is_connected(self.container) {
            debug!(container = %self.container, "容器已脱离文档，跳过重算");
            return;
        }
        self.process_all_menu_items(doc, false);
    }

    // ========== 选中状态 ==========

    pub fn find_menu_by_id(&self, doc: &Document, menu_id: &str) -> Option<MenuMatch> {
        find_menu_by_id(doc, self.container, menu_id)
    }

    /// 设置选中菜单；空 ID 等价于清除
    pub fn set_active_menu(&self, doc: &mut Document, menu_id: &str) -> Option<MenuMatch> {
        set_active(doc, self.container, menu_id)
    }

    pub fn clear_active_menu(&self, doc: &mut Document) {
        clear_active(doc, self.container);
    }

    // ========== 生命周期 ==========

    /// 销毁菜单：取消全部动画、移除全部监听器、释放元素缓存
    ///
    /// 重复调用是空操作。已写入的样式和类名保持不变。
    pub fn destroy(&mut self, doc: &mut Document) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        let cancelled = self.scheduler.cancel_all();
        let listeners = self.handlers.len();
        for (id, _) in self.handlers.drain() {
            doc.remove_event_listener(id);
        }
        self.cache = ElementCache::default();
        self.resize_deadline = None;

        debug!(cancelled, listeners, "菜单已销毁");
    }

    // ========== 查询方法 ==========

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn options(&self) -> &MenuOptions {
        &self.options
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// 本菜单安装的监听器数量
    pub fn listener_count(&self) -> usize {
        self.handlers.len()
    }

    /// 是否有等待触发的 resize 重算
    pub fn has_pending_resize(&self) -> bool {
        self.resize_deadline.is_some()
    }

    /// 是否没有进行中的动画且没有待触发的重算
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle() && self.resize_deadline.is_none()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::BoxGeometry;

    /// 两个一级菜单，第二个带两个子项；宿主布局写入固定几何
    fn setup(options: MenuOptions) -> (Document, NavMenu) {
        let mut doc = Document::new();
        let nav = doc.create_child(doc.body(), "nav");
        let data = vec![
            MenuItemData::new("a", "A"),
            MenuItemData::new("b", "B")
                .with_children(vec![MenuItemData::new("b1", "B1"), MenuItemData::new("b2", "B2")]),
        ];
        render_from_data(&mut doc, nav, &data);
        apply_layout(&mut doc, nav);

        let menu = NavMenu::new(&mut doc, nav, options).unwrap();
        (doc, menu)
    }

    fn apply_layout(doc: &mut Document, nav: ElementId) {
        let main = doc.find_first_by_class(nav, markup::MAIN).unwrap();
        doc.set_geometry(main, BoxGeometry::new(0.0, 0.0, 300.0, 40.0));
        for (i, item) in doc.find_all_by_class(nav, markup::ITEM).into_iter().enumerate() {
            doc.set_geometry(item, BoxGeometry::new(i as f64 * 100.0, 0.0, 100.0, 40.0));
        }
        for child in doc.find_all_by_class(nav, markup::CHILDREN) {
            doc.set_geometry(child, BoxGeometry::new(0.0, 40.0, 120.0, 64.0));
        }
    }

    fn item(doc: &Document, menu: &NavMenu, index: usize) -> ElementId {
        doc.find_all_by_class(menu.container(), markup::ITEM)[index]
    }

    #[test]
    fn test_init_hides_submenus_and_positions_them() {
        let (doc, menu) = setup(MenuOptions::default());
        let child = doc.find_first_by_class(menu.container(), markup::CHILDREN).unwrap();

        assert_eq!(doc.style(child, "display"), Some("none"));
        assert_eq!(doc.style(child, "visibility"), Some("visible"));
        assert_eq!(doc.style(child, "top"), Some("40px"));
        assert_eq!(doc.style(child, "left"), Some("0px"));
        assert_eq!(doc.style(child, "width"), Some("120px"));
    }

    #[test]
    fn test_init_creates_hidden_indicator() {
        let (doc, menu) = setup(MenuOptions::default());
        let bar_box = doc.find_first_by_class(menu.container(), markup::CURRENT_BAR_BOX).unwrap();

        assert_eq!(doc.style(bar_box, "display"), Some("none"));
        assert!(doc.find_first_by_class(bar_box, markup::CURRENT_BAR).is_some());
        // resize + 容器 2 + 一级菜单 2×2 + 二级菜单 2×2
        assert_eq!(menu.listener_count(), 11);
    }

    #[test]
    fn test_indicator_disabled() {
        let options = MenuOptions {
            current_bar: false,
            ..MenuOptions::default()
        };
        let (doc, menu) = setup(options);

        assert!(doc.find_first_by_class(menu.container(), markup::CURRENT_BAR_BOX).is_none());
        assert_eq!(menu.listener_count(), 9);
    }

    #[test]
    fn test_hover_leave_without_children_clears_marker_immediately() {
        let (mut doc, mut menu) = setup(MenuOptions::default());
        let a = item(&doc, &menu, 0);
        let value = doc.find_first_by_class(a, markup::ITEM_VALUE).unwrap();

        menu.dispatch(&mut doc, &DomEvent::mouse_enter(a, 0.0));
        assert!(doc.has_class(value, markup::ITEM_HOVER));

        menu.dispatch(&mut doc, &DomEvent::mouse_leave(a, 10.0));
        assert!(!doc.has_class(value, markup::ITEM_HOVER));
    }

    #[test]
    fn test_indicator_follows_hovered_item() {
        let (mut doc, mut menu) = setup(MenuOptions::default());
        let b = item(&doc, &menu, 1);
        let bar = doc.find_first_by_class(menu.container(), markup::CURRENT_BAR).unwrap();

        menu.dispatch(&mut doc, &DomEvent::mouse_enter(b, 0.0));
        menu.tick(&mut doc, 300.0);

        assert_eq!(doc.style(bar, "left"), Some("100px"));
        assert_eq!(doc.style(bar, "width"), Some("100px"));
    }

    #[test]
    fn test_child_value_hover() {
        let (mut doc, mut menu) = setup(MenuOptions::default());
        let value = doc.find_first_by_class(menu.container(), markup::CHILD_VALUE).unwrap();

        assert_eq!(menu.dispatch(&mut doc, &DomEvent::mouse_enter(value, 0.0)), 1);
        assert!(doc.has_class(value, markup::CHILD_HOVER));
        menu.dispatch(&mut doc, &DomEvent::mouse_leave(value, 5.0));
        assert!(!doc.has_class(value, markup::CHILD_HOVER));
    }

    #[test]
    fn test_resize_recompute_skipped_when_detached() {
        let (mut doc, mut menu) = setup(MenuOptions::default());
        let child = doc.find_first_by_class(menu.container(), markup::CHILDREN).unwrap();
        doc.set_style(child, "top", "");

        // 容器脱离文档但仍存在
        let detached = doc.create_element("div");
        doc.append_child(detached, menu.container());

        menu.dispatch(&mut doc, &DomEvent::resize(0.0));
        menu.tick(&mut doc, 200.0);

        assert!(!menu.has_pending_resize());
        assert_eq!(doc.style(child, "top"), None);
    }
}
