//! # Dom 模块
//!
//! 无头文档模型：菜单组件读写的元素树。
//!
//! ## 核心概念
//!
//! - `Document`: 元素树的所有者（相当于宿主页面）
//! - `ElementId`: 元素句柄，按句柄相等判定身份，不做结构比较
//! - `BoxGeometry`: 宿主提供的盒模型几何（相对父元素）
//!
//! 组件本身不做布局计算，只读取宿主写入的几何信息；
//! `display: none` 与内联 `width` / `height` 会影响读取到的渲染尺寸。

mod event;
mod html;
mod style;

use std::collections::BTreeMap;

pub use event::{DomEvent, EventKind, EventTarget, ListenerId};
pub use style::{InlineStyle, format_number, format_px, parse_leading_float};

use event::ListenerRegistry;

/// 元素句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// 获取内部索引
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// 盒模型几何（像素，相对父元素）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// 内容的自然高度（`scrollHeight`）
    pub scroll_height: f64,
}

impl BoxGeometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            scroll_height: height,
        }
    }

    pub fn with_scroll_height(mut self, scroll_height: f64) -> Self {
        self.scroll_height = scroll_height;
        self
    }
}

/// 文档元素
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: InlineStyle,
    text: Option<String>,
    inner_html: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    geometry: BoxGeometry,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: InlineStyle::new(),
            text: None,
            inner_html: None,
            parent: None,
            children: Vec::new(),
            geometry: BoxGeometry::default(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn inner_html(&self) -> Option<&str> {
        self.inner_html.as_deref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn geometry(&self) -> BoxGeometry {
        self.geometry
    }
}

/// 简单选择器（`#id` / `.class`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
}

impl Selector {
    /// 解析选择器字符串，不支持的格式返回 `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (kind, name) = raw.split_at_checked(1)?;
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return None;
        }

        match kind {
            "#" => Some(Self::Id(name.to_string())),
            "." => Some(Self::Class(name.to_string())),
            _ => None,
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Id(id) => element.attribute("id") == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
        }
    }
}

/// 文档
///
/// 拥有全部元素；菜单组件只持有 `ElementId`（非拥有引用）。
/// 对已删除元素的写操作是空操作，读操作返回默认值。
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    body: ElementId,
    listeners: ListenerRegistry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// 创建只包含 `<body>` 的文档
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Element::new("body"))],
            body: ElementId(0),
            listeners: ListenerRegistry::default(),
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    // ========== 节点管理 ==========

    /// 创建游离元素（未挂载到任何父元素）
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Some(Element::new(tag)));
        id
    }

    /// 创建元素并追加到父元素末尾
    pub fn create_child(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// 追加子元素；子元素若已有父元素会先被移出
    ///
    /// 任一元素不存在，或会形成环时返回 `false`。
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_inclusive_ancestor(child, parent) {
            return false;
        }

        self.detach(child);
        if let Some(element) = self.element_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.element_mut(parent) {
            element.children.push(child);
        }
        true
    }

    /// 删除元素及其子树（`<body>` 不可删除）
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.body || !self.contains(id) {
            return false;
        }
        self.detach(id);
        self.drop_subtree(id);
        true
    }

    /// 删除全部子元素（`innerHTML = ''`）
    pub fn remove_children(&mut self, parent: ElementId) {
        let children = match self.element_mut(parent) {
            Some(element) => {
                element.text = None;
                element.inner_html = None;
                std::mem::take(&mut element.children)
            }
            None => return,
        };

        for child in children {
            self.drop_subtree(child);
        }
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.element(id).and_then(Element::parent) else {
            return;
        };
        if let Some(element) = self.element_mut(parent) {
            element.children.retain(|c| *c != id);
        }
        if let Some(element) = self.element_mut(id) {
            element.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: ElementId) {
        let Some(element) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        self.listeners.remove_element(id);
        for child in element.children {
            self.drop_subtree(child);
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.element(node).and_then(Element::parent);
        }
        false
    }

    /// 元素是否挂载在 `<body>` 之下
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.body, id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(Element::parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.element(id).map(Element::children).unwrap_or(&[])
    }

    // ========== 属性 / 类名 / 文本 ==========

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// 覆盖类名（`className = "a b"`）
    pub fn set_class_name(&mut self, id: ElementId, class_name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes = class_name.split_whitespace().map(str::to_string).collect();
        }
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attribute(name))
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.element_mut(id) {
            element.text = Some(text.to_string());
        }
    }

    /// 写入原始标记（不解析，序列化时原样输出）
    pub fn set_inner_html(&mut self, id: ElementId, markup: &str) {
        if let Some(element) = self.element_mut(id) {
            element.inner_html = Some(markup.to_string());
        }
    }

    // ========== 内联样式 ==========

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.style.get(property))
    }

    /// 写入内联样式（空字符串表示删除）
    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.style.set(property, value);
        }
    }

    // ========== 几何 ==========

    /// 宿主写入布局结果
    pub fn set_geometry(&mut self, id: ElementId, geometry: BoxGeometry) {
        if let Some(element) = self.element_mut(id) {
            element.geometry = geometry;
        }
    }

    pub fn geometry(&self, id: ElementId) -> BoxGeometry {
        self.element(id).map(Element::geometry).unwrap_or_default()
    }

    /// 元素自身及祖先都没有 `display: none`
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(element) = self.element(node) else {
                return false;
            };
            if element.style.get("display") == Some("none") {
                return false;
            }
            current = element.parent;
        }
        true
    }

    /// 渲染宽度（`offsetWidth`）
    pub fn offset_width(&self, id: ElementId) -> f64 {
        self.rendered_size(id, "width", |g| g.width)
    }

    /// 渲染高度（`offsetHeight`）
    pub fn offset_height(&self, id: ElementId) -> f64 {
        self.rendered_size(id, "height", |g| g.height)
    }

    /// 内容自然高度（`scrollHeight`）
    pub fn scroll_height(&self, id: ElementId) -> f64 {
        if !self.is_rendered(id) {
            return 0.0;
        }
        self.geometry(id).scroll_height
    }

    fn rendered_size(&self, id: ElementId, property: &str, layout: fn(&BoxGeometry) -> f64) -> f64 {
        if !self.is_rendered(id) {
            return 0.0;
        }
        self.style(id, property)
            .and_then(parse_leading_float)
            .unwrap_or_else(|| layout(&self.geometry(id)))
    }

    /// 读取属性的数值（`parseFloat(getComputedStyle(el)[prop]) || 0`）
    pub fn computed_px(&self, id: ElementId, property: &str) -> f64 {
        if let Some(value) = self.style(id, property).and_then(parse_leading_float) {
            return value;
        }

        let geometry = self.geometry(id);
        match property {
            "width" => self.offset_width(id),
            "height" => self.offset_height(id),
            "left" => geometry.left,
            "top" => geometry.top,
            _ => 0.0,
        }
    }

    // ========== 查询 ==========

    /// 按文档顺序返回 `root` 的全部后代中匹配的元素（不含 `root`）
    pub fn query_all(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let Some(element) = self.element(id) else {
                continue;
            };
            if selector.matches(element) {
                found.push(id);
            }
            stack.extend(element.children.iter().rev().copied());
        }

        found
    }

    pub fn find_all_by_class(&self, root: ElementId, class: &str) -> Vec<ElementId> {
        self.query_all(root, &Selector::Class(class.to_string()))
    }

    pub fn find_first_by_class(&self, root: ElementId, class: &str) -> Option<ElementId> {
        self.find_all_by_class(root, class).into_iter().next()
    }

    /// 在 `root` 的后代中查找第一个匹配选择器的元素
    pub fn query_selector(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        self.query_all(root, selector).into_iter().next()
    }

    /// 从自身开始向上查找第一个带指定类名的元素
    pub fn closest(&self, id: ElementId, class: &str) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(node) = current {
            let element = self.element(node)?;
            if element.has_class(class) {
                return Some(node);
            }
            current = element.parent;
        }
        None
    }

    // ========== 事件监听 ==========

    pub fn add_event_listener(&mut self, target: EventTarget, kind: EventKind) -> ListenerId {
        self.listeners.add(target, kind)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// 匹配事件的监听器（按注册顺序）
    pub fn listeners_for(&self, target: EventTarget, kind: EventKind) -> Vec<ListenerId> {
        self.listeners.matching(target, kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
