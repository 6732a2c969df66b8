//! # Builder 模块
//!
//! 从声明式菜单数据生成菜单结构。
//!
//! 生成的结构（二级菜单项使用 `vui-child-*` 类名）：
//!
//! ```text
//! ul.vui-main
//! └── li.vui-item
//!     ├── a.vui-item-value[data-menu-id][href]
//!     │   ├── span.vui-item-value-icon   (内联 SVG 或 img)
//!     │   └── span.vui-item-value-text
//!     └── ul.vui-children               (仅在有子项时)
//!         └── li.vui-child-item ...
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::markup;
use crate::dom::{Document, ElementId};

/// 菜单项数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItemData {
    /// 菜单 ID（写入 `data-menu-id`，需唯一）
    #[serde(default)]
    pub id: String,

    /// 显示文本
    #[serde(default)]
    pub text: String,

    /// 链接地址，缺省为 `#`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// 图标：内联 SVG 标记或图片 URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// 子菜单项
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItemData>,
}

impl MenuItemData {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItemData>) -> Self {
        self.children = children;
        self
    }
}

/// 菜单层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Top,
    Child,
}

impl Level {
    fn item_class(self) -> &'static str {
        match self {
            Level::Top => markup::ITEM,
            Level::Child => markup::CHILD_ITEM,
        }
    }

    fn value_class(self) -> &'static str {
        match self {
            Level::Top => markup::ITEM_VALUE,
            Level::Child => markup::CHILD_VALUE,
        }
    }

    fn icon_class(self) -> &'static str {
        match self {
            Level::Top => "vui-item-value-icon",
            Level::Child => "vui-child-value-icon",
        }
    }

    fn text_class(self) -> &'static str {
        match self {
            Level::Top => "vui-item-value-text",
            Level::Child => "vui-child-value-text",
        }
    }
}

/// 根据数据渲染菜单结构
///
/// 数据为空时不修改容器，返回 `None`；否则先清空容器，
/// 再生成 `ul.vui-main` 并返回它。缺少 `id` 或 `text` 的项会被跳过。
pub fn render_from_data(
    doc: &mut Document,
    container: ElementId,
    data: &[MenuItemData],
) -> Option<ElementId> {
    if data.is_empty() {
        return None;
    }

    doc.remove_children(container);

    let main = doc.create_element("ul");
    doc.set_class_name(main, markup::MAIN);
    for item in data {
        render_item(doc, main, item, Level::Top);
    }
    doc.append_child(container, main);

    debug!(items = data.len(), "菜单结构渲染完成");
    Some(main)
}

fn render_item(doc: &mut Document, parent: ElementId, data: &MenuItemData, level: Level) {
    if data.id.is_empty() || data.text.is_empty() {
        debug!(id = %data.id, text = %data.text, "跳过缺少 id 或 text 的菜单项");
        return;
    }

    let li = doc.create_element("li");
    doc.set_class_name(li, level.item_class());

    let link = doc.create_child(li, "a");
    doc.set_attribute(link, "href", data.href.as_deref().unwrap_or("#"));
    doc.set_class_name(link, level.value_class());
    doc.set_attribute(link, markup::MENU_ID_ATTR, &data.id);

    let icon = doc.create_child(link, "span");
    doc.set_class_name(icon, level.icon_class());
    if let Some(source) = data.icon.as_deref().filter(|s| !s.is_empty()) {
        let source = source.trim();
        if source.to_ascii_lowercase().starts_with("<svg") {
            doc.set_inner_html(icon, source);
        } else {
            let img = doc.create_child(icon, "img");
            doc.set_attribute(img, "src", source);
        }
    }

    let text = doc.create_child(link, "span");
    doc.set_class_name(text, level.text_class());
    doc.set_text(text, &data.text);

    if !data.children.is_empty() {
        let children = doc.create_child(li, "ul");
        doc.set_class_name(children, markup::CHILDREN);
        for child in &data.children {
            render_item(doc, children, child, Level::Child);
        }
    }

    doc.append_child(parent, li);
}
