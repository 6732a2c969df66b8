//! # Geometry 模块
//!
//! 子菜单定位：根据主菜单尺寸和菜单项位置计算子菜单的 `top` / `left` / `width`。

use crate::dom::{Document, ElementId, format_px};

use super::markup;

/// 主菜单尺寸
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainDimensions {
    /// 主菜单高度，即子菜单的 `top`
    pub item_height: f64,
    pub main_width: f64,
}

impl MainDimensions {
    pub fn read(doc: &Document, main: ElementId) -> Self {
        Self {
            item_height: doc.offset_height(main),
            main_width: doc.offset_width(main),
        }
    }
}

/// 子菜单左偏移
///
/// 子菜单默认与菜单项左对齐；超出主菜单右边界时向左平移，结果永远不为正。
pub fn clamp_submenu_left(main_width: f64, item_left: f64, child_width: f64) -> f64 {
    let left = main_width - item_left - child_width;
    if left > 0.0 { 0.0 } else { left }
}

/// 临时以"可测量但不可见"的状态显示元素并执行测量
///
/// 测量期间元素为 `display: block; visibility: hidden; width: auto; left: 0; top: 0`，
/// 结束后恢复原内联样式（原本没有的属性会被删除）。
pub fn measure_natural<R>(
    doc: &mut Document,
    element: ElementId,
    measure: impl FnOnce(&Document, ElementId) -> R,
) -> R {
    const OVERRIDES: [(&str, &str); 5] = [
        ("display", "block"),
        ("visibility", "hidden"),
        ("width", "auto"),
        ("left", "0"),
        ("top", "0"),
    ];

    let saved: Vec<(&str, Option<String>)> = OVERRIDES
        .iter()
        .map(|(property, _)| (*property, doc.style(element, property).map(str::to_string)))
        .collect();

    for (property, value) in OVERRIDES {
        doc.set_style(element, property, value);
    }

    let result = measure(doc, element);

    for (property, original) in saved {
        doc.set_style(element, property, original.as_deref().unwrap_or(""));
    }

    result
}

/// 计算并写入菜单项下子菜单的位置和宽度
///
/// 主菜单尺寸为 0、菜单项没有子菜单或没有父元素时不做任何事。
pub fn layout_submenu(doc: &mut Document, item: ElementId, dims: MainDimensions) {
    if dims.item_height == 0.0 || dims.main_width == 0.0 {
        return;
    }
    let Some(child) = doc.find_first_by_class(item, markup::CHILDREN) else {
        return;
    };
    if doc.parent(item).is_none() {
        return;
    }

    let item_left = doc.geometry(item).left;
    let item_width = doc.offset_width(item);

    // 子菜单不窄于菜单项
    let child_width = measure_natural(doc, child, |doc, el| item_width.max(doc.offset_width(el)));
    let child_left = clamp_submenu_left(dims.main_width, item_left, child_width);

    doc.set_style(child, "top", &format_px(dims.item_height));
    doc.set_style(child, "left", &format_px(child_left));
    doc.set_style(child, "width", &format_px(child_width));
}
