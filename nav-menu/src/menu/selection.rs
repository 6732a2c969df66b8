//! # Selection 模块
//!
//! 选中状态：按 `data-menu-id` 查找菜单项，并维护 `vui-item-active` /
//! `vui-child-active` 标记。选中状态不单独存储，完全由类名推导。

use tracing::warn;

use super::markup;
use crate::dom::{Document, ElementId};

/// 按 ID 查找到的菜单项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuMatch {
    /// 一级菜单项（`li.vui-item`）
    pub item: Option<ElementId>,
    /// 二级菜单项（`li.vui-child-item`），目标是一级菜单时为 `None`
    pub child_item: Option<ElementId>,
}

fn find_value(
    doc: &Document,
    container: ElementId,
    class: &str,
    menu_id: &str,
) -> Option<ElementId> {
    doc.find_all_by_class(container, class)
        .into_iter()
        .find(|value| doc.attribute(*value, markup::MENU_ID_ATTR) == Some(menu_id))
}

/// 查找菜单项，二级菜单优先
pub fn find_menu_by_id(doc: &Document, container: ElementId, menu_id: &str) -> Option<MenuMatch> {
    if menu_id.is_empty() {
        return None;
    }

    if let Some(value) = find_value(doc, container, markup::CHILD_VALUE, menu_id) {
        let child_item = doc.closest(value, markup::CHILD_ITEM);
        let item = child_item.and_then(|c| doc.closest(c, markup::ITEM));
        return Some(MenuMatch { item, child_item });
    }

    find_value(doc, container, markup::ITEM_VALUE, menu_id).map(|value| MenuMatch {
        item: doc.closest(value, markup::ITEM),
        child_item: None,
    })
}

/// 清除全部选中标记
pub fn clear_active(doc: &mut Document, container: ElementId) {
    let mut marked = Vec::new();
    for (value_class, active_class) in [
        (markup::ITEM_VALUE, markup::ITEM_ACTIVE),
        (markup::CHILD_VALUE, markup::CHILD_ACTIVE),
    ] {
        marked.extend(
            doc.find_all_by_class(container, value_class)
                .into_iter()
                .filter(|value| doc.has_class(*value, active_class)),
        );
    }

    for value in marked {
        doc.remove_class(value, markup::ITEM_ACTIVE);
        doc.remove_class(value, markup::CHILD_ACTIVE);
    }
}

/// 设置选中菜单
///
/// 空 ID 等价于 [`clear_active`]；未找到时记录警告，已有标记保持不变。
pub fn set_active(doc: &mut Document, container: ElementId, menu_id: &str) -> Option<MenuMatch> {
    if menu_id.is_empty() {
        clear_active(doc, container);
        return None;
    }

    let Some(found) = find_menu_by_id(doc, container, menu_id) else {
        warn!(menu_id, "未找到 menu-id 对应的菜单项");
        return None;
    };

    clear_active(doc, container);
    if let Some(value) = found
        .item
        .and_then(|item| doc.find_first_by_class(item, markup::ITEM_VALUE))
    {
        doc.add_class(value, markup::ITEM_ACTIVE);
    }
    if let Some(value) = found
        .child_item
        .and_then(|child| doc.find_first_by_class(child, markup::CHILD_VALUE))
    {
        doc.add_class(value, markup::CHILD_ACTIVE);
    }

    Some(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuItemData, render_from_data};

    fn setup() -> (Document, ElementId) {
        let mut doc = Document::new();
        let nav = doc.create_child(doc.body(), "nav");
        let data = vec![
            MenuItemData::new("a", "A"),
            MenuItemData::new("b", "B").with_children(vec![MenuItemData::new("b1", "B1")]),
        ];
        render_from_data(&mut doc, nav, &data);
        (doc, nav)
    }

    fn active_ids(doc: &Document, nav: ElementId, class: &str) -> Vec<String> {
        doc.find_all_by_class(nav, class)
            .into_iter()
            .filter_map(|v| doc.attribute(v, markup::MENU_ID_ATTR).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_find_prefers_child_values() {
        let (doc, nav) = setup();
        let items = doc.find_all_by_class(nav, markup::ITEM);
        let child = doc.find_first_by_class(nav, markup::CHILD_ITEM);

        assert_eq!(
            find_menu_by_id(&doc, nav, "b1"),
            Some(MenuMatch { item: Some(items[1]), child_item: child })
        );
        assert_eq!(
            find_menu_by_id(&doc, nav, "a"),
            Some(MenuMatch { item: Some(items[0]), child_item: None })
        );
        assert_eq!(find_menu_by_id(&doc, nav, "zzz"), None);
        assert_eq!(find_menu_by_id(&doc, nav, ""), None);
    }

    #[test]
    fn test_selection_sequence() {
        let (mut doc, nav) = setup();

        set_active(&mut doc, nav, "a");
        assert_eq!(active_ids(&doc, nav, markup::ITEM_ACTIVE), vec!["a"]);

        set_active(&mut doc, nav, "b1");
        assert_eq!(active_ids(&doc, nav, markup::ITEM_ACTIVE), vec!["b"]);
        assert_eq!(active_ids(&doc, nav, markup::CHILD_ACTIVE), vec!["b1"]);

        set_active(&mut doc, nav, "b");
        assert_eq!(active_ids(&doc, nav, markup::ITEM_ACTIVE), vec!["b"]);
        assert!(active_ids(&doc, nav, markup::CHILD_ACTIVE).is_empty());
    }

    #[test]
    fn test_unknown_id_keeps_markers() {
        let (mut doc, nav) = setup();
        set_active(&mut doc, nav, "b1");

        assert!(set_active(&mut doc, nav, "missing").is_none());
        assert_eq!(active_ids(&doc, nav, markup::ITEM_ACTIVE), vec!["b"]);
        assert_eq!(active_ids(&doc, nav, markup::CHILD_ACTIVE), vec!["b1"]);
    }

    #[test]
    fn test_empty_id_clears() {
        let (mut doc, nav) = setup();
        set_active(&mut doc, nav, "a");
        set_active(&mut doc, nav, "");
        assert!(active_ids(&doc, nav, markup::ITEM_ACTIVE).is_empty());
    }
}
