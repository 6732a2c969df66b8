//! # 菜单场景集成测试
//!
//! 测试 事件派发 → NavMenu → AnimationScheduler → Document 的完整链路。
//! 宿主布局由测试直接写入几何信息。

use nav_menu::{
    BoxGeometry, ConfigError, Document, DomEvent, ElementId, MenuError, MenuItemData, MenuOptions,
    NavMenu, markup, render_from_data,
};

/// 一级菜单 a / b / c，b 带两个子项，c 带一个子项
fn sample_data() -> Vec<MenuItemData> {
    vec![
        MenuItemData::new("a", "A"),
        MenuItemData::new("b", "B").with_children(vec![
            MenuItemData::new("b1", "B1"),
            MenuItemData::new("b2", "B2"),
        ]),
        MenuItemData::new("c", "C").with_children(vec![MenuItemData::new("c1", "C1")]),
    ]
}

/// 模拟宿主布局：主菜单 300×40，菜单项宽 100 从左到右排列，子菜单自然尺寸 120×64
fn apply_layout(doc: &mut Document, nav: ElementId, main_width: f64) {
    let main = doc.find_first_by_class(nav, markup::MAIN).unwrap();
    doc.set_geometry(main, BoxGeometry::new(0.0, 0.0, main_width, 40.0));
    for (i, item) in doc.find_all_by_class(nav, markup::ITEM).into_iter().enumerate() {
        doc.set_geometry(item, BoxGeometry::new(i as f64 * 100.0, 0.0, 100.0, 40.0));
    }
    for child in doc.find_all_by_class(nav, markup::CHILDREN) {
        doc.set_geometry(child, BoxGeometry::new(0.0, 40.0, 120.0, 64.0));
    }
}

/// 先渲染并布局，再创建菜单
fn mounted_menu(options: MenuOptions) -> (Document, NavMenu) {
    let mut doc = Document::new();
    let nav = doc.create_child(doc.body(), "nav");
    doc.set_attribute(nav, "id", "site-nav");
    render_from_data(&mut doc, nav, &sample_data());
    apply_layout(&mut doc, nav, 300.0);

    let menu = NavMenu::new(&mut doc, nav, options).unwrap();
    (doc, menu)
}

fn item(doc: &Document, menu: &NavMenu, index: usize) -> ElementId {
    doc.find_all_by_class(menu.container(), markup::ITEM)[index]
}

fn submenu(doc: &Document, item: ElementId) -> ElementId {
    doc.find_first_by_class(item, markup::CHILDREN).unwrap()
}

fn value(doc: &Document, item: ElementId) -> ElementId {
    doc.find_first_by_class(item, markup::ITEM_VALUE).unwrap()
}

fn marked(doc: &Document, menu: &NavMenu, class: &str) -> Vec<String> {
    let root = menu.container();
    let mut ids = Vec::new();
    for value_class in [markup::ITEM_VALUE, markup::CHILD_VALUE] {
        for el in doc.find_all_by_class(root, value_class) {
            if doc.has_class(el, class) {
                ids.push(doc.attribute(el, markup::MENU_ID_ATTR).unwrap_or_default().to_string());
            }
        }
    }
    ids
}

/// 测试完整的悬停流程：指示条淡入 → 子菜单展开 → 收起 → 指示条淡出
#[test]
fn test_hover_flow() {
    let (mut doc, mut menu) = mounted_menu(MenuOptions::default());
    let nav = menu.container();
    let b = item(&doc, &menu, 1);
    let child = submenu(&doc, b);
    let b_value = value(&doc, b);
    let bar_box = doc.find_first_by_class(nav, markup::CURRENT_BAR_BOX).unwrap();

    // 1. 进入容器与菜单项
    menu.dispatch(&mut doc, &DomEvent::mouse_enter(nav, 0.0));
    assert_eq!(doc.style(bar_box, "display"), Some("block"));

    menu.dispatch(&mut doc, &DomEvent::mouse_enter(b, 0.0));
    assert_eq!(doc.style(child, "display"), Some("block"));
    assert_eq!(doc.style(child, "height"), Some("0px"));
    assert!(doc.has_class(b_value, markup::ITEM_HOVER));

    // 2. 展开中途超过自然高度
    menu.tick(&mut doc, 232.0);
    assert!(doc.offset_height(child) > 64.0);

    // 3. 展开结束，恢复自动高度
    menu.tick(&mut doc, 400.0);
    assert_eq!(doc.style(child, "height"), None);
    assert_eq!(doc.style(child, "display"), Some("block"));
    assert_eq!(doc.style(bar_box, "opacity"), Some("1"));

    // 4. 离开菜单项：以一半时长线性收起，结束后才移除悬停标记
    menu.dispatch(&mut doc, &DomEvent::mouse_leave(b, 500.0));
    menu.tick(&mut doc, 600.0);
    assert_eq!(doc.style(child, "height"), Some("32px"));
    assert!(doc.has_class(b_value, markup::ITEM_HOVER));

    menu.tick(&mut doc, 700.0);
    assert_eq!(doc.style(child, "display"), Some("none"));
    assert_eq!(doc.style(child, "height"), None);
    assert!(!doc.has_class(b_value, markup::ITEM_HOVER));

    // 5. 离开容器
    menu.dispatch(&mut doc, &DomEvent::mouse_leave(nav, 700.0));
    let mut now = 700.0;
    while !menu.is_idle() {
        now += 16.0;
        menu.tick(&mut doc, now);
    }
    assert_eq!(doc.style(bar_box, "display"), Some("none"));
    assert_eq!(doc.style(bar_box, "opacity"), Some("0"));
}

/// 测试快速重复悬停时每个元素只保留一个动画
#[test]
fn test_rapid_hover_keeps_single_animation_per_element() {
    let (mut doc, mut menu) = mounted_menu(MenuOptions::default());
    let b = item(&doc, &menu, 1);
    let c = item(&doc, &menu, 2);
    let child = submenu(&doc, b);

    for step in 0..5 {
        let t = step as f64 * 20.0;
        menu.dispatch(&mut doc, &DomEvent::mouse_enter(b, t));
        menu.tick(&mut doc, t + 5.0);
        menu.dispatch(&mut doc, &DomEvent::mouse_leave(b, t + 10.0));
        menu.dispatch(&mut doc, &DomEvent::mouse_enter(c, t + 10.0));
        menu.tick(&mut doc, t + 15.0);
        menu.dispatch(&mut doc, &DomEvent::mouse_leave(c, t + 15.0));
    }

    let scheduler = menu.scheduler();
    assert!(scheduler.is_animating(child));
    // b、c 的子菜单 + 指示条
    assert!(scheduler.active_count() <= 3);
    assert_eq!(scheduler.active_count(), scheduler.pending_frames());
}

/// 测试 a → b1 → b 的选中切换
#[test]
fn test_selection_scenario() {
    let (mut doc, menu) = mounted_menu(MenuOptions::default());

    menu.set_active_menu(&mut doc, "a");
    assert_eq!(marked(&doc, &menu, markup::ITEM_ACTIVE), vec!["a"]);
    assert!(marked(&doc, &menu, markup::CHILD_ACTIVE).is_empty());

    menu.set_active_menu(&mut doc, "b1");
    assert_eq!(marked(&doc, &menu, markup::ITEM_ACTIVE), vec!["b"]);
    assert_eq!(marked(&doc, &menu, markup::CHILD_ACTIVE), vec!["b1"]);

    menu.set_active_menu(&mut doc, "b");
    assert_eq!(marked(&doc, &menu, markup::ITEM_ACTIVE), vec!["b"]);
    assert!(marked(&doc, &menu, markup::CHILD_ACTIVE).is_empty());

    // 未知 ID：保留现有标记
    assert!(menu.set_active_menu(&mut doc, "nope").is_none());
    assert_eq!(marked(&doc, &menu, markup::ITEM_ACTIVE), vec!["b"]);
    assert!(marked(&doc, &menu, markup::CHILD_ACTIVE).is_empty());

    menu.set_active_menu(&mut doc, "c1");
    menu.clear_active_menu(&mut doc);
    assert!(marked(&doc, &menu, markup::ITEM_ACTIVE).is_empty());
    assert!(marked(&doc, &menu, markup::CHILD_ACTIVE).is_empty());
}

/// 测试数据生成的每个菜单项都能按 ID 找回
#[test]
fn test_builder_round_trip() {
    let mut doc = Document::new();
    let nav = doc.create_child(doc.body(), "nav");
    let data = sample_data();
    let menu = NavMenu::new(&mut doc, nav, MenuOptions::default().with_data(data.clone())).unwrap();

    let items = doc.find_all_by_class(nav, markup::ITEM);
    assert_eq!(items.len(), data.len());

    for (top, item_data) in items.iter().zip(&data) {
        let found = menu.find_menu_by_id(&doc, &item_data.id).unwrap();
        assert_eq!(found.item, Some(*top));
        assert_eq!(found.child_item, None);

        let child_items = doc.find_all_by_class(*top, markup::CHILD_ITEM);
        assert_eq!(child_items.len(), item_data.children.len());
        for (child_item, child_data) in child_items.iter().zip(&item_data.children) {
            let found = menu.find_menu_by_id(&doc, &child_data.id).unwrap();
            assert_eq!(found.item, Some(*top));
            assert_eq!(found.child_item, Some(*child_item));
        }
    }
}

/// 测试容器上的初始选中 ID
#[test]
fn test_initial_active_menu_attribute() {
    let mut doc = Document::new();
    let nav = doc.create_child(doc.body(), "nav");
    doc.set_attribute(nav, markup::ACTIVE_MENU_ATTR, "b1");

    let options = MenuOptions::default().with_data(sample_data());
    let menu = NavMenu::new(&mut doc, nav, options).unwrap();

    assert_eq!(marked(&doc, &menu, markup::ITEM_ACTIVE), vec!["b"]);
    assert_eq!(marked(&doc, &menu, markup::CHILD_ACTIVE), vec!["b1"]);
}

/// 测试 resize 防抖：连续事件只在最后一次之后 100ms 重算一次
#[test]
fn test_resize_debounce_coalesces_bursts() {
    let (mut doc, mut menu) = mounted_menu(MenuOptions::default());
    let nav = menu.container();
    let b = item(&doc, &menu, 1);
    let child = submenu(&doc, b);
    assert_eq!(doc.style(child, "left"), Some("0px"));

    // 视口变窄
    apply_layout(&mut doc, nav, 150.0);
    for t in [0.0, 50.0, 90.0] {
        menu.dispatch(&mut doc, &DomEvent::resize(t));
    }

    menu.tick(&mut doc, 150.0);
    assert!(menu.has_pending_resize());
    assert_eq!(doc.style(child, "left"), Some("0px"));

    menu.tick(&mut doc, 190.0);
    assert!(!menu.has_pending_resize());
    assert_eq!(doc.style(child, "left"), Some("-70px"));
    assert_eq!(doc.style(child, "width"), Some("120px"));
}

/// 测试销毁：释放全部监听器与帧，且可重复调用
#[test]
fn test_destroy_releases_everything() {
    let (mut doc, mut menu) = mounted_menu(MenuOptions::default());
    let nav = menu.container();
    let b = item(&doc, &menu, 1);
    let b_value = value(&doc, b);
    assert_eq!(doc.listener_count(), menu.listener_count());

    menu.dispatch(&mut doc, &DomEvent::mouse_enter(nav, 0.0));
    menu.dispatch(&mut doc, &DomEvent::mouse_enter(b, 0.0));
    menu.dispatch(&mut doc, &DomEvent::resize(0.0));
    assert!(menu.scheduler().pending_frames() > 0);

    menu.destroy(&mut doc);
    assert!(menu.is_destroyed());
    assert_eq!(doc.listener_count(), 0);
    assert_eq!(menu.listener_count(), 0);
    assert!(menu.is_idle());

    // 销毁后事件与帧都不再生效
    assert_eq!(menu.dispatch(&mut doc, &DomEvent::mouse_leave(b, 10.0)), 0);
    assert_eq!(menu.tick(&mut doc, 500.0), 0);
    assert!(doc.has_class(b_value, markup::ITEM_HOVER));

    menu.destroy(&mut doc);
    assert!(menu.is_destroyed());
}

/// 测试已有指示条标记时直接复用
#[test]
fn test_existing_indicator_is_reused() {
    let mut doc = Document::new();
    let nav = doc.create_child(doc.body(), "nav");
    render_from_data(&mut doc, nav, &sample_data());
    let bar_box = doc.create_child(nav, "div");
    doc.add_class(bar_box, markup::CURRENT_BAR_BOX);
    let bar = doc.create_child(bar_box, "div");
    doc.add_class(bar, markup::CURRENT_BAR);
    apply_layout(&mut doc, nav, 300.0);

    let mut menu = NavMenu::new(&mut doc, nav, MenuOptions::default()).unwrap();
    assert_eq!(doc.find_all_by_class(nav, markup::CURRENT_BAR_BOX), vec![bar_box]);
    // 复用时不绑定容器的进入/离开事件
    assert_eq!(menu.dispatch(&mut doc, &DomEvent::mouse_enter(nav, 0.0)), 0);

    let c = item(&doc, &menu, 2);
    menu.dispatch(&mut doc, &DomEvent::mouse_enter(c, 0.0));
    menu.tick(&mut doc, 300.0);
    assert_eq!(doc.style(bar, "left"), Some("200px"));
    assert_eq!(doc.style(bar, "width"), Some("100px"));
}

/// 测试自定义缓动：非 easeOutBack 名称时指示条线性移动
#[test]
fn test_linear_indicator_easing() {
    let options = MenuOptions {
        easing: "linear".to_string(),
        ..MenuOptions::default()
    };
    let (mut doc, mut menu) = mounted_menu(options);
    let bar = doc.find_first_by_class(menu.container(), markup::CURRENT_BAR).unwrap();
    let c = item(&doc, &menu, 2);

    menu.dispatch(&mut doc, &DomEvent::mouse_enter(c, 0.0));
    menu.tick(&mut doc, 150.0);
    assert_eq!(doc.style(bar, "left"), Some("100px"));
}

/// 测试空闲一段时间后再悬停：动画从事件时间开始计时
#[test]
fn test_hover_after_idle_gap_runs_full_duration() {
    let options = MenuOptions {
        easing: "linear".to_string(),
        ..MenuOptions::default()
    };
    let (mut doc, mut menu) = mounted_menu(options);
    let bar = doc.find_first_by_class(menu.container(), markup::CURRENT_BAR).unwrap();
    let a = item(&doc, &menu, 0);
    let c = item(&doc, &menu, 2);

    // 1. 第一次悬停并跑完
    menu.dispatch(&mut doc, &DomEvent::mouse_enter(c, 0.0));
    menu.tick(&mut doc, 300.0);
    assert_eq!(doc.style(bar, "left"), Some("200px"));
    assert!(!menu.scheduler().is_animating(bar));

    // 2. 5 秒内没有任何帧，之后悬停 a
    menu.dispatch(&mut doc, &DomEvent::mouse_enter(a, 5000.0));
    menu.tick(&mut doc, 5150.0);
    assert_eq!(doc.style(bar, "left"), Some("100px"));
    assert!(menu.scheduler().is_animating(bar));

    // 3. 满 currentBarDuration 后落位
    menu.tick(&mut doc, 5300.0);
    assert_eq!(doc.style(bar, "left"), Some("0px"));
    assert!(!menu.scheduler().is_animating(bar));
}

/// 测试构造错误
#[test]
fn test_construction_errors() {
    let mut doc = Document::new();
    let nav = doc.create_child(doc.body(), "nav");
    doc.set_attribute(nav, "id", "site-nav");
    doc.add_class(nav, "menu");

    let gone = doc.create_child(doc.body(), "nav");
    doc.remove(gone);
    assert_eq!(
        NavMenu::new(&mut doc, gone, MenuOptions::default()).unwrap_err(),
        MenuError::InvalidContainer(gone)
    );

    let bad_options = MenuOptions {
        duration: -5.0,
        ..MenuOptions::default()
    };
    assert!(matches!(
        NavMenu::new(&mut doc, nav, bad_options),
        Err(MenuError::Config(ConfigError::Validation(_)))
    ));

    assert!(matches!(
        NavMenu::mount(&mut doc, "nav ul", MenuOptions::default()),
        Err(MenuError::InvalidSelector { .. })
    ));
    assert!(matches!(
        NavMenu::mount(&mut doc, "#missing", MenuOptions::default()),
        Err(MenuError::SelectorNotFound { .. })
    ));

    let menu = NavMenu::mount(&mut doc, "#site-nav", MenuOptions::default()).unwrap();
    assert_eq!(menu.container(), nav);
}

/// 测试缺少主菜单时只记录警告
#[test]
fn test_missing_main_list_is_not_fatal() {
    let mut doc = Document::new();
    let nav = doc.create_child(doc.body(), "nav");

    let mut menu = NavMenu::new(&mut doc, nav, MenuOptions::default()).unwrap();

    // 没有菜单项，只有 resize 和容器事件
    assert_eq!(menu.listener_count(), 3);
    menu.dispatch(&mut doc, &DomEvent::resize(0.0));
    menu.tick(&mut doc, 100.0);
    assert!(menu.is_idle());
}
