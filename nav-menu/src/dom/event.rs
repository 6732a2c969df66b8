//! # Event 模块
//!
//! 文档事件与监听器注册表。
//!
//! 文档只记录"谁在监听什么"，监听器对应的处理逻辑由安装者自己保存，
//! 通过 [`ListenerId`] 关联。

use std::collections::BTreeMap;

use super::ElementId;

/// 事件目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// 视口（resize 事件）
    Window,
    /// 文档中的元素
    Element(ElementId),
}

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// 指针进入
    MouseEnter,
    /// 指针离开
    MouseLeave,
    /// 视口尺寸变化
    Resize,
}

/// 宿主派发的事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomEvent {
    pub target: EventTarget,
    pub kind: EventKind,
    /// 事件时间戳（毫秒）
    pub timestamp: f64,
}

impl DomEvent {
    pub fn new(target: EventTarget, kind: EventKind, timestamp: f64) -> Self {
        Self {
            target,
            kind,
            timestamp,
        }
    }

    pub fn mouse_enter(element: ElementId, timestamp: f64) -> Self {
        Self::new(EventTarget::Element(element), EventKind::MouseEnter, timestamp)
    }

    pub fn mouse_leave(element: ElementId, timestamp: f64) -> Self {
        Self::new(EventTarget::Element(element), EventKind::MouseLeave, timestamp)
    }

    pub fn resize(timestamp: f64) -> Self {
        Self::new(EventTarget::Window, EventKind::Resize, timestamp)
    }
}

/// 监听器 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 监听器注册表
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    entries: BTreeMap<ListenerId, (EventTarget, EventKind)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, target: EventTarget, kind: EventKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.insert(id, (target, kind));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// 按注册顺序返回匹配的监听器
    pub(crate) fn matching(&self, target: EventTarget, kind: EventKind) -> Vec<ListenerId> {
        self.entries
            .iter()
            .filter(|(_, entry)| **entry == (target, kind))
            .map(|(id, _)| *id)
            .collect()
    }

    /// 移除某个元素上的全部监听器
    pub(crate) fn remove_element(&mut self, element: ElementId) {
        self.entries
            .retain(|_, (target, _)| *target != EventTarget::Element(element));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
