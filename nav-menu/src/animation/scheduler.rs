//! # Scheduler 模块
//!
//! 动画调度器：在帧队列之上维护"每个元素至多一个动画"的登记表。
//!
//! ```text
//! start(target, task)
//!   ├── cancel(target)              取消该元素上的旧动画
//!   ├── AnimationId::next           生成新的动画 ID
//!   └── frames.request(task)        申请下一帧
//!
//! run_frame(timestamp)
//!   └── 每个到期任务 tick 一次
//!         ├── Continue  → 重新申请下一帧
//!         └── Finished  → 清理登记 → finish（收尾 + 完成回调）
//! ```

use std::collections::HashMap;

use tracing::{debug, trace};

use super::easing::{DEFAULT_OVERSHOOT, EasingFunction};
use super::frame::{FrameHandle, FrameQueue};
use crate::dom::{Document, ElementId};

/// 动画 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnimationId({})", self.0)
    }
}

/// 单帧执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// 继续下一帧
    Continue,
    /// 已到达终点
    Finished,
}

/// 逐帧任务
///
/// 进度由时间戳推导，任务不累积状态；
/// 被外部取消的任务直接丢弃，不会调用 `finish`。
pub trait FrameTask {
    /// 任务类型名（用于日志）
    fn kind(&self) -> &'static str;

    /// 执行一帧
    fn tick(&mut self, doc: &mut Document, timestamp: f64) -> TickControl;

    /// 正常结束后的收尾（在登记表清理之后调用）
    fn finish(self: Box<Self>, doc: &mut Document);
}

struct ScheduledTask {
    id: AnimationId,
    target: ElementId,
    task: Box<dyn FrameTask>,
}

/// 动画调度器
pub struct AnimationScheduler {
    frames: FrameQueue<ScheduledTask>,
    /// 元素 -> 当前动画
    by_target: HashMap<ElementId, AnimationId>,
    /// 动画 -> 待执行的帧
    handles: HashMap<AnimationId, FrameHandle>,
    next_id: u64,
    /// 最近一次看到的时间戳（毫秒）
    clock: f64,
    /// 按名称解析 `easeOutBack` 时使用的回弹幅度
    overshoot: f64,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("active", &self.by_target.len())
            .field("pending_frames", &self.frames.len())
            .field("clock", &self.clock)
            .finish()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_overshoot(DEFAULT_OVERSHOOT)
    }

    pub fn with_overshoot(overshoot: f64) -> Self {
        Self {
            frames: FrameQueue::new(),
            by_target: HashMap::new(),
            handles: HashMap::new(),
            next_id: 1,
            clock: 0.0,
            overshoot,
        }
    }

    fn next_animation_id(&mut self) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        id
    }

    // ========== 时钟 ==========

    /// 当前时钟（毫秒）
    pub fn now(&self) -> f64 {
        self.clock
    }

    /// 推进时钟（只前进不后退）
    pub fn advance_clock(&mut self, timestamp: f64) {
        if timestamp.is_finite() && timestamp > self.clock {
            self.clock = timestamp;
        }
    }

    /// 按名称解析缓动函数
    pub fn easing_by_name(&self, name: Option<&str>) -> EasingFunction {
        EasingFunction::from_name(name, self.overshoot)
    }

    pub fn overshoot(&self) -> f64 {
        self.overshoot
    }

    // ========== 动画控制 ==========

    /// 在元素上启动逐帧任务
    ///
    /// 元素上已有的动画会先被同步取消。
    pub fn start(&mut self, target: ElementId, task: Box<dyn FrameTask>) -> AnimationId {
        self.cancel(target);

        let id = self.next_animation_id();
        debug!(%id, %target, kind = task.kind(), "启动动画");

        let handle = self.frames.request(ScheduledTask { id, target, task });
        self.handles.insert(id, handle);
        self.by_target.insert(target, id);
        id
    }

    /// 取消元素上的动画
    ///
    /// 已写入的属性值保持不变。没有动画时是空操作。
    pub fn cancel(&mut self, target: ElementId) -> bool {
        let Some(id) = self.by_target.remove(&target) else {
            return false;
        };

        if let Some(handle) = self.handles.remove(&id) {
            self.frames.cancel(handle);
        }
        debug!(%id, %target, "取消动画");
        true
    }

    /// 取消全部动画，返回取消的数量
    pub fn cancel_all(&mut self) -> usize {
        let count = self.by_target.len();
        self.frames.clear();
        self.by_target.clear();
        self.handles.clear();
        count
    }

    /// 执行一帧
    ///
    /// # 返回
    /// 本帧执行的任务数量
    pub fn run_frame(&mut self, doc: &mut Document, timestamp: f64) -> usize {
        self.advance_clock(timestamp);

        let due = self.frames.take_due();
        let count = due.len();

        for (_, mut scheduled) in due {
            match scheduled.task.tick(doc, timestamp) {
                TickControl::Continue => {
                    let (id, target) = (scheduled.id, scheduled.target);
                    let handle = self.frames.request(scheduled);
                    self.handles.insert(id, handle);
                    self.by_target.insert(target, id);
                }
                TickControl::Finished => {
                    self.release(scheduled.target, scheduled.id);
                    trace!(id = %scheduled.id, kind = scheduled.task.kind(), "动画完成");
                    scheduled.task.finish(doc);
                }
            }
        }

        count
    }

    fn release(&mut self, target: ElementId, id: AnimationId) {
        self.handles.remove(&id);
        if self.by_target.get(&target) == Some(&id) {
            self.by_target.remove(&target);
        }
    }

    // ========== 查询方法 ==========

    /// 元素是否有进行中的动画
    pub fn is_animating(&self, target: ElementId) -> bool {
        self.by_target.contains_key(&target)
    }

    /// 元素当前动画的 ID
    pub fn animation_for(&self, target: ElementId) -> Option<AnimationId> {
        self.by_target.get(&target).copied()
    }

    /// 进行中的动画数量
    pub fn active_count(&self) -> usize {
        self.by_target.len()
    }

    /// 已申请但尚未执行的帧数量
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// 是否没有任何动画
    pub fn is_idle(&self) -> bool {
        self.by_target.is_empty() && self.frames.is_empty()
    }
}
