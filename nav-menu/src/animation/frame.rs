//! # Frame 模块
//!
//! 帧回调原语（`requestAnimationFrame` / `cancelAnimationFrame` 的等价物）。
//!
//! 宿主每次刷新调用一次 [`FrameQueue::take_due`]，取出本帧需要执行的全部任务；
//! 执行期间新申请的帧进入下一批。

use std::collections::BTreeMap;

/// 帧句柄
///
/// 单调递增，不会复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 帧队列
#[derive(Debug)]
pub struct FrameQueue<T> {
    pending: BTreeMap<FrameHandle, T>,
    next_handle: u64,
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_handle: 1,
        }
    }

    /// 申请在下一帧执行任务
    pub fn request(&mut self, task: T) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(handle, task);
        handle
    }

    /// 取消尚未执行的帧；已执行或已取消的句柄返回 `None`
    pub fn cancel(&mut self, handle: FrameHandle) -> Option<T> {
        self.pending.remove(&handle)
    }

    /// 取出本帧的全部任务（按申请顺序）
    pub fn take_due(&mut self) -> Vec<(FrameHandle, T)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// 丢弃全部待执行任务，返回丢弃数量
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
