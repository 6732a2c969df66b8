//! # Tween 模块
//!
//! 补间原语：淡入淡出、滑动展开/收起、通用数值属性动画。
//!
//! 三者结构相同：
//! 1. 从当前样式读取起始值，计算到目标值的变化量
//! 2. 每帧 `progress = min(elapsed / duration, 1)`，按缓动（或线性）插值写入内联样式
//! 3. `progress >= 1` 时收尾：恢复/隐藏元素并调用完成回调
//!
//! 所有入口在写入任何样式之前都会先取消元素上的旧动画。

use tracing::debug;

use super::easing::EasingFunction;
use super::scheduler::{AnimationId, AnimationScheduler, FrameTask, TickControl};
use crate::dom::{Document, ElementId, format_number, format_px};

/// 完成回调
pub type Completion = Box<dyn FnOnce(&mut Document)>;

/// 淡入淡出方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// 滑动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// 展开（回弹缓动）
    Down,
    /// 收起（线性）
    Up,
}

/// 动画计时
///
/// 只保存起点和时长，进度每帧由时间戳重新推导。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenClock {
    start: f64,
    duration: f64,
}

impl TweenClock {
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// 线性进度 (0.0 - 1.0)
    ///
    /// 时长不为正时直接视为完成。
    pub fn progress(&self, timestamp: f64) -> f64 {
        if self.duration.is_nan() || self.duration <= 0.0 {
            return 1.0;
        }
        ((timestamp - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

struct FadeTask {
    element: ElementId,
    clock: TweenClock,
    direction: FadeDirection,
}

impl FrameTask for FadeTask {
    fn kind(&self) -> &'static str {
        "fade"
    }

    fn tick(&mut self, doc: &mut Document, timestamp: f64) -> TickControl {
        let progress = self.clock.progress(timestamp);
        let opacity = match self.direction {
            FadeDirection::In => progress,
            FadeDirection::Out => 1.0 - progress,
        };
        doc.set_style(self.element, "opacity", &format_number(opacity));

        if progress < 1.0 {
            TickControl::Continue
        } else {
            TickControl::Finished
        }
    }

    fn finish(self: Box<Self>, doc: &mut Document) {
        if self.direction == FadeDirection::Out {
            doc.set_style(self.element, "display", "none");
        }
    }
}

struct SlideTask {
    element: ElementId,
    clock: TweenClock,
    direction: SlideDirection,
    /// 展开时为自然高度，收起时为起始高度
    distance: f64,
    easing: EasingFunction,
    callback: Option<Completion>,
}

impl FrameTask for SlideTask {
    fn kind(&self) -> &'static str {
        "slide"
    }

    fn tick(&mut self, doc: &mut Document, timestamp: f64) -> TickControl {
        let progress = self.clock.progress(timestamp);
        let height = match self.direction {
            SlideDirection::Down => self.distance * self.easing.apply(progress),
            SlideDirection::Up => self.distance * (1.0 - progress),
        };
        doc.set_style(self.element, "height", &format_px(height));

        if progress < 1.0 {
            TickControl::Continue
        } else {
            TickControl::Finished
        }
    }

    fn finish(self: Box<Self>, doc: &mut Document) {
        match self.direction {
            // 恢复为 auto，后续内容变化不会被裁切
            SlideDirection::Down => doc.set_style(self.element, "height", ""),
            SlideDirection::Up => {
                doc.set_style(self.element, "display", "none");
                doc.set_style(self.element, "height", "");
            }
        }
        if let Some(callback) = self.callback {
            callback(doc);
        }
    }
}

/// 单个属性的起点与变化量
#[derive(Debug, Clone, PartialEq)]
struct PropertyTrack {
    name: String,
    start: f64,
    change: f64,
}

struct PropertyTask {
    element: ElementId,
    clock: TweenClock,
    tracks: Vec<PropertyTrack>,
    easing: EasingFunction,
    callback: Option<Completion>,
}

impl FrameTask for PropertyTask {
    fn kind(&self) -> &'static str {
        "animate"
    }

    fn tick(&mut self, doc: &mut Document, timestamp: f64) -> TickControl {
        let progress = self.clock.progress(timestamp);
        let eased = self.easing.apply(progress);

        for track in &self.tracks {
            let value = track.start + track.change * eased;
            doc.set_style(self.element, &track.name, &format_px(value));
        }

        if progress < 1.0 {
            TickControl::Continue
        } else {
            TickControl::Finished
        }
    }

    fn finish(self: Box<Self>, doc: &mut Document) {
        if let Some(callback) = self.callback {
            callback(doc);
        }
    }
}

impl AnimationScheduler {
    /// 淡入 / 淡出
    ///
    /// 淡入前先显示元素并把不透明度置 0；淡出结束后隐藏元素。
    /// 始终线性。元素不存在时是空操作。
    ///
    /// `now` 是动画起点的时间戳，进度按之后帧的时间戳与它的差值计算。
    pub fn fade(
        &mut self,
        doc: &mut Document,
        element: Option<ElementId>,
        now: f64,
        duration: f64,
        direction: FadeDirection,
    ) -> Option<AnimationId> {
        let element = element?;
        self.cancel(element);
        self.advance_clock(now);

        match direction {
            FadeDirection::In => {
                doc.set_style(element, "opacity", "0");
                doc.set_style(element, "display", "block");
            }
            FadeDirection::Out => doc.set_style(element, "opacity", "1"),
        }

        let task = FadeTask {
            element,
            clock: TweenClock::new(now, duration),
            direction,
        };
        Some(self.start(element, Box::new(task)))
    }

    pub fn fade_in(
        &mut self,
        doc: &mut Document,
        element: Option<ElementId>,
        now: f64,
        duration: f64,
    ) -> Option<AnimationId> {
        self.fade(doc, element, now, duration, FadeDirection::In)
    }

    pub fn fade_out(
        &mut self,
        doc: &mut Document,
        element: Option<ElementId>,
        now: f64,
        duration: f64,
    ) -> Option<AnimationId> {
        self.fade(doc, element, now, duration, FadeDirection::Out)
    }

    /// 滑动展开 / 收起
    ///
    /// - 展开：高度从 0 回弹到 `scrollHeight`，结束后清除内联高度
    /// - 收起：高度从当前渲染高度线性降到 0，结束后隐藏并清除内联高度
    ///
    /// 元素不存在时只同步调用回调；收起一个高度已为 0 的元素时
    /// 同步收尾并调用回调，不申请任何帧。
    pub fn slide(
        &mut self,
        doc: &mut Document,
        element: Option<ElementId>,
        now: f64,
        duration: f64,
        direction: SlideDirection,
        callback: Option<Completion>,
    ) -> Option<AnimationId> {
        let Some(element) = element else {
            if let Some(callback) = callback {
                callback(doc);
            }
            return None;
        };

        self.cancel(element);
        self.advance_clock(now);

        let distance = match direction {
            SlideDirection::Down => {
                doc.set_style(element, "height", "0px");
                doc.set_style(element, "display", "block");
                doc.scroll_height(element)
            }
            SlideDirection::Up => {
                let height = doc.offset_height(element);
                if height == 0.0 {
                    debug!(%element, "元素已收起，直接完成");
                    doc.set_style(element, "display", "none");
                    doc.set_style(element, "height", "");
                    if let Some(callback) = callback {
                        callback(doc);
                    }
                    return None;
                }
                height
            }
        };

        let easing = match direction {
            SlideDirection::Down => self.easing_by_name(Some(super::easing::EASE_OUT_BACK)),
            SlideDirection::Up => EasingFunction::Linear,
        };

        let task = SlideTask {
            element,
            clock: TweenClock::new(now, duration),
            direction,
            distance,
            easing,
            callback,
        };
        Some(self.start(element, Box::new(task)))
    }

    pub fn slide_down(
        &mut self,
        doc: &mut Document,
        element: Option<ElementId>,
        now: f64,
        duration: f64,
    ) -> Option<AnimationId> {
        self.slide(doc, element, now, duration, SlideDirection::Down, None)
    }

    pub fn slide_up(
        &mut self,
        doc: &mut Document,
        element: Option<ElementId>,
        now: f64,
        duration: f64,
        callback: Option<Completion>,
    ) -> Option<AnimationId> {
        self.slide(doc, element, now, duration, SlideDirection::Up, callback)
    }

    /// 通用数值属性动画
    ///
    /// 所有属性共享同一条进度曲线，以 `px` 写入。起始值读取失败时按 0 处理。
    /// `easing` 只识别 `"easeOutBack"`，其余一律线性。
    pub fn animate(
        &mut self,
        doc: &mut Document,
        element: Option<ElementId>,
        now: f64,
        properties: &[(&str, f64)],
        duration: f64,
        easing: Option<&str>,
        callback: Option<Completion>,
    ) -> Option<AnimationId> {
        let element = element?;
        self.cancel(element);
        self.advance_clock(now);

        let tracks = properties
            .iter()
            .map(|&(name, target)| {
                let start = doc.computed_px(element, name);
                PropertyTrack {
                    name: name.to_string(),
                    start,
                    change: target - start,
                }
            })
            .collect();

        let task = PropertyTask {
            element,
            clock: TweenClock::new(now, duration),
            tracks,
            easing: self.easing_by_name(easing),
            callback,
        };
        Some(self.start(element, Box::new(task)))
    }
}
