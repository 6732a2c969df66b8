//! # Animation 模块
//!
//! 逐元素、可取消、基于时间的样式补间引擎。
//!
//! ## 核心设计理念
//!
//! 动画进度只由时间戳推导：
//! - 启动补间时传入起点时间戳，宿主每帧调用 [`AnimationScheduler::run_frame`] 并传入帧时间戳
//! - 每个任务根据 `elapsed / duration` 计算进度并写入内联样式
//! - 帧率波动只影响采样密度，不影响终点和总时长
//!
//! ## 核心概念
//!
//! - `FrameQueue`: 帧回调原语（申请 / 取消 / 每帧取出）
//! - `AnimationScheduler`: 每个元素至多一个动画的登记表
//! - `FrameTask`: 可重复执行的逐帧任务
//! - `EasingFunction`: 缓动函数
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let mut scheduler = AnimationScheduler::new();
//!
//! // 展开子菜单，起点为事件时间戳
//! scheduler.slide_down(&mut doc, Some(children), event_time, 400.0);
//!
//! // 指示条移动到悬停项
//! let target = [("left", 120.0), ("width", 80.0)];
//! scheduler.animate(&mut doc, Some(bar), event_time, &target, 300.0, Some("easeOutBack"), None);
//!
//! // 宿主每帧驱动
//! scheduler.run_frame(&mut doc, timestamp);
//! ```

mod easing;
mod frame;
mod scheduler;
mod tween;

pub use easing::{DEFAULT_OVERSHOOT, EASE_OUT_BACK, EasingFunction, ease_out_back};
pub use frame::{FrameHandle, FrameQueue};
pub use scheduler::{AnimationId, AnimationScheduler, FrameTask, TickControl};
pub use tween::{Completion, FadeDirection, SlideDirection, TweenClock};
