//! # Easing 模块
//!
//! 缓动函数，用于动画的时间插值。
//!
//! 只提供两种曲线：线性，以及先冲过目标再回落的 `easeOutBack`。

/// `easeOutBack` 默认回弹幅度
pub const DEFAULT_OVERSHOOT: f64 = 1.70158;

/// `easeOutBack` 的缓动名称
pub const EASE_OUT_BACK: &str = "easeOutBack";

/// 回弹缓出
///
/// # 参数
/// - `t`: 已经过的时间（调用方需先限制在 `[0, d]`）
/// - `b`: 初始值
/// - `c`: 变化量
/// - `d`: 总时长
/// - `s`: 回弹幅度
///
/// `t == d` 时结果精确等于 `b + c`。
pub fn ease_out_back(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    let nt = t / d - 1.0;
    c * (nt * nt * ((s + 1.0) * nt + s) + 1.0) + b
}

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EasingFunction {
    /// 线性（匀速）
    #[default]
    Linear,
    /// 回弹缓出
    EaseOutBack {
        /// 回弹幅度
        overshoot: f64,
    },
}

impl EasingFunction {
    /// 默认回弹幅度的 `easeOutBack`
    pub fn ease_out_back() -> Self {
        Self::EaseOutBack {
            overshoot: DEFAULT_OVERSHOOT,
        }
    }

    /// 按名称选择缓动函数
    ///
    /// 只识别 `"easeOutBack"`，其余名称（包括未指定）一律回退为线性。
    pub fn from_name(name: Option<&str>, overshoot: f64) -> Self {
        match name {
            Some(EASE_OUT_BACK) => Self::EaseOutBack { overshoot },
            _ => Self::Linear,
        }
    }

    /// 计算缓动值
    ///
    /// # 参数
    /// - `progress`: 时间进度 (0.0 - 1.0)
    ///
    /// # 返回
    /// - 缓动后的进度值（`easeOutBack` 中途会超过 1.0）
    pub fn apply(&self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseOutBack { overshoot } => ease_out_back(t, 0.0, 1.0, 1.0, *overshoot),
        }
    }

    /// 缓动名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOutBack { .. } => EASE_OUT_BACK,
        }
    }
}
