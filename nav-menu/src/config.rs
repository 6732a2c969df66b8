//! # Config 模块
//!
//! 菜单组件配置。
//!
//! ## 配置优先级
//!
//! 1. 代码中显式设置的字段（最高）
//! 2. 配置文件 (JSON，camelCase 键名)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::animation::{DEFAULT_OVERSHOOT, EASE_OUT_BACK};
use crate::error::ConfigError;
use crate::menu::MenuItemData;

/// 菜单配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuOptions {
    /// 子菜单展开时长（毫秒），收起使用一半；同时是指示条淡入淡出时长
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// 指示条移动使用的缓动名称
    ///
    /// 只识别 `"easeOutBack"`，其余名称回退为线性。
    #[serde(default = "default_easing")]
    pub easing: String,

    /// 是否启用指示条
    #[serde(default = "default_current_bar")]
    pub current_bar: bool,

    /// 指示条移动时长（毫秒）
    #[serde(default = "default_current_bar_duration")]
    pub current_bar_duration: f64,

    /// `easeOutBack` 回弹幅度
    #[serde(default = "default_ease_out_back_param")]
    pub ease_out_back_param: f64,

    /// 菜单数据（提供时在初始化前渲染菜单结构）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<MenuItemData>>,
}

// 默认值函数
fn default_duration() -> f64 {
    400.0
}

fn default_easing() -> String {
    EASE_OUT_BACK.to_string()
}

fn default_current_bar() -> bool {
    true
}

fn default_current_bar_duration() -> f64 {
    300.0
}

fn default_ease_out_back_param() -> f64 {
    DEFAULT_OVERSHOOT
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            easing: default_easing(),
            current_bar: default_current_bar(),
            current_bar_duration: default_current_bar_duration(),
            ease_out_back_param: default_ease_out_back_param(),
            data: None,
        }
    }
}

impl MenuOptions {
    /// 从 JSON 文件加载配置并验证
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// 从 JSON 文本解析配置并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let options: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// 替换菜单数据
    pub fn with_data(mut self, data: Vec<MenuItemData>) -> Self {
        self.data = Some(data);
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("duration", self.duration),
            ("currentBarDuration", self.current_bar_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{} 必须是非负有限数，实际为 {}",
                    name, value
                )));
            }
        }

        if !self.ease_out_back_param.is_finite() {
            return Err(ConfigError::Validation(
                "easeOutBackParam 必须是有限数".to_string(),
            ));
        }

        Ok(())
    }
}
