//! # Error 模块
//!
//! 定义 nav-menu 中使用的错误类型。
//!
//! 只有构造期错误会以 `Err` 形式返回；运行期的查找失败（缺少主菜单、
//! 未知的菜单 ID 等）只记录警告，不会中断执行。

use thiserror::Error;

use crate::dom::ElementId;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("配置文件读取失败: {0}")]
    Io(String),

    /// JSON 解析失败
    #[error("配置文件解析失败: {0}")]
    Parse(String),

    /// 配置项取值无效
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// 菜单构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MenuError {
    /// 容器元素不存在于文档中
    #[error("无效的容器元素: {0}")]
    InvalidContainer(ElementId),

    /// 选择器格式不受支持
    #[error("无效的选择器 '{selector}'，仅支持 #id 或 .class")]
    InvalidSelector { selector: String },

    /// 选择器没有匹配到任何元素
    #[error("未找到选择器对应的元素: {selector}")]
    SelectorNotFound { selector: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type MenuResult<T> = Result<T, MenuError>;
