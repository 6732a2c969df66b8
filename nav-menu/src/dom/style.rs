//! # Style 模块
//!
//! 元素内联样式与数值读写辅助。

/// 内联样式表
///
/// 按写入顺序保存 `属性 -> 值`，与浏览器 `element.style` 的行为一致：
/// 写入空字符串即删除该属性。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    entries: Vec<(String, String)>,
}

impl InlineStyle {
    /// 创建空样式表
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取属性值
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// 写入属性值（空字符串表示删除）
    pub fn set(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.remove(property);
            return;
        }

        match self.entries.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => self
                .entries
                .push((property.to_string(), value.to_string())),
        }
    }

    /// 删除属性，返回旧值
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(index).1)
    }

    /// 是否没有任何属性
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 序列化为 `style` 属性文本
    pub fn to_css_text(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// 解析字符串开头的数值（`parseFloat` 语义）
///
/// `"12.5px"` → `Some(12.5)`，`"auto"` → `None`。
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let mut end = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;

    while end > 0 {
        if let Ok(value) = s[..end].parse::<f64>() {
            if value.is_finite() {
                return Some(value);
            }
        }
        end -= 1;
    }

    None
}

/// 格式化数值（去掉 `-0`）
pub fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}", value)
}

/// 格式化像素值
pub fn format_px(value: f64) -> String {
    format!("{}px", format_number(value))
}
