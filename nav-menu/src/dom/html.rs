//! # Html 模块
//!
//! 将元素子树序列化为带缩进的 HTML 文本，供调试输出和快照测试使用。

use super::{Document, ElementId};

/// 空元素（没有结束标签）
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input"];

impl Document {
    /// 序列化元素及其子树（`outerHTML`，每个元素一行，两空格缩进）
    pub fn outer_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_element(id, 0, &mut out);
        out.truncate(out.trim_end().len());
        out
    }

    fn write_element(&self, id: ElementId, depth: usize, out: &mut String) {
        let Some(element) = self.element(id) else {
            return;
        };
        let indent = "  ".repeat(depth);

        let mut open = format!("<{}", element.tag());
        if !element.classes().is_empty() {
            let classes = element.classes().join(" ");
            open.push_str(&format!(" class=\"{}\"", escape_attribute(&classes)));
        }
        for (name, value) in &element.attributes {
            open.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
        }
        if !element.style().is_empty() {
            let css = element.style().to_css_text();
            open.push_str(&format!(" style=\"{}\"", escape_attribute(&css)));
        }
        open.push('>');

        if VOID_TAGS.contains(&element.tag()) {
            out.push_str(&format!("{}{}\n", indent, open));
            return;
        }

        let content = match (element.inner_html(), element.text()) {
            (Some(markup), _) => markup.to_string(),
            (None, Some(text)) => escape_text(text),
            (None, None) => String::new(),
        };

        if element.children().is_empty() {
            out.push_str(&format!("{}{}{}</{}>\n", indent, open, content, element.tag()));
            return;
        }

        out.push_str(&format!("{}{}\n", indent, open));
        if !content.is_empty() {
            out.push_str(&format!("{}  {}\n", indent, content));
        }
        for child in element.children() {
            self.write_element(*child, depth + 1, out);
        }
        out.push_str(&format!("{}</{}>\n", indent, element.tag()));
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_html() {
        let mut doc = Document::new();
        let list = doc.create_child(doc.body(), "ul");
        doc.add_class(list, "menu");
        let item = doc.create_child(list, "li");
        doc.set_attribute(item, "data-menu-id", "a&b");
        doc.set_style(item, "display", "none");
        let link = doc.create_child(item, "a");
        doc.set_text(link, "<A>");
        let img = doc.create_child(item, "img");
        doc.set_attribute(img, "src", "a.png");

        let expected = [
            "<ul class=\"menu\">",
            "  <li data-menu-id=\"a&amp;b\" style=\"display: none\">",
            "    <a>&lt;A&gt;</a>",
            "    <img src=\"a.png\">",
            "  </li>",
            "</ul>",
        ]
        .join("\n");
        assert_eq!(doc.outer_html(list), expected);
    }
}
