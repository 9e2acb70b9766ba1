//! HTML markup for rendered results, matching the blog theme's media blocks.

use crate::render::RenderedEntry;

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One media block per entry. The excerpt is index-provided highlight markup and is not escaped.
pub fn results_html(entries: &[RenderedEntry]) -> String {
    let mut html = String::new();
    for entry in entries {
        html.push_str("<div class=\"media\">");
        html.push_str("<div class=\"media-body\">");
        html.push_str(&format!("<a class=\"link-unstyled\" href=\"{}\">", escape_html(&entry.href)));
        html.push_str(&format!("<h3 class=\"media-heading\">{}</h3>", escape_html(&entry.title)));
        html.push_str("</a>");
        html.push_str("<span class=\"media-meta\">");
        html.push_str(&format!(
            "<span class=\"media-date text-small\">{}</span>",
            escape_html(&entry.date)
        ));
        html.push_str("</span>");
        html.push_str(&format!(
            "<div class=\"media-content hide-xs font-merryweather\">{}</div>",
            entry.excerpt_html
        ));
        html.push_str("</div>");
        html.push_str("<div style=\"clear:both;\"></div>");
        html.push_str("<hr>");
        html.push_str("</div>");
    }
    html
}
