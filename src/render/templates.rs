//! HTML fragments for the reports page.

use crate::reports::Report;

/// Shown in place of cards when the working set is empty.
pub const EMPTY_STATE: &str =
    r#"<p class="empty-state" style="text-align:center;color:#aaa;">No active reports.</p>"#;

/// Render a single report card.
pub fn report_card(report: &Report) -> String {
    let reply = if report.has_reply() {
        format!(
            r#"
        <div class="report-reply">
            <strong>Reply:</strong>
            <p>{}</p>
        </div>"#,
            html_escape(&report.reply)
        )
    } else {
        String::new()
    };

    format!(
        r#"
    <div class="report-card status-{} type-{}">
        <div class="report-header">
            <span class="report-type">{}</span>
            <span class="report-status">{}</span>
            <span class="report-id">#{}</span>
        </div>

        <h3 class="report-title">{}</h3>
        <p class="report-body">{}</p>

        <div class="report-meta">
            <span>Created: {}</span>
            <span>{}</span>
        </div>
        {}
    </div>
    "#,
        class_token(&report.status),
        class_token(&report.kind),
        html_escape(report.display_kind()),
        html_escape(report.display_status()),
        html_escape(&report.id),
        html_escape(&report.title),
        html_escape(&report.body),
        html_escape(&report.created_at),
        html_escape(&report.relative_label),
        reply
    )
}

/// Standalone page wrapping a rendered fragment.
pub fn page_document(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
    <main>
        <h1>{}</h1>
        <div id="reports">{}</div>
    </main>
</body>
</html>"#,
        html_escape(title),
        CSS,
        html_escape(title),
        content
    )
}

/// Collapse free-form feed text into something safe inside a class list.
fn class_token(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Minimal styles for standalone output.
pub const CSS: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2em auto; color: #222; }
.report-card { border: 1px solid #ccc; border-radius: 6px; padding: 1em; margin-bottom: 1em; }
.report-header { display: flex; gap: 0.75em; font-size: 0.85em; color: #666; }
.report-id { margin-left: auto; }
.report-meta { display: flex; justify-content: space-between; font-size: 0.8em; color: #888; }
.report-reply { border-left: 3px solid #0066cc; padding-left: 0.75em; margin-top: 0.75em; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_report_card_escapes_feed_text() {
        let report = Report {
            id: "7".to_string(),
            title: "<b>bold</b>".to_string(),
            body: "a & b".to_string(),
            created_at: "2025-03-10".to_string(),
            relative_label: String::new(),
            reply: String::new(),
            kind: "bug".to_string(),
            status: "won't fix".to_string(),
        };
        let html = report_card(&report);
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("status-won-t-fix type-bug"));
        assert!(!html.contains("report-reply"));
    }

    #[test]
    fn test_page_document_wraps_content() {
        let page = page_document("Reports", "<p>x</p>");
        assert!(page.contains(r#"<div id="reports"><p>x</p></div>"#));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }
}
