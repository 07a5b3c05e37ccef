//! Feed-card previews of a generated post package.
//!
//! The model's text is only loosely structured, so extraction is purely
//! textual: everything after `LinkedIn Post:` and before
//! `Suggested Posting Times:` is the body. Either marker may be missing.

pub const POST_MARKER: &str = "LinkedIn Post:";
pub const TIMES_MARKER: &str = "Suggested Posting Times:";

/// Post body without the label and the posting-times section.
pub fn extract_post_body(post: &str) -> &str {
    let mut section = post;
    if let Some((before, _)) = section.split_once(TIMES_MARKER) {
        section = before;
    }
    if let Some((_, after)) = section.split_once(POST_MARKER) {
        section = after.trim();
    }
    section
}

/// The `Primary:` / `Backup:` lines of the posting-times section, if any.
pub fn extract_posting_times(post: &str) -> Vec<String> {
    let Some((_, times)) = post.split_once(TIMES_MARKER) else {
        return Vec::new();
    };
    times
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("Primary:") || l.starts_with("Backup:"))
        .map(String::from)
        .collect()
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn paragraphs(body: &str) -> Vec<&str> {
    body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()).collect()
}

/// Body as HTML: escaped, blank-line paragraphs, `<br>` for line breaks.
pub fn body_html(post: &str) -> String {
    let escaped = html_escape(extract_post_body(post));
    paragraphs(&escaped)
        .iter()
        .map(|p| p.replace('\n', "<br>"))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// HTML fragment resembling a LinkedIn feed card. Never fails; text without
/// markers is rendered whole.
pub fn render_preview(post: &str) -> String {
    format!(
        r#"
    <div style="border:1px solid #ddd;border-radius:10px;padding:12px;
                background:#f9fafb;font-family:system-ui,-apple-system,
                BlinkMacSystemFont,'Segoe UI',sans-serif;font-size:14px;
                line-height:1.5; max-width:680px;">
      <div style="display:flex;align-items:center;margin-bottom:8px;">
        <div style="width:32px;height:32px;border-radius:50%;
                    background:#ccc;margin-right:8px;"></div>
        <div>
          <div style="font-weight:600;">Your Profile · LinkedIn</div>
          <div style="font-size:12px;color:#555;">Following · 1h · 🌐</div>
        </div>
      </div>
      <div style="margin-top:4px;">{body}</div>
    </div>
    "#,
        body = body_html(post)
    )
}

/// Standalone page around [`render_preview`], for opening in a browser.
pub fn render_preview_page(post: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Post preview</title></head>\n<body>{}</body>\n</html>\n",
        render_preview(post)
    )
}

/// Boxed plain-text card for the terminal.
pub fn render_text_card(post: &str, width: usize) -> String {
    let inner = width.saturating_sub(4).max(20);
    let mut lines = vec![
        "Your Profile · LinkedIn".to_string(),
        "Following · 1h".to_string(),
        String::new(),
    ];
    for (i, para) in paragraphs(extract_post_body(post)).iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        for line in para.lines() {
            lines.extend(wrap(line.trim(), inner));
        }
    }

    let bar = "─".repeat(inner + 2);
    let mut out = format!("┌{bar}┐\n");
    for l in lines {
        let pad = inner.saturating_sub(l.chars().count());
        out.push_str(&format!("│ {}{} │\n", l, " ".repeat(pad)));
    }
    out.push_str(&format!("└{bar}┘"));
    out
}

/// Greedy word wrap; words wider than `width` are split by characters.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut cur = String::new();
    for word in line.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(width) {
            let needed = if cur.is_empty() { piece.len() } else { cur.chars().count() + 1 + piece.len() };
            if needed > width && !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            if !cur.is_empty() {
                cur.push(' ');
            }
            cur.extend(piece);
        }
    }
    if !cur.is_empty() || out.is_empty() {
        out.push(cur);
    }
    out
}
