//! Server-side HTML pages. Each page is a plain function returning a string;
//! everything user-controlled goes through `escape_html`.

pub mod pages;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 860px; margin: 0 auto; padding: 24px; color: #222; }
nav a { margin-right: 16px; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #ddd; }
video { max-width: 100%; background: #000; }
.metric { display: inline-block; min-width: 160px; margin: 8px 16px 8px 0; }
.metric strong { display: block; font-size: 1.8em; }
.error { color: #a00; }
textarea { width: 100%; min-height: 240px; }
"#;

/// Wraps a page body in the shared document shell and navigation.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Public Speaking Coach</title>
    <style>{STYLE}</style>
</head>
<body>
    <nav>
        <a href="/page-test">Home</a>
        <a href="/upload">Upload</a>
        <a href="/videos">Videos</a>
    </nav>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes a single URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("talk.mp4"), "talk.mp4");
        assert_eq!(encode_path_segment("my talk #1.mp4"), "my%20talk%20%231.mp4");
        assert_eq!(encode_path_segment("é.mov"), "%C3%A9.mov");
    }

    #[test]
    fn test_layout_escapes_title() {
        let html = layout("<script>", "<p>body</p>");
        assert!(html.contains("&lt;script&gt; | Public Speaking Coach"));
        assert!(html.contains("<p>body</p>"));
    }
}
