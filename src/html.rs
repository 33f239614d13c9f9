//! Markdown to sanitized HTML, for the HTML preview, clipboard copy and
//! export.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Stylesheet embedded in exported documents when no `--css` file is given.
pub const DEFAULT_CSS: &str = "\
body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; \
line-height: 1.6; max-width: 46em; margin: 2em auto; padding: 0 1em; color: #24292f; }
pre, code { font-family: ui-monospace, Menlo, Consolas, monospace; background: #f6f8fa; }
pre { padding: 1em; overflow: auto; }
blockquote { margin: 0; padding: 0 1em; color: #57606a; border-left: 0.25em solid #d0d7de; }
table { border-collapse: collapse; }
th, td { border: 1px solid #d0d7de; padding: 0.3em 0.8em; }
img { max-width: 100%; }
";

/// Elements removed together with everything they enclose.
const STRIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "title", "textarea",
    "xmp", "noembed", "noframes", "frameset", "applet",
];

static STRIPPED_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    STRIPPED_ELEMENTS
        .iter()
        .map(|tag| compile(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")))
        .collect()
});

/// Unpaired opening/closing tags of stripped elements, plus tags that can
/// redirect or reload the page.
static STRIPPED_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    let names = STRIPPED_ELEMENTS.join("|");
    compile(&format!(
        r"(?i)</?(?:{names}|base|meta|link|form|frame|plaintext)\b[^>]*>"
    ))
});

static EVENT_HANDLERS: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#));

static URL_ATTRS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)\b(href|src|action|formaction|xlink:href)\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#)
});

static CHAR_REFS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)&(?:#x([0-9a-f]+)|#([0-9]+)|([a-z]+));?"));

/// Schemes a browser would run or load as inline content.
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid sanitizer pattern {pattern:?}: {err}"))
}

/// Render markdown to HTML and sanitize the result.
///
/// Raw HTML in the source (such as `<u>` or the Drive download button) is
/// kept; anything scriptable is removed by [`sanitize`].
pub fn markdown_to_html(source: &str) -> String {
    let mut options = comrak::Options::default();
    crate::document::apply_extensions(&mut options);
    options.extension.tagfilter = true;
    options.render.unsafe_ = true;
    sanitize(&comrak::markdown_to_html(source, &options))
}

/// Strip script-capable markup from an HTML fragment.
///
/// This is a pattern-based pass over comrak's output, not a full HTML
/// parser: it drops dangerous elements and their content, inline event
/// handlers and script/data URLs.
pub fn sanitize(html: &str) -> String {
    let mut out = html.to_string();
    for block in STRIPPED_BLOCKS.iter() {
        out = block.replace_all(&out, "").into_owned();
    }
    out = STRIPPED_TAGS.replace_all(&out, "").into_owned();
    out = EVENT_HANDLERS.replace_all(&out, "").into_owned();
    URL_ATTRS
        .replace_all(&out, |caps: &Captures<'_>| {
            if is_blocked_url(&caps[2]) {
                format!("{}=\"#\"", &caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Whether an attribute value resolves to a blocked scheme once the browser
/// has decoded character references and dropped whitespace and controls.
fn is_blocked_url(raw: &str) -> bool {
    let unquoted = raw.trim_matches(|c| c == '"' || c == '\'');
    let decoded = decode_char_refs(unquoted);
    let normalized: String = decoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn decode_char_refs(text: &str) -> String {
    CHAR_REFS
        .replace_all(text, |caps: &Captures<'_>| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_char_ref(name.as_str()))
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_char_ref(name: &str) -> Option<char> {
    match name.to_ascii_lowercase().as_str() {
        "colon" => Some(':'),
        "tab" => Some('\t'),
        "newline" => Some('\n'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lpar" => Some('('),
        "rpar" => Some(')'),
        _ => None,
    }
}

/// Wrap an HTML fragment in a complete page for export.
pub fn standalone_document(body: &str, title: &str, css: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>\n{css}</style>\n</head>\n<body>\n\
         <div id=\"output\">\n{body}</div>\n</body>\n</html>\n",
        escape_html(title)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
