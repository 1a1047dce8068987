//! Helpers for reference lists embedded in attribute values
//!
//! Covers CSS `url(...)` references (inline `style` attributes and `<style>`
//! text) and comma-separated `srcset` candidate lists.

/// Extracts the targets of every `url(...)` in a CSS fragment
///
/// Surrounding whitespace and quotes are trimmed; empty targets are skipped.
pub fn extract_css_urls(css: &str) -> Vec<String> {
    css_url_spans(css)
        .into_iter()
        .map(|(start, end)| unquote(&css[start..end]).to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

/// Rewrites every `url(...)` target for which `rewrite` returns a replacement
///
/// Quotes around a replaced target are preserved.
pub fn rewrite_css_urls<F>(css: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(css.len());
    let mut last = 0;

    for (start, end) in css_url_spans(css) {
        let raw = &css[start..end];
        let target = unquote(raw);
        if target.is_empty() {
            continue;
        }

        if let Some(replacement) = rewrite(target) {
            let offset = start + raw.find(target).unwrap_or(0);
            out.push_str(&css[last..offset]);
            out.push_str(&replacement);
            last = offset + target.len();
        }
    }

    out.push_str(&css[last..]);
    out
}

/// Byte spans of the raw contents between `url(` and the closing `)`
fn css_url_spans(css: &str) -> Vec<(usize, usize)> {
    let lower = css.to_ascii_lowercase();
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("url(") {
        let start = cursor + found + 4;
        let Some(close) = lower[start..].find(')') else {
            break;
        };
        let end = start + close;
        spans.push((start, end));
        cursor = end + 1;
    }

    spans
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Splits a `srcset` value into its candidates
///
/// Commas inside parentheses do not split.
pub fn split_srcset(srcset: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, ch) in srcset.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let part = srcset[start..i].trim();
                if !part.is_empty() {
                    out.push(part);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    let tail = srcset[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// URLs of every `srcset` candidate (the text before any descriptor)
pub fn srcset_urls(srcset: &str) -> Vec<&str> {
    split_srcset(srcset)
        .into_iter()
        .filter_map(|candidate| candidate.split_whitespace().next())
        .collect()
}

/// Rewrites each candidate URL in a `srcset`, keeping descriptors
pub fn rewrite_srcset<F>(srcset: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    split_srcset(srcset)
        .into_iter()
        .map(|candidate| {
            let mut fields = candidate.split_whitespace();
            let Some(url) = fields.next() else {
                return String::new();
            };
            let url = rewrite(url).unwrap_or_else(|| url.to_string());
            std::iter::once(url)
                .chain(fields.map(str::to_string))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
