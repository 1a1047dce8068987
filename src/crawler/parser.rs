//! HTML parser for extracting references and rewriting them to the mirror
//!
//! This module handles:
//! - Extracting page links (`<a>`, `<area>`) and resources (`<link>`, media
//!   `src`/`srcset`, CSS `url(...)` in `style` attributes and `<style>` text)
//! - Rewriting same-host references to their local mirror paths in a
//!   streaming `lol_html` pass that leaves all other markup byte-for-byte intact

use crate::crawler::css::{extract_css_urls, rewrite_css_urls, rewrite_srcset, srcset_urls};
use crate::state::Resource;
use crate::storage::map_path;
use crate::url::same_host;
use crate::MirrorError;
use lol_html::errors::RewritingError;
use lol_html::html_content::ContentType;
use lol_html::{element, text, HtmlRewriter, Settings};
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Elements whose `src`/`srcset` reference a resource
const SOURCE_TAGS: &[&str] = &[
    "img", "script", "iframe", "source", "audio", "video", "track", "embed", "input",
];

/// Attributes that carry a reference to another document or resource
const REFERENCE_ATTRIBUTES: [&str; 4] = ["href", "src", "srcset", "style"];

/// References found in one HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRefs {
    /// Page links to consider following (absolute, query removed)
    pub links: Vec<Url>,

    /// Resources the page depends on (absolute, query removed)
    pub resources: Vec<Resource>,
}

/// Extracts references from HTML and rewrites them to local paths
pub trait DocumentParser: Send + Sync {
    /// Finds every link and resource in `html`, resolved against `base`
    ///
    /// Each absolute URL appears at most once per list.
    fn extract_links_and_resources(&self, html: &[u8], base: &Url) -> crate::Result<ExtractedRefs>;

    /// Replaces same-host references with the paths `map_path` assigns them
    ///
    /// Cross-host references are left untouched.
    fn rewrite_to_local(
        &self,
        html: &[u8],
        base: &Url,
        content_type: &str,
        output_root: &Path,
    ) -> Vec<u8>;
}

/// `DocumentParser` built on the `scraper` HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for HtmlParser {
    fn extract_links_and_resources(&self, html: &[u8], base: &Url) -> crate::Result<ExtractedRefs> {
        let document = Html::parse_document(&String::from_utf8_lossy(html));
        Ok(extract_refs(&document, base))
    }

    fn rewrite_to_local(
        &self,
        html: &[u8],
        base: &Url,
        content_type: &str,
        output_root: &Path,
    ) -> Vec<u8> {
        let rewriter = Rewriter {
            base,
            content_type,
            output_root,
        };
        match rewriter.rewrite(html) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::warn!("{}; saving original markup", e);
                html.to_vec()
            }
        }
    }
}

/// Collects links and resources with per-document dedup
#[derive(Default)]
struct RefCollector {
    refs: ExtractedRefs,
    seen_links: HashSet<String>,
    seen_resources: HashSet<String>,
}

impl RefCollector {
    fn add_link(&mut self, url: Url) {
        if self.seen_links.insert(url.as_str().to_string()) {
            self.refs.links.push(url);
        }
    }

    fn add_resource(&mut self, url: Url) {
        if self.seen_resources.insert(url.as_str().to_string()) {
            self.refs.resources.push(Resource::new(url));
        }
    }
}

fn extract_refs(document: &Html, base: &Url) -> ExtractedRefs {
    let mut collector = RefCollector::default();
    let resolve = |raw: &str| resolve_reference(raw, base).map(without_query);

    for node in document.tree.root().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let value = element.value();
        let tag = value.name();

        match tag {
            "a" | "area" => {
                if let Some(url) = value.attr("href").and_then(resolve) {
                    collector.add_link(url);
                }
            }
            "link" => {
                if let Some(url) = value.attr("href").and_then(resolve) {
                    collector.add_resource(url);
                }
            }
            "style" => {
                let css: String = element.text().collect();
                for raw in extract_css_urls(&css) {
                    if let Some(url) = resolve(raw.as_str()) {
                        collector.add_resource(url);
                    }
                }
            }
            _ => {}
        }

        if SOURCE_TAGS.contains(&tag) {
            if let Some(url) = value.attr("src").and_then(resolve) {
                collector.add_resource(url);
            }
            if let Some(srcset) = value.attr("srcset") {
                for raw in srcset_urls(srcset) {
                    if let Some(url) = resolve(raw) {
                        collector.add_resource(url);
                    }
                }
            }
        }

        if let Some(style) = value.attr("style") {
            if style.to_ascii_lowercase().contains("url(") {
                for raw in extract_css_urls(style) {
                    if let Some(url) = resolve(raw.as_str()) {
                        collector.add_resource(url);
                    }
                }
            }
        }
    }

    collector.refs
}

/// Resolves a reference against the page URL
///
/// Returns None if the reference should be excluded:
/// - empty values and pure fragments (`#...`)
/// - `data:`, `mailto:`, `javascript:` references
/// - anything that does not resolve to an HTTP(S) URL
pub fn resolve_reference(raw: &str, base: &Url) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("data:") || lower.starts_with("mailto:") || lower.starts_with("javascript:") {
        return None;
    }

    let resolved = base.join(raw).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

fn without_query(mut url: Url) -> Url {
    url.set_query(None);
    url
}

/// Lowercase extension of the last path segment, including the dot
fn path_extension(url: &Url) -> String {
    let file = url.path().rsplit('/').next().unwrap_or("");
    match file.rfind('.') {
        Some(idx) => file[idx..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Guesses the content type a referenced URL will be served with
fn guess_content_type<'a>(tag: &str, attr: &str, url: &Url, fallback: &'a str) -> &'a str {
    let ext = path_extension(url);
    if tag == "script" || ext == ".js" {
        "application/javascript"
    } else if ext == ".css" || (tag == "link" && attr == "href" && ext.is_empty()) {
        "text/css"
    } else if ext == ".html" || ext == ".htm" || ext.is_empty() {
        "text/html"
    } else {
        fallback
    }
}

/// Rewrites reference attributes in place, leaving all other markup untouched
struct Rewriter<'a> {
    base: &'a Url,
    content_type: &'a str,
    output_root: &'a Path,
}

impl Rewriter<'_> {
    fn rewrite(&self, html: &[u8]) -> crate::Result<Vec<u8>> {
        let mut output = Vec::with_capacity(html.len());
        let mut style_text = String::new();

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    element!("[href], [src], [srcset], [style]", |el| {
                        let tag = el.tag_name();
                        for name in REFERENCE_ATTRIBUTES {
                            let Some(value) = el.get_attribute(name) else {
                                continue;
                            };
                            if let Some(rewritten) = self.rewrite_attr(&tag, name, &value) {
                                if rewritten != value {
                                    el.set_attribute(name, &rewritten)?;
                                }
                            }
                        }
                        Ok(())
                    }),
                    // <style> bodies can arrive split across several chunks
                    text!("style", |chunk| {
                        style_text.push_str(chunk.as_str());
                        if chunk.last_in_text_node() {
                            let css = rewrite_css_urls(&style_text, |raw| {
                                self.local_path("style", "style", raw)
                            });
                            chunk.replace(&css, ContentType::Html);
                            style_text.clear();
                        } else {
                            chunk.remove();
                        }
                        Ok(())
                    }),
                ],
                ..Settings::default()
            },
            |c: &[u8]| output.extend_from_slice(c),
        );

        rewriter.write(html).map_err(|e| self.rewrite_error(e))?;
        rewriter.end().map_err(|e| self.rewrite_error(e))?;

        Ok(output)
    }

    fn rewrite_error(&self, error: RewritingError) -> MirrorError {
        MirrorError::HtmlParse {
            url: self.base.to_string(),
            message: error.to_string(),
        }
    }

    /// Returns the rewritten attribute value, or None to keep the original
    fn rewrite_attr(&self, tag: &str, name: &str, value: &str) -> Option<String> {
        match name {
            "href" | "src" => self.local_path(tag, name, value),
            "srcset" => Some(rewrite_srcset(value, |raw| self.local_path(tag, name, raw))),
            "style" => Some(rewrite_css_urls(value, |raw| self.local_path(tag, name, raw))),
            _ => None,
        }
    }

    /// Local mirror path of a same-host reference
    fn local_path(&self, tag: &str, attr: &str, raw: &str) -> Option<String> {
        let url = resolve_reference(raw, self.base)?;
        let base_host = self.base.host_str().unwrap_or("");
        if !same_host(&url, base_host) {
            return None;
        }

        let content_type = guess_content_type(tag, attr, &url, self.content_type);
        let path = map_path(&url, content_type, self.output_root);
        Some(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ResourceKind;

    fn base_url() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    fn extract(html: &str) -> ExtractedRefs {
        HtmlParser
            .extract_links_and_resources(html.as_bytes(), &base_url())
            .unwrap()
    }

    fn rewrite(html: &str) -> String {
        let out = HtmlParser.rewrite_to_local(html.as_bytes(), &base_url(), "text/html", Path::new("/out"));
        String::from_utf8(out).unwrap()
    }

    fn link_strs(refs: &ExtractedRefs) -> Vec<&str> {
        refs.links.iter().map(|u| u.as_str()).collect()
    }

    #[test]
    fn test_extract_relative_and_absolute_links() {
        let refs = extract(
            r#"<a href="/about">A</a><a href="guide">G</a><a href="https://other.com/x">X</a>"#,
        );
        assert_eq!(
            link_strs(&refs),
            vec![
                "https://example.com/about",
                "https://example.com/docs/guide",
                "https://other.com/x"
            ]
        );
    }

    #[test]
    fn test_area_links() {
        let refs = extract(r#"<map><area href="/region"></map>"#);
        assert_eq!(link_strs(&refs), vec!["https://example.com/region"]);
    }

    #[test]
    fn test_query_dropped_and_deduplicated() {
        let refs = extract(r#"<a href="/p?page=1">1</a><a href="/p?page=2">2</a><a href="/p">3</a>"#);
        assert_eq!(link_strs(&refs), vec!["https://example.com/p"]);
    }

    #[test]
    fn test_skip_special_references() {
        let refs = extract(
            r##"<a href="#top">t</a><a href="mailto:a@b.c">m</a>
                <a href="javascript:void(0)">j</a><a href="data:text/html,x">d</a>
                <a href="  ">e</a><img src="data:image/png;base64,AAAA">"##,
        );
        assert!(refs.links.is_empty());
        assert!(refs.resources.is_empty());
    }

    #[test]
    fn test_resources_classified() {
        let refs = extract(
            r#"<html><head><link rel="stylesheet" href="/s.css"><script src="app.js"></script></head>
               <body><img src="/i.png"><video src="/v.mp4"></video><iframe src="/frame.html"></iframe></body></html>"#,
        );
        let kinds: Vec<(&str, ResourceKind)> = refs
            .resources
            .iter()
            .map(|r| (r.url.as_str(), r.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("https://example.com/s.css", ResourceKind::Css),
                ("https://example.com/docs/app.js", ResourceKind::Js),
                ("https://example.com/i.png", ResourceKind::Image),
                ("https://example.com/v.mp4", ResourceKind::Other),
                ("https://example.com/frame.html", ResourceKind::Html),
            ]
        );
    }

    #[test]
    fn test_srcset_candidates() {
        let refs = extract(r#"<img srcset="/small.png 480w, /large.png 800w">"#);
        let urls: Vec<&str> = refs.resources.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/small.png", "https://example.com/large.png"]);
    }

    #[test]
    fn test_inline_style_and_style_element() {
        let refs = extract(
            r#"<html><head><style>body { background: url('/bg.png') }</style></head>
               <body><div style="background-image: url(/hero.jpg)"></div></body></html>"#,
        );
        let urls: Vec<&str> = refs.resources.iter().map(|r| r.url.as_str()).collect();
        assert!(urls.contains(&"https://example.com/bg.png"));
        assert!(urls.contains(&"https://example.com/hero.jpg"));
    }

    #[test]
    fn test_duplicate_resources_collapsed() {
        let refs = extract(r#"<img src="/a.png"><img src="/a.png?v=2"><img src="a.png">"#);
        let urls: Vec<&str> = refs.resources.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/a.png", "https://example.com/docs/a.png"]);
    }

    #[test]
    fn test_rewrite_same_host_href() {
        let out = rewrite(r#"<html><body><a href="/about">About</a></body></html>"#);
        assert!(out.contains(r#"href="/out/about.html""#), "{}", out);
    }

    #[test]
    fn test_rewrite_leaves_cross_host() {
        let out = rewrite(r#"<html><body><a href="https://other.com/x">X</a></body></html>"#);
        assert!(out.contains(r#"href="https://other.com/x""#), "{}", out);
    }

    #[test]
    fn test_rewrite_resources() {
        let out = rewrite(
            r#"<html><head><link rel="stylesheet" href="/theme"><script src="/app"></script></head>
               <body><img src="/img/logo.png"></body></html>"#,
        );
        assert!(out.contains(r#"href="/out/theme.css""#), "{}", out);
        assert!(out.contains(r#"src="/out/app.js""#), "{}", out);
        assert!(out.contains(r#"src="/out/img/logo.png""#), "{}", out);
    }

    #[test]
    fn test_rewrite_srcset_preserves_descriptors() {
        let out = rewrite(r#"<img srcset="/a.png 1x, https://cdn.other.com/b.png 2x">"#);
        assert!(
            out.contains(r#"srcset="/out/a.png 1x, https://cdn.other.com/b.png 2x""#),
            "{}",
            out
        );
    }

    #[test]
    fn test_rewrite_inline_style() {
        let out = rewrite(r#"<div style="background: url('/bg.png')"></div>"#);
        assert!(out.contains("url('/out/bg.png')"), "{}", out);
    }

    #[test]
    fn test_rewrite_keeps_script_text_raw() {
        let out = rewrite(r#"<html><head><script>if (a < b && c) {}</script></head><body><p>1 &lt; 2</p></body></html>"#);
        assert!(out.contains("if (a < b && c) {}"), "{}", out);
        assert!(out.contains("<p>1 &lt; 2</p>"), "{}", out);
    }

    #[test]
    fn test_rewrite_keeps_doctype_and_void_elements() {
        let out = rewrite("<!DOCTYPE html><html><head></head><body><br><img src=\"https://x.org/a.png\"></body></html>");
        assert!(out.starts_with("<!DOCTYPE html>"), "{}", out);
        assert!(out.contains("<br>"), "{}", out);
        assert!(!out.contains("</br>"), "{}", out);
        assert!(!out.contains("</img>"), "{}", out);
    }

    #[test]
    fn test_rewrite_without_local_references_is_identity() {
        let html = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>A &amp; B</title>
<script>if (a < b && c) { go("x"); }</script></head>
<body><!-- note --><p class='x' id=y>Text&nbsp;here<br/></p>
<a href="https://other.com/x">X</a><img src="data:image/png;base64,AA" alt="">
<textarea>

keep</textarea></body></html>
"#;
        assert_eq!(rewrite(html), html);
    }

    #[test]
    fn test_rewrite_changes_only_references() {
        let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
<html><head><link rel="stylesheet" href="/css/site.css"></head><body>
<svg><use xlink:href="/icons.svg#a"></use></svg>
<pre>

x</pre>
<p a="1" b="2" c="3" d="4" e="5"><img src="logo.png" alt="logo"></p>
</body></html>"#;
        let expected = html
            .replace(r#"href="/css/site.css""#, r#"href="/out/css/site.css""#)
            .replace(r#"src="logo.png""#, r#"src="/out/docs/logo.png""#);

        assert_eq!(rewrite(html), expected);
    }

    #[test]
    fn test_rewrite_style_element_exact() {
        let html = "<style>p { background: url(/p.png) } a { color: red }</style>";
        assert_eq!(
            rewrite(html),
            "<style>p { background: url(/out/p.png) } a { color: red }</style>"
        );
    }

    #[test]
    fn test_rewrite_style_element() {
        let out = rewrite("<html><head><style>p { background: url(/p.png) }</style></head></html>");
        assert!(out.contains("url(/out/p.png)"), "{}", out);
    }
}
