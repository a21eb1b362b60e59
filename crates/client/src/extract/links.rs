//! Link and image target resolution against the document's base URL.

use url::Url;

use super::tree::Tree;

/// Schemes that never produce a usable target.
const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Rewrite every `a[href]` and `img[src]` in `tree` to an absolute URL.
///
/// Targets that are empty, script-like, or fail to resolve lose the
/// attribute entirely, so the renderer never sees a relative reference.
/// Returns the number of rewritten attributes.
pub fn resolve_links(tree: &mut Tree, base_url: &Url) -> usize {
    let mut resolved = 0;

    for id in tree.descendants(tree.root()) {
        let Some(el) = tree.element_mut(id) else {
            continue;
        };
        let key = match el.name.as_str() {
            "a" => "href",
            "img" => "src",
            _ => continue,
        };
        let Some(target) = el.attr(key) else {
            continue;
        };

        match resolve(target, base_url) {
            Some(url) => {
                el.set_attr(key, url.to_string());
                resolved += 1;
            }
            None => el.remove_attr(key),
        }
    }

    resolved
}

/// Resolve one reference. `None` for empty or script targets and for
/// anything `Url::join` rejects.
pub fn resolve(target: &str, base_url: &Url) -> Option<Url> {
    let target = target.trim();
    if target.is_empty() {
        return None;
    }
    let lowered = target.to_ascii_lowercase();
    if SCRIPT_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }
    base_url.join(target).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved_attr(html: &str, tag: &str, key: &str, base: &str) -> Option<String> {
        let mut tree = Tree::parse(html);
        resolve_links(&mut tree, &Url::parse(base).unwrap());
        let id = tree.elements_named(tag)[0];
        tree.element(id).and_then(|el| el.attr(key)).map(str::to_string)
    }

    #[test]
    fn test_absolute_link_unchanged() {
        let href = resolved_attr(r#"<a href="https://example.com">x</a>"#, "a", "href", "https://other.org/");
        assert_eq!(href.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_relative_links() {
        let base = "https://example.com/path/";
        assert_eq!(
            resolved_attr(r#"<a href="/about">x</a>"#, "a", "href", base).as_deref(),
            Some("https://example.com/about")
        );
        assert_eq!(
            resolved_attr(r#"<a href="contact">x</a>"#, "a", "href", base).as_deref(),
            Some("https://example.com/path/contact")
        );
        assert_eq!(
            resolved_attr(r#"<a href="../up">x</a>"#, "a", "href", base).as_deref(),
            Some("https://example.com/up")
        );
    }

    #[test]
    fn test_fragment_and_query() {
        let base = "https://example.com/page";
        assert_eq!(
            resolved_attr(r##"<a href="#section">x</a>"##, "a", "href", base).as_deref(),
            Some("https://example.com/page#section")
        );
        assert_eq!(
            resolved_attr(r#"<a href="/search?q=test">x</a>"#, "a", "href", base).as_deref(),
            Some("https://example.com/search?q=test")
        );
    }

    #[test]
    fn test_protocol_relative() {
        let href = resolved_attr(r#"<a href="//cdn.example.net/lib">x</a>"#, "a", "href", "https://example.com/");
        assert_eq!(href.as_deref(), Some("https://cdn.example.net/lib"));
    }

    #[test]
    fn test_image_source() {
        let src = resolved_attr(r#"<img src="img/logo.png" alt="Logo">"#, "img", "src", "https://example.com/a/");
        assert_eq!(src.as_deref(), Some("https://example.com/a/img/logo.png"));
    }

    #[test]
    fn test_script_targets_removed() {
        let base = "https://example.com/";
        assert_eq!(resolved_attr(r#"<a href="javascript:void(0)">x</a>"#, "a", "href", base), None);
        assert_eq!(resolved_attr(r#"<a href=" JavaScript:alert(1)">x</a>"#, "a", "href", base), None);
        assert_eq!(resolved_attr(r#"<img src="data:image/png;base64,AAAA">"#, "img", "src", base), None);
    }

    #[test]
    fn test_empty_and_unresolvable_removed() {
        let base = "https://example.com/";
        assert_eq!(resolved_attr(r#"<a href="  ">x</a>"#, "a", "href", base), None);
        assert_eq!(resolved_attr(r#"<a href="http://[::1">x</a>"#, "a", "href", base), None);
    }

    #[test]
    fn test_count() {
        let mut tree = Tree::parse(r#"<a href="/a">a</a><a href="javascript:x">b</a><img src="c.png"><a>d</a>"#);
        assert_eq!(resolve_links(&mut tree, &Url::parse("https://example.com/").unwrap()), 2);
    }
}
