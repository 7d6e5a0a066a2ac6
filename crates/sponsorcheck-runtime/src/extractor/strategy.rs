//! Post container strategies.
//!
//! Naver blogs render posts with one of two editors. Each strategy knows one
//! container selector; strategies are tried in order and the first container
//! found wins.

use scraper::{ElementRef, Html, Selector};

use sponsorcheck_core::ExtractedContent;

/// Locates the post body inside a parsed page.
pub trait ContentStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The post container, if this page uses this layout.
    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>>;
}

/// SmartEditor ONE posts (`.se-main-container`).
pub struct SmartEditorStrategy {
    selector: Selector,
}

impl SmartEditorStrategy {
    pub fn new() -> Self {
        Self {
            selector: Selector::parse(".se-main-container").expect("valid selector"),
        }
    }
}

impl Default for SmartEditorStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStrategy for SmartEditorStrategy {
    fn name(&self) -> &'static str {
        "smart-editor"
    }

    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}

/// Older posts rendered by the legacy viewer (`#postViewArea`).
pub struct LegacyViewerStrategy {
    selector: Selector,
}

impl LegacyViewerStrategy {
    pub fn new() -> Self {
        Self {
            selector: Selector::parse("#postViewArea").expect("valid selector"),
        }
    }
}

impl Default for LegacyViewerStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStrategy for LegacyViewerStrategy {
    fn name(&self) -> &'static str {
        "legacy-viewer"
    }

    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}

/// Strategies in the order they are tried.
pub fn default_strategies() -> Vec<Box<dyn ContentStrategy>> {
    vec![
        Box::new(SmartEditorStrategy::new()),
        Box::new(LegacyViewerStrategy::new()),
    ]
}

/// Extract post content from a page, returning the strategy that matched.
pub fn extract_post(
    html: &str,
    strategies: &[Box<dyn ContentStrategy>],
) -> Option<(ExtractedContent, &'static str)> {
    let document = Html::parse_document(html);

    strategies.iter().find_map(|strategy| {
        strategy
            .locate(&document)
            .map(|container| (content_of(container), strategy.name()))
    })
}

/// The `src` of the `mainFrame` iframe, if the page wraps its post in one.
pub fn find_content_frame(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("iframe#mainFrame").ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|frame| frame.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

fn content_of(container: ElementRef<'_>) -> ExtractedContent {
    let text = visible_text(container);
    let image_count = Selector::parse("img")
        .map(|img| container.select(&img).count())
        .unwrap_or(0);

    ExtractedContent::new(text, image_count)
}

/// Rendered text of the container: inline runs stay joined, block elements
/// start new lines, and whitespace runs collapse to one space.
fn visible_text(container: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(container, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let name = child.value().name();
        if matches!(name, "script" | "style" | "noscript") {
            continue;
        }
        if name == "br" {
            out.push('\n');
            continue;
        }

        let block = is_block(name);
        if block {
            out.push('\n');
        }
        collect_text(child, out);
        if block {
            out.push('\n');
        }
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "blockquote"
            | "pre"
            | "table"
            | "tr"
            | "section"
            | "article"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMART_EDITOR_PAGE: &str = r#"
<html><body>
  <div class="se-main-container">
    <div class="se-component se-text"><p><span>오늘은 협찬받은 카페에 다녀왔어요.</span></p></div>
    <div class="se-component se-image"><img src="a.jpg"></div>
    <div class="se-component se-image"><img src="b.jpg"><img src="c.jpg"></div>
    <div class="se-component se-text"><p>  분위기가 좋았습니다.  </p></div>
    <script>window.tracking = "ignored";</script>
  </div>
  <img src="outside.jpg">
</body></html>
"#;

    const LEGACY_PAGE: &str = r#"
<html><body>
  <div id="postViewArea"><p>예전 에디터 글</p><img src="x.png"></div>
</body></html>
"#;

    #[test]
    fn test_smart_editor_extraction() {
        let (content, strategy) = extract_post(SMART_EDITOR_PAGE, &default_strategies()).unwrap();

        assert_eq!(strategy, "smart-editor");
        assert_eq!(content.text, "오늘은 협찬받은 카페에 다녀왔어요.\n분위기가 좋았습니다.");
        assert_eq!(content.image_count, 3);
        assert_eq!(content.char_count, content.text.chars().count());
    }

    #[test]
    fn test_inline_formatting_keeps_words_joined() {
        let page = r#"<div class="se-main-container"><p><span>협찬</span><b>받은</b> 솔직 후기</p></div>"#;
        let (content, _) = extract_post(page, &default_strategies()).unwrap();

        assert_eq!(content.text, "협찬받은 솔직 후기");
        assert_eq!(content.char_count, 10);
        assert!(sponsorcheck_core::rules::check_keywords(
            &content.text,
            &["협찬받은".to_string()]
        ));
    }

    #[test]
    fn test_block_boundaries_and_whitespace() {
        let page = r#"<div class="se-main-container"><p>첫 줄<br>둘째   줄</p><ul><li>하나</li><li><i>둘</i></li></ul></div>"#;
        let (content, _) = extract_post(page, &default_strategies()).unwrap();

        assert_eq!(content.text, "첫 줄\n둘째 줄\n하나\n둘");
    }

    #[test]
    fn test_legacy_viewer_fallback() {
        let (content, strategy) = extract_post(LEGACY_PAGE, &default_strategies()).unwrap();

        assert_eq!(strategy, "legacy-viewer");
        assert_eq!(content.text, "예전 에디터 글");
        assert_eq!(content.image_count, 1);
    }

    #[test]
    fn test_first_strategy_wins() {
        let page = r#"<div id="postViewArea">legacy</div><div class="se-main-container">new</div>"#;
        let (content, strategy) = extract_post(page, &default_strategies()).unwrap();

        assert_eq!(strategy, "smart-editor");
        assert_eq!(content.text, "new");
    }

    #[test]
    fn test_no_container_found() {
        assert!(extract_post("<html><body><p>hi</p></body></html>", &default_strategies()).is_none());
    }

    #[test]
    fn test_empty_container_counts_zero() {
        let (content, _) =
            extract_post(r#"<div class="se-main-container"></div>"#, &default_strategies()).unwrap();

        assert_eq!(content.text, "");
        assert_eq!(content.char_count, 0);
        assert_eq!(content.image_count, 0);
    }

    #[test]
    fn test_find_content_frame() {
        let page = r#"<html><body><iframe id="mainFrame" src="/PostView.naver?blogId=demo&amp;logNo=1"></iframe></body></html>"#;
        assert_eq!(
            find_content_frame(page).as_deref(),
            Some("/PostView.naver?blogId=demo&logNo=1")
        );
        assert!(find_content_frame(SMART_EDITOR_PAGE).is_none());
    }
}
