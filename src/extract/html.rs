use crate::extract::text::{element_text, truncate_chars};
use crate::extract::{
    COMMENT_CHARS, Capped, FieldDescriptor, FormInfo, Heading, ImageInfo, LinkInfo, ListInfo,
    ListKind, MAX_COMMENTS, MAX_FORM_FIELDS, MAX_IMAGES, MAX_LINKS, MAX_LIST_ITEMS, MAX_PARAGRAPHS,
    MAX_RESOURCES, MetaTag, NOTABLE_META_NAMES, PARAGRAPH_CHARS, Resources,
};
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2, h3"));
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static LISTS: LazyLock<Selector> = LazyLock::new(|| selector("ul, ol"));
static LIST_ITEMS: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));
static FORMS: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static FORM_FIELDS: LazyLock<Selector> = LazyLock::new(|| selector("input, textarea, select"));
static SCRIPTS: LazyLock<Selector> = LazyLock::new(|| selector("script[src]"));
static STYLESHEETS: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"link[rel~="stylesheet"][href]"#));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta"));

/// Text of the first title element
pub fn title(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// Content of `<meta name="description">`
pub fn description(doc: &Html) -> Option<String> {
    doc.select(&META_DESCRIPTION)
        .next()
        .and_then(|e| e.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

pub fn headings(doc: &Html) -> Vec<Heading> {
    doc.select(&HEADINGS)
        .map(|e| Heading {
            tag: e.value().name().to_string(),
            text: element_text(e),
        })
        .collect()
}

/// Non-empty paragraphs, the first few cut to length
pub fn paragraphs(doc: &Html) -> Capped<String> {
    let texts = doc
        .select(&PARAGRAPHS)
        .map(element_text)
        .filter(|t| !t.is_empty());
    Capped::collect(texts, MAX_PARAGRAPHS).map(|t| truncate_chars(&t, PARAGRAPH_CHARS))
}

pub fn lists(doc: &Html) -> Vec<ListInfo> {
    doc.select(&LISTS)
        .map(|list| {
            let kind = if list.value().name() == "ol" {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };
            let items = list
                .select(&LIST_ITEMS)
                .map(element_text)
                .filter(|t| !t.is_empty());
            ListInfo {
                kind,
                items: Capped::collect(items, MAX_LIST_ITEMS),
            }
        })
        .collect()
}

pub fn links(doc: &Html) -> Capped<LinkInfo> {
    let links = doc.select(&LINKS).filter_map(|a| {
        let href = a.value().attr("href")?;
        let text = element_text(a);
        Some(LinkInfo {
            text: (!text.is_empty()).then_some(text),
            href: href.to_string(),
        })
    });
    Capped::collect(links, MAX_LINKS)
}

pub fn images(doc: &Html) -> Capped<ImageInfo> {
    let images = doc.select(&IMAGES).filter_map(|img| {
        let el = img.value();
        Some(ImageInfo {
            src: el.attr("src")?.to_string(),
            alt: el.attr("alt").map(str::to_string),
        })
    });
    Capped::collect(images, MAX_IMAGES)
}

/// Every comment node in the document, including those outside `<html>`
pub fn comments(doc: &Html) -> Capped<String> {
    let comments = doc
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Comment(comment) => Some(comment.trim().to_string()),
            _ => None,
        });
    Capped::collect(comments, MAX_COMMENTS).map(|c| truncate_chars(&c, COMMENT_CHARS))
}

pub fn forms(doc: &Html) -> Vec<FormInfo> {
    doc.select(&FORMS)
        .map(|form| {
            let el = form.value();
            let fields = form.select(&FORM_FIELDS).map(|field| {
                let fel = field.value();
                FieldDescriptor {
                    kind: fel.attr("type").unwrap_or(fel.name()).to_string(),
                    name: fel.attr("name").map(str::to_string),
                }
            });
            FormInfo {
                action: el.attr("action").map(str::to_string),
                method: el.attr("method").map(str::to_string),
                fields: Capped::collect(fields, MAX_FORM_FIELDS),
            }
        })
        .collect()
}

pub fn resources(doc: &Html) -> Resources {
    let scripts = doc
        .select(&SCRIPTS)
        .filter_map(|s| s.value().attr("src"))
        .map(str::to_string);
    let stylesheets = doc
        .select(&STYLESHEETS)
        .filter_map(|l| l.value().attr("href"))
        .map(str::to_string);
    Resources {
        scripts: Capped::collect(scripts, MAX_RESOURCES),
        stylesheets: Capped::collect(stylesheets, MAX_RESOURCES),
    }
}

/// Meta tags with a notable name, an http-equiv, or a bare charset
pub fn meta_tags(doc: &Html) -> Vec<MetaTag> {
    let mut tags = Vec::new();
    for meta in doc.select(&META) {
        let el = meta.value();
        let name = el.attr("name").filter(|n| !n.is_empty());
        let http_equiv = el.attr("http-equiv").filter(|h| !h.is_empty());

        let notable_name = name.is_some_and(|n| NOTABLE_META_NAMES.contains(&n));
        if notable_name || http_equiv.is_some() {
            let key = name.or(http_equiv).unwrap_or_default();
            tags.push(MetaTag {
                key: key.to_string(),
                content: el.attr("content").unwrap_or_default().to_string(),
            });
        } else if let Some(charset) = el.attr("charset") {
            tags.push(MetaTag {
                key: "charset".to_string(),
                content: charset.to_string(),
            });
        }
    }
    tags
}
