pub mod html;
pub mod text;


use scraper::Html;

/// Maximum paragraphs listed
pub const MAX_PARAGRAPHS: usize = 5;
/// Characters kept per paragraph
pub const PARAGRAPH_CHARS: usize = 200;
/// Maximum items listed per ul/ol
pub const MAX_LIST_ITEMS: usize = 5;
/// Maximum links listed
pub const MAX_LINKS: usize = 10;
/// Maximum images listed
pub const MAX_IMAGES: usize = 5;
/// Maximum comments listed
pub const MAX_COMMENTS: usize = 5;
/// Characters kept per comment
pub const COMMENT_CHARS: usize = 100;
/// Maximum input fields listed per form
pub const MAX_FORM_FIELDS: usize = 5;
/// Maximum scripts, and separately stylesheets, listed
pub const MAX_RESOURCES: usize = 5;

/// Meta tag names worth reporting
pub const NOTABLE_META_NAMES: [&str; 6] = [
    "charset",
    "viewport",
    "keywords",
    "author",
    "generator",
    "application-name",
];

/// A list cut at a fixed cap that remembers how many items it saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capped<T> {
    /// Items kept, in document order
    pub items: Vec<T>,
    /// Number of items found before capping
    pub total: usize,
}

impl<T> Capped<T> {
    /// Keeps the first `cap` items and counts the rest
    pub fn collect<I: IntoIterator<Item = T>>(iter: I, cap: usize) -> Self {
        let mut items = Vec::new();
        let mut total = 0;
        for item in iter {
            if total < cap {
                items.push(item);
            }
            total += 1;
        }
        Self { items, total }
    }

    /// Number of items dropped by the cap
    pub fn omitted(&self) -> usize {
        self.total - self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Capped<U> {
        Capped {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// An h1/h2/h3 element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Lowercase tag name
    pub tag: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// A ul/ol element and its li items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInfo {
    pub kind: ListKind,
    pub items: Capped<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    /// Link text, None when the anchor has no text
    pub text: Option<String>,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub src: String,
    pub alt: Option<String>,
}

/// One input, textarea or select inside a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The type attribute, or the tag name when there is none
    pub kind: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInfo {
    pub action: Option<String>,
    pub method: Option<String>,
    pub fields: Capped<FieldDescriptor>,
}

/// Scripts and stylesheets loaded from external URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub scripts: Capped<String>,
    pub stylesheets: Capped<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    /// name, http-equiv or "charset"
    pub key: String,
    pub content: String,
}

/// Every field extracted from one rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub headings: Vec<Heading>,
    pub paragraphs: Capped<String>,
    pub lists: Vec<ListInfo>,
    pub links: Capped<LinkInfo>,
    pub images: Capped<ImageInfo>,
    pub comments: Capped<String>,
    pub forms: Vec<FormInfo>,
    pub resources: Resources,
    pub meta_tags: Vec<MetaTag>,
}

/// Parses rendered markup and extracts every report field
pub fn extract(markup: &str) -> PageFields {
    let doc = Html::parse_document(markup);
    let fields = PageFields {
        title: html::title(&doc),
        description: html::description(&doc),
        headings: html::headings(&doc),
        paragraphs: html::paragraphs(&doc),
        lists: html::lists(&doc),
        links: html::links(&doc),
        images: html::images(&doc),
        comments: html::comments(&doc),
        forms: html::forms(&doc),
        resources: html::resources(&doc),
        meta_tags: html::meta_tags(&doc),
    };

    ::log::debug!(
        "Extracted {} headings, {} paragraphs, {} links, {} images, {} forms",
        fields.headings.len(),
        fields.paragraphs.total,
        fields.links.total,
        fields.images.total,
        fields.forms.len()
    );

    fields
}
