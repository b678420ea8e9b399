use crate::error::{ReportError, Result};
use crate::extract::{Capped, FormInfo, ListKind, PageFields};
use crate::probe::TimingSample;
use crate::results::{CookieRecord, RenderedPage};
use std::path::{Path, PathBuf};

const BANNER_WIDTH: usize = 70;

pub const NO_TITLE: &str = "No title found.";
pub const NO_DESCRIPTION: &str = "No description found.";
pub const NO_HEADINGS: &str = "No headings found.";
pub const NO_PARAGRAPHS: &str = "No paragraphs found.";
pub const NO_LISTS: &str = "No lists found.";
pub const NO_LINKS: &str = "No links found.";
pub const NO_IMAGES: &str = "No images found.";
pub const NO_COMMENTS: &str = "No comments found.";
pub const NO_FORMS: &str = "No forms found.";
pub const NO_RESOURCES: &str = "No external scripts or stylesheets found.";
pub const NO_META_TAGS: &str = "No notable meta tags found.";
pub const NO_COOKIES: &str = "No cookies found.";
/// Stand-in for a missing attribute value
pub const MISSING: &str = "none";

/// One labeled block of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(label: &str, lines: Vec<String>) -> Self {
        Self {
            label: label.to_string(),
            lines,
        }
    }

    /// A section holding only a placeholder line
    pub fn placeholder(label: &str, text: &str) -> Self {
        Self::new(label, vec![text.to_string()])
    }
}

/// An ordered report: header, sections, then the raw markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    url: String,
    sections: Vec<Section>,
    markup: String,
}

impl Report {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            sections: Vec::new(),
            markup: String::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections.extend(sections);
        self
    }

    pub fn with_markup(mut self, markup: &str) -> Self {
        self.markup = markup.to_string();
        self
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Looks a section up by its label
    pub fn section(&self, label: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.label == label)
    }

    /// Renders the whole report as text
    pub fn render(&self) -> String {
        let banner = "=".repeat(BANNER_WIDTH);
        let mut out = vec![
            banner.clone(),
            format!("Page report for URL: {}", self.url),
            banner.clone(),
        ];

        for section in &self.sections {
            out.push(String::new());
            out.push(format!("--- {} ---", section.label));
            out.extend(section.lines.iter().cloned());
        }

        out.push(String::new());
        out.push(banner.clone());
        out.push(format!("--- {} ---", labels::RAW_MARKUP));
        out.push(banner);
        out.push(self.markup.clone());

        out.join("\n")
    }

    /// Writes the rendered report to `path`, replacing any existing file
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ::log::info!("Report saved to {}", path.display());
        Ok(())
    }
}

/// Section labels, in report order
pub mod labels {
    pub const LATENCY: &str = "Server response";
    pub const LOAD: &str = "Page load";
    pub const TITLE: &str = "Title";
    pub const DESCRIPTION: &str = "Meta description";
    pub const HEADINGS: &str = "Headings (H1, H2, H3)";
    pub const PARAGRAPHS: &str = "Paragraphs";
    pub const LISTS: &str = "Lists (UL/OL)";
    pub const LINKS: &str = "Links";
    pub const IMAGES: &str = "Images";
    pub const COMMENTS: &str = "HTML comments";
    pub const FORMS: &str = "Forms";
    pub const RESOURCES: &str = "External resources (JS/CSS)";
    pub const META_TAGS: &str = "Meta tags";
    pub const COOKIES: &str = "Cookies";
    pub const RAW_MARKUP: &str = "Raw HTML source";

    pub const ORDER: [&str; 14] = [
        LATENCY,
        LOAD,
        TITLE,
        DESCRIPTION,
        HEADINGS,
        PARAGRAPHS,
        LISTS,
        LINKS,
        IMAGES,
        COMMENTS,
        FORMS,
        RESOURCES,
        META_TAGS,
        COOKIES,
    ];
}

/// Assembles the full report in its fixed section order
pub fn build(
    url: &str,
    sample: &TimingSample,
    page: &RenderedPage,
    fields: &PageFields,
    cookies: &[CookieRecord],
) -> Report {
    Report::new(url)
        .with_section(latency_section(sample))
        .with_section(load_section(page.load_seconds))
        .with_sections(field_sections(fields))
        .with_section(cookie_section(cookies))
        .with_markup(&page.markup)
}

pub fn latency_section(sample: &TimingSample) -> Section {
    let lines = match sample {
        TimingSample::Response {
            status_code,
            elapsed_ms,
        } => vec![
            format!("HTTP status code: {}", status_code),
            format!("Response time: {:.2} ms", elapsed_ms),
        ],
        TimingSample::Timeout => {
            vec!["Response time measurement failed: request timed out".to_string()]
        }
        TimingSample::RequestError(detail) => {
            vec![format!(
                "Response time measurement failed: request error - {}",
                detail
            )]
        }
    };
    Section::new(labels::LATENCY, lines)
}

pub fn load_section(load_seconds: f64) -> Section {
    Section::new(
        labels::LOAD,
        vec![format!("Browser load time: {:.2} s", load_seconds)],
    )
}

/// Sections for every extracted field, title through meta tags
pub fn field_sections(fields: &PageFields) -> Vec<Section> {
    vec![
        match &fields.title {
            Some(title) => Section::new(labels::TITLE, vec![title.clone()]),
            None => Section::placeholder(labels::TITLE, NO_TITLE),
        },
        match &fields.description {
            Some(desc) => Section::new(labels::DESCRIPTION, vec![desc.clone()]),
            None => Section::placeholder(labels::DESCRIPTION, NO_DESCRIPTION),
        },
        headings_section(fields),
        paragraphs_section(&fields.paragraphs),
        lists_section(fields),
        links_section(fields),
        images_section(fields),
        comments_section(&fields.comments),
        forms_section(&fields.forms),
        resources_section(fields),
        meta_section(fields),
    ]
}

pub fn cookie_section(cookies: &[CookieRecord]) -> Section {
    if cookies.is_empty() {
        return Section::placeholder(labels::COOKIES, NO_COOKIES);
    }
    let json = serde_json::to_string_pretty(cookies)
        .unwrap_or_else(|e| format!("Failed to serialize cookies: {}", e));
    Section::new(labels::COOKIES, json.lines().map(str::to_string).collect())
}

/// "+N more" line for a capped list, if anything was cut
fn overflow_note<T>(capped: &Capped<T>, noun: &str, indent: &str) -> Option<String> {
    let omitted = capped.omitted();
    (omitted > 0).then(|| format!("{}... and {} more {}", indent, omitted, noun))
}

fn headings_section(fields: &PageFields) -> Section {
    if fields.headings.is_empty() {
        return Section::placeholder(labels::HEADINGS, NO_HEADINGS);
    }
    let lines = fields
        .headings
        .iter()
        .map(|h| format!("<{}>: {}", h.tag.to_uppercase(), h.text))
        .collect();
    Section::new(labels::HEADINGS, lines)
}

fn paragraphs_section(paragraphs: &Capped<String>) -> Section {
    if paragraphs.is_empty() {
        return Section::placeholder(labels::PARAGRAPHS, NO_PARAGRAPHS);
    }
    let mut lines: Vec<String> = paragraphs
        .items
        .iter()
        .enumerate()
        .map(|(i, p)| format!("Paragraph {}: {}", i + 1, p))
        .collect();
    lines.extend(overflow_note(paragraphs, "paragraphs", ""));
    Section::new(labels::PARAGRAPHS, lines)
}

fn lists_section(fields: &PageFields) -> Section {
    if fields.lists.is_empty() {
        return Section::placeholder(labels::LISTS, NO_LISTS);
    }
    let mut lines = Vec::new();
    for list in &fields.lists {
        lines.push(match list.kind {
            ListKind::Unordered => "Unordered list:".to_string(),
            ListKind::Ordered => "Ordered list:".to_string(),
        });
        if list.items.is_empty() {
            lines.push("  (no items)".to_string());
        }
        lines.extend(list.items.items.iter().map(|item| format!("  - {}", item)));
        lines.extend(overflow_note(&list.items, "items", "  "));
    }
    Section::new(labels::LISTS, lines)
}

fn links_section(fields: &PageFields) -> Section {
    if fields.links.is_empty() {
        return Section::placeholder(labels::LINKS, NO_LINKS);
    }
    let mut lines: Vec<String> = fields
        .links
        .items
        .iter()
        .enumerate()
        .map(|(i, link)| match &link.text {
            Some(text) => format!("Link {}: text: '{}', URL: '{}'", i + 1, text, link.href),
            None => format!("Link {}: URL: '{}' (no text)", i + 1, link.href),
        })
        .collect();
    lines.extend(overflow_note(&fields.links, "links", ""));
    Section::new(labels::LINKS, lines)
}

fn images_section(fields: &PageFields) -> Section {
    if fields.images.is_empty() {
        return Section::placeholder(labels::IMAGES, NO_IMAGES);
    }
    let mut lines: Vec<String> = fields
        .images
        .items
        .iter()
        .enumerate()
        .map(|(i, img)| {
            format!(
                "Image {}: SRC: '{}', ALT: '{}'",
                i + 1,
                img.src,
                img.alt.as_deref().unwrap_or("no alt text")
            )
        })
        .collect();
    lines.extend(overflow_note(&fields.images, "images", ""));
    Section::new(labels::IMAGES, lines)
}

fn comments_section(comments: &Capped<String>) -> Section {
    if comments.is_empty() {
        return Section::placeholder(labels::COMMENTS, NO_COMMENTS);
    }
    let mut lines: Vec<String> = comments
        .items
        .iter()
        .enumerate()
        .map(|(i, c)| format!("Comment {}: {}", i + 1, c))
        .collect();
    lines.extend(overflow_note(comments, "comments", ""));
    Section::new(labels::COMMENTS, lines)
}

fn forms_section(forms: &[FormInfo]) -> Section {
    if forms.is_empty() {
        return Section::placeholder(labels::FORMS, NO_FORMS);
    }
    let mut lines = Vec::new();
    for (i, form) in forms.iter().enumerate() {
        lines.push(format!("Form {}:", i + 1));
        lines.push(format!(
            "  action: {}",
            form.action.as_deref().unwrap_or(MISSING)
        ));
        lines.push(format!(
            "  method: {}",
            form.method.as_deref().unwrap_or(MISSING)
        ));
        if form.fields.is_empty() {
            lines.push("  No input fields found.".to_string());
            continue;
        }
        lines.push("  Input fields:".to_string());
        lines.extend(form.fields.items.iter().map(|f| {
            format!(
                "    - type: {}, name: {}",
                f.kind,
                f.name.as_deref().unwrap_or("unnamed")
            )
        }));
        lines.extend(overflow_note(&form.fields, "fields", "    "));
    }
    Section::new(labels::FORMS, lines)
}

fn resources_section(fields: &PageFields) -> Section {
    let resources = &fields.resources;
    if resources.scripts.is_empty() && resources.stylesheets.is_empty() {
        return Section::placeholder(labels::RESOURCES, NO_RESOURCES);
    }
    let mut lines = Vec::new();
    for (heading, noun, capped) in [
        ("Scripts:", "scripts", &resources.scripts),
        ("Stylesheets:", "stylesheets", &resources.stylesheets),
    ] {
        if capped.is_empty() {
            continue;
        }
        lines.push(heading.to_string());
        lines.extend(
            capped
                .items
                .iter()
                .enumerate()
                .map(|(i, url)| format!("  {}: {}", i + 1, url)),
        );
        lines.extend(overflow_note(capped, noun, "  "));
    }
    Section::new(labels::RESOURCES, lines)
}

fn meta_section(fields: &PageFields) -> Section {
    if fields.meta_tags.is_empty() {
        return Section::placeholder(labels::META_TAGS, NO_META_TAGS);
    }
    let lines = fields
        .meta_tags
        .iter()
        .map(|m| format!("{}: {}", m.key, m.content))
        .collect();
    Section::new(labels::META_TAGS, lines)
}

/// Report path for `filename` under the current working directory
pub fn output_path(filename: &str) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|source| ReportError::Io {
        path: PathBuf::from(filename),
        source,
    })?;
    Ok(cwd.join(filename))
}
