/*!
 * Tag-tree-preserving translation.
 *
 * Translates text carrying inline markup (a recursive tree of tags over
 * strings) without dropping or corrupting the markup. Simple trees are
 * translated in one piece with sentinel markers standing in for the tag
 * boundaries, keeping cross-span context for fluency; when the markers do
 * not survive translation intact, or the result drifts too far from an
 * independent plain translation, the tree falls back to translating each
 * child on its own, which is less fluent but structurally exact.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranslateError;
use crate::similarity::match_ratio;
use crate::translate::core::Translation;

/// Opening sentinel marking a nested tag's text during injection
const TAG_OPEN: &str = "<argos-tag>";

/// Closing sentinel marking a nested tag's text during injection
const TAG_CLOSE: &str = "</argos-tag>";

/// Longest flattened text injection is attempted on, in chars
const MAX_INJECTION_LENGTH: usize = 200;

/// Similarity floor the injected translation must reach against an
/// independent plain translation; the golden-ratio reciprocal, generous
/// but non-trivial
const INJECTION_SIMILARITY_FLOOR: f64 = 0.618_033_988_749_894_8;

/// Matches one sentinel-delimited span in translated text
static SENTINEL_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<argos-tag>(.*?)</argos-tag>").expect("sentinel regex compiles"));

/// One node in a tag tree: either plain text or a tag over children
#[derive(Debug, Clone, PartialEq)]
pub enum TagNode {
    /// A plain text leaf
    Text(String),
    /// A tag wrapping child nodes
    Tag(Tag),
}

impl TagNode {
    /// Create a text leaf
    pub fn text(value: impl Into<String>) -> Self {
        TagNode::Text(value.into())
    }

    /// The combined text of this node and everything under it
    pub fn flattened_text(&self) -> String {
        match self {
            TagNode::Text(text) => text.clone(),
            TagNode::Tag(tag) => tag.flattened_text(),
        }
    }
}

/// A tag with child nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Child nodes in document order
    pub children: Vec<TagNode>,

    /// When false, this tag and everything under it passes through
    /// translation unchanged
    pub translateable: bool,
}

impl Tag {
    /// Create a translateable tag over the given children
    pub fn new(children: Vec<TagNode>) -> Self {
        Self {
            children,
            translateable: true,
        }
    }

    /// Create a tag whose contents must not be translated
    pub fn non_translateable(children: Vec<TagNode>) -> Self {
        Self {
            children,
            translateable: false,
        }
    }

    /// The combined text of all children
    pub fn flattened_text(&self) -> String {
        self.children
            .iter()
            .map(TagNode::flattened_text)
            .collect()
    }
}

/// Nesting depth of a node
///
/// A text leaf has depth 0, a tag directly over text has depth 1, a tag
/// whose children include depth-1 tags has depth 2, and so on. An empty
/// tag has depth 0.
pub fn depth(node: &TagNode) -> usize {
    match node {
        TagNode::Text(_) => 0,
        TagNode::Tag(tag) => {
            if tag.children.is_empty() {
                0
            } else {
                1 + tag.children.iter().map(depth).max().unwrap_or(0)
            }
        }
    }
}

/// Translate text, restoring a single leading or trailing space lost in
/// translation
pub fn translate_preserve_formatting(
    translation: &dyn Translation,
    input_text: &str,
) -> Result<String, TranslateError> {
    let mut translated = translation.translate(input_text)?;
    if input_text.starts_with(' ') && !translated.starts_with(' ') {
        translated.insert(0, ' ');
    }
    if input_text.ends_with(' ') && !translated.ends_with(' ') {
        translated.push(' ');
    }
    Ok(translated)
}

/// Translate a tag tree, preserving its structure
///
/// Plain text translates directly. Non-translateable tags pass through
/// unchanged. A depth-2 tag (one level of nested tags over text) is first
/// attempted via sentinel injection; when injection is rejected, and for
/// all deeper trees, each child is translated independently instead.
pub fn translate_tags(
    translation: &dyn Translation,
    node: TagNode,
) -> Result<TagNode, TranslateError> {
    match node {
        TagNode::Text(text) => Ok(TagNode::Text(translate_preserve_formatting(
            translation,
            &text,
        )?)),
        TagNode::Tag(tag) if !tag.translateable => Ok(TagNode::Tag(tag)),
        TagNode::Tag(tag) => {
            if depth(&TagNode::Tag(tag.clone())) == 2 {
                if let Some(injected) = inject_tags(translation, &tag)? {
                    debug!("Tag injection succeeded");
                    return Ok(TagNode::Tag(injected));
                }
                debug!("Tag injection rejected, translating children independently");
            }

            let children = tag
                .children
                .into_iter()
                .map(|child| translate_tags(translation, child))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TagNode::Tag(Tag {
                children,
                translateable: tag.translateable,
            }))
        }
    }
}

/// Attempt to translate a depth-2 tag in one piece via sentinel injection
///
/// Returns `None` when injection is not applicable or its result fails
/// verification; the caller then falls back to per-child translation. A
/// rejection never escapes as an error.
fn inject_tags(
    translation: &dyn Translation,
    tag: &Tag,
) -> Result<Option<Tag>, TranslateError> {
    let plain_text = tag.flattened_text();
    if plain_text.chars().count() > MAX_INJECTION_LENGTH {
        return Ok(None);
    }

    // Flatten with sentinels standing in for the nested tag boundaries
    let mut flattened = String::new();
    let mut nested_tags: Vec<&Tag> = Vec::new();
    for child in &tag.children {
        match child {
            TagNode::Text(text) => flattened.push_str(text),
            TagNode::Tag(nested) => {
                if depth(child) != 1 {
                    return Ok(None);
                }
                flattened.push_str(TAG_OPEN);
                flattened.push_str(&nested.flattened_text());
                flattened.push_str(TAG_CLOSE);
                nested_tags.push(nested);
            }
        }
    }

    let translated = translate_preserve_formatting(translation, &flattened)?;

    // Parse the sentinels back out and check the shape survived
    let spans: Vec<_> = SENTINEL_SPAN.captures_iter(&translated).collect();
    if spans.len() != nested_tags.len() {
        debug!(
            "Tag injection shape mismatch: {} spans for {} tags",
            spans.len(),
            nested_tags.len()
        );
        return Ok(None);
    }

    // Stray markers outside a well-paired span mean the translator moved
    // or broke a boundary
    let stripped = SENTINEL_SPAN.replace_all(&translated, "$1").into_owned();
    if stripped.contains(TAG_OPEN) || stripped.contains(TAG_CLOSE) {
        return Ok(None);
    }

    // Sanity check against an independent translation of the plain text
    let plain_translated = translate_preserve_formatting(translation, &plain_text)?;
    let ratio = match_ratio(&stripped, &plain_translated);
    if ratio < INJECTION_SIMILARITY_FLOOR {
        debug!(
            "Tag injection similarity {:.3} below floor, rejecting",
            ratio
        );
        return Ok(None);
    }

    // Rebuild the tree, walking the translated text around the spans
    let mut children = Vec::new();
    let mut cursor = 0usize;
    for (span, nested) in spans.iter().zip(&nested_tags) {
        let whole = span.get(0).expect("capture group 0 always present");
        if cursor < whole.start() {
            children.push(TagNode::Text(translated[cursor..whole.start()].to_string()));
        }
        let inner = span.get(1).map(|m| m.as_str()).unwrap_or("");
        children.push(TagNode::Tag(Tag {
            children: vec![TagNode::Text(inner.to_string())],
            translateable: nested.translateable,
        }));
        cursor = whole.end();
    }
    if cursor < translated.len() {
        children.push(TagNode::Text(translated[cursor..].to_string()));
    }

    Ok(Some(Tag {
        children,
        translateable: tag.translateable,
    }))
}
