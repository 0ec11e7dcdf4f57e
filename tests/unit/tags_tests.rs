/*!
 * Tests for tag-tree-preserving translation.
 */

use yaomt::tags::{translate_preserve_formatting, translate_tags, Tag, TagNode};

use crate::common::mock_translations::{lang, MockTranslation};

fn identity_mock() -> MockTranslation {
    MockTranslation::new(lang("en", "English"), lang("en", "English"), |text, n| {
        Ok(vec![yaomt::Hypothesis::new(text, 0.0); n])
    })
}

fn uppercase_mock() -> MockTranslation {
    MockTranslation::uppercase(lang("en", "English"), lang("es", "Spanish"))
}

fn paris_tree() -> TagNode {
    TagNode::Tag(Tag::new(vec![
        TagNode::text("I went to "),
        TagNode::Tag(Tag::new(vec![TagNode::text("Paris")])),
        TagNode::text(" last summer."),
    ]))
}

#[test]
fn test_translateTags_withIdentity_shouldPreserveTextAndStructure() {
    let translated = translate_tags(&identity_mock(), paris_tree()).unwrap();

    assert_eq!(translated.flattened_text(), "I went to Paris last summer.");

    // The nested tag boundary survived injection intact
    let TagNode::Tag(tag) = translated else {
        panic!("expected a tag node");
    };
    assert_eq!(tag.children.len(), 3);
    assert!(matches!(
        &tag.children[1],
        TagNode::Tag(nested) if nested.flattened_text() == "Paris"
    ));
}

#[test]
fn test_translateTags_withUppercase_shouldTranslateNestedSpanSeparatelyWhenInjectionFails() {
    // Uppercasing mangles the sentinel markers, so injection is rejected
    // and each child translates independently
    let translated = translate_tags(&uppercase_mock(), paris_tree()).unwrap();

    assert_eq!(translated.flattened_text(), "I WENT TO PARIS LAST SUMMER.");

    let TagNode::Tag(tag) = translated else {
        panic!("expected a tag node");
    };
    assert!(matches!(
        &tag.children[1],
        TagNode::Tag(nested) if nested.flattened_text() == "PARIS"
    ));
}

#[test]
fn test_translateTags_nonTranslateable_shouldPassThroughUnchanged() {
    let tree = TagNode::Tag(Tag::non_translateable(vec![TagNode::text("verbatim")]));
    let translated = translate_tags(&uppercase_mock(), tree.clone()).unwrap();
    assert_eq!(translated, tree);
}

#[test]
fn test_translateTags_plainString_shouldTranslateDirectly() {
    let translated = translate_tags(&uppercase_mock(), TagNode::text("hello")).unwrap();
    assert_eq!(translated, TagNode::text("HELLO"));
}

#[test]
fn test_translateTags_deepTree_shouldRecursePerChild() {
    // Depth 3: injection does not apply, recursion must still translate
    // every leaf
    let tree = TagNode::Tag(Tag::new(vec![
        TagNode::text("outer "),
        TagNode::Tag(Tag::new(vec![
            TagNode::text("middle "),
            TagNode::Tag(Tag::new(vec![TagNode::text("inner")])),
        ])),
    ]));

    let translated = translate_tags(&uppercase_mock(), tree).unwrap();
    assert_eq!(translated.flattened_text(), "OUTER MIDDLE INNER");
}

#[test]
fn test_translateTags_longFlattenedText_shouldSkipInjection() {
    let long_text = "word ".repeat(50);
    let tree = TagNode::Tag(Tag::new(vec![
        TagNode::text(long_text.clone()),
        TagNode::Tag(Tag::new(vec![TagNode::text("tagged")])),
    ]));

    // Still translates correctly via the per-child path
    let translated = translate_tags(&identity_mock(), tree).unwrap();
    assert_eq!(
        translated.flattened_text(),
        format!("{}tagged", long_text)
    );
}

#[test]
fn test_translatePreserveFormatting_shouldRestoreEdgeSpaces() {
    // A translator that trims its output
    let trimming = MockTranslation::new(lang("en", "English"), lang("es", "Spanish"), |text, n| {
        Ok(vec![
            yaomt::Hypothesis::new(text.trim().to_uppercase(), 0.0);
            n
        ])
    });

    assert_eq!(
        translate_preserve_formatting(&trimming, " padded ").unwrap(),
        " PADDED "
    );
    assert_eq!(
        translate_preserve_formatting(&trimming, "plain").unwrap(),
        "PLAIN"
    );
}

#[test]
fn test_translateTags_failingTranslation_shouldPropagateError() {
    let failing = MockTranslation::failing(lang("en", "English"), lang("es", "Spanish"));
    assert!(translate_tags(&failing, paris_tree()).is_err());
}
