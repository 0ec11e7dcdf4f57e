/*!
 * Tests for the core translation capability: identity, composite, and the
 * hypothesis-count contract.
 */

use std::sync::Arc;

use yaomt::{CompositeTranslation, Hypothesis, IdentityTranslation, Translation};

use crate::common::mock_translations::{lang, MockTranslation};

#[test]
fn test_identityTranslation_shouldReturnInputUnchanged() {
    let english = lang("en", "English");
    let identity = IdentityTranslation::new(Arc::clone(&english));

    assert_eq!(identity.translate("Hello World").unwrap(), "Hello World");
    assert_eq!(identity.from_lang().code(), "en");
    assert_eq!(identity.to_lang().code(), "en");
}

#[test]
fn test_identityTranslation_shouldHonorHypothesisCountContract() {
    let identity = IdentityTranslation::new(lang("en", "English"));

    for n in [1, 2, 4] {
        let hypotheses = identity.hypotheses("text", n).unwrap();
        assert_eq!(hypotheses.len(), n);
        for hypothesis in &hypotheses {
            assert_eq!(hypothesis.value, "text");
            assert_eq!(hypothesis.score, 0.0);
        }
    }
}

#[test]
fn test_compositeTranslation_shouldChainUnderlyingTranslations() {
    let english = lang("en", "English");
    let spanish = lang("es", "Spanish");
    let french = lang("fr", "French");

    let first = Arc::new(MockTranslation::mapping(
        Arc::clone(&english),
        Arc::clone(&spanish),
        &[("Hello World", "X")],
    ));
    let second = Arc::new(MockTranslation::mapping(
        Arc::clone(&spanish),
        Arc::clone(&french),
        &[("X", "Y")],
    ));

    let composite = CompositeTranslation::new(first, second);
    assert_eq!(composite.from_lang().code(), "en");
    assert_eq!(composite.to_lang().code(), "fr");
    assert_eq!(composite.translate("Hello World").unwrap(), "Y");
}

#[test]
fn test_compositeTranslation_shouldHonorHypothesisCountContract() {
    let composite = CompositeTranslation::new(
        Arc::new(MockTranslation::mapping(
            lang("a", "A"),
            lang("b", "B"),
            &[],
        )),
        Arc::new(MockTranslation::mapping(
            lang("b", "B"),
            lang("c", "C"),
            &[],
        )),
    );

    for n in [1, 2, 4] {
        assert_eq!(composite.hypotheses("text", n).unwrap().len(), n);
    }
}

#[test]
fn test_compositeTranslation_shouldSumScoresAndSortBestFirst() {
    // First hop returns ("a", -1), ("b", -2); second hop maps each value
    // deterministically at -1 per rank offset
    let first = Arc::new(MockTranslation::new(
        lang("x", "X"),
        lang("m", "M"),
        |_, n| {
            assert_eq!(n, 2);
            Ok(vec![Hypothesis::new("a", -1.0), Hypothesis::new("b", -2.0)])
        },
    ));
    let second = Arc::new(MockTranslation::new(
        lang("m", "M"),
        lang("y", "Y"),
        |text, n| {
            assert_eq!(n, 2);
            let mapped = match text {
                "a" => "x",
                "b" => "y",
                other => other,
            };
            Ok(vec![
                Hypothesis::new(mapped, -1.0),
                Hypothesis::new(format!("{}2", mapped), -3.0),
            ])
        },
    ));

    let composite = CompositeTranslation::new(first, second);
    let hypotheses = composite.hypotheses("input", 2).unwrap();

    // Cross product: (x,-2) (x2,-4) (y,-3) (y2,-5); top 2 best-first
    assert_eq!(hypotheses.len(), 2);
    assert_eq!(hypotheses[0], Hypothesis::new("x", -2.0));
    assert_eq!(hypotheses[1], Hypothesis::new("y", -3.0));
}

#[test]
fn test_compositeTranslation_shouldPropagateUnderlyingErrors() {
    let composite = CompositeTranslation::new(
        Arc::new(MockTranslation::failing(lang("a", "A"), lang("b", "B"))),
        Arc::new(MockTranslation::mapping(
            lang("b", "B"),
            lang("c", "C"),
            &[],
        )),
    );
    assert!(composite.translate("text").is_err());
}

#[test]
fn test_translate_shouldReturnTopHypothesisValue() {
    let translation = MockTranslation::new(lang("a", "A"), lang("b", "B"), |_, _| {
        Ok(vec![Hypothesis::new("best", -0.5)])
    });
    assert_eq!(translation.translate("anything").unwrap(), "best");
}
