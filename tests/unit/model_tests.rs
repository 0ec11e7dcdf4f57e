/*!
 * Tests for package-backed model translation: lazy engine loading, the
 * segment/tokenize/translate/reassemble pipeline, and its artifacts.
 */

use std::sync::Arc;

use yaomt::engine::mock::{MockBehavior, MockLoader};
use yaomt::engine::EngineLoader;
use yaomt::package::PackageKind;
use yaomt::{Device, ModelTranslation, TranslateError, Translation};

use crate::common::mock_translations::{lang, MockTranslation};
use crate::common::{make_package, make_package_of_kind};

fn model_translation(loader: Arc<MockLoader>) -> ModelTranslation {
    ModelTranslation::new(
        lang("en", "English"),
        lang("es", "Spanish"),
        make_package(("en", "English"), ("es", "Spanish")),
        loader as Arc<dyn EngineLoader>,
        Device::Cpu,
    )
}

#[test]
fn test_modelTranslation_shouldLoadEngineLazilyAndOnce() {
    let loader = Arc::new(MockLoader::new());
    let translation = model_translation(Arc::clone(&loader));

    assert_eq!(loader.load_count(), 0);

    translation.translate("hello").unwrap();
    assert_eq!(loader.load_count(), 1);

    translation.translate("again").unwrap();
    assert_eq!(loader.load_count(), 1);
}

#[test]
fn test_modelTranslation_shouldHonorHypothesisCountContract() {
    let loader = Arc::new(MockLoader::new());
    let translation = model_translation(loader);

    for n in [1, 2, 4] {
        let hypotheses = translation.hypotheses("hello world", n).unwrap();
        assert_eq!(hypotheses.len(), n);
    }
}

#[test]
fn test_modelTranslation_shouldApplyEngineBehavior() {
    let loader = Arc::new(
        MockLoader::new().with_behavior("en", "es", MockBehavior::Uppercase),
    );
    let translation = model_translation(loader);
    assert_eq!(translation.translate("hello world").unwrap(), "HELLO WORLD");
}

#[test]
fn test_modelTranslation_shouldBatchOncePerParagraph() {
    let loader = Arc::new(MockLoader::new().with_splitter());
    let translation = model_translation(Arc::clone(&loader));

    // Two sentences in one paragraph still make a single batch call
    translation.translate("One. Two.").unwrap();
    assert_eq!(loader.inference_count(), 1);

    translation.translate("para one\npara two").unwrap();
    assert_eq!(loader.inference_count(), 3);
}

#[test]
fn test_modelTranslation_shouldPreserveParagraphStructure() {
    let loader = Arc::new(
        MockLoader::new().with_behavior("en", "es", MockBehavior::Uppercase),
    );
    let translation = model_translation(loader);
    assert_eq!(
        translation.translate("first\nsecond").unwrap(),
        "FIRST\nSECOND"
    );
}

#[test]
fn test_modelTranslation_shouldStripTokenizerLeadingSpace() {
    let loader = Arc::new(MockLoader::new().with_leading_space());
    let translation = model_translation(loader);
    assert_eq!(translation.translate("hello").unwrap(), "hello");
}

#[test]
fn test_modelTranslation_shouldStripTargetPrefixFromOutput() {
    let loader = Arc::new(MockLoader::new());
    let translation = ModelTranslation::new(
        lang("en", "English"),
        lang("es", "Spanish"),
        make_package_of_kind(
            ("en", "English"),
            ("es", "Spanish"),
            PackageKind::Translate,
            "__es__",
        ),
        loader as Arc<dyn EngineLoader>,
        Device::Cpu,
    );

    // The mock engine echoes the prefix token into its output tokens; the
    // decoded text must not carry it
    assert_eq!(translation.translate("hello").unwrap(), "hello");
}

#[test]
fn test_modelTranslation_withSbdProbe_shouldChunkBeforeTranslating() {
    let loader = Arc::new(
        MockLoader::new().with_behavior("en", "es", MockBehavior::Uppercase),
    );

    // Probe that reports the first sentence of whatever it is asked about
    let probe = Arc::new(MockTranslation::new(
        lang("en", "English"),
        lang("en", "English"),
        |text, n| {
            let body = text
                .strip_prefix("<detect-sentence-boundaries>")
                .unwrap_or(text);
            let end = body.find(". ").map(|i| i + 1).unwrap_or(body.len());
            Ok(vec![
                yaomt::Hypothesis::new(
                    format!("{}<sentence-boundary>", &body[..end]),
                    0.0
                );
                n
            ])
        },
    ));

    let translation = model_translation(Arc::clone(&loader)).with_sbd_probe(probe);
    let translated = translation.translate("First part. Second part.").unwrap();
    assert_eq!(translated, "FIRST PART. SECOND PART.");
    // One batch call covering both chunks
    assert_eq!(loader.inference_count(), 1);
}

#[test]
fn test_modelTranslation_withFailingLoader_shouldReturnModelLoadError() {
    let loader = Arc::new(MockLoader::failing());
    let translation = model_translation(loader);
    assert!(matches!(
        translation.translate("hello"),
        Err(TranslateError::ModelLoad { .. })
    ));
}

#[test]
fn test_modelTranslation_withFailingEngine_shouldReturnInferenceError() {
    let loader = Arc::new(
        MockLoader::new().with_behavior("en", "es", MockBehavior::Failing),
    );
    let translation = model_translation(loader);
    assert!(matches!(
        translation.translate("hello"),
        Err(TranslateError::Inference(_))
    ));
}
