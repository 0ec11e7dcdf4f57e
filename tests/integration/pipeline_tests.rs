/*!
 * End-to-end tests: install package fixtures on disk, build the graph,
 * and translate through direct, pivot, and cached edges.
 */

use std::sync::Arc;

use yaomt::engine::mock::MockLoader;
use yaomt::engine::EngineLoader;
use yaomt::{LanguageGraph, TranslateConfig, TranslateError};

use crate::common::{create_temp_dir, write_sbd_package, write_translate_package};

fn chained_loader() -> MockLoader {
    MockLoader::new()
        .with_mapping("en", "es", &[("Hello", "Hola"), ("Good morning", "Buenos días")])
        .with_mapping("es", "fr", &[("Hola", "Bonjour"), ("Buenos días", "Bonjour matin")])
}

/// Installs the en->es and es->fr fixtures and builds a graph over them
fn chained_graph(loader: MockLoader) -> (LanguageGraph, tempfile::TempDir) {
    let temp = create_temp_dir().unwrap();
    write_translate_package(temp.path(), ("en", "English"), ("es", "Spanish")).unwrap();
    write_translate_package(temp.path(), ("es", "Spanish"), ("fr", "French")).unwrap();

    let config = TranslateConfig::with_packages_dir(temp.path());
    let graph = LanguageGraph::from_installed(&config, Arc::new(loader) as Arc<dyn EngineLoader>);
    (graph, temp)
}

#[test]
fn test_pipeline_shouldDiscoverAllThreeLanguages() {
    let (graph, _temp) = chained_graph(chained_loader());

    let languages = graph.installed_languages();
    assert_eq!(languages.len(), 3);
    // English first, the rest by display name
    assert_eq!(languages[0].code(), "en");
    assert_eq!(languages[1].name(), "French");
    assert_eq!(languages[2].name(), "Spanish");
}

#[test]
fn test_pipeline_directEdge_shouldTranslateThroughPackage() {
    let (graph, _temp) = chained_graph(chained_loader());
    assert_eq!(graph.translate("Hello", "en", "es").unwrap(), "Hola");
}

#[test]
fn test_pipeline_pivotEdge_shouldComposeBothPackages() {
    let (graph, _temp) = chained_graph(chained_loader());

    // en -> fr only exists through the es pivot
    assert_eq!(graph.translate("Hello", "en", "fr").unwrap(), "Bonjour");
    assert_eq!(
        graph.translate("Good morning", "en", "fr").unwrap(),
        "Bonjour matin"
    );
}

#[test]
fn test_pipeline_pivotEdge_shouldHonorHypothesisCountContract() {
    let (graph, _temp) = chained_graph(chained_loader());
    let translation = graph.translation_from_codes("en", "fr").unwrap();

    for n in [1, 2, 4] {
        assert_eq!(translation.hypotheses("Hello", n).unwrap().len(), n);
    }
}

#[test]
fn test_pipeline_reversePair_shouldBeUnsupported() {
    let (graph, _temp) = chained_graph(chained_loader());

    let error = graph.translate("Bonjour", "fr", "en").unwrap_err();
    assert!(matches!(error, TranslateError::UnsupportedLanguage { .. }));
    assert!(error.to_string().contains("fr"));
}

#[test]
fn test_pipeline_selfTranslation_shouldAlwaysSucceed() {
    let (graph, _temp) = chained_graph(chained_loader());

    for code in ["en", "es", "fr"] {
        assert_eq!(
            graph.translate("unchanged text", code, code).unwrap(),
            "unchanged text"
        );
    }
}

#[test]
fn test_pipeline_repeatedTranslation_shouldServeFromEdgeCache() {
    let temp = create_temp_dir().unwrap();
    write_translate_package(temp.path(), ("en", "English"), ("es", "Spanish")).unwrap();

    let loader = Arc::new(chained_loader());
    let config = TranslateConfig::with_packages_dir(temp.path());
    let graph =
        LanguageGraph::from_installed(&config, Arc::clone(&loader) as Arc<dyn EngineLoader>);

    graph.translate("Hello", "en", "es").unwrap();
    let after_first = loader.inference_count();
    assert!(after_first > 0);

    // Identical input again: the cached edge answers without inference
    graph.translate("Hello", "en", "es").unwrap();
    assert_eq!(loader.inference_count(), after_first);
}

#[test]
fn test_pipeline_multiParagraphInput_shouldPreserveBlankLines() {
    let (graph, _temp) = chained_graph(chained_loader());
    assert_eq!(
        graph.translate("Hello\n\nHello", "en", "es").unwrap(),
        "Hola\n\nHola"
    );
}

#[test]
fn test_pipeline_withSbdPackage_shouldStillBuildAndTranslate() {
    let temp = create_temp_dir().unwrap();
    write_translate_package(temp.path(), ("en", "English"), ("es", "Spanish")).unwrap();
    write_sbd_package(temp.path(), "en", "English").unwrap();

    let config = TranslateConfig::with_packages_dir(temp.path());
    let graph = LanguageGraph::from_installed(
        &config,
        Arc::new(chained_loader()) as Arc<dyn EngineLoader>,
    );

    // The sbd package contributes no language pair of its own
    assert_eq!(graph.installed_languages().len(), 2);
    assert_eq!(graph.translate("Hello", "en", "es").unwrap(), "Hola");
}

#[test]
fn test_installedLanguages_shouldListWithoutLoadingModels() {
    let temp = create_temp_dir().unwrap();
    write_translate_package(temp.path(), ("en", "English"), ("es", "Spanish")).unwrap();

    let loader = Arc::new(chained_loader());
    let config = TranslateConfig::with_packages_dir(temp.path());
    let languages =
        yaomt::installed_languages(&config, Arc::clone(&loader) as Arc<dyn EngineLoader>);

    assert_eq!(languages.len(), 2);
    assert_eq!(languages[0].code(), "en");
    // Listing is metadata-only; no engine was opened
    assert_eq!(loader.load_count(), 0);
}

#[test]
fn test_pipeline_rebuildAfterInstallingPackage_shouldAddPair() {
    let temp = create_temp_dir().unwrap();
    write_translate_package(temp.path(), ("en", "English"), ("es", "Spanish")).unwrap();

    let config = TranslateConfig::with_packages_dir(temp.path());
    let loader = || Arc::new(chained_loader()) as Arc<dyn EngineLoader>;

    let graph = LanguageGraph::from_installed(&config, loader());
    assert!(graph.translation_from_codes("en", "fr").is_err());

    // Installing the es->fr package and rebuilding exposes the pivot
    write_translate_package(temp.path(), ("es", "Spanish"), ("fr", "French")).unwrap();
    let rebuilt = LanguageGraph::from_installed(&config, loader());
    assert_eq!(rebuilt.translate("Hello", "en", "fr").unwrap(), "Bonjour");
}
