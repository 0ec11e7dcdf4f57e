/*!
 * The translation graph: languages as nodes, translations as edges.
 *
 * Built once from installed packages (or a remote capability), then closed
 * under self-translation and pivot composition so that every language pair
 * connected by any path of installed edges has a direct lookup. After the
 * build the graph is read-only and safe to share across threads.
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{info, warn};

use crate::config::{Device, TranslateConfig};
use crate::engine::EngineLoader;
use crate::errors::TranslateError;
use crate::package::{installed_packages, Package, PackageKind};
use crate::providers::{LanguageModel, RemoteApi};
use crate::translate::cache::CachedTranslation;
use crate::translate::core::{CompositeTranslation, IdentityTranslation, Language, Translation};
use crate::translate::fewshot::FewShotTranslation;
use crate::translate::model::ModelTranslation;
use crate::translate::remote::RemoteTranslation;

/// One language node with its outgoing edges, in append order
struct Node {
    language: Arc<Language>,
    translations_from: Vec<Arc<dyn Translation>>,
}

/// An immutable graph of languages and the translations between them
pub struct LanguageGraph {
    /// Nodes in presentation order: English first, the rest by name
    nodes: Vec<Node>,

    /// Language code to node index
    index: HashMap<String, usize>,
}

impl LanguageGraph {
    /// Build a graph from the packages installed under the configured
    /// packages directory
    pub fn from_installed(config: &TranslateConfig, loader: Arc<dyn EngineLoader>) -> Self {
        Self::from_packages(
            installed_packages(&config.packages_dir),
            loader,
            config.device,
        )
    }

    /// Build a graph from an explicit package list
    ///
    /// Packages are consumed in list order; the first package for a given
    /// language pair wins and later duplicates are skipped, so the result
    /// is deterministic for a given list.
    pub fn from_packages(
        packages: Vec<Package>,
        loader: Arc<dyn EngineLoader>,
        device: Device,
    ) -> Self {
        let mut builder = GraphBuilder::new();

        // A boundary-detection package, when installed, provides the
        // chunker's probe for packages without a bundled splitter.
        let sbd_probe = packages
            .iter()
            .find(|package| package.kind() == PackageKind::Sbd)
            .map(|package| sbd_probe_translation(package.clone(), Arc::clone(&loader), device));

        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        let mut direct_edges = 0usize;

        for package in packages {
            if package.kind() != PackageKind::Translate {
                continue;
            }

            let (Some(from_code), Some(to_code)) = (package.from_code(), package.to_code())
            else {
                warn!(
                    "Skipping package {}: missing language pair",
                    package.label()
                );
                continue;
            };

            let pair = (from_code.to_string(), to_code.to_string());
            if !seen_pairs.insert(pair) {
                warn!(
                    "Skipping package {}: a package for {} -> {} is already installed",
                    package.label(),
                    from_code,
                    to_code
                );
                continue;
            }

            let from_lang = builder.language(from_code, &package.from_name());
            let to_lang = builder.language(to_code, &package.to_name());

            let mut model = ModelTranslation::new(
                Arc::clone(&from_lang),
                Arc::clone(&to_lang),
                package,
                Arc::clone(&loader),
                device,
            );
            if let Some(probe) = &sbd_probe {
                model = model.with_sbd_probe(Arc::clone(probe));
            }

            builder.add_edge(Arc::new(CachedTranslation::new(Arc::new(model))));
            direct_edges += 1;
        }

        builder.add_identity_edges();
        let synthesized = builder.close_under_composition();
        let graph = builder.finish();

        info!(
            "Built translation graph: {} languages, {} direct edges, {} synthesized pivot edges",
            graph.nodes.len(),
            direct_edges,
            synthesized
        );

        graph
    }

    /// Build a complete mesh over the languages a remote service advertises
    ///
    /// Self-pairs get identity edges instead of remote round-trips, so
    /// self-translation stays free and local.
    pub fn from_remote_api(api: Arc<dyn RemoteApi>) -> Result<Self, TranslateError> {
        let mut builder = GraphBuilder::new();

        let remote_languages = api.languages()?;
        let languages: Vec<Arc<Language>> = remote_languages
            .iter()
            .map(|language| builder.language(&language.code, &language.name))
            .collect();

        for from_lang in &languages {
            for to_lang in &languages {
                if from_lang.code() == to_lang.code() {
                    continue;
                }
                builder.add_edge(Arc::new(RemoteTranslation::new(
                    Arc::clone(from_lang),
                    Arc::clone(to_lang),
                    Arc::clone(&api),
                )));
            }
        }

        builder.add_identity_edges();
        let graph = builder.finish();

        info!(
            "Built remote translation graph: {} languages",
            graph.nodes.len()
        );
        Ok(graph)
    }

    /// Build a complete mesh of few-shot translations over the given
    /// (code, name) languages
    pub fn from_language_model(
        language_model: Arc<dyn LanguageModel>,
        languages: &[(&str, &str)],
    ) -> Self {
        let mut builder = GraphBuilder::new();

        let languages: Vec<Arc<Language>> = languages
            .iter()
            .map(|(code, name)| builder.language(code, name))
            .collect();

        for from_lang in &languages {
            for to_lang in &languages {
                if from_lang.code() == to_lang.code() {
                    continue;
                }
                builder.add_edge(Arc::new(FewShotTranslation::new(
                    Arc::clone(from_lang),
                    Arc::clone(to_lang),
                    Arc::clone(&language_model),
                )));
            }
        }

        builder.add_identity_edges();
        let graph = builder.finish();

        info!(
            "Built few-shot translation graph: {} languages",
            graph.nodes.len()
        );
        graph
    }

    /// Languages in the graph: English first when installed, the rest
    /// sorted by display name
    pub fn installed_languages(&self) -> Vec<Arc<Language>> {
        self.nodes
            .iter()
            .map(|node| Arc::clone(&node.language))
            .collect()
    }

    /// Look up a language by code
    pub fn language(&self, code: &str) -> Option<Arc<Language>> {
        self.index
            .get(code)
            .map(|&i| Arc::clone(&self.nodes[i].language))
    }

    /// The translation between two languages, if any path exists
    ///
    /// After closure this succeeds for every connected pair, including every
    /// self-pair. The first matching edge in append order wins.
    pub fn get_translation(&self, from: &Language, to: &Language) -> Option<Arc<dyn Translation>> {
        let &from_index = self.index.get(from.code())?;
        self.nodes[from_index]
            .translations_from
            .iter()
            .find(|edge| edge.to_lang().code() == to.code())
            .cloned()
    }

    /// The translation between two language codes, as an error when absent
    pub fn translation_from_codes(
        &self,
        from_code: &str,
        to_code: &str,
    ) -> Result<Arc<dyn Translation>, TranslateError> {
        let from = self
            .language(from_code)
            .ok_or_else(|| TranslateError::unsupported(from_code, to_code))?;
        let to = self
            .language(to_code)
            .ok_or_else(|| TranslateError::unsupported(from_code, to_code))?;
        self.get_translation(&from, &to)
            .ok_or_else(|| TranslateError::unsupported(from_code, to_code))
    }

    /// Translate text between two language codes
    pub fn translate(
        &self,
        input_text: &str,
        from_code: &str,
        to_code: &str,
    ) -> Result<String, TranslateError> {
        self.translation_from_codes(from_code, to_code)?
            .translate(input_text)
    }
}

/// Mutable graph state during the build; frozen into a `LanguageGraph`
struct GraphBuilder {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Get or create the language node for a code, in insertion order
    fn language(&mut self, code: &str, name: &str) -> Arc<Language> {
        if let Some(&i) = self.index.get(code) {
            return Arc::clone(&self.nodes[i].language);
        }
        let language = Arc::new(Language::new(code, name));
        self.index.insert(code.to_string(), self.nodes.len());
        self.nodes.push(Node {
            language: Arc::clone(&language),
            translations_from: Vec::new(),
        });
        language
    }

    /// Append an edge to its source node's adjacency list
    fn add_edge(&mut self, edge: Arc<dyn Translation>) {
        let from_index = self.index[edge.from_lang().code()];
        self.nodes[from_index].translations_from.push(edge);
    }

    /// Give every known language a self-edge
    ///
    /// Runs after all direct edges exist, so languages that only ever
    /// appear as a destination get one too.
    fn add_identity_edges(&mut self) {
        for node in &mut self.nodes {
            node.translations_from
                .push(Arc::new(IdentityTranslation::new(Arc::clone(
                    &node.language,
                ))));
        }
    }

    /// Close the graph under pivot composition, returning the number of
    /// synthesized edges
    ///
    /// Standard transitive closure by relaxation: for every edge L -> M and
    /// every edge M -> N, add a composite L -> N unless L already reaches N.
    /// The scan follows insertion order for nodes and append order for
    /// edges, so when several pivot paths reach the same destination the
    /// first one discovered wins, reproducibly for a given package order.
    fn close_under_composition(&mut self) -> usize {
        let mut synthesized = 0usize;

        for node_index in 0..self.nodes.len() {
            let mut keep_adding = true;
            while keep_adding {
                keep_adding = false;

                let mut edge_index = 0;
                // The adjacency list grows while we scan it; newly added
                // composites are themselves considered as first hops.
                while edge_index < self.nodes[node_index].translations_from.len() {
                    let first = Arc::clone(&self.nodes[node_index].translations_from[edge_index]);
                    let mid_index = self.index[first.to_lang().code()];
                    let second_edges: Vec<Arc<dyn Translation>> =
                        self.nodes[mid_index].translations_from.to_vec();

                    for second in second_edges {
                        let destination = second.to_lang().code();
                        if !self.has_edge(node_index, destination) {
                            keep_adding = true;
                            synthesized += 1;
                            self.nodes[node_index].translations_from.push(Arc::new(
                                CompositeTranslation::new(Arc::clone(&first), second),
                            ));
                        }
                    }

                    edge_index += 1;
                }
            }
        }

        synthesized
    }

    fn has_edge(&self, from_index: usize, to_code: &str) -> bool {
        self.nodes[from_index]
            .translations_from
            .iter()
            .any(|edge| edge.to_lang().code() == to_code)
    }

    /// Freeze the graph, sorting nodes into presentation order
    fn finish(mut self) -> LanguageGraph {
        // English first so it shows up as the default source language;
        // everything else by display name. Presentation only, the edges
        // are already fixed.
        self.nodes.sort_by(|a, b| {
            let a_en = a.language.code() == "en";
            let b_en = b.language.code() == "en";
            b_en.cmp(&a_en)
                .then_with(|| a.language.name().cmp(b.language.name()))
        });

        let index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.language.code().to_string(), i))
            .collect();

        LanguageGraph {
            nodes: self.nodes,
            index,
        }
    }
}

/// Scan the configured packages directory and list the languages a graph
/// built over it would hold
///
/// Convenience for pickers that only need the language list; building the
/// graph is cheap because engines load lazily.
pub fn installed_languages(
    config: &TranslateConfig,
    loader: Arc<dyn EngineLoader>,
) -> Vec<Arc<Language>> {
    LanguageGraph::from_installed(config, loader).installed_languages()
}

/// Build the probe translation over a boundary-detection package
fn sbd_probe_translation(
    package: Package,
    loader: Arc<dyn EngineLoader>,
    device: Device,
) -> Arc<dyn Translation> {
    let from_lang = Arc::new(Language::new(
        package.from_code().unwrap_or("sbd"),
        package.from_name(),
    ));
    let to_lang = Arc::new(Language::new(
        package.to_code().unwrap_or("sbd"),
        package.to_name(),
    ));
    Arc::new(ModelTranslation::new(
        from_lang, to_lang, package, loader, device,
    ))
}
