/*!
 * The translation graph and composition engine.
 *
 * This module contains the core translation machinery, split into several
 * submodules:
 *
 * - `hypothesis`: Scored candidate outputs
 * - `core`: The `Translation` trait, languages, identity and composite
 *   translations, paragraph helpers
 * - `cache`: Paragraph-level memoizing decorator
 * - `model`: Translation backed by an installed package's model
 * - `remote`: Translation delegated to a remote HTTP service
 * - `fewshot`: Translation via few-shot prompting of a language model
 * - `chunk`: Heuristic sentence chunking
 * - `sbd`: Sentence-boundary probes for the chunker
 * - `graph`: Graph construction, closure, and lookups
 */

// Re-export main types for easier usage
pub use self::cache::CachedTranslation;
pub use self::core::{
    combine_paragraph_hypotheses, split_paragraphs, CompositeTranslation, IdentityTranslation,
    Language, Translation,
};
pub use self::fewshot::FewShotTranslation;
pub use self::graph::{installed_languages, LanguageGraph};
pub use self::hypothesis::Hypothesis;
pub use self::model::ModelTranslation;
pub use self::remote::RemoteTranslation;

// Submodules
pub mod cache;
pub mod chunk;
pub mod core;
pub mod fewshot;
pub mod graph;
pub mod hypothesis;
pub mod model;
pub mod remote;
pub mod sbd;
