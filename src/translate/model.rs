/*!
 * Translation backed by an installed package's model.
 *
 * `ModelTranslation` drives the full per-paragraph pipeline: sentence
 * segmentation, tokenization, one batched inference call, and per-rank
 * reassembly. The engine bundle is opened lazily on first use so building
 * a graph over many packages does not load every model eagerly.
 */

use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use crate::config::Device;
use crate::engine::{EngineLoader, InferenceOptions, LoadedEngine};
use crate::errors::TranslateError;
use crate::package::{Package, PackageKind};
use crate::translate::chunk;
use crate::translate::core::{
    combine_paragraph_hypotheses, split_paragraphs, Language, Translation,
};
use crate::translate::hypothesis::Hypothesis;
use crate::translate::sbd;

/// Maximum inputs per engine batch
const BATCH_SIZE: usize = 32;

/// Minimum beam width; a beam wider than the hypothesis count is needed to
/// produce distinct-enough candidates
const MIN_BEAM_SIZE: usize = 4;

/// Small positive bias toward longer outputs, preventing premature
/// truncation
const LENGTH_PENALTY: f32 = 0.2;

/// A direct translation provided by one installed package
pub struct ModelTranslation {
    from_lang: Arc<Language>,
    to_lang: Arc<Language>,
    package: Package,
    loader: Arc<dyn EngineLoader>,
    device: Device,
    sbd_probe: Option<Arc<dyn Translation>>,
    engine: OnceCell<LoadedEngine>,
}

impl ModelTranslation {
    /// Create a translation over a package; the engine loads on first call
    pub fn new(
        from_lang: Arc<Language>,
        to_lang: Arc<Language>,
        package: Package,
        loader: Arc<dyn EngineLoader>,
        device: Device,
    ) -> Self {
        Self {
            from_lang,
            to_lang,
            package,
            loader,
            device,
            sbd_probe: None,
            engine: OnceCell::new(),
        }
    }

    /// Attach a sentence-boundary probe used when the package bundles no
    /// sentence splitter
    pub fn with_sbd_probe(mut self, probe: Arc<dyn Translation>) -> Self {
        self.sbd_probe = Some(probe);
        self
    }

    fn engine(&self) -> Result<&LoadedEngine, TranslateError> {
        self.engine.get_or_try_init(|| {
            debug!(
                "Loading model for package {} ({} -> {}) on {}",
                self.package.label(),
                self.from_lang.code(),
                self.to_lang.code(),
                self.device
            );
            self.loader.load(&self.package, self.device)
        })
    }

    /// Split one paragraph into sentence-sized translation units
    fn segment(
        &self,
        engine: &LoadedEngine,
        paragraph: &str,
    ) -> Result<Vec<String>, TranslateError> {
        // Boundary-probe packages translate their whole input as one unit;
        // segmenting them would recurse.
        if self.package.kind() == PackageKind::Sbd {
            return Ok(vec![paragraph.to_string()]);
        }

        if let Some(splitter) = &engine.splitter {
            return Ok(splitter.split(paragraph));
        }

        if let Some(probe) = &self.sbd_probe {
            return chunk::chunk(paragraph, |tail| {
                sbd::probe_sentence_boundary(tail, probe.as_ref())
            });
        }

        // No segmentation available at all
        Ok(vec![paragraph.to_string()])
    }

    /// Run the segment/tokenize/translate/reassemble pipeline on one
    /// paragraph
    fn translate_paragraph(
        &self,
        engine: &LoadedEngine,
        paragraph: &str,
        num_hypotheses: usize,
    ) -> Result<Vec<Hypothesis>, TranslateError> {
        let sentences = self.segment(engine, paragraph)?;
        if sentences.is_empty() {
            return Ok(vec![Hypothesis::new("", 0.0); num_hypotheses]);
        }

        let tokenized = sentences
            .iter()
            .map(|sentence| engine.tokenizer.encode(sentence))
            .collect::<Result<Vec<_>, _>>()?;

        let target_prefix = self.package.target_prefix();
        let options = InferenceOptions {
            num_hypotheses,
            beam_size: num_hypotheses.max(MIN_BEAM_SIZE),
            length_penalty: LENGTH_PENALTY,
            max_batch_size: BATCH_SIZE,
            replace_unknowns: true,
            target_prefix: (!target_prefix.is_empty()).then(|| target_prefix.to_string()),
        };

        let translated_batches = engine.engine.translate_batch(&tokenized, &options)?;
        if translated_batches.len() != tokenized.len() {
            return Err(TranslateError::Inference(format!(
                "engine returned {} outputs for {} inputs",
                translated_batches.len(),
                tokenized.len()
            )));
        }

        let mut hypotheses = Vec::with_capacity(num_hypotheses);
        for rank in 0..num_hypotheses {
            let mut tokens = Vec::new();
            let mut score = 0.0;
            for batch in &translated_batches {
                let ranked = batch.get(rank).ok_or_else(|| {
                    TranslateError::Inference(format!(
                        "engine returned fewer than {} hypotheses",
                        num_hypotheses
                    ))
                })?;
                tokens.extend(ranked.tokens.iter().cloned());
                score += ranked.score;
            }

            let mut value = engine.tokenizer.decode(tokens)?;

            if !target_prefix.is_empty() {
                if let Some(stripped) = value.strip_prefix(target_prefix) {
                    value = stripped.to_string();
                }
            }

            // Sub-word detokenization leaves one leading space artifact
            if let Some(stripped) = value.strip_prefix(' ') {
                value = stripped.to_string();
            }

            hypotheses.push(Hypothesis::new(value, score));
        }

        Ok(hypotheses)
    }
}

impl Translation for ModelTranslation {
    fn from_lang(&self) -> &Language {
        &self.from_lang
    }

    fn to_lang(&self) -> &Language {
        &self.to_lang
    }

    fn hypotheses(
        &self,
        input_text: &str,
        num_hypotheses: usize,
    ) -> Result<Vec<Hypothesis>, TranslateError> {
        let engine = self.engine()?;

        let paragraphs = split_paragraphs(input_text);
        let mut translated_paragraphs = Vec::with_capacity(paragraphs.len());
        for paragraph in paragraphs {
            translated_paragraphs.push(self.translate_paragraph(engine, paragraph, num_hypotheses)?);
        }

        Ok(combine_paragraph_hypotheses(
            &translated_paragraphs,
            num_hypotheses,
        ))
    }
}
