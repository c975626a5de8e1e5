//! Raw record → [`Poem`] normalization

use crate::models::{fingerprint, Poem, RawPoem};
use crate::services::script_converter::ScriptConverter;
use shici_common::config::PlaceholderConfig;

/// Applies placeholders, script conversion and blank-line removal
#[derive(Debug, Clone)]
pub struct Normalizer {
    converter: ScriptConverter,
    placeholders: PlaceholderConfig,
}

impl Normalizer {
    pub fn new(converter: ScriptConverter, placeholders: PlaceholderConfig) -> Self {
        Self {
            converter,
            placeholders,
        }
    }

    pub fn converter(&self) -> &ScriptConverter {
        &self.converter
    }

    /// Normalize one record, giving it `id`
    pub fn normalize(&self, raw: &RawPoem, id: usize) -> Poem {
        let title = self
            .converter
            .convert(raw.title.as_deref().unwrap_or(&self.placeholders.title));
        let author = self
            .converter
            .convert(raw.author.as_deref().unwrap_or(&self.placeholders.author));

        // Blank check happens after conversion; conversion never produces whitespace
        let paragraphs: Vec<String> = raw
            .paragraphs
            .iter()
            .flatten()
            .map(|p| self.converter.convert(p))
            .filter(|p| !p.trim().is_empty())
            .collect();

        let tags = raw
            .tags
            .iter()
            .flatten()
            .map(|t| self.converter.convert(t))
            .collect();

        let fingerprint = fingerprint(&title, &author, &paragraphs);

        Poem {
            id,
            title,
            author,
            paragraphs,
            tags,
            fingerprint,
        }
    }

    /// Normalize a whole shard; ids continue from `first_id`
    pub fn normalize_shard(&self, records: &[RawPoem], first_id: usize) -> Vec<Poem> {
        records
            .iter()
            .enumerate()
            .map(|(offset, raw)| self.normalize(raw, first_id + offset))
            .collect()
    }
}

/// Renumber a merged sequence so ids equal positions
pub fn assign_ids(poems: &mut [Poem]) {
    for (index, poem) in poems.iter_mut().enumerate() {
        poem.id = index;
    }
}
