use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::tokenizer::tokenize;

pub type DocId = u32;

const K1: f32 = 1.2;
const B: f32 = 0.75;

/// A query term matching the document's name is a stronger relevance signal
/// than one incidentally present in body text.
const FILENAME_BOOST: f32 = 2.0;
const CONTENT_BOOST: f32 = 1.0;

/// One extracted documentation page: its archive-relative name and its text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
}

/// Per-field statistics: postings in document insertion order, per-document
/// token counts, and the average field length the scorer normalizes against.
#[derive(Debug, Default)]
struct FieldIndex {
    postings: HashMap<String, Vec<(DocId, u32)>>,
    lengths: Vec<u32>,
    avg_len: f32,
}

impl FieldIndex {
    fn add(&mut self, doc_id: DocId, text: &str) {
        let terms = tokenize(text);
        self.lengths.push(terms.len() as u32);
        let mut tf: HashMap<String, u32> = HashMap::new();
        for term in terms {
            *tf.entry(term).or_insert(0) += 1;
        }
        for (term, count) in tf {
            self.postings.entry(term).or_default().push((doc_id, count));
        }
    }

    fn finish(&mut self) {
        let total: u64 = self.lengths.iter().map(|&l| u64::from(l)).sum();
        self.avg_len = if self.lengths.is_empty() {
            0.0
        } else {
            total as f32 / self.lengths.len() as f32
        };
        // Posting lists are appended doc-by-doc, so each is already sorted by
        // DocId; normalize anyway so iteration order never depends on map order.
        for plist in self.postings.values_mut() {
            plist.sort_by_key(|&(doc_id, _)| doc_id);
        }
    }

    fn score_into(&self, terms: &[String], boost: f32, scores: &mut HashMap<DocId, f32>) {
        let n = self.lengths.len() as f32;
        let mut seen: HashSet<&str> = HashSet::new();
        for term in terms {
            if !seen.insert(term.as_str()) {
                continue;
            }
            let Some(plist) = self.postings.get(term.as_str()) else {
                continue;
            };
            let df = plist.len() as f32;
            let idf = ((n - df + 0.5) / (df + 0.5)).ln_1p().max(0.0);
            for &(doc_id, tf) in plist {
                let tf = tf as f32;
                let len = self.lengths[doc_id as usize] as f32;
                let len_norm = 1.0 - B + B * len / self.avg_len.max(1.0);
                let contrib = idf * (tf * (K1 + 1.0)) / (tf + K1 * len_norm);
                *scores.entry(doc_id).or_insert(0.0) += boost * contrib;
            }
        }
    }
}

/// In-memory ranked keyword index over a fixed document collection.
///
/// Both fields (content and filename) participate in free-text scoring;
/// there are no exact-match filter fields. Construction is one-shot: the
/// index is read-only afterwards, and rebuilding means building a new value.
#[derive(Debug)]
pub struct SearchIndex {
    docs: Vec<Document>,
    content: FieldIndex,
    filename: FieldIndex,
}

impl SearchIndex {
    /// Build the index from the full document collection in one batch pass.
    pub fn build(docs: Vec<Document>) -> Self {
        let mut content = FieldIndex::default();
        let mut filename = FieldIndex::default();
        for (i, doc) in docs.iter().enumerate() {
            let doc_id = i as DocId;
            content.add(doc_id, &doc.content);
            filename.add(doc_id, &doc.filename);
        }
        content.finish();
        filename.finish();
        tracing::debug!(
            num_docs = docs.len(),
            content_terms = content.postings.len(),
            filename_terms = filename.postings.len(),
            "search index built"
        );
        Self {
            docs,
            content,
            filename,
        }
    }

    /// Rank documents against a free-text query and return the top `limit`.
    ///
    /// Each field's BM25 contribution is multiplied by its boost and the two
    /// are summed per document. Zero-score documents are not matches. Ties
    /// are broken by ascending DocId, i.e. original insertion order, so an
    /// identical query against an unchanged index always returns the same
    /// ordered list. A query with no indexable terms yields an empty list.
    pub fn query(&self, text: &str, limit: usize) -> Vec<SearchHit> {
        let terms = tokenize(text);
        let mut scores: HashMap<DocId, f32> = HashMap::new();
        self.filename.score_into(&terms, FILENAME_BOOST, &mut scores);
        self.content.score_into(&terms, CONTENT_BOOST, &mut scores);

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter(|&(_, score)| score > 0.0)
            .map(|(doc_id, score)| SearchHit { doc_id, score })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.doc_id.cmp(&b.doc_id))
        });
        hits.truncate(limit);
        hits
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(doc_id as usize)
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }
}
