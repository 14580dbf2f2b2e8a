use indexmap::IndexMap;

/// Splits text into lowercase ingredient terms
///
/// Terms are maximal runs of alphanumeric characters, so commas, whitespace
/// and punctuation all act as separators. The same function is applied to
/// corpus rows at build time and to queries at match time; scores are only
/// comparable because both sides share this preprocessing.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Immutable TF-IDF index over the recipe corpus
///
/// Built exactly once at startup. Every corpus row gets a sparse,
/// L2-normalized weight vector; dimensionality equals the learned vocabulary
/// size. Safe for unsynchronized concurrent reads.
#[derive(Debug)]
pub struct TfIdfIndex {
    /// Distinct terms in first-seen order, term -> dimension
    vocabulary: IndexMap<String, usize>,
    /// Smoothed inverse document frequency per dimension
    idf: Vec<f32>,
    /// One sparse unit-length vector per corpus row, sorted by dimension
    rows: Vec<Vec<(usize, f32)>>,
}

impl TfIdfIndex {
    /// Builds the index from pre-tokenized documents
    ///
    /// IDF uses the smoothed form `ln((1 + n) / (1 + df)) + 1`, which never
    /// divides by zero and keeps a positive weight for terms present in
    /// every document. Row weights are raw term count times IDF, then
    /// L2-normalized so a plain dot product is cosine similarity.
    pub fn build(documents: &[Vec<String>]) -> Self {
        let mut vocabulary: IndexMap<String, usize> = IndexMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();

        for tokens in documents {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokens {
                let dim = *vocabulary.entry(token.clone()).or_insert_with(|| {
                    doc_freq.push(0);
                    doc_freq.len() - 1
                });
                if !seen.contains(&dim) {
                    seen.push(dim);
                    doc_freq[dim] += 1;
                }
            }
        }

        let n = documents.len() as f32;
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let rows = documents
            .iter()
            .map(|tokens| Self::weigh(tokens, &vocabulary, &idf))
            .collect();

        Self {
            vocabulary,
            idf,
            rows,
        }
    }

    /// Number of distinct terms learned from the corpus
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of indexed corpus rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when no term was learned, so no query can ever match
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Projects query tokens into the learned vocabulary space
    ///
    /// Terms absent from the vocabulary contribute nothing; an all-unknown
    /// query yields an empty vector, not an error.
    pub fn encode(&self, tokens: &[String]) -> Vec<(usize, f32)> {
        Self::weigh(tokens, &self.vocabulary, &self.idf)
    }

    /// Cosine similarity of an encoded query against every corpus row
    pub fn scores(&self, query: &[(usize, f32)]) -> Vec<f32> {
        self.rows
            .iter()
            .map(|row| sparse_dot(query, row))
            .collect()
    }

    fn weigh(
        tokens: &[String],
        vocabulary: &IndexMap<String, usize>,
        idf: &[f32],
    ) -> Vec<(usize, f32)> {
        let mut weights: Vec<(usize, f32)> = Vec::new();
        for token in tokens {
            if let Some(&dim) = vocabulary.get(token) {
                match weights.iter_mut().find(|(d, _)| *d == dim) {
                    Some((_, w)) => *w += idf[dim],
                    None => weights.push((dim, idf[dim])),
                }
            }
        }
        weights.sort_unstable_by_key(|&(dim, _)| dim);

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weights {
                *w /= norm;
            }
        }
        weights
    }
}

/// Dot product of two sparse vectors sorted by dimension
fn sparse_dot(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let mut sum = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
