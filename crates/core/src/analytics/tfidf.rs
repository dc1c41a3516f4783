use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use tf_idf_vectorizer::{TokenFrequency, ZeroSpVec};

/// Common English function words dropped before weighting.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

pub fn is_stop_word(token: &str) -> bool {
    stop_words().contains(token)
}

/// Lowercased word tokens of two or more characters, stop words removed.
pub fn tokenize(document: &str) -> Vec<String> {
    document
        .split(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
        .filter(|token| !is_stop_word(token))
        .collect()
}

/// Term-frequency / inverse-document-frequency matrix fitted over a corpus.
///
/// Raw term counts, smoothed idf `ln((1 + n) / (1 + df)) + 1`, rows L2-normalised.
/// Terms are indexed in order of first appearance across the corpus.
#[derive(Debug)]
pub struct TfidfMatrix {
    document_frequency: TokenFrequency,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<ZeroSpVec<f64>>,
}

impl TfidfMatrix {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let term_counts: Vec<TokenFrequency> = documents
            .iter()
            .map(|document| {
                let mut counts = TokenFrequency::new();
                counts.add_tokens(tokenize(document.as_ref()).as_slice());
                counts
            })
            .collect();

        let mut document_frequency = TokenFrequency::new();
        for counts in &term_counts {
            document_frequency.add_tokens(counts.token_set_ref_str().as_slice());
        }

        let vocabulary: HashMap<String, usize> = document_frequency
            .token_set()
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();

        let total = term_counts.len() as f64;
        let idf: Vec<f64> = document_frequency
            .token_count_vector_ref_str()
            .into_iter()
            .map(|(_, df)| ((1.0 + total) / (1.0 + f64::from(df))).ln() + 1.0)
            .collect();

        let rows = term_counts
            .iter()
            .map(|counts| weighted_row(counts, &vocabulary, &idf))
            .collect();

        Self { document_frequency, vocabulary, idf, rows }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.document_frequency.token_num()
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.document_frequency.token_count(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|index| self.idf[*index])
    }

    pub fn row(&self, index: usize) -> Option<&ZeroSpVec<f64>> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[ZeroSpVec<f64>] {
        &self.rows
    }

    /// Similarity of row `index` against every row, in row order.
    ///
    /// Rows are unit length, so the dot product is the cosine. Zero rows score 0.
    pub fn cosine_against_all(&self, index: usize) -> Vec<f64> {
        match self.rows.get(index) {
            Some(query) => {
                self.rows.iter().map(|row| query.dot::<f64>(row).clamp(0.0, 1.0)).collect()
            }
            None => Vec::new(),
        }
    }
}

fn weighted_row(
    counts: &TokenFrequency,
    vocabulary: &HashMap<String, usize>,
    idf: &[f64],
) -> ZeroSpVec<f64> {
    let mut entries: Vec<(usize, f64)> = counts
        .token_count_vector_ref_str()
        .into_iter()
        .filter_map(|(term, count)| {
            vocabulary.get(term).map(|index| (*index, f64::from(count) * idf[*index]))
        })
        .collect();
    entries.sort_by_key(|(index, _)| *index);

    let norm = entries.iter().map(|(_, weight)| weight * weight).sum::<f64>().sqrt();

    // ZeroSpVec releases its buffer on drop, so it must never be left unallocated.
    let mut row = ZeroSpVec::with_capacity(entries.len().max(1));
    for (index, weight) in entries {
        row.add_dim(index - row.len());
        row.push(weight / norm);
    }
    row.add_dim(vocabulary.len() - row.len());
    row
}

#[cfg(test)]
mod tests {
    use super::{is_stop_word, tokenize, TfidfMatrix};

    #[test]
    fn tokenizer_drops_short_tokens_and_stop_words() {
        assert_eq!(tokenize("Whole Milk & 2% the Best"), vec!["milk", "best"]);
        assert_eq!(tokenize("snacks_chips  b"), vec!["snacks_chips"]);
        assert!(is_stop_word("whole"));
        assert!(!is_stop_word("banana"));
    }

    #[test]
    fn rows_are_unit_length_and_self_similarity_is_one() {
        let matrix = TfidfMatrix::fit(&[
            "banana fresh fruits produce",
            "organic banana fresh fruits produce",
            "whole milk milk dairy eggs",
        ]);

        for index in 0..3 {
            let norm: f64 = matrix.row(index).map(|row| row.norm_sq::<f64>()).unwrap_or_default();
            assert!((norm - 1.0).abs() < 1e-9);
            assert_eq!(matrix.row(index).map(|row| row.len()), Some(matrix.vocabulary_len()));
            assert!((matrix.cosine_against_all(index)[index] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn shared_terms_raise_similarity() {
        let matrix = TfidfMatrix::fit(&[
            "banana fresh fruits produce",
            "organic banana fresh fruits produce",
            "whole milk milk dairy eggs",
        ]);

        let scores = matrix.cosine_against_all(0);
        assert!(scores[1] > scores[2]);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn smoothed_idf_matches_formula() {
        let matrix = TfidfMatrix::fit(&["apple pie", "apple tart"]);
        let expected_common = (3.0f64 / 3.0).ln() + 1.0;
        let expected_rare = (3.0f64 / 2.0).ln() + 1.0;

        assert_eq!(matrix.vocabulary_len(), 3);
        assert_eq!(matrix.document_frequency("apple"), 2);
        assert!((matrix.idf("apple").unwrap_or_default() - expected_common).abs() < 1e-12);
        assert!((matrix.idf("pie").unwrap_or_default() - expected_rare).abs() < 1e-12);
    }

    #[test]
    fn repeated_terms_count_once_per_document_for_idf() {
        let matrix = TfidfMatrix::fit(&["milk milk milk", "milk bread"]);

        assert_eq!(matrix.document_frequency("milk"), 2);
        assert!((matrix.idf("milk").unwrap_or_default() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stop_word_only_document_is_a_zero_row() {
        let matrix = TfidfMatrix::fit(&["the and of", "banana"]);
        assert!(matrix.row(0).is_some_and(|row| row.nnz() == 0));
        assert_eq!(matrix.cosine_against_all(0), vec![0.0, 0.0]);
    }

    #[test]
    fn corpus_of_stop_words_has_no_vocabulary() {
        let matrix = TfidfMatrix::fit(&["the", "and of"]);
        assert_eq!(matrix.vocabulary_len(), 0);
        assert_eq!(matrix.cosine_against_all(1), vec![0.0, 0.0]);
    }
}
