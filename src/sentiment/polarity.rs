use std::collections::HashMap;
use std::sync::OnceLock;

use super::{words, SentimentScorer};
use crate::models::{ArticleRecord, SentimentScore};

const POLARITY_TSV: &str = include_str!("../../data/polarity.tsv");

const NEGATIONS: &[&str] = &["not", "never", "no", "nor", "without"];
const NEGATION_FACTOR: f64 = -0.5;

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("highly", 1.3),
    ("deeply", 1.3),
    ("so", 1.3),
    ("too", 1.2),
    ("quite", 1.1),
    ("fairly", 0.9),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    polarity: f64,
    subjectivity: f64,
}

static POLARITY: OnceLock<HashMap<&'static str, Entry>> = OnceLock::new();

fn lexicon() -> &'static HashMap<&'static str, Entry> {
    POLARITY.get_or_init(|| {
        POLARITY_TSV
            .lines()
            .filter_map(|line| {
                let mut fields = line.split('\t');
                let word = fields.next()?.trim();
                let polarity = fields.next()?.trim().parse().ok()?;
                let subjectivity = fields.next()?.trim().parse().ok()?;
                Some((word, Entry { polarity, subjectivity }))
            })
            .collect()
    })
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

fn intensity(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, factor)| *factor)
}

/// Averages adjective polarity and subjectivity over the description.
///
/// An intensifier scales the next lexicon word; a negation directly before a
/// lexicon word (or before its intensifier) flips and halves its polarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarityScorer;

impl PolarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Returns `(polarity, subjectivity)`, `(0.0, 0.0)` when nothing matched.
    pub fn score_text(&self, text: &str) -> (f64, f64) {
        let lexicon = lexicon();
        let tokens = words(text);

        let mut matched: Vec<Entry> = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let Some(entry) = lexicon.get(token.as_str()) else {
                continue;
            };

            let mut polarity = entry.polarity;
            let mut subjectivity = entry.subjectivity;
            let mut lookback = i;

            if let Some(factor) = i.checked_sub(1).and_then(|p| intensity(&tokens[p])) {
                polarity *= factor;
                subjectivity *= factor;
                lookback -= 1;
            }

            if lookback
                .checked_sub(1)
                .is_some_and(|p| is_negation(&tokens[p]))
            {
                polarity *= NEGATION_FACTOR;
            }

            matched.push(Entry {
                polarity: polarity.clamp(-1.0, 1.0),
                subjectivity: subjectivity.clamp(0.0, 1.0),
            });
        }

        if matched.is_empty() {
            return (0.0, 0.0);
        }

        let n = matched.len() as f64;
        let polarity = matched.iter().map(|e| e.polarity).sum::<f64>() / n;
        let subjectivity = matched.iter().map(|e| e.subjectivity).sum::<f64>() / n;
        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0))
    }
}

impl SentimentScorer for PolarityScorer {
    fn score(&self, record: &ArticleRecord) -> SentimentScore {
        match record.description.as_deref() {
            Some(description) => {
                let (polarity, subjectivity) = self.score_text(description);
                SentimentScore::polarity(polarity, subjectivity)
            }
            None => SentimentScore::missing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_plain_adjectives_average() {
        let (p, s) = PolarityScorer::new().score_text("A good and bad day");
        assert!(approx(p, (0.7 + -0.7) / 2.0));
        assert!(approx(s, (0.6 + 0.67) / 2.0));
    }

    #[test]
    fn test_no_match_is_neutral_objective() {
        assert_eq!(PolarityScorer::new().score_text("Parliament meets on Tuesday"), (0.0, 0.0));
        assert_eq!(PolarityScorer::new().score_text(""), (0.0, 0.0));
    }

    #[test]
    fn test_negation_flips_and_halves() {
        let (p, _) = PolarityScorer::new().score_text("the outlook is not good");
        assert!(approx(p, -0.35));
        let (p, _) = PolarityScorer::new().score_text("the outlook isn't good");
        assert!(approx(p, -0.35));
    }

    #[test]
    fn test_intensifier_scales_and_clamps() {
        let (p, s) = PolarityScorer::new().score_text("very good");
        assert!(approx(p, 0.7 * 1.3));
        assert!(approx(s, 0.6 * 1.3));

        let (p, s) = PolarityScorer::new().score_text("extremely excellent");
        assert!(approx(p, 1.0));
        assert!(approx(s, 1.0));
    }

    #[test]
    fn test_negated_intensifier() {
        let (p, _) = PolarityScorer::new().score_text("not very good");
        assert!(approx(p, 0.7 * 1.3 * NEGATION_FACTOR));
    }

    #[test]
    fn test_ranges_hold() {
        let texts = [
            "worst terrible awful horrible",
            "excellent wonderful best amazing",
            "not bad, not terrible, very very good",
        ];
        for text in texts {
            let (p, s) = PolarityScorer::new().score_text(text);
            assert!((-1.0..=1.0).contains(&p), "{text}: polarity {p}");
            assert!((0.0..=1.0).contains(&s), "{text}: subjectivity {s}");
        }
    }

    #[test]
    fn test_null_description_is_missing() {
        let record = ArticleRecord {
            title: Some("A great title".to_string()),
            description: None,
            ..Default::default()
        };
        let score = PolarityScorer::new().score(&record);
        assert_eq!(score.value, None);
        assert_eq!(score.subjectivity, None);
    }

    #[test]
    fn test_scores_description_not_title() {
        let record = ArticleRecord {
            title: Some("terrible".to_string()),
            description: Some("great".to_string()),
            ..Default::default()
        };
        let score = PolarityScorer::new().score(&record);
        assert!(approx(score.value.unwrap(), 0.8));
        assert!(approx(score.subjectivity.unwrap(), 0.75));
    }
}
