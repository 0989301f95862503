//! Prompt composition.
//!
//! Two prompt kinds share the model client: the summary prompt renders a
//! whole [`InsightBundle`], the question prompt passes user text through
//! untouched.

use crate::insight::InsightBundle;
use crate::reporting::{render_correlations, render_describe, render_missing};

const SUMMARY_INSTRUCTION: &str = "You are a data analyst. A user has uploaded the CSV file \
described below. Using the sample rows and the initial findings:\n\
1. Explain what the dataset is most likely about.\n\
2. Propose 3 analysis or modeling tasks that would suit it.";

const SUMMARY_FOOTER: &str = "Answer in Markdown.";

/// Section headings of the summary prompt, in order.
pub const SUMMARY_SECTIONS: [&str; 4] = [
    "--- Sample Data ---",
    "--- Summary Statistics ---",
    "--- Top Correlations ---",
    "--- Missing Value Overview ---",
];

/// Builds prompt text for the model client.
pub struct PromptComposer;

impl PromptComposer {
    /// Render a bundle into the summary prompt.
    ///
    /// Sections always appear in the same order; an empty correlation list
    /// or missing report renders as its literal marker.
    pub fn summary(bundle: &InsightBundle) -> String {
        let bodies = [
            bundle.sample.csv.clone(),
            render_describe(&bundle.profiles),
            render_correlations(&bundle.top_correlations),
            render_missing(&bundle.missing),
        ];

        let mut prompt = String::from(SUMMARY_INSTRUCTION);
        prompt.push_str("\n\n");
        for (heading, body) in SUMMARY_SECTIONS.iter().zip(bodies) {
            prompt.push_str(heading);
            prompt.push('\n');
            prompt.push_str(body.trim_end());
            prompt.push_str("\n\n");
        }
        prompt.push_str(SUMMARY_FOOTER);
        prompt
    }

    /// The question prompt is the question itself.
    pub fn question(question: &str) -> String {
        question.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::{NO_CORRELATIONS, NO_MISSING_VALUES};
    use crate::types::{
        CategoricalSummary, ColumnKind, ColumnProfile, ColumnStatistics, CorrelationPair,
        MissingEntry, MissingReport, SampleRows,
    };

    fn bundle() -> InsightBundle {
        InsightBundle {
            sample: SampleRows {
                header: vec!["city".to_string()],
                rows: vec![vec![Some("Oslo".to_string())], vec![None]],
                csv: "city\nOslo\n\n".to_string(),
            },
            profiles: vec![ColumnProfile {
                name: "city".to_string(),
                kind: ColumnKind::NonNumeric,
                missing_count: 1,
                statistics: ColumnStatistics::Categorical(CategoricalSummary {
                    count: 1,
                    unique: 1,
                    top: Some("Oslo".to_string()),
                    freq: Some(1),
                }),
            }],
            missing: MissingReport::default(),
            top_correlations: Vec::new(),
            target: None,
        }
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let prompt = PromptComposer::summary(&bundle());

        let positions: Vec<usize> = SUMMARY_SECTIONS
            .iter()
            .map(|heading| prompt.find(heading).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.starts_with("You are a data analyst."));
        assert!(prompt.ends_with("Answer in Markdown."));
    }

    #[test]
    fn test_empty_parts_render_markers() {
        let prompt = PromptComposer::summary(&bundle());

        let correlations = prompt.find(SUMMARY_SECTIONS[2]).unwrap();
        let missing = prompt.find(SUMMARY_SECTIONS[3]).unwrap();
        assert!(prompt[correlations..missing].contains(NO_CORRELATIONS));
        assert!(prompt[missing..].contains(NO_MISSING_VALUES));
    }

    #[test]
    fn test_populated_parts() {
        let mut bundle = bundle();
        bundle.top_correlations.push(CorrelationPair {
            left: "a".to_string(),
            right: "b".to_string(),
            strength: 1.0,
        });
        bundle.missing.entries.push(MissingEntry {
            column: "city".to_string(),
            count: 1,
        });
        let prompt = PromptComposer::summary(&bundle);

        assert!(prompt.contains("a vs b: 1.000"));
        assert!(prompt.contains("city: 1"));
        assert!(prompt.contains("city\nOslo\n\n"));
    }

    #[test]
    fn test_question_is_verbatim() {
        let question = "  Which column predicts survival best?\n";
        assert_eq!(PromptComposer::question(question), question);
    }
}
