//! Canned replies and templated competency reports.
//!
//! Nothing here is inference: plain mode picks a sentence from a fixed pool
//! (keyword-triggered pools first), evaluation mode fills a fixed report
//! skeleton. All randomness comes from the injected [`StdRng`] so a seeded
//! generator is fully reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::services::catalog::{
    contains_any, Competency, ACHIEVEMENTS, ACHIEVEMENT_BRANCHES, ADVICE_TOPICS, CATALOG,
    DEFAULT_PAIR, GENERIC_REPLIES, KEYWORD_REPLIES, KEYWORD_RULES, SHARING_NOTE, SITUATIONS,
    TURNING_POINTS, TURNING_POINT_BRANCHES,
};
use crate::services::variant::{EvaluationStyle, VariantProfile};

/// Upper bound on competencies listed in one report.
pub const MAX_COMPETENCIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Plain,
    Evaluation,
}

impl Mode {
    pub fn is_evaluation(self) -> bool {
        matches!(self, Mode::Evaluation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessedCompetency {
    pub competency: Competency,
    pub detail: String,
    /// 3..=5, only for the scored report.
    pub score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub competencies: Vec<AssessedCompetency>,
    pub report: String,
}

pub struct ResponseGenerator {
    profile: VariantProfile,
    rng: StdRng,
}

impl ResponseGenerator {
    pub fn new(profile: VariantProfile, rng: StdRng) -> Self {
        Self { profile, rng }
    }

    pub fn seeded(profile: VariantProfile, seed: u64) -> Self {
        Self::new(profile, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(profile: VariantProfile) -> Self {
        Self::new(profile, StdRng::from_entropy())
    }

    pub fn respond(&mut self, input: &str, mode: Mode) -> String {
        match mode {
            Mode::Plain => self.plain(input),
            Mode::Evaluation => self.evaluate(input).report,
        }
    }

    pub fn plain(&mut self, input: &str) -> String {
        if self.profile.keyword_replies {
            let lowered = input.to_lowercase();
            if let Some((_, reply)) = KEYWORD_REPLIES
                .iter()
                .find(|(words, _)| contains_any(&lowered, words))
            {
                return (*reply).to_string();
            }
        }

        let pool = &GENERIC_REPLIES[..self.profile.generic_pool_size.min(GENERIC_REPLIES.len())];
        pool.choose(&mut self.rng)
            .copied()
            .unwrap_or(GENERIC_REPLIES[0])
            .to_string()
    }

    pub fn evaluate(&mut self, input: &str) -> Evaluation {
        match self.profile.evaluation {
            EvaluationStyle::Scored => self.scored_report(),
            EvaluationStyle::Sampled => self.sampled_report(),
            EvaluationStyle::KeywordMatched => self.keyword_report(input),
        }
    }

    // ============================================
    // Scored: three random competencies with stars
    // ============================================
    fn scored_report(&mut self) -> Evaluation {
        let mut pool = CATALOG;
        pool.shuffle(&mut self.rng);

        let competencies: Vec<AssessedCompetency> = pool
            .iter()
            .take(MAX_COMPETENCIES)
            .map(|&competency| AssessedCompetency {
                competency,
                detail: competency.description().to_string(),
                score: Some(self.rng.gen_range(3..=5)),
            })
            .collect();

        let mut report = String::from("【コンピテンシー評価結果】\n\n");
        report.push_str(
            "入力いただいた内容から、以下のコンピテンシーが特に発揮されていると評価されました：\n\n",
        );
        for assessed in &competencies {
            let score = assessed.score.unwrap_or(3);
            report.push_str(&format!(
                "◆ {} {} ({}/5)\n",
                assessed.competency.label_ja(),
                stars(score),
                score
            ));
        }
        report.push_str("\n【総評】\n");
        report.push_str(&format!(
            "今回の授業での学びや気づきから、特に「{}」と「{}」が高く評価されます。",
            competencies[0].competency.label_ja(),
            competencies[1].competency.label_ja()
        ));
        report.push_str(
            "継続的な学習と振り返りにより、さらなるコンピテンシーの向上が期待されます。\n\n",
        );
        report.push_str("次回も授業での学びを積極的に言語化し、自己成長につなげていきましょう。");

        Evaluation {
            competencies,
            report,
        }
    }

    // ============================================
    // Sampled: 2-4 random competencies, capped
    // ============================================
    fn sampled_report(&mut self) -> Evaluation {
        let wanted = self.rng.gen_range(2..=4);
        let competencies: Vec<AssessedCompetency> = CATALOG
            .choose_multiple(&mut self.rng, wanted)
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .take(MAX_COMPETENCIES)
            .map(|competency| AssessedCompetency {
                competency,
                detail: competency
                    .details()
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or("学習への積極的な取り組みを示した")
                    .to_string(),
                score: None,
            })
            .collect();

        let mut report = String::from("【コンピテンシー評価結果】\n\n");
        report.push_str("①入力いただいた内容から以下のエピソードが分析されます。\n");
        report.push_str("● 成し遂げたこととその達成度\n");
        for line in ACHIEVEMENTS.choose_multiple(&mut self.rng, 2) {
            report.push_str(&format!("- {}。\n", line));
        }
        report.push_str("\n● 成し遂げたことに至るための分岐点\n");
        for line in TURNING_POINTS.choose_multiple(&mut self.rng, 2) {
            report.push_str(&format!("- {}。\n", line));
        }

        report.push_str(
            "\n②入力いただいた内容から、以下のコンピテンシーが特に発揮されていると評価されました\n",
        );
        for (i, assessed) in competencies.iter().enumerate() {
            let prefix = if i == 0 { "1.".to_string() } else { "◆".to_string() };
            report.push_str(&format!(
                "{}({}): {}\n",
                prefix,
                assessed.competency.code(),
                assessed.competency.name()
            ));
            report.push_str(&format!("- {}\n\n", assessed.detail));
        }

        let (topic, advice) = ADVICE_TOPICS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(ADVICE_TOPICS[0]);
        report.push_str("【総評】\n");
        report.push_str(&format!("● {}\n", topic));
        report.push_str(&format!("- {}。\n", advice));
        report.push_str(&format!("- {}", SHARING_NOTE));

        Evaluation {
            competencies,
            report,
        }
    }

    // ============================================
    // Keyword-matched: detection table, default pair
    // ============================================
    fn keyword_report(&mut self, input: &str) -> Evaluation {
        let lowered = input.to_lowercase();
        let competencies = select_by_keywords(&lowered);

        let mut report = String::from("コンピテンシー評価結果\n\n");
        report.push_str("【1】入力内容から以下のエピソードが分析されました。\n");
        report.push_str("● 成し遂げたこととその達成度\n");
        for line in branch_lines(&ACHIEVEMENT_BRANCHES, &lowered) {
            report.push_str(&format!("- {}\n", line));
        }
        report.push_str("\n● 成し遂げたことに至るための分岐点\n");
        for line in branch_lines(&TURNING_POINT_BRANCHES, &lowered) {
            report.push_str(&format!("- {}\n", line));
        }

        report.push_str(
            "\n【2】入力内容から、以下のコンピテンシーが特に発揮されていると評価されました。\n",
        );
        for assessed in &competencies {
            report.push_str(&format!(
                "◆({}): {}\n",
                assessed.competency.code(),
                assessed.competency.name()
            ));
            report.push_str(&format!("- {}\n\n", assessed.detail));
        }

        let situation = SITUATIONS
            .iter()
            .find(|s| s.keywords.is_empty() || contains_any(&lowered, s.keywords))
            .unwrap_or(&SITUATIONS[SITUATIONS.len() - 1]);
        report.push_str("【総評】\n");
        report.push_str(&format!("■{}\n", situation.title));
        report.push_str(&format!("- {}", situation.summary));

        Evaluation {
            competencies,
            report,
        }
    }
}

/// Keyword-set selection: every rule whose set intersects the input, in
/// table order; the default pair when none match; never more than
/// [`MAX_COMPETENCIES`].
pub fn select_by_keywords(lowered_input: &str) -> Vec<AssessedCompetency> {
    let mut selected: Vec<AssessedCompetency> = KEYWORD_RULES
        .iter()
        .filter(|rule| contains_any(lowered_input, rule.keywords))
        .map(|rule| AssessedCompetency {
            competency: rule.competency,
            detail: rule.description.to_string(),
            score: None,
        })
        .collect();

    if selected.is_empty() {
        selected = DEFAULT_PAIR
            .iter()
            .map(|&(competency, detail)| AssessedCompetency {
                competency,
                detail: detail.to_string(),
                score: None,
            })
            .collect();
    }

    selected.truncate(MAX_COMPETENCIES);
    selected
}

fn branch_lines(
    branches: &[(&[&str], [&'static str; 2])],
    lowered_input: &str,
) -> [&'static str; 2] {
    branches
        .iter()
        .find(|(words, _)| words.is_empty() || contains_any(lowered_input, words))
        .map(|(_, lines)| *lines)
        .unwrap_or(branches[branches.len() - 1].1)
}

fn stars(score: u8) -> String {
    let filled = usize::from(score.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
