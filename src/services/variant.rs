//! Chat variants: one configurable component instead of three near-identical
//! programs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GENERIC_FAILURE: &str =
    "申し訳ございません。システムエラーが発生しました。しばらく時間をおいてから再度お試しください。";
pub const EVALUATION_FAILURE: &str =
    "申し訳ございません。コンピテンシー評価中にエラーが発生しました。しばらく時間をおいてから再度お試しください。";
pub const BRIEF_FAILURE: &str = "申し訳ございません。システムエラーが発生しました。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Random competencies with star scores, fixed history.
    Basic,
    /// Random competencies with sampled phrase pools.
    Sampled,
    /// Keyword-detected competencies, deletable history.
    #[default]
    Standalone,
}

/// How evaluation mode picks competencies and lays out the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStyle {
    Scored,
    Sampled,
    KeywordMatched,
}

/// Whose name is shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMode {
    MockStudent,
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantProfile {
    pub variant: Variant,
    pub storage_key: &'static str,
    pub id_prefix: &'static str,
    pub evaluation: EvaluationStyle,
    pub keyword_replies: bool,
    pub generic_pool_size: usize,
    pub deletable_history: bool,
    pub identity: IdentityMode,
    pub welcome_note: Option<&'static str>,
    /// Stored as the reply when a plain reply could not be produced.
    pub generic_failure: &'static str,
    /// Stored as the reply when an evaluation could not be produced.
    pub evaluation_failure: &'static str,
}

impl Variant {
    pub fn profile(self) -> VariantProfile {
        match self {
            Variant::Basic => VariantProfile {
                variant: self,
                storage_key: "rai_chat_history",
                id_prefix: "chat_",
                evaluation: EvaluationStyle::Scored,
                keyword_replies: false,
                generic_pool_size: 5,
                deletable_history: false,
                identity: IdentityMode::MockStudent,
                welcome_note: None,
                generic_failure: GENERIC_FAILURE,
                evaluation_failure: EVALUATION_FAILURE,
            },
            Variant::Sampled => VariantProfile {
                variant: self,
                storage_key: "rai_sampled_chat_history",
                id_prefix: "chat_",
                evaluation: EvaluationStyle::Sampled,
                keyword_replies: true,
                generic_pool_size: 8,
                deletable_history: false,
                identity: IdentityMode::MockStudent,
                welcome_note: None,
                generic_failure: GENERIC_FAILURE,
                evaluation_failure: EVALUATION_FAILURE,
            },
            Variant::Standalone => VariantProfile {
                variant: self,
                storage_key: "rai_standalone_chat_history",
                id_prefix: "standalone_chat_",
                evaluation: EvaluationStyle::KeywordMatched,
                keyword_replies: true,
                generic_pool_size: 5,
                deletable_history: true,
                identity: IdentityMode::Anonymous,
                welcome_note: Some(
                    "※ スタンドアロン版：実際の入力内容に基づく改善されたコンピテンシー評価",
                ),
                generic_failure: BRIEF_FAILURE,
                evaluation_failure: BRIEF_FAILURE,
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Basic => "basic",
            Variant::Sampled => "sampled",
            Variant::Standalone => "standalone",
        };
        f.write_str(name)
    }
}
