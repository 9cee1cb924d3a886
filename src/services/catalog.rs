//! Fixed competency catalog and phrase pools used by the response generator.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Competency {
    Resilience,
    Initiative,
    Teamwork,
    SelfEfficacy,
    Understanding,
    Multitasking,
    Empathy,
    Innovation,
}

/// Catalog order.
pub static CATALOG: [Competency; 8] = [
    Competency::Resilience,
    Competency::Initiative,
    Competency::Teamwork,
    Competency::SelfEfficacy,
    Competency::Understanding,
    Competency::Multitasking,
    Competency::Empathy,
    Competency::Innovation,
];

impl Competency {
    pub fn code(self) -> char {
        match self {
            Competency::Resilience => 'R',
            Competency::Initiative => 'I',
            Competency::Teamwork => 'T',
            Competency::SelfEfficacy => 'S',
            Competency::Understanding => 'U',
            Competency::Multitasking => 'M',
            Competency::Empathy => 'E',
            Competency::Innovation => 'C',
        }
    }

    /// Bilingual display name, e.g. `Resilience（しなやかさ）`.
    pub fn name(self) -> &'static str {
        match self {
            Competency::Resilience => "Resilience（しなやかさ）",
            Competency::Initiative => "Initiative（自発性）",
            Competency::Teamwork => "Teamwork（チームワーク）",
            Competency::SelfEfficacy => "Self-efficacy（自己効力感）",
            Competency::Understanding => "Understanding（理解力）",
            Competency::Multitasking => "Multitasking（マルチタスキング）",
            Competency::Empathy => "Empathy（共感力）",
            Competency::Innovation => "Innovation（変革力）",
        }
    }

    pub fn label_ja(self) -> &'static str {
        match self {
            Competency::Resilience => "しなやかさ",
            Competency::Initiative => "自発性",
            Competency::Teamwork => "チームワーク",
            Competency::SelfEfficacy => "自己効力感",
            Competency::Understanding => "理解力",
            Competency::Multitasking => "マルチタスキング",
            Competency::Empathy => "共感力",
            Competency::Innovation => "変革力",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Competency::Resilience => "困ったことや失敗したことから学び立ち直る力",
            Competency::Initiative => "自分で自分の目標を決め、あきらめることなく取り組む",
            Competency::Teamwork => "目的を達成するために他の人と協力する",
            Competency::SelfEfficacy => "自分ならどういうふうに問題解決し、自分を信じる感覚",
            Competency::Understanding => "科学的に物事を理解する",
            Competency::Multitasking => "複数の課題にバランスよく取り組む",
            Competency::Empathy => "他人の気持ちを想像して、その心に寄り添う",
            Competency::Innovation => "新しい考え方で、物事に変化を生み出す",
        }
    }

    /// Elaborations used by the sampled report; one is picked per competency.
    pub fn details(self) -> &'static [&'static str] {
        match self {
            Competency::Resilience => &[
                "困難な状況に直面しても諦めずに取り組む姿勢を示した",
                "挫折や失敗を学習の機会として捉える柔軟性を発揮した",
                "新しい環境や課題に対して適応力を示した",
            ],
            Competency::Initiative => &[
                "自分なりの学習目標を明確に設定し、それに向けて積極的に取り組む意欲を示した",
                "授業の内容を受け身で聞くだけでなく、主体的に学習に参加する姿勢を見せた",
                "自ら課題を見つけ、解決に向けて行動を起こす自発性を発揮した",
            ],
            Competency::Teamwork => &[
                "グループワークや協働学習において、他のメンバーと効果的に連携した",
                "チーム目標の達成に向けて、自分の役割を理解し責任を持って行動した",
                "他者の意見を尊重しながら、建設的な議論に参加した",
            ],
            Competency::SelfEfficacy => &[
                "自分の能力や判断に対して適切な自信を持ち、積極的に学習に取り組んだ",
                "困難な課題に対しても「やればできる」という前向きな姿勢を示した",
                "自分なりの方法で問題解決に取り組む意欲を見せた",
            ],
            Competency::Understanding => &[
                "授業内容を論理的に整理し、体系的に理解しようとする姿勢を示した",
                "複雑な概念や理論を、具体例と関連付けて理解する能力を発揮した",
                "学んだ内容を批判的に検討し、deeper understanding を目指した",
            ],
            Competency::Multitasking => &[
                "複数の学習課題を同時に管理し、バランスよく取り組む能力を示した",
                "時間管理や優先順位付けを適切に行い、効率的な学習を実践した",
                "異なる視点や課題を統合的に捉える能力を発揮した",
            ],
            Competency::Empathy => &[
                "他の学生や教員の気持ちや立場を理解し、適切に配慮した行動を取った",
                "相手の表情や言動から感情を読み取り、共感的な対応を示した",
                "多様な価値観や考え方を受け入れる開放性を発揮した",
            ],
            Competency::Innovation => &[
                "従来の考え方にとらわれず、新しい視点から物事を捉えようとした",
                "創意工夫を凝らし、独自の解決策やアプローチを提案した",
                "現状に満足せず、より良い方法や改善策を模索する姿勢を示した",
            ],
        }
    }
}

// ==================== PLAIN MODE ====================

pub static GENERIC_REPLIES: [&str; 8] = [
    "そのような視点は非常に興味深いですね。もう少し詳しく教えていただけますか？",
    "授業での学びを深く考察されていますね。その気づきをどのように今後に活かしていこうと思いますか？",
    "素晴らしい観点です。他の授業や日常生活でも類似の経験はありましたか？",
    "その考えについて、もう少し具体的な例があれば教えてください。",
    "興味深い内容ですね。この学びから、どのような新しい疑問が生まれましたか？",
    "ピアサポートの観点から考えると、今回の体験はどのような意味を持つと思いますか？",
    "他の参加者との相互作用について、どのような印象を持たれましたか？",
    "今回の学習内容で、特に印象に残った部分はありますか？",
];

/// Trigger words and the reply they select. First matching entry wins.
pub static KEYWORD_REPLIES: [(&[&str], &str); 3] = [
    (
        &["グループ", "チーム", "協力"],
        "グループでの協働について言及されていますね。チームワークやコミュニケーションの観点で、どのような学びがありましたか？",
    ),
    (
        &["聞く", "傾聴", "話"],
        "傾聴やコミュニケーションに関する気づきですね。相手の立場に立って考えることで、どのような新しい発見がありましたか？",
    ),
    (
        &["難しい", "困った", "課題"],
        "困難な状況での学びは特に価値がありますね。その経験から、どのような対処方法や解決策を見つけることができましたか？",
    ),
];

// ==================== SAMPLED REPORT ====================

pub static ACHIEVEMENTS: [&str; 5] = [
    "授業でのグループワークにおいて、チームメンバーとの協働を通じて課題解決に取り組んだこと",
    "ピアサポートの理論を学び、実際の支援場面で活用しようとする意識を持ったこと",
    "他者の意見を聞きながら、自分なりの考えを整理し表現できるようになったこと",
    "授業での学びを振り返り、今後の学習目標を明確に設定したこと",
    "困難な状況でも諦めずに解決策を模索する姿勢を示したこと",
];

pub static TURNING_POINTS: [&str; 4] = [
    "グループディスカッションで多様な意見に触れたことが、自分の考えを深める契機となった",
    "授業での体験学習が、理論と実践の結びつきを理解する分岐点となった",
    "他の学生との意見交換が、新しい視点を獲得するきっかけとなった",
    "教員からのフィードバックが、自己省察を深める機会となった",
];

pub static ADVICE_TOPICS: [(&str, &str); 4] = [
    (
        "継続的な学習の深化",
        "今回の学びをさらに深めるために、関連する文献や資料に積極的に触れることをおすすめします",
    ),
    (
        "実践的な経験の積み重ね",
        "学んだ理論を実際の場面で活用する機会を積極的に作ることで、より深い理解につながります",
    ),
    (
        "他者との協働スキル向上",
        "グループワークや話し合いの場面で、より効果的なコミュニケーションを意識してみてください",
    ),
    (
        "自己省察の習慣化",
        "定期的に自分の学習や成長を振り返る時間を設けることで、さらなる発展が期待されます",
    ),
];

pub const SHARING_NOTE: &str =
    "また、学んだことを他の学生と共有することで、相互の学習効果を高めることができます。";

// ==================== KEYWORD-MATCHED REPORT ====================

/// A keyword set that, when any member occurs in the input, selects a
/// competency together with a fixed description.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub competency: Competency,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

/// Detection table. Matches are reported in table order.
pub static KEYWORD_RULES: [KeywordRule; 6] = [
    KeywordRule {
        competency: Competency::Resilience,
        keywords: &["不安", "困っ", "難し", "失敗", "うまくいかない", "ついていけない"],
        description: "困難な状況に向き合い、課題を認識する力を示しています",
    },
    KeywordRule {
        competency: Competency::SelfEfficacy,
        keywords: &["自分", "意見", "考え", "振り返り", "反省"],
        description: "自分の現状を客観的に把握し、課題を認識する自己理解力を発揮しています",
    },
    KeywordRule {
        competency: Competency::Teamwork,
        keywords: &["ペア", "グループ", "チーム", "授業", "参加", "一緒"],
        description: "授業でのペアワークに参加し、協働学習の場に身を置く姿勢を示しています",
    },
    KeywordRule {
        competency: Competency::Empathy,
        keywords: &["エアコン", "寒い", "環境", "教室", "周り", "他の人"],
        description: "学習環境や周囲の状況に対する気づきと配慮を示しています",
    },
    KeywordRule {
        competency: Competency::Understanding,
        keywords: &["理解", "学ん", "勉強", "知識", "覚え"],
        description: "新しい知識や概念を学習しようとする姿勢を示しています",
    },
    KeywordRule {
        competency: Competency::Initiative,
        keywords: &["積極的", "頑張", "挑戦", "努力", "取り組"],
        description: "学習に対する積極的な取り組み姿勢を示しています",
    },
];

/// Used when no keyword rule matches.
pub static DEFAULT_PAIR: [(Competency, &str); 2] = [
    (Competency::Resilience, "現在の状況に向き合う姿勢を示しています"),
    (Competency::SelfEfficacy, "自己省察と課題認識を行う力を発揮しています"),
];

/// Keyword-conditioned line pairs; the last entry is the fallback.
pub static ACHIEVEMENT_BRANCHES: [(&[&str], [&str; 2]); 3] = [
    (
        &["不安", "ついていけない", "困っ"],
        [
            "現在の状況を正直に振り返り、課題を認識できたこと。",
            "困難な状況に向き合い、自分の感情を言語化できたこと。",
        ],
    ),
    (
        &["ペア", "グループ", "意見", "話"],
        [
            "ペアワークの場に参加し、協働学習を体験したこと。",
            "自分のコミュニケーションの課題を客観視できたこと。",
        ],
    ),
    (
        &[],
        [
            "授業での体験を丁寧に振り返り、学習に取り組んだこと。",
            "自分なりの視点で状況を観察し、気づきを得たこと。",
        ],
    ),
];

pub static TURNING_POINT_BRANCHES: [(&[&str], [&str; 2]); 3] = [
    (
        &["不安", "困っ"],
        [
            "授業への参加自体が、新しい環境への適応の第一歩となった。",
            "自分の感情を受け入れ、成長の機会として捉えられた。",
        ],
    ),
    (
        &["ペア", "グループ"],
        [
            "ペアワークでの経験が、コミュニケーションの重要性を実感する契機となった。",
            "他者との関わりを通じて、自分の特性を理解する機会となった。",
        ],
    ),
    (
        &[],
        [
            "授業での体験が、新しい学習の視点を獲得する契機となった。",
            "日常の観察から学習につながる気づきを得ることができた。",
        ],
    ),
];

/// Closing summary picked by situation analysis.
#[derive(Debug, Clone, Copy)]
pub struct SituationSummary {
    pub keywords: &'static [&'static str],
    pub title: &'static str,
    pub summary: &'static str,
}

/// First match wins; the last entry (no keywords) is the general case.
pub static SITUATIONS: [SituationSummary; 4] = [
    SituationSummary {
        keywords: &["不安", "ついていけない", "困っ"],
        title: "困難に向き合う姿勢",
        summary: "入学から間もない時期に感じる不安は自然なことです。現在の状況を正直に振り返り、課題を認識できていることは、今後の成長につながる重要な第一歩です。",
    },
    SituationSummary {
        keywords: &["意見", "言え", "話", "発言"],
        title: "コミュニケーション能力の向上",
        summary: "ペアワークで自分の意見を表現することの難しさを感じていらっしゃいますね。この気づき自体が、コミュニケーション能力向上への第一歩となります。",
    },
    SituationSummary {
        keywords: &["学ん", "理解", "勉強", "知識"],
        title: "継続的な学習の深化",
        summary: "学習内容に対する積極的な取り組み姿勢が見られます。新しい知識を吸収し、自分なりに理解しようとする態度は素晴らしいものです。",
    },
    SituationSummary {
        keywords: &[],
        title: "学習への取り組み",
        summary: "授業での体験を丁寧に振り返り、学習環境にも気を配る観察力を示されています。このような細やかな気づきは、今後の学習に活かせる貴重な資質です。",
    },
];

/// True when any of `words` occurs in `text`.
pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}
