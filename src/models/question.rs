use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 题型标签
///
/// 只用于路由生成调用，最终响应中以每道题的 `question_type` 字段体现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// O/X 判断题
    Ox,
    /// 四选一选择题
    MultipleChoice,
    /// 简答题（附同义答案）
    ShortAnswer,
}

impl QuestionType {
    /// 序列化时使用的标签
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Ox => "ox",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::ShortAnswer => "short_answer",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// O/X 判断题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxQuestion {
    pub question: String,
    pub answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// 选择题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// 简答题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortAnswerQuestion {
    pub question: String,
    pub answer: String,
    /// LLM 可能返回 null，统一视为空列表
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub similar_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// 已生成的题目（按题型区分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "question_type", rename_all = "snake_case")]
pub enum GeneratedQuestion {
    Ox(OxQuestion),
    MultipleChoice(MultipleChoiceQuestion),
    ShortAnswer(ShortAnswerQuestion),
}

impl GeneratedQuestion {
    pub fn question_type(&self) -> QuestionType {
        match self {
            GeneratedQuestion::Ox(_) => QuestionType::Ox,
            GeneratedQuestion::MultipleChoice(_) => QuestionType::MultipleChoice,
            GeneratedQuestion::ShortAnswer(_) => QuestionType::ShortAnswer,
        }
    }

    /// 题干文本（用于去重上下文）
    pub fn question_text(&self) -> &str {
        match self {
            GeneratedQuestion::Ox(q) => &q.question,
            GeneratedQuestion::MultipleChoice(q) => &q.question,
            GeneratedQuestion::ShortAnswer(q) => &q.question,
        }
    }
}

impl From<OxQuestion> for GeneratedQuestion {
    fn from(q: OxQuestion) -> Self {
        GeneratedQuestion::Ox(q)
    }
}

impl From<MultipleChoiceQuestion> for GeneratedQuestion {
    fn from(q: MultipleChoiceQuestion) -> Self {
        GeneratedQuestion::MultipleChoice(q)
    }
}

impl From<ShortAnswerQuestion> for GeneratedQuestion {
    fn from(q: ShortAnswerQuestion) -> Self {
        GeneratedQuestion::ShortAnswer(q)
    }
}

/// 带题号的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberedQuestion {
    /// 从 1 开始
    pub question_number: usize,
    #[serde(flatten)]
    pub question: GeneratedQuestion,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
