use serde::{Deserialize, Serialize};

use crate::error::{AppResult, ValidationError};
use crate::models::question::{NumberedQuestion, QuestionType};

/// 难度下限
pub const MIN_DIFFICULTY: u8 = 1;
/// 难度上限
pub const MAX_DIFFICULTY: u8 = 10;
/// 默认难度
pub const DEFAULT_DIFFICULTY: u8 = 5;

/// 测验生成请求
///
/// `difficulty_level` 用 i64 承接，越界值在 [`QuizRequest::validate`] 中拒绝，
/// 而不是在反序列化阶段就被截断或报出含糊的类型错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    pub topic: String,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: i64,
}

fn default_difficulty() -> i64 {
    DEFAULT_DIFFICULTY as i64
}

impl QuizRequest {
    pub fn new(topic: impl Into<String>, difficulty_level: i64) -> Self {
        Self {
            topic: topic.into(),
            difficulty_level,
        }
    }

    /// 使用默认难度创建
    pub fn with_topic(topic: impl Into<String>) -> Self {
        Self::new(topic, default_difficulty())
    }

    /// 校验请求参数
    pub fn validate(&self) -> AppResult<()> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic.into());
        }

        let range = i64::from(MIN_DIFFICULTY)..=i64::from(MAX_DIFFICULTY);
        if !range.contains(&self.difficulty_level) {
            return Err(ValidationError::DifficultyOutOfRange {
                value: self.difficulty_level,
                min: MIN_DIFFICULTY,
                max: MAX_DIFFICULTY,
            }
            .into());
        }

        Ok(())
    }
}

/// 最终测验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub topic: String,
    pub difficulty_level: i64,
    pub questions: Vec<NumberedQuestion>,
}

impl QuizResult {
    /// 按题号顺序返回题型
    pub fn question_types(&self) -> Vec<QuestionType> {
        self.questions
            .iter()
            .map(|q| q.question.question_type())
            .collect()
    }
}
