//! 单题生成上下文
//!
//! 封装"我正在为哪个主题生成第几题、需要避开哪些题干"这一信息

use std::fmt::Display;

use crate::models::question::QuestionType;
use crate::models::quiz::QuizRequest;

/// 单题生成上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationCtx {
    pub topic: String,
    pub difficulty_level: i64,
    /// 本题题型
    pub kind: QuestionType,
    /// 本题在测验中的位置（从1开始，仅用于日志显示）
    pub position: usize,
    /// 测验总题数
    pub total: usize,
    /// 本次请求中此前已生成的题干，按生成顺序排列
    pub avoid: Vec<String>,
}

impl GenerationCtx {
    pub fn new(
        request: &QuizRequest,
        kind: QuestionType,
        position: usize,
        total: usize,
        avoid: Vec<String>,
    ) -> Self {
        Self {
            topic: request.topic.clone(),
            difficulty_level: request.difficulty_level,
            kind,
            position,
            total,
            avoid,
        }
    }
}

impl Display for GenerationCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[题目 {}/{} 题型#{} 难度#{}]",
            self.position, self.total, self.kind, self.difficulty_level
        )
    }
}
