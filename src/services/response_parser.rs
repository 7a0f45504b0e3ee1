//! LLM 响应解析
//!
//! LLM 返回的原始文本在这里一次性转换成带类型的题目，
//! 通过校验之前的数据不会流向上层

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::{AppResult, LlmError, SchemaError};
use crate::models::question::{
    GeneratedQuestion, MultipleChoiceQuestion, OxQuestion, QuestionType, ShortAnswerQuestion,
};
use crate::utils::logging::truncate_text;

/// 选择题选项数量
pub const OPTION_COUNT: usize = 4;

fn code_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // 非贪婪，只取第一个代码块
        Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").expect("code fence regex is valid")
    })
}

/// 去掉 Markdown 代码块包裹，截取最外层的 JSON 对象
fn extract_json_object(content: &str) -> &str {
    if let Some(captures) = code_fence_regex().captures(content) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str();
        }
    }

    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => content.trim(),
    }
}

/// 解析为 JSON 对象，失败视为 LLM 调用失败
fn parse_object(content: &str) -> AppResult<Value> {
    let json = extract_json_object(content);
    let value: Value = serde_json::from_str(json).map_err(|source| LlmError::JsonParseFailed {
        response: truncate_text(content, 120),
        source,
    })?;

    if !value.is_object() {
        return Err(LlmError::JsonParseFailed {
            response: truncate_text(content, 120),
            source: serde::de::Error::custom("响应不是 JSON 对象"),
        }
        .into());
    }

    Ok(value)
}

fn typed<T: DeserializeOwned>(kind: QuestionType, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|source| SchemaError::InvalidFields { kind, source }.into())
}

fn require_text(kind: QuestionType, question: &str) -> AppResult<()> {
    if question.trim().is_empty() {
        return Err(SchemaError::EmptyQuestion { kind }.into());
    }
    Ok(())
}

/// 按题型解析并校验 LLM 响应
pub fn parse_question(kind: QuestionType, content: &str) -> AppResult<GeneratedQuestion> {
    let value = parse_object(content)?;

    match kind {
        QuestionType::Ox => {
            let q: OxQuestion = typed(kind, value)?;
            require_text(kind, &q.question)?;
            Ok(q.into())
        }
        QuestionType::MultipleChoice => {
            let q: MultipleChoiceQuestion = typed(kind, value)?;
            require_text(kind, &q.question)?;
            validate_multiple_choice(&q)?;
            Ok(q.into())
        }
        QuestionType::ShortAnswer => {
            let q: ShortAnswerQuestion = typed(kind, value)?;
            require_text(kind, &q.question)?;
            if q.answer.trim().is_empty() {
                return Err(SchemaError::EmptyAnswer { kind }.into());
            }
            Ok(q.into())
        }
    }
}

fn validate_multiple_choice(q: &MultipleChoiceQuestion) -> AppResult<()> {
    if q.options.len() != OPTION_COUNT {
        return Err(SchemaError::OptionCount {
            expected: OPTION_COUNT,
            actual: q.options.len(),
        }
        .into());
    }

    // 逐字节比较，不做 trim 或大小写归一
    if !q.options.iter().any(|option| option == &q.answer) {
        return Err(SchemaError::AnswerNotInOptions {
            answer: q.answer.clone(),
        }
        .into());
    }

    Ok(())
}
