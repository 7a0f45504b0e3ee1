//! 提示词构建
//!
//! 每种题型一个固定的 system 指令（描述 JSON 结构和出题规则），
//! user 指令携带主题、难度和需要避免重复的题干列表

use crate::models::question::QuestionType;
use crate::utils::logging::truncate_text;
use crate::workflow::GenerationCtx;

/// 去重列表中单条题干在提示词里的最大长度
const AVOID_ENTRY_MAX_CHARS: usize = 200;

const OX_SYSTEM_PROMPT: &str = r#"당신은 지정된 주제와 난이도에 맞는 O/X 퀴즈를 만드는 전문가입니다.
반드시 다음 규칙을 지켜 JSON 객체 하나로만 응답해야 합니다.

- JSON 구조: { "question": "...", "answer": true, "explanation": "..." }
- 'question'은 참 또는 거짓으로 판단할 수 있는 하나의 진술문이어야 합니다.
- 'answer'는 문자열이 아닌 boolean 값(true 또는 false)이어야 합니다.
- 'explanation' 필드에는 정답에 대한 간결한 해설을 포함해야 합니다.
- 이미 출제된 문제 목록이 주어지면 그 문제들과 의미가 겹치지 않는 새로운 문제를 만들어야 합니다."#;

const MULTIPLE_CHOICE_SYSTEM_PROMPT: &str = r#"당신은 지정된 주제와 난이도에 맞는 객관식 퀴즈를 만드는 전문가입니다.
반드시 다음 규칙을 지켜 JSON 객체 하나로만 응답해야 합니다.

- JSON 구조: { "question": "...", "options": ["...", "...", "...", "..."], "answer": "...", "explanation": "..." }
- 'options' 배열에는 항상 정확히 4개의 서로 다른 선택지를 포함해야 합니다.
- 'answer'는 'options' 배열에 있는 텍스트와 정확히 일치해야 합니다.
- 'explanation' 필드에는 정답에 대한 간결한 해설을 포함해야 합니다.
- 이미 출제된 문제 목록이 주어지면 그 문제들과 의미가 겹치지 않는 새로운 문제를 만들어야 합니다."#;

const SHORT_ANSWER_SYSTEM_PROMPT: &str = r#"당신은 지정된 주제와 난이도에 맞는 단답형 퀴즈를 만드는 전문가입니다.
반드시 다음 규칙을 지켜 JSON 객체 하나로만 응답해야 합니다.

- JSON 구조: { "question": "...", "answer": "...", "similar_answers": ["...", "..."], "explanation": "..." }
- 'answer'는 한두 단어로 된 짧은 정답이어야 합니다.
- 'similar_answers'에는 정답으로 인정할 수 있는 동의어, 다른 표기, 약칭을 넣습니다. 없으면 빈 배열 []로 둡니다.
- 'explanation' 필드에는 정답에 대한 간결한 해설을 포함해야 합니다.
- 이미 출제된 문제 목록이 주어지면 그 문제들과 의미가 겹치지 않는 새로운 문제를 만들어야 합니다."#;

/// 题型对应的 system 指令
pub fn system_prompt(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Ox => OX_SYSTEM_PROMPT,
        QuestionType::MultipleChoice => MULTIPLE_CHOICE_SYSTEM_PROMPT,
        QuestionType::ShortAnswer => SHORT_ANSWER_SYSTEM_PROMPT,
    }
}

fn kind_label(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Ox => "O/X",
        QuestionType::MultipleChoice => "객관식",
        QuestionType::ShortAnswer => "단답형",
    }
}

/// 构建 user 指令
pub fn user_prompt(ctx: &GenerationCtx) -> String {
    let mut prompt = format!(
        "주제: {}\n난이도: {}/10 (1은 매우 쉬움, 10은 매우 어려움)\n위 주제와 난이도에 맞는 {} 문제 1개를 만들어 주세요.",
        ctx.topic,
        ctx.difficulty_level,
        kind_label(ctx.kind)
    );

    if !ctx.avoid.is_empty() {
        prompt.push_str("\n\n다음은 이미 출제된 문제입니다. 이 문제들과 내용이 겹치지 않게 하세요:\n");
        for (i, text) in ctx.avoid.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {}\n",
                i + 1,
                truncate_text(text, AVOID_ENTRY_MAX_CHARS)
            ));
        }
    }

    prompt
}

/// 取最近的 `limit` 条题干作为去重上下文，保持原有顺序
pub fn avoid_window(seen: &[String], limit: usize) -> Vec<String> {
    let start = seen.len().saturating_sub(limit);
    seen[start..].to_vec()
}
