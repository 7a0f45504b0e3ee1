use async_trait::async_trait;
use quiz_composer::config::GenerationMode;
use quiz_composer::error::{AppError, LlmError, ValidationError};
use quiz_composer::services::prompts;
use quiz_composer::{
    AppResult, ChatBackend, Config, GeneratedQuestion, QuestionGenerator, QuestionType,
    QuizComposer, QuizRequest, QuizService,
};
use std::error::Error as _;
use std::sync::Mutex;
use std::time::Duration;

/// 按题型返回固定 JSON 的假 LLM，记录每次收到的 user 指令
struct FakeLlm {
    user_messages: Mutex<Vec<String>>,
    fail_on_call: Option<usize>,
}

impl FakeLlm {
    fn new() -> Self {
        Self {
            user_messages: Mutex::new(Vec::new()),
            fail_on_call: None,
        }
    }

    fn failing_on(call: usize) -> Self {
        Self {
            user_messages: Mutex::new(Vec::new()),
            fail_on_call: Some(call),
        }
    }

    fn user_messages(&self) -> Vec<String> {
        self.user_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeLlm {
    fn model_name(&self) -> &str {
        "fake-llm"
    }

    async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        let call = {
            let mut messages = self.user_messages.lock().unwrap();
            messages.push(user_message.to_string());
            messages.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(LlmError::EmptyContent {
                model: "fake-llm".to_string(),
            }
            .into());
        }

        let system = system_message.unwrap_or_default();
        let body = if system == prompts::system_prompt(QuestionType::Ox) {
            format!(
                r#"{{"question": "O/X 문제 {call}: 조선은 1392년에 건국되었다.", "answer": true, "explanation": "이성계가 건국"}}"#
            )
        } else if system == prompts::system_prompt(QuestionType::MultipleChoice) {
            format!(
                r#"{{"question": "객관식 문제 {call}: 훈민정음을 창제한 왕은?", "options": ["태조", "세종", "정조", "영조"], "answer": "세종", "explanation": "1443년 창제"}}"#
            )
        } else {
            format!(
                r#"{{"question": "단답형 문제 {call}: 조선의 마지막 왕조 국호는?", "answer": "대한제국", "similar_answers": ["대한 제국"]}}"#
            )
        };
        Ok(body)
    }
}

fn service(llm: FakeLlm) -> QuizService<QuestionGenerator<FakeLlm>> {
    QuizService::new(
        QuizComposer::with_mode(QuestionGenerator::new(llm), GenerationMode::Sequential, 10),
        Duration::from_secs(30),
    )
}

fn fake_llm(service: &QuizService<QuestionGenerator<FakeLlm>>) -> &FakeLlm {
    service.composer().source().backend()
}

#[tokio::test]
async fn test_joseon_scenario_with_all_three_types() {
    let service = service(FakeLlm::new());
    let types = [
        QuestionType::Ox,
        QuestionType::MultipleChoice,
        QuestionType::ShortAnswer,
    ];

    let quiz = service
        .create_quiz_with_types(QuizRequest::new("조선시대 역사", 3), &types)
        .await
        .expect("测验应生成成功");

    let json = serde_json::to_value(&quiz).unwrap();
    assert_eq!(json["topic"], "조선시대 역사");
    assert_eq!(json["difficulty_level"], 3);

    let questions = json["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);

    assert_eq!(questions[0]["question_type"], "ox");
    assert!(questions[0]["answer"].is_boolean());

    assert_eq!(questions[1]["question_type"], "multiple_choice");
    let options = questions[1]["options"].as_array().unwrap();
    assert_eq!(options.len(), 4);
    assert!(options.contains(&questions[1]["answer"]));

    assert_eq!(questions[2]["question_type"], "short_answer");
    assert!(questions[2]["similar_answers"].is_array());

    let numbers: Vec<u64> = questions
        .iter()
        .map(|q| q["question_number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_short_answer_is_optional() {
    let service = service(FakeLlm::new());
    let types = [
        QuestionType::MultipleChoice,
        QuestionType::Ox,
        QuestionType::MultipleChoice,
    ];

    let quiz = service
        .create_quiz_with_types(QuizRequest::new("조선시대 역사", 7), &types)
        .await
        .unwrap();

    assert_eq!(quiz.question_types(), types.to_vec());
    for q in &quiz.questions {
        if let GeneratedQuestion::MultipleChoice(mc) = &q.question {
            assert_eq!(mc.options.len(), 4);
            assert!(mc.options.contains(&mc.answer));
        }
    }
}

#[tokio::test]
async fn test_later_prompts_carry_earlier_questions() {
    let service = service(FakeLlm::new());
    let types = [
        QuestionType::Ox,
        QuestionType::MultipleChoice,
        QuestionType::ShortAnswer,
    ];

    let quiz = service
        .create_quiz_with_types(QuizRequest::new("조선시대 역사", 3), &types)
        .await
        .unwrap();

    let messages = fake_llm(&service).user_messages();
    assert_eq!(messages.len(), 3);

    let first = quiz.questions[0].question.question_text();
    let second = quiz.questions[1].question.question_text();

    assert!(!messages[0].contains("이미 출제된"));
    assert!(messages[1].contains(first));
    assert!(!messages[1].contains(second));
    let pos_first = messages[2].find(first).unwrap();
    let pos_second = messages[2].find(second).unwrap();
    assert!(pos_first < pos_second);
}

#[tokio::test]
async fn test_failure_on_second_call_returns_no_partial_quiz() {
    let service = service(FakeLlm::failing_on(2));

    let err = service
        .create_quiz_with_types(
            QuizRequest::new("조선시대 역사", 3),
            &[
                QuestionType::Ox,
                QuestionType::MultipleChoice,
                QuestionType::ShortAnswer,
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::QuizGenerationFailed { .. }));
    assert_eq!(err.to_string(), "测验生成失败");
    assert!(err.source().is_some());
    assert_eq!(fake_llm(&service).user_messages().len(), 2);
}

#[tokio::test]
async fn test_difficulty_eleven_rejected_without_llm_call() {
    let service = service(FakeLlm::new());

    let err = service
        .create_quiz(QuizRequest::new("조선시대 역사", 11))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::DifficultyOutOfRange { value: 11, .. })
    ));
    assert!(fake_llm(&service).user_messages().is_empty());
}

#[tokio::test]
async fn test_random_quizzes_hold_invariants() {
    let service = service(FakeLlm::new());

    for _ in 0..20 {
        let quiz = service
            .create_quiz(QuizRequest::with_topic("한국 근현대사"))
            .await
            .unwrap();

        assert_eq!(quiz.difficulty_level, 5);
        assert_eq!(quiz.questions.len(), 3);
        let short_answers = quiz
            .question_types()
            .into_iter()
            .filter(|t| *t == QuestionType::ShortAnswer)
            .count();
        assert!(short_answers <= 1);
        let numbers: Vec<usize> = quiz.questions.iter().map(|q| q.question_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}

/// 真实 LLM 端到端测试
///
/// 运行方式：
/// ```bash
/// LLM_API_KEY=... cargo test test_live_quiz -- --ignored --nocapture
/// ```
#[tokio::test]
#[ignore]
async fn test_live_quiz() {
    quiz_composer::logging::init(true);

    let config = Config::from_env().expect("需要设置 LLM_API_KEY");
    let service = QuizService::from_config(&config);

    let quiz = service
        .create_quiz(QuizRequest::new("조선시대 역사", 3))
        .await
        .expect("测验生成失败");

    println!("{}", serde_json::to_string_pretty(&quiz).unwrap());
    assert_eq!(quiz.questions.len(), 3);
}
