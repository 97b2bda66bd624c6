//! End-to-end conversation flow tests: phase transitions, message ordering,
//! engine-failure recovery, and session isolation, driven through the
//! coordinator with a scripted mock engine.

use std::sync::Arc;

use serde_json::json;

use rep_coach::adapters::ai::MockEngine;
use rep_coach::domain::coaching::{
    ConversationCoordinator, OutboundMessage, Session, Speaker, TrainingPhase,
    OBJECTION_CUE_MARKER,
};
use rep_coach::domain::tools::ToolCall;
use rep_coach::ports::CompletionError;

const START_MESSAGE: &str = "药品: Semaglutide；科室: Endocrinology；难度: Basic。点击【Start】";

fn coordinator(engine: MockEngine) -> ConversationCoordinator {
    ConversationCoordinator::new(Arc::new(engine))
}

async fn started_session(coordinator: &ConversationCoordinator) -> Session {
    let mut session = Session::new();
    coordinator.handle_message(&mut session, START_MESSAGE).await;
    assert_eq!(session.phase(), TrainingPhase::DoctorInteraction);
    session
}

fn doctor_messages(messages: &[OutboundMessage]) -> Vec<&OutboundMessage> {
    messages.iter().filter(|m| m.speaker.is_doctor()).collect()
}

#[tokio::test]
async fn non_start_message_yields_single_instruction_and_no_state_change() {
    let engine = MockEngine::new();
    let coordinator = coordinator(engine.clone());
    let mut session = Session::new();

    let out = coordinator.handle_message(&mut session, "随便聊聊").await;

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].speaker, Speaker::System);
    assert!(out[0].body.contains("药品"));
    assert_eq!(session.phase(), TrainingPhase::AwaitingStart);
    assert!(session.persona().is_none());
    // No engine call is made for the instruction.
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn valid_start_emits_notice_opening_and_profile_in_order() {
    let coordinator = coordinator(MockEngine::new());
    let mut session = Session::new();

    let out = coordinator.handle_message(&mut session, START_MESSAGE).await;

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].speaker, Speaker::System);
    assert!(out[0].body.contains("正在生成医生场景"));
    assert_eq!(out[1].speaker, Speaker::doctor("李伟"));
    assert!(out[1].body.contains("司美格鲁肽"));
    assert_eq!(out[2].speaker, Speaker::System);
    assert!(out[2].body.contains("【医生档案】"));

    assert_eq!(session.phase(), TrainingPhase::DoctorInteraction);
    assert_eq!(session.persona().unwrap().name, "李伟");
    // Transcript holds the trainee utterance and the doctor opening.
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn interaction_turn_produces_coach_then_exactly_one_doctor_line() {
    let engine = MockEngine::new()
        .with_reply("评分：82/100 🟢 亮点：引用了临床数据。")
        .with_reply("这个数据是哪个研究的？");
    let coordinator = coordinator(engine);
    let mut session = started_session(&coordinator).await;

    let out = coordinator
        .handle_message(&mut session, "我们的临床试验显示平均减重 15%。")
        .await;

    assert_eq!(out[0].speaker, Speaker::Coach);
    assert!(out[0].body.contains("82/100"));
    let doctors = doctor_messages(&out);
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].body, "这个数据是哪个研究的？");
    assert_eq!(session.phase(), TrainingPhase::DoctorInteraction);
}

#[tokio::test]
async fn coach_critique_quotes_doctor_prior_line_and_trainee_utterance() {
    let engine = MockEngine::new();
    let coordinator = coordinator(engine.clone());
    let mut session = started_session(&coordinator).await;

    coordinator
        .handle_message(&mut session, "我们有新的减重数据。")
        .await;

    // First engine call of the turn is the critique.
    let critique = &engine.calls()[0];
    let prompt = &critique.messages[0].content;
    assert!(prompt.contains("司美格鲁肽有哪些新版数据"));
    assert!(prompt.contains("我们有新的减重数据。"));
    assert!(critique
        .system_prompt
        .as_deref()
        .unwrap()
        .contains("培训协调员"));
}

#[tokio::test]
async fn end_training_emits_summary_and_resets_phase() {
    let engine = MockEngine::new()
        .with_reply("评分：88/100 🟢")
        .with_reply("总体评分：84/100。主要优势：循证沟通。");
    let coordinator = coordinator(engine);
    let mut session = started_session(&coordinator).await;

    let out = coordinator.handle_message(&mut session, "结束训练").await;

    assert_eq!(out[0].speaker, Speaker::Coach);
    assert_eq!(out[1].speaker, Speaker::System);
    assert!(out[1].body.contains("正在生成总结报告"));
    assert_eq!(out[2].speaker, Speaker::Summary);
    assert!(out[2].body.contains("84/100"));
    assert!(doctor_messages(&out).is_empty());

    assert_eq!(session.phase(), TrainingPhase::AwaitingStart);
    assert!(session.persona().is_none());
}

#[tokio::test]
async fn summary_prompt_carries_full_transcript() {
    let engine = MockEngine::new()
        .with_reply("教练点评一")
        .with_reply("医生追问一")
        .with_reply("教练点评二")
        .with_reply("总结报告");
    let coordinator = coordinator(engine.clone());
    let mut session = started_session(&coordinator).await;

    coordinator.handle_message(&mut session, "先介绍数据。").await;
    coordinator.handle_message(&mut session, "end training").await;

    let summary_call = engine.calls().last().unwrap().clone();
    let prompt = &summary_call.messages[0].content;
    assert!(prompt.contains("User: 先介绍数据。"));
    assert!(prompt.contains("Doctor 李伟:"));
    assert!(prompt.contains("Coach: 教练点评一"));
}

#[tokio::test]
async fn coach_failure_still_generates_doctor_line() {
    let engine = MockEngine::new()
        .with_error(CompletionError::rate_limited(30))
        .with_reply("请继续介绍适应症。");
    let coordinator = coordinator(engine);
    let mut session = started_session(&coordinator).await;

    let out = coordinator.handle_message(&mut session, "继续介绍").await;

    assert_eq!(out[0].speaker, Speaker::Coach);
    assert!(out[0].body.contains("评估时出错"));
    let doctors = doctor_messages(&out);
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].body, "请继续介绍适应症。");
    assert_eq!(session.phase(), TrainingPhase::DoctorInteraction);
}

#[tokio::test]
async fn doctor_failure_is_reported_under_doctor_tag() {
    let engine = MockEngine::new()
        .with_reply("教练点评")
        .with_error(CompletionError::unavailable("down"));
    let coordinator = coordinator(engine);
    let mut session = started_session(&coordinator).await;

    let out = coordinator.handle_message(&mut session, "继续").await;

    let doctors = doctor_messages(&out);
    assert_eq!(doctors.len(), 1);
    assert!(doctors[0].body.contains("生成回复时出错"));
    // The failed line is not recorded to the transcript.
    assert!(!session.transcript().render().contains("生成回复时出错"));
}

#[tokio::test]
async fn summary_failure_recovers_on_next_message() {
    let engine = MockEngine::new()
        .with_reply("教练点评")
        .with_error(CompletionError::unavailable("down"));
    let coordinator = coordinator(engine);
    let mut session = started_session(&coordinator).await;

    let out = coordinator.handle_message(&mut session, "结束训练").await;
    assert!(out
        .iter()
        .any(|m| m.speaker == Speaker::System && m.body.contains("生成总结报告时出错")));
    assert_eq!(session.phase(), TrainingPhase::FinalSummary);

    // The next message trips the safety net and resets the session.
    let out = coordinator.handle_message(&mut session, "你好").await;
    assert_eq!(out.len(), 1);
    assert!(out[0].body.contains("培训已结束"));
    assert_eq!(session.phase(), TrainingPhase::AwaitingStart);
    assert!(session.persona().is_none());
}

#[tokio::test]
async fn objection_cue_marks_emitted_line_but_not_transcript() {
    let engine = MockEngine::new()
        .with_reply("教练点评")
        .with_reply("我的患者比较担心副作用，你们的数据如何？");
    let coordinator = coordinator(engine);
    let mut session = started_session(&coordinator).await;

    let out = coordinator.handle_message(&mut session, "继续").await;

    let doctors = doctor_messages(&out);
    assert!(doctors[0].body.ends_with(OBJECTION_CUE_MARKER));
    assert!(!session.transcript().render().contains(OBJECTION_CUE_MARKER));
}

#[tokio::test]
async fn doctor_prompt_context_excludes_coach_lines() {
    let engine = MockEngine::new()
        .with_reply("教练点评")
        .with_reply("医生追问");
    let coordinator = coordinator(engine.clone());
    let mut session = started_session(&coordinator).await;

    coordinator.handle_message(&mut session, "介绍数据").await;

    // Second engine call of the turn generates the doctor line.
    let doctor_call = &engine.calls()[1];
    let prompt = &doctor_call.messages[0].content;
    assert!(prompt.contains("User: 介绍数据"));
    assert!(!prompt.contains("教练点评"));
    assert!(doctor_call.system_prompt.as_deref().unwrap().contains("李伟"));
}

#[tokio::test]
async fn identical_inputs_after_reset_replay_identically() {
    let script = || {
        MockEngine::new()
            .with_reply("教练点评")
            .with_reply("医生追问")
    };

    let coordinator_a = coordinator(script());
    let mut session = Session::new();
    let mut first_run = coordinator_a.handle_message(&mut session, START_MESSAGE).await;
    first_run.extend(coordinator_a.handle_message(&mut session, "介绍数据").await);

    session.reset();

    let coordinator_b = coordinator(script());
    let mut second_run = coordinator_b.handle_message(&mut session, START_MESSAGE).await;
    second_run.extend(coordinator_b.handle_message(&mut session, "介绍数据").await);

    assert_eq!(first_run, second_run);
}

#[tokio::test]
async fn concurrent_sessions_do_not_interfere() {
    let engine = MockEngine::new();
    let coordinator = Arc::new(ConversationCoordinator::new(Arc::new(engine)));

    let mut session_a = Session::new();
    let mut session_b = Session::new();

    let (out_a, out_b) = tokio::join!(
        coordinator.handle_message(&mut session_a, START_MESSAGE),
        coordinator.handle_message(&mut session_b, "你好"),
    );

    // Session A started; session B only got the instruction.
    assert_eq!(session_a.phase(), TrainingPhase::DoctorInteraction);
    assert_eq!(session_b.phase(), TrainingPhase::AwaitingStart);
    assert!(out_a.iter().any(|m| m.speaker.is_doctor()));
    assert_eq!(out_b.len(), 1);
    assert_ne!(session_a.id(), session_b.id());
}

#[tokio::test]
async fn unrecognized_scenario_falls_back_to_generic_persona() {
    let coordinator = coordinator(MockEngine::new());
    let mut session = Session::new();

    let out = coordinator
        .handle_message(&mut session, "药品: Aspirin；科室: Cardiology。开始")
        .await;

    assert_eq!(session.persona().unwrap().name, "王医生");
    assert!(out.iter().any(|m| m.speaker == Speaker::doctor("王医生")));
}

#[tokio::test]
async fn engine_tool_request_is_dispatched_and_fed_back() {
    let engine = MockEngine::new()
        .with_tool_request(ToolCall::new(
            "objection_tool",
            json!({"drug": "司美格鲁肽", "topic": "cost"}),
        ))
        .with_reply("教练点评：准备好费用异议的应对。")
        .with_reply("医生追问");
    let coordinator = coordinator(engine.clone());
    let mut session = started_session(&coordinator).await;

    let out = coordinator.handle_message(&mut session, "继续").await;

    let follow_up = &engine.calls()[1];
    assert!(follow_up.messages.iter().any(|m| {
        m.name.as_deref() == Some("objection_tool") && m.content.contains("这个药太贵了")
    }));
    assert!(out
        .iter()
        .any(|m| m.speaker == Speaker::Coach && m.body.contains("费用异议")));
}
