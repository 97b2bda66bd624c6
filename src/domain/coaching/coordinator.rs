//! Conversation coordinator - drives the role-play training flow.
//!
//! Given the current phase and an inbound trainee utterance, the coordinator
//! decides which persona to simulate, which prompts to build, how to tag the
//! resulting multi-party output, and how to transition between phases -
//! including recovery from completion-engine failures. Every engine call is
//! wrapped individually: `handle_message` never errors, it always returns an
//! ordered sequence of tagged messages.

use std::sync::Arc;

use crate::domain::tools::ToolRegistry;
use crate::ports::{CompletionEngine, CompletionError, CompletionRequest};

use super::{
    detect_objection_topic, is_end_training, DoctorPersona, KeywordStartClassifier,
    OutboundMessage, Session, Speaker, StartClassifier, TrainingPhase, OBJECTION_CUE_MARKER,
};

/// Framing for coach critiques and the final summary.
const COORDINATOR_SYSTEM_PROMPT: &str =
    "你是一个医药代表培训协调员。你的任务是根据用户输入协调场景生成、医生互动和培训评估。";

/// Instruction shown when a start request is missing required signals.
const START_INSTRUCTIONS: &str = "请提供药品、科室、难度信息并包含\"Start\"或\"开始\"以启动。例如：\"药品: Semaglutide；科室: Endocrinology；难度: Basic。点击【Start】\"";

/// Doctor context window size, in transcript entries.
const DOCTOR_CONTEXT_CAP: usize = 4;

/// Iteration guard for engine-requested tool round-trips.
const MAX_TOOL_ROUNDS: usize = 4;

/// Orchestrates trainee turns against a completion engine and tool registry.
///
/// The coordinator itself is stateless across sessions; all conversational
/// state lives in the [`Session`] passed into [`handle_message`].
///
/// [`handle_message`]: ConversationCoordinator::handle_message
pub struct ConversationCoordinator {
    engine: Arc<dyn CompletionEngine>,
    tools: Arc<ToolRegistry>,
    classifier: Box<dyn StartClassifier>,
}

impl ConversationCoordinator {
    /// Creates a coordinator with the default tool registry and the keyword
    /// start classifier.
    pub fn new(engine: Arc<dyn CompletionEngine>) -> Self {
        Self {
            engine,
            tools: Arc::new(ToolRegistry::new()),
            classifier: Box::new(KeywordStartClassifier),
        }
    }

    /// Replaces the start-intent classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn StartClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the tool registry.
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Arc::new(tools);
        self
    }

    /// Handles one trainee utterance and returns the tagged messages it
    /// produced, in emission order.
    ///
    /// The utterance is always recorded to the transcript first, before any
    /// dispatch. Engine failures surface as error messages carrying the tag
    /// of whichever role was being generated; they never corrupt phase or
    /// transcript invariants.
    pub async fn handle_message(
        &self,
        session: &mut Session,
        utterance: &str,
    ) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        session.record(Speaker::User, utterance);

        tracing::debug!(
            session_id = %session.id(),
            phase = session.phase().label(),
            "dispatching trainee utterance"
        );

        match session.phase() {
            TrainingPhase::AwaitingStart => {
                self.handle_awaiting_start(session, utterance, &mut out);
            }
            TrainingPhase::DoctorInteraction => {
                self.handle_doctor_interaction(session, utterance, &mut out)
                    .await;
            }
            TrainingPhase::FinalSummary => {
                // Safety net: reachable only if a message slips in between
                // summary emission and the phase reset.
                out.push(OutboundMessage::system(
                    "培训已结束。如需开始新的培训，请按格式提示开始。",
                ));
                session.complete_training();
            }
        }

        out
    }

    fn handle_awaiting_start(
        &self,
        session: &mut Session,
        utterance: &str,
        out: &mut Vec<OutboundMessage>,
    ) {
        let Some(intent) = self.classifier.classify(utterance) else {
            out.push(OutboundMessage::system(START_INSTRUCTIONS));
            return;
        };

        out.push(OutboundMessage::system("正在生成医生场景…"));

        let persona =
            DoctorPersona::for_scenario(intent.drug.as_deref(), intent.specialty.as_deref());
        if let Err(err) = session.begin_interaction(persona.clone()) {
            tracing::warn!(session_id = %session.id(), error = %err, "scenario setup failed");
            out.push(OutboundMessage::system(format!("抱歉，生成场景时出错: {err}")));
            session.complete_training();
            return;
        }

        tracing::info!(
            session_id = %session.id(),
            doctor = %persona.name,
            specialty = %persona.specialty,
            level = intent.level.as_str(),
            "training session started"
        );

        out.push(OutboundMessage::doctor(&persona.name, &persona.opening_line));
        if let Some(characteristics) = &persona.characteristics {
            out.push(OutboundMessage::system(format!("【医生档案】{characteristics}")));
        }
        session.record(Speaker::doctor(&persona.name), &persona.opening_line);
    }

    async fn handle_doctor_interaction(
        &self,
        session: &mut Session,
        utterance: &str,
        out: &mut Vec<OutboundMessage>,
    ) {
        self.critique_turn(session, utterance, out).await;

        if is_end_training(utterance) {
            self.summarize_training(session, out).await;
            return;
        }

        self.generate_doctor_line(session, out).await;
    }

    /// Runs the coach critique for every trainee utterance in this phase.
    async fn critique_turn(
        &self,
        session: &mut Session,
        utterance: &str,
        out: &mut Vec<OutboundMessage>,
    ) {
        let doctor_prior_line = if session.transcript().len() >= 2 {
            session
                .transcript()
                .second_to_last()
                .map(|entry| entry.utterance().to_string())
                .unwrap_or_default()
        } else {
            session
                .persona()
                .map(|persona| persona.opening_line.clone())
                .unwrap_or_default()
        };

        let eval_prompt = format!(
            "作为医药销售培训教练，请针对医生刚才所说的{doctor_prior_line}，评估医药代表的以下回答：{utterance}。请给出评分（例如X/100）、合规性（例如🟢或🔴）以及具体的亮点和改进建议。"
        );

        let request = CompletionRequest::new(eval_prompt)
            .with_system_prompt(COORDINATOR_SYSTEM_PROMPT)
            .with_tools(self.tools.to_openai_tools());

        match self.invoke(request).await {
            Ok(feedback) => {
                out.push(OutboundMessage::coach(&feedback));
                session.record(Speaker::Coach, feedback);
            }
            Err(err) => {
                tracing::warn!(session_id = %session.id(), error = %err, "coach critique failed");
                out.push(OutboundMessage::coach(format!("评估时出错: {err}")));
            }
        }
    }

    /// Produces the final summary and resets the session for a new run.
    async fn summarize_training(&self, session: &mut Session, out: &mut Vec<OutboundMessage>) {
        if let Err(err) = session.enter_final_summary() {
            tracing::warn!(session_id = %session.id(), error = %err, "summary transition failed");
        }

        out.push(OutboundMessage::system("正在生成总结报告…"));

        let summary_prompt = format!(
            "作为医药销售培训教练，请对以下完整的对话记录进行总结性评估。内容应包括整体表现评分、主要优势、关键改进领域，以及可能的雷达图数据点（例如：学术性、沟通技巧、异议处理、合规性等维度，每个维度给一个分数）。对话记录如下：\n{}",
            session.transcript().render()
        );

        let request = CompletionRequest::new(summary_prompt)
            .with_system_prompt(COORDINATOR_SYSTEM_PROMPT)
            .with_tools(self.tools.to_openai_tools());

        match self.invoke(request).await {
            Ok(summary) => {
                out.push(OutboundMessage::summary(&summary));
                session.record(Speaker::Summary, summary);
                session.complete_training();
                tracing::info!(session_id = %session.id(), "training session summarized");
            }
            Err(err) => {
                // Session stays in FinalSummary; the defensive branch resets
                // it on the next message.
                tracing::warn!(session_id = %session.id(), error = %err, "summary generation failed");
                out.push(OutboundMessage::system(format!("生成总结报告时出错: {err}")));
            }
        }
    }

    /// Generates the doctor's next line from the recent context window.
    async fn generate_doctor_line(&self, session: &mut Session, out: &mut Vec<OutboundMessage>) {
        let (doctor_name, system_prompt) = match session.persona() {
            Some(persona) => (persona.name.clone(), persona.system_prompt()),
            None => (
                "医生".to_string(),
                super::persona::GENERIC_SYSTEM_PROMPT.to_string(),
            ),
        };

        let context = session
            .transcript()
            .doctor_context_window(DOCTOR_CONTEXT_CAP)
            .join("\n");
        let prompt = format!(
            "这是最近的对话历史:\n{context}\n\n现在轮到你 ({doctor_name}) 回应。你可以继续之前的对话，或者针对代表的发言提出一个相关的临床问题或常见的顾虑/异议（例如关于药物效果、副作用、价格、患者依从性等）。请生成你的下一句对话。"
        );

        let request = CompletionRequest::new(prompt)
            .with_system_prompt(system_prompt)
            .with_tools(self.tools.to_openai_tools());

        match self.invoke(request).await {
            Ok(line) => {
                let emitted = match detect_objection_topic(&line) {
                    Some(topic) => {
                        tracing::debug!(
                            session_id = %session.id(),
                            topic = topic.as_str(),
                            "doctor line carries objection cue"
                        );
                        format!("{line}{OBJECTION_CUE_MARKER}")
                    }
                    None => line.clone(),
                };
                out.push(OutboundMessage::doctor(&doctor_name, emitted));
                // Transcript stores the unmarked line.
                session.record(Speaker::doctor(&doctor_name), line);
            }
            Err(err) => {
                tracing::warn!(session_id = %session.id(), error = %err, "doctor line failed");
                out.push(OutboundMessage::doctor(
                    &doctor_name,
                    format!("生成回复时出错: {err}"),
                ));
            }
        }
    }

    /// Invokes the engine, executing any requested tools in a bounded loop.
    ///
    /// Each round either yields final text or a tool request; tool results
    /// are fed back into the exchange before re-invoking. The iteration
    /// guard prevents a misbehaving engine from looping forever.
    async fn invoke(&self, mut request: CompletionRequest) -> Result<String, CompletionError> {
        for _ in 0..MAX_TOOL_ROUNDS {
            let completion = self.engine.complete(request.clone()).await?;

            let Some(call) = completion.tool_request else {
                return Ok(completion.content);
            };

            tracing::debug!(tool = %call.name, "engine requested tool");
            let output = self.tools.dispatch(&call);
            if !output.is_success() {
                tracing::warn!(tool = %call.name, "tool reported an error result");
            }

            if !completion.content.is_empty() {
                request.push_assistant_turn(completion.content);
            }
            request.push_tool_result(call.name, output.joined_text());
        }

        Err(CompletionError::ToolLoopExceeded {
            rounds: MAX_TOOL_ROUNDS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockEngine;
    use crate::domain::tools::ToolCall;
    use serde_json::json;

    fn coordinator(engine: MockEngine) -> ConversationCoordinator {
        ConversationCoordinator::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn non_matching_start_message_emits_single_instruction() {
        let coordinator = coordinator(MockEngine::new());
        let mut session = Session::new();

        let out = coordinator.handle_message(&mut session, "你好").await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].speaker, Speaker::System);
        assert!(out[0].body.contains("药品"));
        assert_eq!(session.phase(), TrainingPhase::AwaitingStart);
        // The trainee utterance is still recorded.
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn tool_round_trip_feeds_result_back() {
        let engine = MockEngine::new()
            .with_tool_request(ToolCall::new(
                "eval_tool",
                json!({"repUtterance": "效果很好，但没有提供任何证据支持"}),
            ))
            .with_reply("综合工具评分，该回答为 70/100。");
        let coordinator = coordinator(engine.clone());
        let mut session = Session::new();
        session
            .begin_interaction(DoctorPersona::for_scenario(None, None))
            .unwrap();

        let out = coordinator.handle_message(&mut session, "继续介绍").await;

        // The first engine call requested the eval tool; the second saw its
        // result appended as a tool message.
        let second_call = &engine.calls()[1];
        assert!(second_call
            .messages
            .iter()
            .any(|m| m.name.as_deref() == Some("eval_tool") && m.content.contains("70/100")));
        assert!(out.iter().any(|m| m.speaker == Speaker::Coach));
    }

    #[tokio::test]
    async fn runaway_tool_loop_hits_iteration_guard() {
        let mut engine = MockEngine::new();
        for _ in 0..8 {
            engine = engine.with_tool_request(ToolCall::new("eval_tool", json!({})));
        }
        let coordinator = coordinator(engine);
        let mut session = Session::new();
        session
            .begin_interaction(DoctorPersona::for_scenario(None, None))
            .unwrap();

        let out = coordinator.handle_message(&mut session, "继续").await;

        // Both the critique and the doctor line fail on the guard, surfaced
        // as tagged error messages; phase is unharmed.
        assert!(out
            .iter()
            .any(|m| m.speaker == Speaker::Coach && m.body.contains("评估时出错")));
        assert_eq!(session.phase(), TrainingPhase::DoctorInteraction);
    }
}
