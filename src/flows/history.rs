//! Handler for questions about the conversation itself.

use async_trait::async_trait;

use super::{Flow, FlowError, FlowOutcome, FlowRequest};
use crate::memory::ConversationMemory;

/// Reply when a transcript is requested but memory holds no turns yet.
pub const NO_PRIOR_MESSAGES_REPLY: &str = "I have no record of earlier messages.";

/// Clarification reply for history-routed questions the handler cannot map
/// to the first message, the last message, or the full transcript.
pub const UNRELATED_REPLY: &str =
    "That question does not seem to be about our conversation history. Can I help with anything else?";

// Cue phrases in English and Portuguese; the original deployment served
// Portuguese-speaking users.
const FIRST_MESSAGE_CUES: [&str; 2] = ["first message", "primeira mensagem"];
const LAST_MESSAGE_CUES: [&str; 2] = ["last message", "última mensagem"];
const TRANSCRIPT_CUES: [&str; 4] = [
    "show history",
    "full history",
    "mostrar histórico",
    "ver histórico",
];

fn wants(prompt: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| prompt.contains(cue))
}

fn transcript(memory: &ConversationMemory) -> String {
    let mut lines = String::from("Here is the conversation history:\n\n");
    for turn in memory.all() {
        lines.push_str(&format!("{}: {}\n", turn.speaker, turn.content));
    }
    lines
}

/// Answers history questions directly from [`ConversationMemory`], without
/// any provider call.
pub struct HistoryFlow;

#[async_trait]
impl Flow for HistoryFlow {
    async fn run(&self, request: FlowRequest<'_>) -> Result<FlowOutcome, FlowError> {
        let prompt = request.prompt.to_lowercase();
        let memory = request.memory;

        if wants(&prompt, &FIRST_MESSAGE_CUES) {
            if let Some(turn) = memory.first() {
                return Ok(FlowOutcome::message(format!(
                    "Your first message was: '{}'",
                    turn.content
                )));
            }
        }

        if wants(&prompt, &LAST_MESSAGE_CUES) {
            if let Some(turn) = memory.last() {
                return Ok(FlowOutcome::message(format!(
                    "The last message was: '{}'",
                    turn.content
                )));
            }
        }

        if wants(&prompt, &TRANSCRIPT_CUES) {
            if memory.is_empty() {
                return Ok(FlowOutcome::message(NO_PRIOR_MESSAGES_REPLY));
            }
            return Ok(FlowOutcome::message(transcript(memory)));
        }

        Ok(FlowOutcome::message(UNRELATED_REPLY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Turn;

    fn seeded_memory() -> ConversationMemory {
        let mut memory = ConversationMemory::new();
        memory.append(Turn::user("oi"));
        memory.append(Turn::assistant("olá"));
        memory
    }

    async fn reply(prompt: &str, memory: &ConversationMemory) -> String {
        HistoryFlow
            .run(FlowRequest { prompt, memory })
            .await
            .expect("history flow failed")
            .messages
            .pop()
            .expect("one message expected")
    }

    #[tokio::test]
    async fn quotes_the_first_message() {
        let memory = seeded_memory();
        let reply = reply("qual foi minha primeira mensagem?", &memory).await;
        assert!(reply.contains("oi"), "reply was: {reply}");
    }

    #[tokio::test]
    async fn quotes_the_last_message() {
        let memory = seeded_memory();
        let reply = reply("what was the last message?", &memory).await;
        assert!(reply.contains("olá"), "reply was: {reply}");
    }

    #[tokio::test]
    async fn formats_the_full_transcript() {
        let memory = seeded_memory();
        let reply = reply("please show history", &memory).await;
        assert!(reply.contains("User: oi"));
        assert!(reply.contains("Assistant: olá"));
    }

    #[tokio::test]
    async fn empty_memory_transcript_reports_no_prior_messages() {
        let memory = ConversationMemory::new();
        let reply = reply("mostrar histórico", &memory).await;
        assert_eq!(reply, NO_PRIOR_MESSAGES_REPLY);
    }

    #[tokio::test]
    async fn first_message_request_with_empty_memory_asks_for_clarification() {
        let memory = ConversationMemory::new();
        let reply = reply("what was my first message?", &memory).await;
        assert_eq!(reply, UNRELATED_REPLY);
    }

    #[tokio::test]
    async fn unrelated_question_gets_the_clarification_reply() {
        let memory = seeded_memory();
        let reply = reply("what is the weather like?", &memory).await;
        assert_eq!(reply, UNRELATED_REPLY);
    }
}
