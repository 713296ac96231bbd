use replay_types::{
    AssistantPayload, Block, ContentBlock, Event, EventPayload, Session, SystemNote, Turn,
    TurnOrigin,
};
use std::time::Duration;

use super::classify::{UserIntent, classify_user};

/// Segmentation state: at most one turn is open (mutable) at a time.
#[derive(Debug, Default)]
enum TurnState {
    #[default]
    NoOpenTurn,
    OpenTurn(Turn),
}

/// Accumulator for folding an event sequence into turns.
///
/// Owns all in-progress state for a single pass, so independent passes share
/// nothing. Typical use:
///
/// ```
/// use replay_engine::Segmenter;
/// # let events: Vec<replay_types::Event> = Vec::new();
/// let session = events.iter().fold(Segmenter::new(), Segmenter::step).finish();
/// assert!(session.turns.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Segmenter {
    state: TurnState,
    /// Duration waiting for the next closing transition
    pending_duration: Option<Duration>,
    sealed: Vec<Turn>,
    opened: usize,
    session: Session,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the accumulator.
    pub fn step(mut self, event: &Event) -> Self {
        self.apply(event);
        self
    }

    /// Apply one event in place.
    pub fn apply(&mut self, event: &Event) {
        self.observe_session(event);

        match &event.payload {
            EventPayload::User(payload) => {
                self.apply_user(event, classify_user(event.is_meta, payload.as_ref()))
            }
            EventPayload::Assistant(Some(message)) => self.apply_assistant(message),
            EventPayload::Assistant(None) => {}
            EventPayload::System(note) => self.apply_system(note),
            EventPayload::Noise => {}
        }
    }

    /// Close any open turn and return the assembled session.
    pub fn finish(mut self) -> Session {
        self.close_turn();

        let mut session = self.session;
        session.start_time = self.sealed.first().and_then(|t| t.timestamp);
        session.end_time = self.sealed.last().and_then(|t| t.timestamp);
        session.turns = self.sealed;
        session
    }

    fn apply_user(&mut self, event: &Event, intent: UserIntent<'_>) {
        match intent {
            UserIntent::Meta | UserIntent::Empty => {}
            UserIntent::ShellOutput(output) => {
                if !output.is_empty()
                    && let Some(turn) = self.open_turn_mut()
                {
                    turn.blocks.push(Block::Text { text: output });
                }
            }
            UserIntent::ShellInput(command) => {
                self.open_turn(event, format!("!{}", command), TurnOrigin::Shell);
            }
            UserIntent::ToolResults(results) => {
                if let Some(turn) = self.open_turn_mut() {
                    turn.blocks
                        .extend(results.iter().map(|result| Block::ToolResult {
                            id: result.tool_use_id.clone(),
                            text: result.content.clone(),
                            is_error: result.is_error,
                        }));
                }
            }
            UserIntent::SlashCommand(name) => {
                self.open_turn(event, name.to_string(), TurnOrigin::SlashCommand);
            }
            UserIntent::Prompt(text) => {
                self.open_turn(event, text.to_string(), TurnOrigin::Prompt);
            }
        }
    }

    fn apply_assistant(&mut self, message: &AssistantPayload) {
        let TurnState::OpenTurn(turn) = &mut self.state else {
            return;
        };

        if !message.model.is_empty() && turn.model.is_none() {
            turn.model = Some(message.model.clone());
            if self.session.model.is_none() {
                self.session.model = Some(message.model.clone());
            }
        }

        for content in &message.content {
            match content {
                ContentBlock::Text { text } => {
                    let text = text.trim();
                    if !text.is_empty() {
                        turn.blocks.push(Block::text(text));
                    }
                }
                ContentBlock::Thinking { thinking } => {
                    if !thinking.is_empty() {
                        turn.blocks.push(Block::Thinking {
                            text: thinking.clone(),
                        });
                    }
                }
                ContentBlock::ToolUse { id, name, input } => {
                    turn.blocks.push(Block::ToolUse {
                        name: name.clone(),
                        id: id.clone(),
                        input: input.clone(),
                    });
                }
                ContentBlock::Unknown => {}
            }
        }
    }

    fn apply_system(&mut self, note: &SystemNote) {
        if let Some(duration) = note.turn_duration() {
            self.pending_duration = Some(duration);
        }
    }

    fn open_turn_mut(&mut self) -> Option<&mut Turn> {
        match &mut self.state {
            TurnState::OpenTurn(turn) => Some(turn),
            TurnState::NoOpenTurn => None,
        }
    }

    /// Seal the current turn (if any) and open a new one.
    fn open_turn(&mut self, event: &Event, user_text: String, origin: TurnOrigin) {
        self.close_turn();

        self.opened += 1;
        let mut turn = Turn::new(self.opened, user_text, origin);
        turn.timestamp = event.timestamp;
        turn.cwd = event.cwd.clone();
        turn.git_branch = event.git_branch.clone();

        if self.session.cwd.is_none() {
            self.session.cwd = event.cwd.clone();
        }
        if self.session.git_branch.is_none() {
            self.session.git_branch = event.git_branch.clone();
        }

        self.state = TurnState::OpenTurn(turn);
    }

    /// Seal the open turn, flushing the pending duration onto it. With no
    /// open turn the pending duration is kept for the next one.
    fn close_turn(&mut self) {
        if let TurnState::OpenTurn(mut turn) = std::mem::take(&mut self.state) {
            if let Some(duration) = self.pending_duration.take() {
                turn.duration = Some(duration);
            }
            self.sealed.push(turn);
        }
    }

    fn observe_session(&mut self, event: &Event) {
        if self.session.id.is_empty() && !event.session_id.is_empty() {
            self.session.id = event.session_id.clone();
        }
        if self.session.slug.is_none() {
            self.session.slug = event.slug.clone().filter(|s| !s.is_empty());
        }
        if self.session.version.is_none() {
            self.session.version = event.version.clone().filter(|v| !v.is_empty());
        }
    }
}
