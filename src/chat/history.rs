use crate::llm::{Role, Turn};

/// The ordered turns of one session.
///
/// Append-only apart from [`History::pop_last_if_role`], which exists to roll
/// back an optimistically appended user turn after a failed dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Removes the last turn only if it has `role`. Returns the removed turn.
    pub fn pop_last_if_role(&mut self, role: Role) -> Option<Turn> {
        if self.turns.last()?.role() == role {
            self.turns.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns in conversation order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of completed (user, model) exchanges.
    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }
}
