use serde::{Deserialize, Serialize};

/// Actions available to the retrieval agent.
///
/// Index order matters: trained policies emit logits positionally, so
/// the discriminants here must stay aligned with training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    VectorSearch,
    GraphExpand,
    Summarize,
    Stop,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; 4] = [
        Action::VectorSearch,
        Action::GraphExpand,
        Action::Summarize,
        Action::Stop,
    ];

    /// Action for a policy output index, if in range.
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Positional index of this action.
    pub fn index(&self) -> usize {
        match self {
            Action::VectorSearch => 0,
            Action::GraphExpand => 1,
            Action::Summarize => 2,
            Action::Stop => 3,
        }
    }

    /// Snake_case tag used in logs and trajectory records.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::VectorSearch => "vector_search",
            Action::GraphExpand => "graph_expand",
            Action::Summarize => "summarize",
            Action::Stop => "stop",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
