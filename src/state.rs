use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Phase {
    #[serde(rename = "pre-birth")]
    PreBirth,
    #[serde(rename = "post-birth")]
    PostBirth,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreBirth => "pre-birth",
            Self::PostBirth => "post-birth",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppState {
    #[serde(rename = "appState")]
    pub phase: Phase,
    #[serde(rename = "completedTodos")]
    pub completed_todos: Vec<String>,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

pub fn create_initial_state(due_date: &str) -> AppState {
    AppState {
        phase: Phase::PreBirth,
        completed_todos: Vec::new(),
        due_date: due_date.to_string(),
    }
}

// Fails closed (None) only when the record is unsalvageable, meaning bad
// JSON or a missing/empty dueDate. Everything else degrades field by
// field so old or hand-edited records keep loading.
pub fn parse_stored_state(raw: &str) -> Option<AppState> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    let object = parsed.as_object()?;
    let due_date = object.get("dueDate")?.as_str()?;
    if due_date.is_empty() {
        return None;
    }
    let completed_todos = object
        .get("completedTodos")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let phase = match object.get("appState").and_then(Value::as_str) {
        Some("post-birth") => Phase::PostBirth,
        _ => Phase::PreBirth,
    };
    Some(AppState {
        phase,
        completed_todos,
        due_date: due_date.to_string(),
    })
}
