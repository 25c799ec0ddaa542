use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::AppError;
use crate::fallback;
use crate::state::Phase;

pub const DEFAULT_ENDPOINT: &str = "https://hackathon202509-backend.onrender.com/tasks";
const FETCH_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Task {
    pub id: i64,
    pub priority: i64,
    #[serde(rename = "priorityType")]
    pub priority_type: i64,
    pub text: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub text: String,
    pub time: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TaskCategory {
    PreBirth,
    PostBirth,
}

impl TaskCategory {
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::PreBirth => "pre-birth",
            Self::PostBirth => "post-birth",
        }
    }
}

// What the checklist engine consumes: one fetch already resolved one way
// or the other, never a half-applied result.
#[derive(Clone, Debug)]
pub enum TaskFeed {
    Loading,
    Failed(String),
    Ready(Vec<Task>),
}

impl Default for TaskFeed {
    // A feed that nothing has fetched yet.
    fn default() -> Self {
        TaskFeed::Loading
    }
}

pub fn parse_task(value: &Value) -> Option<Task> {
    let task: Task = serde_json::from_value(value.clone()).ok()?;
    if task.text.is_empty() {
        return None;
    }
    Some(task)
}

pub fn parse_task_list(payload: &Value) -> Result<Vec<Task>, AppError> {
    let items = payload.as_array().ok_or_else(|| {
        AppError::TaskSource("invalid todo payload: expected an array".to_string())
    })?;
    Ok(items.iter().filter_map(parse_task).collect())
}

pub fn parse_schedule_entry(value: &Value) -> Option<ScheduleEntry> {
    let entry: ScheduleEntry = serde_json::from_value(value.clone()).ok()?;
    if entry.text.is_empty() || entry.time.is_empty() {
        return None;
    }
    Some(entry)
}

pub fn parse_schedule_list(payload: &Value) -> Result<Vec<ScheduleEntry>, AppError> {
    let items = payload.as_array().ok_or_else(|| {
        AppError::TaskSource("invalid schedule payload: expected an array".to_string())
    })?;
    Ok(items.iter().filter_map(parse_schedule_entry).collect())
}

fn read_tasks_file(path: &Path) -> Result<Vec<Task>, AppError> {
    let raw = fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&raw)?;
    parse_task_list(&payload)
}

pub struct TaskSource {
    client: Client,
    base: Url,
    tasks_file: Option<PathBuf>,
    task_cache: HashMap<TaskCategory, Vec<Task>>,
    schedule_cache: Option<Vec<ScheduleEntry>>,
}

impl TaskSource {
    pub fn new(endpoint: &str, tasks_file: Option<PathBuf>) -> Result<Self, AppError> {
        let base = Url::parse(endpoint)
            .map_err(|_| AppError::InvalidInput(format!("invalid endpoint url: {endpoint}")))?;
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            base,
            tasks_file,
            task_cache: HashMap::new(),
            schedule_cache: None,
        })
    }

    fn request_url(&self, path: &str) -> Result<Url, AppError> {
        let joined = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined)
            .map_err(|_| AppError::InvalidInput(format!("invalid endpoint url: {joined}")))
    }

    async fn fetch_value(&self, path: &str) -> Result<Value, AppError> {
        let url = self.request_url(path)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::TaskSource(format!(
                "request for {path} failed with status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    async fn fetch_remote_tasks(&self, category: TaskCategory) -> Result<Vec<Task>, AppError> {
        let payload = self.fetch_value(category.as_path()).await?;
        parse_task_list(&payload)
    }

    // Pre-birth has no built-in fallback: failures surface as a load error
    // and an empty list is a valid, empty checklist.
    pub async fn pre_birth_tasks(&mut self) -> Result<Vec<Task>, AppError> {
        if let Some(tasks) = self.task_cache.get(&TaskCategory::PreBirth) {
            return Ok(tasks.clone());
        }
        let tasks = match self.tasks_file.as_deref() {
            Some(path) => read_tasks_file(path)?,
            None => self.fetch_remote_tasks(TaskCategory::PreBirth).await?,
        };
        self.task_cache.insert(TaskCategory::PreBirth, tasks.clone());
        Ok(tasks)
    }

    // The post-birth checklist must always render. Any fetch failure or
    // an empty result falls back to the built-in dataset.
    pub async fn post_birth_tasks(&mut self) -> Vec<Task> {
        if let Some(tasks) = self.task_cache.get(&TaskCategory::PostBirth) {
            return tasks.clone();
        }
        let tasks = match self.fetch_remote_tasks(TaskCategory::PostBirth).await {
            Ok(tasks) if !tasks.is_empty() => tasks,
            _ => fallback::post_birth_tasks(),
        };
        self.task_cache.insert(TaskCategory::PostBirth, tasks.clone());
        tasks
    }

    pub async fn schedule(&mut self) -> Vec<ScheduleEntry> {
        if let Some(entries) = &self.schedule_cache {
            return entries.clone();
        }
        let entries = match self.fetch_remote_schedule().await {
            Ok(entries) if !entries.is_empty() => entries,
            _ => fallback::post_birth_schedule(),
        };
        self.schedule_cache = Some(entries.clone());
        entries
    }

    async fn fetch_remote_schedule(&self) -> Result<Vec<ScheduleEntry>, AppError> {
        let payload = self.fetch_value("schedule").await?;
        parse_schedule_list(&payload)
    }

    pub async fn tasks_for_phase(&mut self, phase: Phase) -> TaskFeed {
        match phase {
            Phase::PreBirth => match self.pre_birth_tasks().await {
                Ok(tasks) => TaskFeed::Ready(tasks),
                Err(err) => TaskFeed::Failed(err.to_string()),
            },
            Phase::PostBirth => TaskFeed::Ready(self.post_birth_tasks().await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    // Endpoint that refuses connections immediately.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/tasks";

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/tasks")
    }

    fn task_value(id: i64) -> Value {
        serde_json::json!({"id": id, "priority": 5, "priorityType": 2, "text": "text"})
    }

    #[test]
    fn parse_task_requires_the_full_shape() {
        assert!(parse_task(&task_value(1)).is_some());
        assert!(parse_task(&serde_json::json!({"id": "1", "priority": 5, "priorityType": 2, "text": "t"})).is_none());
        assert!(parse_task(&serde_json::json!({"id": 1, "priorityType": 2, "text": "t"})).is_none());
        assert!(parse_task(&serde_json::json!({"id": 1, "priority": 5, "priorityType": 2, "text": ""})).is_none());
        assert!(parse_task(&serde_json::json!("task")).is_none());
    }

    #[test]
    fn parse_task_list_drops_invalid_elements() {
        let payload = serde_json::json!([
            {"id": 1, "priority": 5, "priorityType": 2, "text": "keep"},
            {"id": 2, "priority": "high", "priorityType": 2, "text": "drop"},
            "junk",
            {"id": 3, "priority": 4, "priorityType": 1, "text": "keep too"}
        ]);
        let tasks = parse_task_list(&payload).expect("tasks");
        assert_eq!(
            tasks.iter().map(|task| task.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn parse_task_list_rejects_non_arrays() {
        let err = parse_task_list(&serde_json::json!({"items": []})).unwrap_err();
        match err {
            AppError::TaskSource(message) => assert!(message.contains("expected an array")),
            _ => panic!("unexpected error type"),
        }
    }

    #[test]
    fn parse_schedule_list_validates_each_entry() {
        let payload = serde_json::json!([
            {"id": 1, "text": "wake up", "time": "06:00"},
            {"id": 2, "text": "", "time": "07:00"},
            {"id": 3, "text": "feed", "time": ""},
            {"id": 4, "text": "nap", "time": "13:00"}
        ]);
        let entries = parse_schedule_list(&payload).expect("entries");
        assert_eq!(
            entries.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            vec![1, 4]
        );
    }

    #[tokio::test]
    async fn post_birth_tasks_fall_back_when_unreachable() {
        let mut source = TaskSource::new(DEAD_ENDPOINT, None).expect("source");
        assert_eq!(source.post_birth_tasks().await, fallback::post_birth_tasks());
    }

    #[tokio::test]
    async fn post_birth_tasks_fall_back_on_empty_payload() {
        let endpoint = serve_once("HTTP/1.1 200 OK", "[]");
        let mut source = TaskSource::new(&endpoint, None).expect("source");
        assert_eq!(source.post_birth_tasks().await, fallback::post_birth_tasks());
    }

    #[tokio::test]
    async fn post_birth_tasks_fall_back_on_server_error() {
        let endpoint = serve_once("HTTP/1.1 500 Internal Server Error", "");
        let mut source = TaskSource::new(&endpoint, None).expect("source");
        assert_eq!(source.post_birth_tasks().await, fallback::post_birth_tasks());
    }

    #[tokio::test]
    async fn post_birth_tasks_use_a_valid_remote_payload() {
        let endpoint = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"id":7,"priority":3,"priorityType":1,"text":"remote"},{"id":"bad"}]"#,
        );
        let mut source = TaskSource::new(&endpoint, None).expect("source");
        let tasks = source.post_birth_tasks().await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 7);
        assert_eq!(tasks[0].text, "remote");
    }

    #[tokio::test]
    async fn fallback_survives_caller_mutation() {
        let mut source = TaskSource::new(DEAD_ENDPOINT, None).expect("source");
        let mut tasks = source.post_birth_tasks().await;
        tasks.clear();
        tasks.push(Task {
            id: 999,
            priority: 0,
            priority_type: 1,
            text: "corrupted".to_string(),
        });
        assert_eq!(source.post_birth_tasks().await, fallback::post_birth_tasks());
    }

    #[tokio::test]
    async fn schedule_falls_back_when_unreachable() {
        let mut source = TaskSource::new(DEAD_ENDPOINT, None).expect("source");
        assert_eq!(source.schedule().await, fallback::post_birth_schedule());
    }

    #[tokio::test]
    async fn pre_birth_tasks_propagate_transport_failure() {
        let mut source = TaskSource::new(DEAD_ENDPOINT, None).expect("source");
        assert!(source.pre_birth_tasks().await.is_err());
        match source.tasks_for_phase(Phase::PreBirth).await {
            TaskFeed::Failed(_) => {}
            _ => panic!("expected a failed feed"),
        }
    }

    #[tokio::test]
    async fn pre_birth_tasks_accept_an_empty_payload() {
        let endpoint = serve_once("HTTP/1.1 200 OK", "[]");
        let mut source = TaskSource::new(&endpoint, None).expect("source");
        let tasks = source.pre_birth_tasks().await.expect("tasks");
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn pre_birth_tasks_read_the_local_file_when_set() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("pre-birth.json");
        std::fs::write(
            &path,
            r#"[{"id":2,"priority":9,"priorityType":2,"text":"local"},{"id":3}]"#,
        )
        .expect("write");
        let mut source = TaskSource::new(DEAD_ENDPOINT, Some(path)).expect("source");
        let tasks = source.pre_birth_tasks().await.expect("tasks");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "local");
    }

    #[tokio::test]
    async fn pre_birth_tasks_surface_a_missing_local_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let mut source = TaskSource::new(DEAD_ENDPOINT, Some(dir.path().join("absent.json")))
            .expect("source");
        assert!(source.pre_birth_tasks().await.is_err());
    }

    #[tokio::test]
    async fn task_cache_serves_repeat_requests_without_refetching() {
        let endpoint = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"id":1,"priority":1,"priorityType":1,"text":"once"}]"#,
        );
        let mut source = TaskSource::new(&endpoint, None).expect("source");
        let first = source.post_birth_tasks().await;
        // The stub only answers once; a second hit must come from the cache.
        let second = source.post_birth_tasks().await;
        assert_eq!(first, second);
        assert_eq!(first[0].text, "once");
    }
}
