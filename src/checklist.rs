use std::collections::HashSet;

use crate::state::AppState;
use crate::store::Store;
use crate::tasks::{Task, TaskFeed};

pub const TODO_PAGE_SIZE: usize = 5;
const PERCENT_SCALE: f64 = 100.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortPolicy {
    // priorityType asc, then priority asc, then id asc.
    TypeFirst,
    // priority desc, then id asc.
    PriorityFirst,
}

// Both policies are total orders; the id comparison breaks every tie.
pub fn sort_tasks(mut tasks: Vec<Task>, policy: SortPolicy) -> Vec<Task> {
    match policy {
        SortPolicy::TypeFirst => tasks.sort_by(|left, right| {
            left.priority_type
                .cmp(&right.priority_type)
                .then(left.priority.cmp(&right.priority))
                .then(left.id.cmp(&right.id))
        }),
        SortPolicy::PriorityFirst => tasks.sort_by(|left, right| {
            right
                .priority
                .cmp(&left.priority)
                .then(left.id.cmp(&right.id))
        }),
    }
    tasks
}

pub fn progress_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * PERCENT_SCALE).round() as u8
}

pub struct Checklist {
    store: Store,
    state: AppState,
    sorted: Vec<Task>,
    loading: bool,
    load_error: Option<String>,
    visible_count: usize,
}

impl Checklist {
    pub fn new(store: Store, state: AppState, feed: TaskFeed, policy: SortPolicy) -> Self {
        let (sorted, loading, load_error) = match feed {
            TaskFeed::Loading => (Vec::new(), true, None),
            TaskFeed::Failed(reason) => (Vec::new(), false, Some(reason)),
            TaskFeed::Ready(tasks) => (sort_tasks(tasks, policy), false, None),
        };
        let mut checklist = Self {
            store,
            state,
            sorted,
            loading,
            load_error,
            visible_count: TODO_PAGE_SIZE,
        };
        checklist.reconcile_visible_count();
        checklist
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    fn completed_id_set(&self) -> HashSet<&str> {
        self.state
            .completed_todos
            .iter()
            .map(String::as_str)
            .collect()
    }

    pub fn contains_task(&self, task_id: i64) -> bool {
        self.sorted.iter().any(|task| task.id == task_id)
    }

    pub fn total_count(&self) -> usize {
        self.sorted.len()
    }

    pub fn completed_count(&self) -> usize {
        let completed = self.completed_id_set();
        self.sorted
            .iter()
            .filter(|task| completed.contains(task.id.to_string().as_str()))
            .count()
    }

    pub fn progress_percentage(&self) -> u8 {
        progress_percentage(self.completed_count(), self.total_count())
    }

    pub fn pending_tasks(&self) -> Vec<&Task> {
        let completed = self.completed_id_set();
        self.sorted
            .iter()
            .filter(|task| !completed.contains(task.id.to_string().as_str()))
            .collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        let completed = self.completed_id_set();
        self.sorted
            .iter()
            .filter(|task| completed.contains(task.id.to_string().as_str()))
            .collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending_tasks().len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        let mut pending = self.pending_tasks();
        pending.truncate(self.visible_count);
        pending
    }

    pub fn is_show_more_disabled(&self) -> bool {
        self.visible_count >= self.pending_len()
    }

    pub fn show_more(&mut self) {
        let next = self.visible_count + TODO_PAGE_SIZE;
        self.visible_count = next.min(self.pending_len());
    }

    // Keeps the pagination cursor honest when the pending set changes out
    // from under it. No pending work zeroes the cursor. A zeroed cursor
    // restarts at one page; a cursor past the end clamps to the end.
    fn reconcile_visible_count(&mut self) {
        let pending = self.pending_len();
        if pending == 0 {
            self.visible_count = 0;
            return;
        }
        if self.visible_count == 0 {
            self.visible_count = TODO_PAGE_SIZE.min(pending);
            return;
        }
        if self.visible_count > pending {
            self.visible_count = pending;
        }
    }

    // The sole mutator of the completed set. The store write is fire and
    // forget: without persistence the checklist still works, it just
    // resets on the next run. Returns the new state so the caller sees
    // the flip without a reload.
    pub fn toggle(&mut self, task_id: i64) -> &AppState {
        let source_id = task_id.to_string();
        if self.state.completed_todos.iter().any(|id| id == &source_id) {
            self.state.completed_todos.retain(|id| id != &source_id);
        } else {
            self.state.completed_todos.push(source_id);
        }
        let _ = self.store.save_state(&self.state);
        self.reconcile_visible_count();
        &self.state
    }
}
