use chrono::NaiveDate;

use crate::checklist::Checklist;
use crate::dates::{self, MotherStage};
use crate::state::Phase;
use crate::tasks::{ScheduleEntry, Task};

pub struct MotherSummary {
    pub title: &'static str,
    pub body: &'static str,
    pub mind: &'static str,
    pub support: &'static str,
}

pub fn mother_summary(stage: MotherStage) -> MotherSummary {
    match stage {
        MotherStage::NearDue => MotherSummary {
            title: "出産直前のママの状態",
            body: "前駆陣痛が増えやすく、体力の消耗も大きくなります。こまめな休息が最優先です。",
            mind: "出産への緊張と待ち遠しさが入り混じる時期です。不安を言語化できる場を用意してあげましょう。",
            support: "こまめな水分補給の声かけや温かい飲み物の用意、夜間のサポート体制を整えておきましょう。",
        },
        MotherStage::FullTerm => MotherSummary {
            title: "臨月のママの状態",
            body: "お腹の張りが強まり、腰痛や睡眠の質低下が目立つ時期です。",
            mind: "出産に向けた実感が高まりつつ、気持ちが揺らぎやすくなります。",
            support: "短時間の散歩やストレッチを一緒に行い、日常の家事は積極的に肩代わりしましょう。",
        },
        MotherStage::FinalMonth => MotherSummary {
            title: "産前1ヶ月のママの状態",
            body: "体重増加とむくみが現れやすく、睡眠時の体勢が辛くなり始めます。",
            mind: "出産準備のタスクが増え、焦りや負担を感じやすい時期です。",
            support: "TODOの棚卸しを一緒に行い、優先度の高い準備をあなたが先導しましょう。",
        },
    }
}

pub fn badge_label(phase: Phase, priority_type: i64) -> &'static str {
    match (phase, priority_type) {
        (Phase::PreBirth, 1) => "urgent",
        (Phase::PreBirth, 2) => "prep",
        (Phase::PreBirth, 3) => "support",
        (Phase::PostBirth, 1) => "paperwork",
        (Phase::PostBirth, 2) => "life-support",
        (Phase::PostBirth, 3) => "mental-care",
        _ => "task",
    }
}

pub fn format_progress_line(checklist: &Checklist) -> String {
    format!(
        "Progress: {}/{} todos done ({}%)",
        checklist.completed_count(),
        checklist.total_count(),
        checklist.progress_percentage()
    )
}

fn format_task_line(task: &Task, done: bool, phase: Phase) -> String {
    let mark = if done { "x" } else { " " };
    format!(
        "- [{mark}] {} (id {}, {})\n",
        task.text,
        task.id,
        badge_label(phase, task.priority_type)
    )
}

pub fn format_pre_birth_status(checklist: &Checklist, today: NaiveDate) -> String {
    let state = checklist.state();
    let days = dates::days_until_due(&state.due_date, today);
    let weeks = dates::weeks_pregnant(days);
    let summary = mother_summary(dates::mother_stage(weeks));

    let mut output = String::new();
    output.push_str("Phase: pre-birth\n");
    output.push_str(&format!(
        "Due date: {} ({} days to go, week {})\n",
        dates::display_date(&state.due_date),
        days,
        weeks
    ));
    output.push_str(&format_progress_line(checklist));
    output.push('\n');
    if let Some(reason) = checklist.load_error() {
        output.push_str(&format!(
            "Failed to load the todo list: {reason}. Try again later.\n"
        ));
    }
    output.push('\n');
    output.push_str(&format!("{}\n", summary.title));
    output.push_str(&format!("- Body: {}\n", summary.body));
    output.push_str(&format!("- Mind: {}\n", summary.mind));
    output.push_str(&format!("- Support: {}\n", summary.support));
    output.push('\n');
    output.push_str("When the baby arrives, run 'papasapo birth' to switch modes.");
    output.trim_end().to_string()
}

pub fn format_post_birth_status(checklist: &Checklist, today: NaiveDate) -> String {
    let state = checklist.state();
    let days = dates::days_after_birth(&state.due_date, today);

    let mut output = String::new();
    output.push_str("Phase: post-birth\n");
    output.push_str(&format!(
        "Day {} with your baby (recorded {})\n",
        days,
        dates::display_date(&state.due_date)
    ));
    output.push_str(&format_progress_line(checklist));
    output.push('\n');
    output.push('\n');
    output.push_str(&format_important_task(
        checklist.pending_tasks().first().copied(),
        state.phase,
    ));
    output.trim_end().to_string()
}

pub fn format_important_task(task: Option<&Task>, phase: Phase) -> String {
    match task {
        Some(task) => format!(
            "Next up: {} (id {}, {})",
            task.text,
            task.id,
            badge_label(phase, task.priority_type)
        ),
        None => "No pending todos. Nice work!".to_string(),
    }
}

pub fn format_checklist(checklist: &Checklist, show_completed: bool, pages: usize) -> String {
    if checklist.is_loading() {
        return "Loading the todo list...".to_string();
    }

    let mut output = String::new();
    if let Some(reason) = checklist.load_error() {
        output.push_str(&format!(
            "Failed to load the todo list: {reason}. Try again later.\n"
        ));
    }

    let phase = checklist.state().phase;
    let visible = checklist.visible_tasks();
    if visible.is_empty() {
        output.push_str("No todos to display.\n");
    } else {
        output.push_str(&format!(
            "Pending todos (showing {} of {}):\n",
            checklist.visible_count(),
            checklist.pending_len()
        ));
        for task in &visible {
            output.push_str(&format_task_line(task, false, phase));
        }
        if !checklist.is_show_more_disabled() {
            output.push_str(&format!(
                "{} more pending. Run 'papasapo list --pages {}' to show more.\n",
                checklist.pending_len() - visible.len(),
                pages + 1
            ));
        }
    }

    let completed = checklist.completed_tasks();
    if !completed.is_empty() {
        output.push('\n');
        if show_completed {
            output.push_str(&format!("Completed todos ({}):\n", completed.len()));
            for task in &completed {
                output.push_str(&format_task_line(task, true, phase));
            }
        } else {
            output.push_str(&format!(
                "Completed: {}. Run 'papasapo list --completed' to list them.\n",
                completed.len()
            ));
        }
    }
    output.trim_end().to_string()
}

pub fn format_schedule(entries: &[ScheduleEntry]) -> String {
    if entries.is_empty() {
        return "No schedule entries.".to_string();
    }
    // Zero-padded 24h times, so the lexicographic order is chronological.
    let mut ordered: Vec<&ScheduleEntry> = entries.iter().collect();
    ordered.sort_by(|left, right| left.time.cmp(&right.time).then(left.id.cmp(&right.id)));

    let mut output = String::new();
    output.push_str("Daily rhythm with your newborn:\n");
    for entry in ordered {
        output.push_str(&format!("{}  {}\n", entry.time, entry.text));
    }
    output.trim_end().to_string()
}

pub fn format_birth_dialog() -> String {
    let mut output = String::new();
    output.push_str("Switch to post-birth mode?\n");
    output.push_str(
        "This records the birth and rebuilds the checklist for life with your baby.\n",
    );
    output.push_str("Completed pre-birth todos are cleared. The switch cannot be undone.");
    output
}

pub fn format_celebration() -> String {
    let mut output = String::new();
    output.push_str("ご出産おめでとうございます！\n");
    output.push_str("Congratulations on your new baby. You did great getting everything ready,\n");
    output.push_str("and papasapo is here for what comes next.");
    output
}
