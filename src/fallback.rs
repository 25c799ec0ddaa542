use crate::tasks::{ScheduleEntry, Task};

fn task(id: i64, priority: i64, priority_type: i64, text: &str) -> Task {
    Task {
        id,
        priority,
        priority_type,
        text: text.to_string(),
    }
}

fn entry(id: i64, time: &str, text: &str) -> ScheduleEntry {
    ScheduleEntry {
        id,
        text: text.to_string(),
        time: time.to_string(),
    }
}

// Built-in post-birth checklist, served whenever the remote source cannot.
// Each call builds a fresh list; callers can never corrupt the dataset.
pub fn post_birth_tasks() -> Vec<Task> {
    vec![
        task(1, 10, 1, "出生届を役所に提出する"),
        task(2, 9, 1, "健康保険の加入手続きをする"),
        task(3, 8, 1, "児童手当の申請をする"),
        task(4, 10, 3, "ママの産後うつに注意を払う"),
        task(5, 9, 2, "授乳のサポートをする"),
        task(6, 8, 2, "おむつ替えを積極的に行う"),
        task(7, 9, 2, "夜間の授乳・おむつ替えを分担する"),
        task(8, 7, 2, "赤ちゃんの沐浴を担当する"),
        task(9, 8, 2, "家事を率先して行う"),
        task(10, 10, 3, "ママの話を聞き精神的サポートをする"),
        task(11, 8, 1, "1ヶ月健診の付き添いをする"),
        task(12, 7, 1, "予防接種のスケジュールを確認する"),
        task(13, 6, 3, "ママの外出時間を作ってあげる"),
        task(14, 8, 3, "赤ちゃんとの時間を大切にする"),
        task(15, 5, 3, "写真・動画で成長記録を残す"),
    ]
}

pub fn post_birth_schedule() -> Vec<ScheduleEntry> {
    vec![
        entry(1, "06:00", "起床・ママの体調チェック"),
        entry(2, "07:30", "朝の授乳とおむつ替え"),
        entry(3, "09:00", "出生届の提出準備"),
        entry(4, "12:00", "昼食づくりとママの休憩サポート"),
        entry(5, "14:00", "児童手当申請に必要な書類整理"),
        entry(6, "17:30", "健康保険加入手続きの確認"),
        entry(7, "20:00", "夜の授乳・おむつ替えサポート"),
        entry(8, "22:00", "ママのメンタルケアと一日の振り返り"),
    ]
}
