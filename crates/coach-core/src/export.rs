use crate::models::WorkoutPlan;

const DEFAULT_EXPORT_STEM: &str = "workout-plan";

/// Plain-text report used when sharing a plan.
pub fn plan_to_text(plan: &WorkoutPlan) -> String {
    let mut lines = vec![plan.title.clone(), String::new()];

    if !plan.description.is_empty() {
        lines.push(plan.description.clone());
        lines.push(String::new());
    }

    lines.push("WEEKLY SCHEDULE".to_string());
    lines.push("================".to_string());
    lines.push(String::new());

    for (day_index, day) in plan.weekly_schedule.iter().enumerate() {
        lines.push(format!("{}. {} — {}", day_index + 1, day.day, day.focus));

        for (exercise_index, exercise) in day.exercises.iter().enumerate() {
            let rest = match exercise.rest.as_deref() {
                Some(rest) if !rest.is_empty() => format!(" | Rest: {rest}"),
                _ => String::new(),
            };
            lines.push(format!(
                "   {}) {} | Sets: {} | Reps: {}{rest}",
                exercise_index + 1,
                exercise.name,
                exercise.sets,
                exercise.reps,
            ));
        }

        if let Some(notes) = day.notes.as_deref().filter(|notes| !notes.is_empty()) {
            lines.push(format!("   Notes: {notes}"));
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn export_file_name(title: &str) -> String {
    format!("{}.txt", file_stem(title))
}

fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !stem.is_empty() {
                stem.push('-');
            }
            pending_separator = false;
            stem.push(ch);
        } else {
            pending_separator = true;
        }
    }

    if stem.is_empty() {
        DEFAULT_EXPORT_STEM.to_string()
    } else {
        stem
    }
}
