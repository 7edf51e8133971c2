use mid_core::Condition;

pub const WIN_POINTS: i32 = 10;
pub const LOSS_POINTS: i32 = -10;

/// Win pays on a hit, lose costs on a miss, neutral never scores.
pub fn points(condition: Condition, hit: bool) -> i32 {
    match (condition, hit) {
        (Condition::Win, true) => WIN_POINTS,
        (Condition::Lose, false) => LOSS_POINTS,
        _ => 0,
    }
}

/// Text shown on the feedback screen after a trial.
pub fn trial_feedback(condition: Condition, hit: bool, total_points: i32) -> String {
    let headline = match (condition, hit) {
        (Condition::Win, true) => "Hit! +10 points",
        (_, true) => "Hit!",
        (Condition::Lose, false) => "Miss! -10 points",
        (_, false) => "Miss!",
    };
    format!("{headline}\nTotal: {total_points} points")
}

/// Shown between blocks, before the countdown.
pub fn performance_feedback(block_points: i32) -> String {
    if block_points < 0 {
        "Your performance in this block was below expectation.\n\
         Try to respond faster in the next block.\nThanks."
            .to_string()
    } else {
        "Good job!\nKeep it up!".to_string()
    }
}
