use crate::contest::store::CachedContest;
use itertools::Itertools;

pub fn render_tasks(contest: &CachedContest) -> String {
    contest
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| format!("{i}: {}, Solved by: {}\n", task.name, task.solved_by))
        .collect()
}

pub fn render_languages(contest: &CachedContest) -> String {
    contest
        .languages
        .iter()
        .map(|language| match &language.verbose {
            Some(verbose) => format!(
                "{} ({verbose}): {}\n",
                language.code,
                language.extensions.iter().join(", ")
            ),
            None => format!("{}: {}\n", language.code, language.extensions.iter().join(", ")),
        })
        .collect()
}
