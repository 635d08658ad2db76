use crate::errors;

/// Parses "3", "c" or "C" into a 0-based task position.
pub fn parse_task_ref(task: &str) -> Result<usize, errors::Error> {
    if let Ok(index) = task.parse::<usize>() {
        return Ok(index);
    }
    match task.chars().next() {
        Some(c @ 'a'..='z') => Ok(c as usize - 'a' as usize),
        Some(c @ 'A'..='Z') => Ok(c as usize - 'A' as usize),
        _ => Err(errors::TaskFormat(task.to_string())),
    }
}
