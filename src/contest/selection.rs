use crate::{client::ApiClient, contest::store::ContestStore, errors};
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Debug, Deserialize)]
pub struct Contest {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub starts: u64,
    #[serde(default)]
    pub ends: u64,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub registration_opened: bool,
    #[serde(default)]
    pub ended: bool,
}

pub fn render_contests(contests: &[Contest]) -> String {
    let mut text = String::from("Choose current contest:\n");
    for (i, contest) in contests.iter().enumerate() {
        text += &format!("{i}: {} | {}\n", contest.name, contest.org_name);
    }
    text
}

/// Interprets one line of user input as a position in a list of `count` contests.
pub fn parse_choice(line: &str, count: usize) -> Result<usize, &'static str> {
    let index: usize = line.trim().parse().map_err(|_| "Please input a number!")?;
    if index >= count {
        return Err("Contest chosen is out of range!");
    }
    Ok(index)
}

fn prompt<R: BufRead, W: Write>(
    contests: &[Contest],
    input: &mut R,
    out: &mut W,
) -> Result<usize, errors::Error> {
    out.write_all(render_contests(contests).as_bytes())?;
    out.flush()?;
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(errors::Aborted("No contest chosen".to_string()));
        }
        match parse_choice(&line, contests.len()) {
            Ok(index) => return Ok(index),
            Err(complaint) => {
                writeln!(out, "{complaint}")?;
                writeln!(out, "Choose current contest:")?;
                out.flush()?;
            }
        }
    }
}

/// Asks the judge for upcoming contests, lets the user pick one and caches its statements.
pub async fn change_contest<R: BufRead, W: Write>(
    client: &ApiClient,
    store: &ContestStore,
    index: Option<usize>,
    input: &mut R,
    out: &mut W,
) -> Result<PathBuf, errors::Error> {
    let contests: Vec<Contest> = client.get("/getUpcomingContests", &[]).await?;
    if contests.is_empty() {
        return Err(errors::Aborted("There are no upcoming contests".to_string()));
    }

    let index = match index {
        Some(index) => {
            if index >= contests.len() {
                return Err(errors::Aborted(format!(
                    "Contest {index} is out of range, there are {} contests",
                    contests.len()
                )));
            }
            index
        }
        None => prompt(&contests, input, out)?,
    };
    let contest = &contests[index];
    info!("Switching to contest #{} {:?}", contest.id, contest.name);

    let statements: serde_json::Value = client
        .get("/getContestTasks", &[("id", contest.id.to_string())])
        .await?;
    let path = store.save(contest.id, statements)?;

    writeln!(
        out,
        "Current contest changed, statements written to {}",
        path.display()
    )?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices() {
        assert_eq!(parse_choice("1\n", 3), Ok(1));
        assert_eq!(parse_choice(" 0 ", 3), Ok(0));
        assert_eq!(parse_choice("3", 3), Err("Contest chosen is out of range!"));
        assert_eq!(parse_choice("first", 3), Err("Please input a number!"));
        assert_eq!(parse_choice("", 3), Err("Please input a number!"));
    }

    #[test]
    fn prompt_retries_until_valid() {
        let contests = vec![
            Contest {
                id: 5,
                name: "Round 5".to_string(),
                org_name: "School".to_string(),
                starts: 0,
                ends: 0,
                running: true,
                registration_opened: false,
                ended: false,
            },
            Contest {
                id: 6,
                name: "Round 6".to_string(),
                org_name: "School".to_string(),
                starts: 0,
                ends: 0,
                running: false,
                registration_opened: true,
                ended: false,
            },
        ];
        let mut input = std::io::Cursor::new("x\n7\n1\n");
        let mut out = Vec::new();
        assert_eq!(prompt(&contests, &mut input, &mut out).unwrap(), 1);
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Choose current contest:\n0: Round 5 | School\n1: Round 6 | School\n"));
        assert!(out.contains("Please input a number!"));
        assert!(out.contains("Contest chosen is out of range!"));

        let mut input = std::io::Cursor::new("x\n");
        assert!(matches!(
            prompt(&contests, &mut input, &mut Vec::new()),
            Err(errors::Aborted(_))
        ));
    }
}
