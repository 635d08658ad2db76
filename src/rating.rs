use crate::{client::ApiClient, errors, message::nullable};
use itertools::Itertools;
use serde::Deserialize;
use std::io::Write;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Rating {
    pub frozen: bool,
    #[serde(deserialize_with = "nullable::or_default")]
    pub labels: Vec<String>,
    pub pages: u64,
    #[serde(deserialize_with = "nullable::or_default")]
    pub table: Vec<Points>,
    #[serde(deserialize_with = "nullable::or_default")]
    pub you: Points,
    pub your_page: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Points {
    #[serde(deserialize_with = "nullable::or_default")]
    pub avatar: String,
    pub label: u64,
    #[serde(deserialize_with = "nullable::or_default")]
    pub login: String,
    pub place: u64,
    /// One `[points, seconds]` pair per task
    #[serde(deserialize_with = "nullable::or_default")]
    pub results: Vec<Vec<i64>>,
    pub sum: u64,
    pub time: u64,
    pub uid: u64,
}

#[derive(Clone, Debug)]
pub struct RatingRequest {
    pub page: u64,
    pub label: u64,
    pub all: bool,
    pub show_time: bool,
}

fn cell(result: &[i64], show_time: bool) -> String {
    let points = result.first().copied().unwrap_or(0);
    if !show_time {
        return format!("| {points:3} ");
    }
    let seconds = result.get(1).copied().unwrap_or(0);
    format!(
        "| {points:3} {:2}:{:02}:{:02} ",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}

fn cells(points: &Points, show_time: bool) -> String {
    points
        .results
        .iter()
        .map(|result| cell(result, show_time))
        .join("")
}

pub fn render_row(points: &Points, show_time: bool) -> String {
    format!(
        "{:3}: {:>30} {} {}",
        points.place,
        points.login,
        cells(points, show_time),
        points.sum
    )
}

pub fn render_you(rating: &Rating, page: u64, show_time: bool) -> String {
    format!(
        "{page} / {} pages\n{:3}: you  {} {}",
        rating.pages,
        rating.you.place,
        cells(&rating.you, show_time),
        rating.you.sum
    )
}

pub fn render_labels(rating: &Rating) -> String {
    rating
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}: {label}\n", i + 1))
        .collect()
}

pub async fn fetch_page(
    client: &ApiClient,
    contest_id: u64,
    page: u64,
    label: u64,
) -> Result<Rating, errors::Error> {
    client
        .get(
            "/getContestTable",
            &[
                ("contestid", contest_id.to_string()),
                ("page", page.to_string()),
                ("label", label.to_string()),
            ],
        )
        .await
}

pub async fn print_labels<W: Write>(
    client: &ApiClient,
    contest_id: u64,
    out: &mut W,
) -> Result<(), errors::Error> {
    let rating = fetch_page(client, contest_id, 1, 0).await?;
    out.write_all(render_labels(&rating).as_bytes())?;
    Ok(())
}

/// Prints one page of the table with the caller's own standing, or every page in a row.
pub async fn print_rating<W: Write>(
    client: &ApiClient,
    contest_id: u64,
    request: RatingRequest,
    out: &mut W,
) -> Result<(), errors::Error> {
    let mut page = if request.all { 1 } else { request.page.max(1) };
    loop {
        let rating = fetch_page(client, contest_id, page, request.label).await?;
        for points in &rating.table {
            writeln!(out, "{}", render_row(points, request.show_time))?;
        }
        if !request.all {
            writeln!(out, "{}", render_you(&rating, page, request.show_time))?;
            return Ok(());
        }
        if page >= rating.pages {
            return Ok(());
        }
        page += 1;
    }
}
