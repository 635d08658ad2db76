use crate::{errors, errors::ToResult, message::nullable};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const STATEMENTS_CACHE: &str = "statements.json";

#[derive(Clone, Debug, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub name: String,
    #[serde(default)]
    pub solved_by: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Langs {
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub api: Vec<String>,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub extensions: Vec<Vec<String>>,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub verbose: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub verbose: Option<String>,
    pub extensions: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct CachedContest {
    pub id: u64,
    pub name: String,
    pub tasks: Vec<Task>,
    pub languages: Vec<Language>,
}

#[derive(Deserialize)]
struct Statements {
    id: u64,
    #[serde(default, deserialize_with = "nullable::or_default")]
    name: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    tasks: Vec<Task>,
    #[serde(default, deserialize_with = "nullable::or_default")]
    langs: Langs,
}

impl CachedContest {
    pub fn from_json(data: &[u8]) -> Result<CachedContest, errors::Error> {
        let statements: Statements =
            serde_json::from_slice(data).context_cache("Cached statements are corrupted")?;

        let langs = statements.langs;
        if langs.api.len() != langs.extensions.len() {
            return Err(errors::CacheFailure(format!(
                "Cached language table is inconsistent: {} languages but {} extension sets",
                langs.api.len(),
                langs.extensions.len()
            )));
        }

        let mut languages: Vec<Language> = Vec::with_capacity(langs.api.len());
        for (i, (code, extensions)) in langs.api.into_iter().zip(langs.extensions).enumerate() {
            if extensions.is_empty() {
                return Err(errors::CacheFailure(format!(
                    "Cached language {code} has no extensions"
                )));
            }
            if languages.iter().any(|language| language.code == code) {
                return Err(errors::CacheFailure(format!(
                    "Cached language {code} is listed twice"
                )));
            }
            languages.push(Language {
                code,
                verbose: langs.verbose.get(i).cloned(),
                extensions,
            });
        }

        Ok(CachedContest {
            id: statements.id,
            name: statements.name,
            tasks: statements.tasks,
            languages,
        })
    }

    pub fn task(&self, index: usize) -> Result<&Task, errors::Error> {
        self.tasks
            .get(index)
            .ok_or(errors::TaskIndexOutOfRange {
                index,
                count: self.tasks.len(),
            })
    }
}

pub struct ContestStore {
    dir: PathBuf,
}

impl ContestStore {
    pub fn new(dir: impl Into<PathBuf>) -> ContestStore {
        ContestStore { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STATEMENTS_CACHE)
    }

    pub fn load(&self) -> Result<CachedContest, errors::Error> {
        let path = self.path();
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(errors::ContestNotChosen)
            }
            Err(e) => return Err(e).with_context_cache(|| format!("Failed to read {path:?}")),
        };
        CachedContest::from_json(&data)
    }

    /// Stores statements as the judge sent them, stamped with the contest id, which the
    /// judge omits.
    pub fn save(
        &self,
        contest_id: u64,
        mut statements: serde_json::Value,
    ) -> Result<PathBuf, errors::Error> {
        let object = statements.as_object_mut().ok_or_else(|| {
            errors::CacheFailure("Contest statements are not a JSON object".to_string())
        })?;
        object.insert("id".to_string(), contest_id.into());

        // Refuse to cache something submit cannot read back
        let data = serde_json::to_vec(&statements).context_cache("Failed to serialize statements")?;
        CachedContest::from_json(&data)?;

        ensure_dir(&self.dir)?;
        let path = self.path();
        std::fs::write(&path, data).with_context_cache(|| format!("Failed to write to {path:?}"))?;
        Ok(path)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), errors::Error> {
    std::fs::create_dir_all(dir).with_context_cache(|| format!("Failed to create {dir:?}"))
}
