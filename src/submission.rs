use crate::{
    contest::{language, store::CachedContest},
    errors,
};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeSource {
    File(PathBuf),
    Stdin,
}

/// Everything the submit command was asked to do
#[derive(Clone, Debug)]
pub struct SubmitRequest {
    pub task_index: usize,
    pub source: CodeSource,
    pub language: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub code: String,
    pub contest_id: u64,
    pub lang: String,
    pub task_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct SubmissionId {
    pub id: u64,
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl CodeSource {
    pub fn filename(&self) -> Option<String> {
        match self {
            CodeSource::File(path) => Some(
                path.file_name()
                    .unwrap_or(path.as_os_str())
                    .to_string_lossy()
                    .into_owned(),
            ),
            CodeSource::Stdin => None,
        }
    }

    /// Reads the whole source. For `Stdin`, `stdin` is read until EOF.
    pub fn read_from<R: Read>(&self, mut stdin: R) -> Result<String, errors::Error> {
        match self {
            CodeSource::File(path) => {
                let code = std::fs::read(path).map_err(|source| errors::SourceRead {
                    path: path.clone(),
                    source,
                })?;
                into_text(code, path.clone())
            }
            CodeSource::Stdin => {
                let mut code = Vec::new();
                stdin
                    .read_to_end(&mut code)
                    .map_err(|source| errors::SourceRead {
                        path: PathBuf::from("<stdin>"),
                        source,
                    })?;
                into_text(code, PathBuf::from("<stdin>"))
            }
        }
    }
}

fn into_text(code: Vec<u8>, path: PathBuf) -> Result<String, errors::Error> {
    String::from_utf8(code).map_err(|e| errors::SourceRead {
        path,
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Validates the request against the cached contest and reads the code. Nothing here talks to
/// the network.
pub fn build(request: SubmitRequest, contest: &CachedContest) -> Result<Submission, errors::Error> {
    build_from(request, contest, std::io::stdin())
}

pub fn build_from<R: Read>(
    request: SubmitRequest,
    contest: &CachedContest,
    stdin: R,
) -> Result<Submission, errors::Error> {
    let task = contest.task(request.task_index)?;

    let filename = request.source.filename();
    let lang = language::resolve(
        request.language.as_deref(),
        filename.as_deref(),
        &contest.languages,
    )?;

    let code = request.source.read_from(stdin)?;

    Ok(Submission {
        code,
        contest_id: contest.id,
        lang,
        task_id: task.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contest() -> CachedContest {
        let raw = json!({
            "id": 9,
            "tasks": [{"id": 11}, {"id": 12}, {"id": 13}],
            "langs": {
                "api": ["cpp17", "python"],
                "extensions": [["cpp"], ["py"]],
            },
        });
        CachedContest::from_json(raw.to_string().as_bytes()).unwrap()
    }

    fn source_file(name: &str, code: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, code).unwrap();
        (dir, path)
    }

    #[test]
    fn builds_from_file() {
        let (_dir, path) = source_file("main.cpp", "int main() {}\n");
        let submission = build(
            SubmitRequest {
                task_index: 1,
                source: CodeSource::File(path),
                language: None,
            },
            &contest(),
        )
        .unwrap();
        assert_eq!(
            submission,
            Submission {
                code: "int main() {}\n".to_string(),
                contest_id: 9,
                lang: "cpp17".to_string(),
                task_id: 12,
            }
        );
        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({"code": "int main() {}\n", "contest_id": 9, "lang": "cpp17", "task_id": 12})
        );
    }

    #[test]
    fn task_index_range() {
        let (_dir, path) = source_file("main.py", "print(1)\n");
        let contest = contest();
        for task_index in 0..10 {
            let result = build(
                SubmitRequest {
                    task_index,
                    source: CodeSource::File(path.clone()),
                    language: None,
                },
                &contest,
            );
            if task_index < contest.tasks.len() {
                assert_eq!(result.unwrap().task_id, contest.tasks[task_index].id);
            } else {
                assert!(matches!(
                    result,
                    Err(errors::TaskIndexOutOfRange { count: 3, .. })
                ));
            }
        }
    }

    #[test]
    fn unsupported_extension_before_reading() {
        let result = build(
            SubmitRequest {
                task_index: 0,
                source: CodeSource::File(PathBuf::from("/nonexistent/sol.py3")),
                language: None,
            },
            &contest(),
        );
        assert!(matches!(result, Err(errors::UnsupportedExtension(_))));
    }

    #[test]
    fn stdin_without_language() {
        let result = build(
            SubmitRequest {
                task_index: 0,
                source: CodeSource::Stdin,
                language: None,
            },
            &contest(),
        );
        assert!(matches!(result, Err(errors::LanguageRequired)));
    }

    #[test]
    fn stdin_with_language() {
        let submission = build_from(
            SubmitRequest {
                task_index: 0,
                source: CodeSource::Stdin,
                language: Some("python".to_string()),
            },
            &contest(),
            std::io::Cursor::new("print(input())\n"),
        )
        .unwrap();
        assert_eq!(submission.code, "print(input())\n");
        assert_eq!(submission.lang, "python");
        assert_eq!(submission.task_id, 11);
    }

    #[test]
    fn binary_source_is_rejected() {
        let result = build_from(
            SubmitRequest {
                task_index: 0,
                source: CodeSource::Stdin,
                language: Some("python".to_string()),
            },
            &contest(),
            &[0xff, 0xfe, 0x00][..],
        );
        match result {
            Err(errors::SourceRead { path, source }) => {
                assert_eq!(path, PathBuf::from("<stdin>"));
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected result {other:?}"),
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.cpp");
        std::fs::write(&path, [b'i', b'n', b't', 0xc3]).unwrap();
        let result = build(
            SubmitRequest {
                task_index: 0,
                source: CodeSource::File(path.clone()),
                language: None,
            },
            &contest(),
        );
        match result {
            Err(errors::SourceRead { path: read, source }) => {
                assert_eq!(read, path);
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn missing_file() {
        let result = build(
            SubmitRequest {
                task_index: 0,
                source: CodeSource::File(PathBuf::from("/nonexistent/sol.cpp")),
                language: None,
            },
            &contest(),
        );
        assert!(matches!(result, Err(errors::SourceRead { .. })));
    }

    #[test]
    fn explicit_language_overrides_extension() {
        let (_dir, path) = source_file("script.txt", "print(1)\n");
        let submission = build(
            SubmitRequest {
                task_index: 2,
                source: CodeSource::File(path),
                language: Some("python".to_string()),
            },
            &contest(),
        )
        .unwrap();
        assert_eq!(submission.lang, "python");
        assert_eq!(submission.task_id, 13);
    }
}
