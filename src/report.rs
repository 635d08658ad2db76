use crate::message::verdict::{FinalVerdict, SubtaskResult};
use std::io::Write;

/// Prints what the judge reports. The short form is the total score followed by the verdict
/// text; the detailed form also breaks the score down per subtask.
pub struct Reporter<W: Write> {
    out: W,
    detailed: bool,
}

impl Reporter<std::io::Stdout> {
    pub fn stdout(detailed: bool) -> Self {
        Reporter::new(std::io::stdout(), detailed)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, detailed: bool) -> Self {
        Reporter { out, detailed }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn progress(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn verdict(&mut self, verdict: &FinalVerdict) -> std::io::Result<()> {
        writeln!(
            self.out,
            "{} {}",
            verdict.total_points, verdict.shown_verdict_text
        )?;
        if self.detailed {
            self.details(verdict)?;
        }
        self.out.flush()
    }

    fn details(&mut self, verdict: &FinalVerdict) -> std::io::Result<()> {
        if !verdict.compiled {
            if !verdict.compiler_log.is_empty() {
                writeln!(self.out, "Compiler log:")?;
                writeln!(self.out, "{}", verdict.compiler_log.trim_end())?;
            }
            return Ok(());
        }
        for (i, subtask) in verdict.subtasks.iter().enumerate() {
            self.subtask(i + 1, subtask)?;
        }
        Ok(())
    }

    fn subtask(&mut self, number: usize, subtask: &SubtaskResult) -> std::io::Result<()> {
        if subtask.skipped {
            return writeln!(self.out, "Subtask {number}: skipped");
        }
        writeln!(
            self.out,
            "Subtask {number}: {} points, worst time {} ms",
            subtask.points, subtask.worst_time_ms
        )?;
        for test in &subtask.failed_tests {
            write!(
                self.out,
                "  test {}: {} ({} ms)",
                test.n, test.verdict_text, test.milliseconds
            )?;
            if test.partial_score > 0 {
                write!(self.out, ", partial score {}", test.partial_score)?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::verdict::FailedTest;

    fn render(verdict: &FinalVerdict, detailed: bool) -> String {
        let mut reporter = Reporter::new(Vec::new(), detailed);
        reporter.verdict(verdict).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn summary() {
        let verdict = FinalVerdict {
            total_points: 80,
            shown_verdict_text: "Partial solution".to_string(),
            compiled: true,
            ..Default::default()
        };
        assert_eq!(render(&verdict, false), "80 Partial solution\n");
    }

    #[test]
    fn compilation_error() {
        let verdict = FinalVerdict {
            shown_verdict_text: "Compilation error".to_string(),
            compiler_log: "main.cpp:1:1: error: expected ';'\n".to_string(),
            ..Default::default()
        };
        assert_eq!(
            render(&verdict, true),
            "0 Compilation error\nCompiler log:\nmain.cpp:1:1: error: expected ';'\n"
        );
    }

    #[test]
    fn subtasks() {
        let verdict = FinalVerdict {
            compiled: true,
            total_points: 30,
            shown_verdict_text: "Wrong answer".to_string(),
            subtasks: vec![
                SubtaskResult {
                    points: 30,
                    worst_time_ms: 15,
                    ..Default::default()
                },
                SubtaskResult {
                    worst_time_ms: 120,
                    failed_tests: vec![FailedTest {
                        n: 4,
                        milliseconds: 120,
                        partial_score: 0,
                        verdict_code: 2,
                        verdict_text: "Wrong answer".to_string(),
                    }],
                    ..Default::default()
                },
                SubtaskResult {
                    skipped: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            render(&verdict, true),
            "30 Wrong answer\n\
             Subtask 1: 30 points, worst time 15 ms\n\
             Subtask 2: 0 points, worst time 120 ms\n\
             \x20 test 4: Wrong answer (120 ms)\n\
             Subtask 3: skipped\n"
        );
    }
}
