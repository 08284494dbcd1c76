use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use ordseq_cursor::{BoxCursor, Cursor, CursorError, CursorExt, LineCursor, SortedCheck};
use ordseq_diff::{DiffEvent, DiffSummary, RunGrouper, RunLog, StreamDiff};
use ordseq_merge::OrderedMerge;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::*;
use crate::config::{OutputFormat, ToolConfig};

type Input = BoxCursor<'static, String, CursorError>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = ToolConfig::resolve(&cli)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.command {
        Command::Merge(args) => cmd_merge(&args, &config, &mut out)?,
        Command::Diff(args) => cmd_diff(&args, &config, &mut out)?,
        Command::Runs(args) => cmd_runs(&args, &config, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn open_input(path: &Path, config: &ToolConfig) -> anyhow::Result<Input> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Box::new(BufReader::new(file))
    };
    debug!(path = %path.display(), check_order = config.check_order, "opened input");
    let lines = LineCursor::new(reader);
    if config.check_order {
        let keys = config.key_spec();
        Ok(SortedCheck::new(lines, move |a: &String, b: &String| keys.compare(a, b)).boxed())
    } else {
        Ok(lines.boxed())
    }
}

/// Run `body` against `cursor`, then close it. An error from `body` wins
/// over an error from closing.
fn with_cursor<C, T>(
    mut cursor: C,
    body: impl FnOnce(&mut C) -> anyhow::Result<T>,
) -> anyhow::Result<T>
where
    C: Cursor,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    let result = body(&mut cursor);
    let closed = cursor.close();
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close)) => {
            warn!(error = %close, "failed to close inputs after an error");
            Err(e)
        }
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, record: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct MergedLine<'a> {
    source: usize,
    line: &'a str,
}

fn cmd_merge<W: Write>(args: &MergeArgs, config: &ToolConfig, out: &mut W) -> anyhow::Result<()> {
    let inputs = args
        .files
        .iter()
        .map(|path| open_input(path, config))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let keys = config.key_spec();
    let merge = OrderedMerge::with_config(
        inputs,
        move |a: &String, b: &String| keys.compare(a, b),
        &config.merge,
    );
    with_cursor(merge, |merge| {
        while merge.load_next()? {
            let (Some(line), Some(source)) = (merge.current(), merge.current_source()) else {
                continue;
            };
            match config.format {
                OutputFormat::Text => writeln!(out, "{line}")?,
                OutputFormat::Json => write_json(out, &MergedLine { source, line })?,
            }
        }
        Ok(())
    })
}

fn cmd_diff<W: Write>(args: &DiffArgs, config: &ToolConfig, out: &mut W) -> anyhow::Result<()> {
    let first = open_input(&args.first, config)?;
    let second = open_input(&args.second, config)?;
    let keys = config.key_spec();
    let diff = StreamDiff::new(first, second, move |a: &String, b: &String| keys.compare(a, b))
        .with_label(config.merge.label.clone());
    let show_unchanged = args.show_unchanged || config.show_unchanged;

    let mut summary = DiffSummary::new();
    let mut unchanged = 0usize;
    with_cursor(diff, |diff| {
        loop {
            let more = diff.load_next()?;
            for event in diff.drain_events() {
                summary.record(&event);
                let same = matches!(&event, DiffEvent::Updated { first, second } if first == second);
                if same {
                    unchanged += 1;
                    if !show_unchanged {
                        continue;
                    }
                }
                match config.format {
                    OutputFormat::Text => write_event(out, &event, same)?,
                    OutputFormat::Json => write_json(out, &event)?,
                }
            }
            if !more {
                return Ok(());
            }
        }
    })?;

    if config.format == OutputFormat::Text {
        writeln!(out, "{}", format!("{summary} ({unchanged} unchanged)").bold())?;
    }
    Ok(())
}

fn write_event<W: Write>(out: &mut W, event: &DiffEvent<String>, same: bool) -> anyhow::Result<()> {
    match event {
        DiffEvent::Added { value } => writeln!(out, "{}", format!("+ {value}").green())?,
        DiffEvent::Removed { value } => writeln!(out, "{}", format!("- {value}").red())?,
        DiffEvent::Updated { first, .. } if same => writeln!(out, "{}", format!("= {first}").dimmed())?,
        DiffEvent::Updated { first, second } => {
            writeln!(out, "{}", format!("~ {first} => {second}").yellow())?
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct RunRecord<'a> {
    key: &'a str,
    first: &'a str,
    last: &'a str,
    len: usize,
}

fn cmd_runs<W: Write>(args: &RunsArgs, config: &ToolConfig, out: &mut W) -> anyhow::Result<()> {
    let input = open_input(&args.file, config)?;
    let keys = config.key_spec();
    let same_key = {
        let keys = keys.clone();
        move |a: &String, b: &String| keys.compare(a, b).is_eq()
    };
    let grouper = RunGrouper::with_predicate(input, RunLog::new(), same_key);
    with_cursor(grouper, |grouper| {
        loop {
            let more = grouper.load_next()?;
            for run in grouper.listener_mut().take_runs() {
                match config.format {
                    OutputFormat::Text => {
                        writeln!(out, "{} {}", format!("{:>7}", run.len).cyan(), keys.key(&run.first))?
                    }
                    OutputFormat::Json => write_json(
                        out,
                        &RunRecord {
                            key: keys.key(&run.first),
                            first: &run.first,
                            last: &run.last,
                            len: run.len,
                        },
                    )?,
                }
            }
            if !more {
                return Ok(());
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut text = lines.join("\n");
        text.push('\n');
        std::fs::write(&path, text).unwrap();
        path
    }

    /// Parse `args`, run the command into a buffer and return its output.
    fn run(args: &[&str]) -> anyhow::Result<String> {
        colored::control::set_override(false);
        let cli = Cli::try_parse_from(std::iter::once("ordseq").chain(args.iter().copied()))?;
        let config = ToolConfig::resolve(&cli)?;
        let mut out = Vec::new();
        match &cli.command {
            Command::Merge(a) => cmd_merge(a, &config, &mut out)?,
            Command::Diff(a) => cmd_diff(a, &config, &mut out)?,
            Command::Runs(a) => cmd_runs(a, &config, &mut out)?,
        }
        Ok(String::from_utf8(out)?)
    }

    fn path(p: &Path) -> &str {
        p.to_str().unwrap()
    }

    #[test]
    fn merges_sorted_files() {
        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "a.txt", &["apple", "cherry"]);
        let b = fixture(&dir, "b.txt", &["banana", "date"]);
        let c = fixture(&dir, "c.txt", &["apricot"]);
        let out = run(&["merge", path(&a), path(&b), path(&c)]).unwrap();
        assert_eq!(out, "apple\napricot\nbanana\ncherry\ndate\n");
    }

    #[test]
    fn merge_json_reports_sources() {
        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "a.txt", &["b"]);
        let b = fixture(&dir, "b.txt", &["a"]);
        let out = run(&["--format", "json", "merge", path(&a), path(&b)]).unwrap();
        assert_eq!(out, "{\"source\":1,\"line\":\"a\"}\n{\"source\":0,\"line\":\"b\"}\n");
    }

    #[test]
    fn merge_by_key_field() {
        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "a.txt", &["x,1", "y,3"]);
        let b = fixture(&dir, "b.txt", &["a,2"]);
        let out = run(&["-d", ",", "-k", "2", "merge", path(&a), path(&b)]).unwrap();
        assert_eq!(out, "x,1\na,2\ny,3\n");
    }

    #[test]
    fn check_order_rejects_unsorted_input() {
        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "a.txt", &["b", "a"]);
        let err = run(&["--check-order", "merge", path(&a)]).unwrap_err();
        assert!(err.to_string().contains("out of order"), "{err}");
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = run(&["merge", "/nonexistent/input.txt"]).unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }

    #[test]
    fn diff_text_output() {
        let dir = TempDir::new().unwrap();
        let old = fixture(&dir, "old.txt", &["A", "B", "C", "F"]);
        let new = fixture(&dir, "new.txt", &["A", "D", "E", "F"]);
        let out = run(&["diff", path(&old), path(&new)]).unwrap();
        assert_eq!(
            out,
            "- B\n- C\n+ D\n+ E\n2 added, 2 removed, 2 updated (2 unchanged)\n"
        );
    }

    #[test]
    fn diff_keyed_updates() {
        let dir = TempDir::new().unwrap();
        let old = fixture(&dir, "old.csv", &["1,alice", "2,bob", "3,carol"]);
        let new = fixture(&dir, "new.csv", &["1,alice", "2,robert", "4,dave"]);
        let out = run(&["-d", ",", "diff", "--show-unchanged", path(&old), path(&new)]).unwrap();
        assert_eq!(
            out,
            "= 1,alice\n~ 2,bob => 2,robert\n- 3,carol\n+ 4,dave\n\
             1 added, 1 removed, 2 updated (1 unchanged)\n"
        );
    }

    #[test]
    fn diff_json_output() {
        let dir = TempDir::new().unwrap();
        let old = fixture(&dir, "old.txt", &["A"]);
        let new = fixture(&dir, "new.txt", &["A", "A"]);
        let out = run(&["--format", "json", "diff", "--show-unchanged", path(&old), path(&new)]).unwrap();
        let events: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(
            events,
            vec![
                serde_json::json!({"kind": "updated", "first": "A", "second": "A"}),
                serde_json::json!({"kind": "added", "value": "A"}),
            ]
        );
    }

    #[test]
    fn diff_of_empty_files() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("old.txt");
        let new = dir.path().join("new.txt");
        std::fs::write(&old, "").unwrap();
        std::fs::write(&new, "").unwrap();
        let out = run(&["diff", path(&old), path(&new)]).unwrap();
        assert_eq!(out, "0 added, 0 removed, 0 updated (0 unchanged)\n");
    }

    #[test]
    fn runs_text_output() {
        let dir = TempDir::new().unwrap();
        let input = fixture(&dir, "in.txt", &["a", "a", "b", "c", "c", "c"]);
        let out = run(&["runs", path(&input)]).unwrap();
        assert_eq!(out, "      2 a\n      1 b\n      3 c\n");
    }

    #[test]
    fn runs_json_by_key() {
        let dir = TempDir::new().unwrap();
        let input = fixture(&dir, "in.csv", &["k1,x", "k1,y", "k2,z"]);
        let out = run(&["-d", ",", "--format", "json", "runs", path(&input)]).unwrap();
        assert_eq!(
            out,
            "{\"key\":\"k1\",\"first\":\"k1,x\",\"last\":\"k1,y\",\"len\":2}\n\
             {\"key\":\"k2\",\"first\":\"k2,z\",\"last\":\"k2,z\",\"len\":1}\n"
        );
    }
}
