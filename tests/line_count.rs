use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use line_counter::{
    Grouping, LineMapper, OutputFormat, ParsePolicy, Record, ReducerOptions, StreamReducer,
};

fn map(key: &str, input: &str) -> String {
    let mut out = Vec::new();
    LineMapper::new(key)
        .map_stream(input.as_bytes(), &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

fn reduce(options: ReducerOptions, input: &str) -> Vec<String> {
    let mut out = Vec::new();
    StreamReducer::new(options)
        .reduce_stream(input.as_bytes(), &mut out)
        .unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn with_grouping(grouping: Grouping) -> ReducerOptions {
    ReducerOptions {
        grouping,
        ..ReducerOptions::default()
    }
}

#[test]
fn mapper_counts_lines_per_file() {
    let out = map("myfile.txt", "a\nb\nc\n");
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines, ["myfile.txt\t1", "myfile.txt\t1", "myfile.txt\t1"]);
}

#[test]
fn reducer_sums_contiguous_keys() {
    let out = reduce(ReducerOptions::default(), "k1\t1\nk1\t2\nk2\t5\n");
    assert_eq!(out, ["k1\t3", "k2\t5"]);
}

#[test]
fn unsorted_runs_stay_apart_under_contiguous_grouping() {
    let input = "fileA.txt\t1\nfileA.txt\t1\nfileB.txt\t1\nfileA.txt\t1\n";
    let out = reduce(with_grouping(Grouping::Contiguous), input);

    assert_eq!(out, ["fileA.txt\t2", "fileB.txt\t1", "fileA.txt\t1"]);
}

#[test]
fn unsorted_runs_merge_under_global_grouping() {
    let input = "fileA.txt\t1\nfileA.txt\t1\nfileB.txt\t1\nfileA.txt\t1\n";
    let out = reduce(with_grouping(Grouping::Global), input);

    assert_eq!(out, ["fileA.txt\t3", "fileB.txt\t1"]);
}

#[test]
fn empty_streams_produce_nothing() {
    assert!(map("k", "").is_empty());
    assert!(reduce(with_grouping(Grouping::Contiguous), "").is_empty());
    assert!(reduce(with_grouping(Grouping::Global), "").is_empty());
}

#[test]
fn rereducing_partial_totals_matches_one_pass() {
    let input = "a\t1\nb\t2\na\t3\nc\t4\nb\t5\na\t6\n";

    // first pass keeps runs apart; the second merges the partial totals
    let partial = reduce(with_grouping(Grouping::Contiguous), input).join("\n") + "\n";
    let merged = reduce(with_grouping(Grouping::Global), &partial);

    assert_eq!(merged, reduce(with_grouping(Grouping::Global), input));
    assert_eq!(merged, ["a\t10", "b\t7", "c\t4"]);
}

#[test]
fn map_then_reduce_counts_each_file() {
    let mut mapped = map("/in/a.txt", "x\ny\nz\n");
    mapped.push_str(&map("/in/b.txt", "only line"));

    let out = reduce(ReducerOptions::default(), &mapped);
    assert_eq!(out, ["/in/a.txt\t3", "/in/b.txt\t1"]);
}

#[test]
fn quoted_output_for_json_like_consumers() {
    let options = ReducerOptions {
        format: OutputFormat::Quoted,
        ..ReducerOptions::default()
    };
    let out = reduce(options, "fileA.txt\t1\nfileA.txt\t1\n");

    assert_eq!(out, ["\"fileA.txt\": 2"]);
}

#[test]
fn strict_policy_names_the_bad_line() {
    let options = ReducerOptions {
        policy: ParsePolicy::Strict,
        ..ReducerOptions::default()
    };
    let mut out = Vec::new();
    let err = StreamReducer::new(options)
        .reduce_stream("k\t1\nk\tmany\n".as_bytes(), &mut out)
        .unwrap_err();

    assert_eq!(err.to_string(), "line 2: `many` is not an integer count");
}

#[test]
fn mapper_record_is_a_single_count() {
    assert_eq!(LineMapper::new("f").record(), Record::new("f", 1));
}

fn run(bin: &str, args: &[&str], envs: &[(&str, &str)], input: &str) -> (Option<i32>, String) {
    let mut child = Command::new(bin)
        .args(args)
        .env_remove("mapreduce_map_input_file")
        .env_remove("map_input_file")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (output.status.code(), String::from_utf8(output.stdout).unwrap())
}

/// Writes `files` into a fresh directory named `dir` under the cargo test
/// scratch space and returns their paths in order.
fn write_inputs(dir: &str, files: &[(&str, &str)]) -> Vec<PathBuf> {
    let root = Path::new(env!("CARGO_TARGET_TMPDIR")).join(dir);
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(&root).unwrap();
    files
        .iter()
        .map(|(name, content)| {
            let path = root.join(name);
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

fn path_args(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

const MAPPER: &str = env!("CARGO_BIN_EXE_linecount_mapper");
const REDUCER: &str = env!("CARGO_BIN_EXE_linecount_reducer");
const SINGLE: &str = env!("CARGO_BIN_EXE_linecount_single");

#[test]
fn mapper_binary_keys_by_input_file() {
    let (code, out) = run(
        MAPPER,
        &[],
        &[
            ("mapreduce_map_input_file", "/path/myfile.txt"),
            ("LINECOUNT_KEY_STYLE", "basename"),
        ],
        "a\nb\nc\n",
    );

    assert_eq!(code, Some(0));
    assert_eq!(out, "myfile.txt\t1\nmyfile.txt\t1\nmyfile.txt\t1\n");
}

#[test]
fn reducer_binary_reads_options_from_env() {
    let input = "fileA.txt\t1\nfileA.txt\t1\nfileB.txt\t1\nfileA.txt\t1\n";
    let (code, out) = run(REDUCER, &[], &[("LINECOUNT_GROUPING", "global")], input);

    assert_eq!(code, Some(0));
    assert_eq!(out, "fileA.txt\t3\nfileB.txt\t1\n");
}

#[test]
fn reducer_binary_rejects_unknown_option() {
    let (code, out) = run(REDUCER, &[], &[("LINECOUNT_FORMAT", "yaml")], "k\t1\n");

    assert_eq!(code, Some(1));
    assert!(out.is_empty());
}

#[test]
fn reducer_binary_fails_on_malformed_record_when_strict() {
    let (code, _) = run(REDUCER, &[], &[("LINECOUNT_POLICY", "strict")], "k\t1\nk\tx\n");
    assert_eq!(code, Some(1));

    let (code, out) = run(REDUCER, &[], &[], "k\t1\nk\tx\n");
    assert_eq!(code, Some(0));
    assert_eq!(out, "k\t1\n");
}

#[test]
fn single_binary_runs_the_pipeline_on_stdin() {
    let (code, out) = run(
        SINGLE,
        &[],
        &[("map_input_file", "hdfs://nn:8020/logs/app.log")],
        "one\ntwo\n",
    );
    assert_eq!(code, Some(0));
    assert_eq!(out, "hdfs://nn:8020/logs/app.log\t2\n");

    let (code, out) = run(
        SINGLE,
        &["--source", "/tmp/x.txt", "--key-style", "basename", "--format", "quoted"],
        &[],
        "1\n2\n3\n",
    );
    assert_eq!(code, Some(0));
    assert_eq!(out, "\"x.txt\": 3\n");
}

#[test]
fn single_binary_keys_each_file_by_its_path() {
    let paths = write_inputs(
        "single_pipeline",
        &[("a.txt", "one\ntwo\n"), ("b.txt", "only"), ("e.txt", "")],
    );
    let args = path_args(&paths);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let (code, out) = run(SINGLE, &args, &[], "");

    assert_eq!(code, Some(0));
    assert_eq!(out, format!("{}\t2\n{}\t1\n", args[0], args[1]));
}

#[test]
fn single_binary_map_stage_emits_raw_records() {
    let paths = write_inputs("single_map", &[("a.txt", "x\ny\n")]);
    let args = path_args(&paths);

    let (code, out) = run(
        SINGLE,
        &["--stage", "map", "--key-style", "basename", args[0].as_str()],
        &[],
        "",
    );

    assert_eq!(code, Some(0));
    assert_eq!(out, "a.txt\t1\na.txt\t1\n");
}

#[test]
fn single_binary_reduce_stage_joins_files_on_line_boundaries() {
    // the first file lacks a trailing newline
    let paths = write_inputs("single_reduce", &[("r1.txt", "k\t1"), ("r2.txt", "k\t2\n")]);
    let args = path_args(&paths);

    let (code, out) = run(SINGLE, &["--stage", "reduce", args[0].as_str(), args[1].as_str()], &[], "");

    assert_eq!(code, Some(0));
    assert_eq!(out, "k\t3\n");
}

#[test]
fn single_binary_reduce_stage_reads_stdin() {
    let (code, out) = run(
        SINGLE,
        &["--stage", "reduce", "--grouping", "global"],
        &[],
        "a\t1\nb\t1\na\t1\n",
    );

    assert_eq!(code, Some(0));
    assert_eq!(out, "a\t2\nb\t1\n");
}

#[test]
fn single_binary_usage_errors_exit_with_one() {
    let (code, out) = run(SINGLE, &["--format", "bogus"], &[], "x\n");

    assert_eq!(code, Some(1));
    assert!(out.is_empty());
}

#[test]
fn single_binary_missing_file_exits_with_one() {
    let missing = Path::new(env!("CARGO_TARGET_TMPDIR")).join("no_such_input.txt");
    let (code, out) = run(SINGLE, &[missing.to_str().unwrap()], &[], "");

    assert_eq!(code, Some(1));
    assert!(out.is_empty());
}
