//! 統合テスト: コンパイル済みバイナリをバッチ / 対話モードで走らせ、
//! 出力・リダイレクト先・終了ステータスを検証する。
//!
//! 子プロセスの生成・回収を伴う検証はすべてここに置く。シェル自体を
//! サブプロセスとして起動するので、テストプロセス内で waitpid が競合しない。

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// 固定の診断メッセージ（実行時エラーはすべてこの 1 行）。
const ERROR_MESSAGE: &str = "An error has occurred\n";

fn pash_bin() -> &'static str {
    env!("CARGO_BIN_EXE_pash")
}

/// スクリプトを一時ファイルに書き、バッチモードで実行する。cwd は `dir`。
fn run_batch(dir: &Path, script: &str) -> Output {
    let script_path = dir.join("script.txt");
    fs::write(&script_path, script).unwrap();
    Command::new(pash_bin())
        .arg(&script_path)
        .current_dir(dir)
        .output()
        .unwrap()
}

/// 対話モードで起動し、`input` を stdin に流して EOF まで実行する。
fn run_interactive(input: &str) -> Output {
    let mut child = Command::new(pash_bin())
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
    child.wait_with_output().unwrap()
}

fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn stderr_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

// ── バッチモード基本動作 ────────────────────────────────────────────

#[test]
fn batch_runs_commands_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo hello\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).contains("hello"));
    assert!(stderr_of(&out).is_empty());
}

#[test]
fn blank_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "   \n\n\t\necho ok\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).contains("ok"));
}

#[test]
fn missing_batch_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(pash_bin())
        .arg("no_such_script.txt")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("cannot open batch file"));
}

#[test]
fn too_many_startup_args_exits_one() {
    let out = Command::new(pash_bin())
        .args(["a.txt", "b.txt"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
}

// ── リダイレクト ────────────────────────────────────────────────────

#[test]
fn redirect_writes_stdout_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo hi > out.txt\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hi\n");
    assert!(!stdout_of(&out).contains("hi"));
}

#[test]
fn redirect_is_scoped_to_a_single_launch() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo one > f.txt\necho two\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(dir.path().join("f.txt")).unwrap(), "one\n");
    // 次の行の出力はリダイレクトの影響を受けない
    assert!(stdout_of(&out).contains("two"));
    assert!(!stdout_of(&out).contains("one"));
}

#[test]
fn redirect_truncates_existing_destination() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("out.txt"), "stale stale stale\n").unwrap();
    let out = run_batch(dir.path(), "echo fresh > out.txt\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "fresh\n",
    );
}

#[test]
fn redirect_captures_stderr_too() {
    let dir = tempfile::tempdir().unwrap();
    // ls は存在しないパスへの文句を stderr に書く。両ストリームとも宛先に行く
    let out = run_batch(dir.path(), "ls /nonexistent_pash_dir > out.txt\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(!fs::read_to_string(dir.path().join("out.txt")).unwrap().is_empty());
    assert!(stderr_of(&out).is_empty());
}

#[test]
fn unopenable_redirect_destination_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo hi > missing_dir/out.txt\necho after\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
    assert!(!stdout_of(&out).contains("after"));
}

// ── 並列グループ ────────────────────────────────────────────────────

#[test]
fn parallel_groups_all_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo aa & echo bb & echo cc\n");
    assert_eq!(out.status.code(), Some(0));
    let stdout = stdout_of(&out);
    // 完了順は不定なので内容だけ検証する
    assert!(stdout.contains("aa"));
    assert!(stdout.contains("bb"));
    assert!(stdout.contains("cc"));
}

#[test]
fn parallel_group_redirects_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo x > x.txt & echo y\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(dir.path().join("x.txt")).unwrap(), "x\n");
    assert!(stdout_of(&out).contains("y"));
}

#[test]
fn batch_waits_for_the_whole_group_before_next_line() {
    let dir = tempfile::tempdir().unwrap();
    // sleep を含むグループの後の行が先に出ることはない
    let out = run_batch(
        dir.path(),
        "sleep 0.2 & echo first\necho second\n",
    );
    assert_eq!(out.status.code(), Some(0));
    let stdout = stdout_of(&out);
    let first = stdout.find("first").unwrap();
    let second = stdout.find("second").unwrap();
    assert!(first < second);
}

#[test]
fn adjacent_separators_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo a && echo b\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
    // flush 前にエラーになるので最初のグループも走らない
    assert!(stdout_of(&out).is_empty());
}

#[test]
fn leading_separator_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "& echo ok\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).contains("ok"));
}

#[test]
fn exceeding_child_ceiling_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // 上限 10 に対して 11 グループ
    let line = vec!["echo z"; 11].join(" & ");
    let out = run_batch(dir.path(), &format!("{}\n", line));
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
}

// ── ビルトイン ──────────────────────────────────────────────────────

#[test]
fn cd_changes_directory_for_children() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let out = run_batch(dir.path(), "cd sub\npwd\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).trim_end().ends_with("sub"));
}

#[test]
fn cd_arity_error_stops_processing() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "cd\necho after\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
    assert!(!stdout_of(&out).contains("after"));
}

#[test]
fn path_with_no_dirs_makes_commands_unresolvable() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "path\necho hi\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
    assert!(!stdout_of(&out).contains("hi"));
}

#[test]
fn path_replacement_still_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "path /usr/bin /bin\necho ok\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).contains("ok"));
}

#[test]
fn exit_stops_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "echo first\nexit\necho second\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).contains("first"));
    assert!(!stdout_of(&out).contains("second"));
}

#[test]
fn exit_with_arguments_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "exit 1\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
}

#[test]
fn unknown_command_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_batch(dir.path(), "definitely_not_a_command_pash\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
}

// ── 対話モード ──────────────────────────────────────────────────────

#[test]
fn interactive_prompts_and_runs_until_eof() {
    let out = run_interactive("echo hi\n");
    assert_eq!(out.status.code(), Some(0));
    let stdout = stdout_of(&out);
    assert!(stdout.contains("pash> "));
    assert!(stdout.contains("hi"));
}

#[test]
fn interactive_exit_terminates_with_zero() {
    let out = run_interactive("exit\necho never\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(!stdout_of(&out).contains("never"));
}

#[test]
fn interactive_runtime_error_exits_zero() {
    let out = run_interactive("cd a b\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stderr_of(&out), ERROR_MESSAGE);
}
