//! 検索パス: コマンド名から実行可能ファイルへの解決。
//!
//! 環境変数 `$PATH` とは独立した、順序付きディレクトリリストを保持する。
//! `path` ビルトインがリスト全体を置き換え、解決はカレントディレクトリ →
//! リスト順の走査で最初に実行可能なものを採用する。
//!
//! ## 置き換えポリシー
//!
//! 全引数を先に検証してから置き換える。1 つでも無効なディレクトリがあれば
//! コマンド全体が失敗し、既存のリストは変更されない（部分置換なし）。

use std::ffi::CString;

use crate::shell::ShellError;

/// 起動時の検索パス。
pub const DEFAULT_DIRS: &[&str] = &["/bin", "/usr/bin"];

/// `access(F_OK | X_OK)` による存在 + 実行可否チェック。
fn is_executable(path: &str) -> bool {
    let c_path = match CString::new(path) {
        Ok(c) => c,
        Err(_) => return false, // NUL 混入パスは存在しえない
    };
    unsafe { libc::access(c_path.as_ptr(), libc::F_OK | libc::X_OK) == 0 }
}

/// 順序付きの検索ディレクトリリスト。
///
/// セッション（[`Shell`](crate::shell::Shell)）が所有し、プロセス生存期間を通じて
/// 保持される。空リストも合法で、その場合ビルトイン以外は何も解決しない。
pub struct SearchPath {
    dirs: Vec<String>,
}

impl SearchPath {
    /// デフォルトの検索パス（`/bin`, `/usr/bin`）で初期化する。
    pub fn new() -> Self {
        Self {
            dirs: DEFAULT_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// リスト全体を `dirs` で置き換える。
    ///
    /// 各ディレクトリはアクセス可能かつ実行（検索）可能であることを先に検証する。
    /// 無効なエントリが 1 つでもあれば [`ShellError::InvalidPathEntry`] を返し、
    /// 既存のリストは変更されない。
    pub fn replace(&mut self, dirs: &[&str]) -> Result<(), ShellError> {
        for dir in dirs {
            if !is_executable(dir) {
                return Err(ShellError::InvalidPathEntry);
            }
        }
        self.dirs = dirs.iter().map(|d| d.to_string()).collect();
        Ok(())
    }

    /// コマンド名を実行可能ファイルのパスに解決する。
    ///
    /// カレントディレクトリから直接アクセス可能ならそのまま返す。
    /// そうでなければリスト順に `dir/name` を調べ、最初に実行可能なものを返す。
    /// どこにも見つからなければ [`ShellError::CommandNotFound`]。
    pub fn resolve(&self, name: &str) -> Result<String, ShellError> {
        if is_executable(name) {
            return Ok(name.to_string());
        }
        for dir in &self.dirs {
            let candidate = format!("{}/{}", dir, name);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
        Err(ShellError::CommandNotFound)
    }

    /// 現在のディレクトリリスト。
    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }
}

// ── テスト ──────────────────────────────────────────────────────────
