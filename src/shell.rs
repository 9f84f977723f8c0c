//! シェルのセッション状態とエラー型。
//!
//! プロセス全体で共有される可変状態（検索パス、保留キュー、子プロセス
//! レジストリ）をグローバルに置かず、1 つのセッションオブジェクトが所有する。
//! セッション開始時に構築され、対話 / バッチループ全体で `&mut` で共有される。

use std::fmt;

use crate::children::ChildRegistry;
use crate::path::SearchPath;
use crate::queue::CommandQueue;

/// シェルの実行状態。入力ループ全体で共有される。
pub struct Shell {
    /// コマンド解決に使う検索パス。`path` ビルトインで全置換される。
    pub search_path: SearchPath,
    /// 1 行分のコマンドグループを溜める保留キュー。flush で空になる。
    pub pending: CommandQueue,
    /// 未回収の子プロセス。flush 末尾の reap で空になる。
    pub children: ChildRegistry,
    /// `exit` ビルトインで true にセットされ、入力ループを終了させる。
    pub should_exit: bool,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            search_path: SearchPath::new(),
            pending: CommandQueue::new(),
            children: ChildRegistry::new(),
            should_exit: false,
        }
    }
}

// ── エラー型 ────────────────────────────────────────────────────────

/// ディスパッチから起動までの各段階で発生しうるエラー。
///
/// ユーザに見えるのは固定の診断メッセージ 1 行だけだが（main が出力して
/// 即終了する）、内部では種別を区別して保持し、テストで検証できるようにする。
#[derive(Debug, PartialEq, Eq)]
pub enum ShellError {
    /// 空のトークン列がディスパッチされた。
    EmptyCommand,
    /// `cd` の引数はちょうど 1 個のワード。
    CdArity,
    /// `exit` は引数を取らない。
    ExitArity,
    /// `path` の引数はワードのみ。
    PathArgs,
    /// `&` が隣接している（間にコマンドがない）。
    AdjacentAmp,
    /// リダイレクトの形が不正（宛先なし、複数、コマンド部なし）。
    RedirectSyntax,
    /// `path` の引数が有効なディレクトリでない。
    InvalidPathEntry,
    /// コマンドがカレントディレクトリにも検索パスにも見つからない。
    CommandNotFound,
    /// 保留キューが満杯。
    QueueFull,
    /// 同時子プロセス数の上限を超過。
    TooManyChildren,
    /// `cd` のディレクトリ変更に失敗。
    Chdir,
    /// リダイレクト先ファイルのオープンに失敗。
    RedirectOpen,
    /// 子プロセスの起動に失敗。値は errno。
    Spawn(i32),
    /// `waitpid` が失敗した。回復不能。
    Wait,
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "empty command"),
            Self::CdArity => write!(f, "cd: expected exactly one argument"),
            Self::ExitArity => write!(f, "exit: takes no arguments"),
            Self::PathArgs => write!(f, "path: arguments must be directories"),
            Self::AdjacentAmp => write!(f, "syntax error: `&` separators cannot be adjacent"),
            Self::RedirectSyntax => write!(f, "syntax error: `>` requires exactly one destination"),
            Self::InvalidPathEntry => write!(f, "path: invalid directory"),
            Self::CommandNotFound => write!(f, "command not found"),
            Self::QueueFull => write!(f, "too many pending commands"),
            Self::TooManyChildren => write!(f, "too many parallel commands"),
            Self::Chdir => write!(f, "cd: chdir failed"),
            Self::RedirectOpen => write!(f, "cannot open redirect destination"),
            Self::Spawn(errno) => write!(f, "spawn failed (errno {})", errno),
            Self::Wait => write!(f, "wait failed"),
        }
    }
}
