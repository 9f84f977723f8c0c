//! `posix_spawn()` の安全な Rust ラッパー。
//!
//! 解決済みの実行ファイルパスを受け取って子プロセスを 1 つ起動する。
//! リダイレクトが要求されていれば、オープン済みの宛先 fd を file actions で
//! 子の stdout と stderr の両方に複製する（親側の fd は呼び出し側が閉じる）。
//!
//! ## 構成
//!
//! | 型 | 役割 |
//! |-----|------|
//! | [`FileActions`] | `posix_spawn_file_actions_t` の RAII ラッパー（fd 複製） |
//! | [`CStringVec`] | argv 用の NULL 終端ポインタ配列 |
//! | [`spawn`] | 上記を組み合わせて `posix_spawn` を呼ぶ公開関数 |
//!
//! exec の失敗は `posix_spawn` の戻り値として親に報告される。子から共有
//! メモリ等で通知する経路は存在しない。

use std::ffi::CString;
use std::fmt;

use crate::shell::ShellError;

// ── エラー型 ──────────────────────────────────────────────────────

/// `posix_spawn` の失敗を表すエラー。
#[derive(Debug)]
pub struct SpawnError {
    /// errno 値。
    pub errno: i32,
    /// コマンド名（エラーメッセージ用）。
    pub command: String,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.errno {
            libc::ENOENT => "command not found",
            libc::EACCES => "permission denied",
            _ => "spawn failed",
        };
        write!(f, "pash: {}: {}", self.command, msg)
    }
}

impl From<SpawnError> for ShellError {
    fn from(e: SpawnError) -> Self {
        ShellError::Spawn(e.errno)
    }
}

// ── FileActions ───────────────────────────────────────────────────

/// `posix_spawn_file_actions_t` の RAII ラッパー。Drop で自動 destroy。
struct FileActions {
    inner: libc::posix_spawn_file_actions_t,
}

impl FileActions {
    /// `posix_spawn_file_actions_init` で初期化する。
    fn new() -> Self {
        unsafe {
            let mut actions: libc::posix_spawn_file_actions_t = std::mem::zeroed();
            libc::posix_spawn_file_actions_init(&mut actions);
            Self { inner: actions }
        }
    }

    /// `dup2(fd, newfd)` アクションを追加する。リダイレクト用。
    fn add_dup2(&mut self, fd: i32, newfd: i32) {
        unsafe {
            libc::posix_spawn_file_actions_adddup2(&mut self.inner, fd, newfd);
        }
    }

    /// `close(fd)` アクションを追加する。複製後の元 fd のクローズ用。
    fn add_close(&mut self, fd: i32) {
        unsafe {
            libc::posix_spawn_file_actions_addclose(&mut self.inner, fd);
        }
    }

    fn as_ptr(&self) -> *const libc::posix_spawn_file_actions_t {
        &self.inner
    }
}

impl Drop for FileActions {
    fn drop(&mut self) {
        unsafe {
            libc::posix_spawn_file_actions_destroy(&mut self.inner);
        }
    }
}

// ── CStringVec ────────────────────────────────────────────────────

/// argv 用の CString ベクタ。NULL 終端のポインタ配列を構築する。
struct CStringVec {
    _strings: Vec<CString>,
    ptrs: Vec<*mut libc::c_char>,
}

impl CStringVec {
    /// 引数リストから構築する。各要素を `CString` に変換し、NULL 終端ポインタ配列を作る。
    fn from_args(args: &[&str]) -> Self {
        let strings: Vec<CString> = args
            .iter()
            .map(|s| CString::new(*s).unwrap_or_else(|_| CString::new("").unwrap()))
            .collect();
        let mut ptrs: Vec<*mut libc::c_char> = strings
            .iter()
            .map(|s| s.as_ptr() as *mut libc::c_char)
            .collect();
        ptrs.push(std::ptr::null_mut()); // NULL 終端
        Self {
            _strings: strings,
            ptrs,
        }
    }

    /// NULL 終端ポインタ配列を返す。
    fn as_ptr(&self) -> *const *mut libc::c_char {
        self.ptrs.as_ptr()
    }
}

// ── spawn 関数 ────────────────────────────────────────────────────

/// `posix_spawn` で子プロセスを起動する。成功時は子 PID を返す。
///
/// - `program`: 解決済みの実行ファイルパス（検索は呼び出し側が済ませている）
/// - `args`: argv（`args[0]` は入力されたままのコマンド名）
/// - `redirect_fd`: リダイレクト宛先としてオープン済みの fd。`Some` なら
///   子の stdout と stderr の両方に複製される（`None` なら継承）
pub fn spawn(
    program: &str,
    args: &[&str],
    redirect_fd: Option<i32>,
) -> Result<libc::pid_t, SpawnError> {
    let c_program = CString::new(program).unwrap_or_else(|_| CString::new("").unwrap());
    let argv = CStringVec::from_args(args);

    // ファイルアクション: 宛先 fd を stdout / stderr の両方へ複製
    let mut actions = FileActions::new();
    if let Some(fd) = redirect_fd {
        actions.add_dup2(fd, libc::STDOUT_FILENO);
        actions.add_dup2(fd, libc::STDERR_FILENO);
        actions.add_close(fd);
    }

    // environ を継承（属性は使わないので null を渡す）
    extern "C" {
        static environ: *const *mut libc::c_char;
    }

    let mut pid: libc::pid_t = 0;

    let ret = unsafe {
        libc::posix_spawn(
            &mut pid,
            c_program.as_ptr(),
            actions.as_ptr(),
            std::ptr::null(),
            argv.as_ptr(),
            environ as *const *mut libc::c_char,
        )
    };

    if ret != 0 {
        return Err(SpawnError {
            errno: ret,
            command: args.first().copied().unwrap_or("").to_string(),
        });
    }

    Ok(pid)
}

// ── テスト ──────────────────────────────────────────────────────────
