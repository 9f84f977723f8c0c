//! 子プロセスレジストリ: 未回収の子 PID の追跡と一括 reap。
//!
//! flush で起動された子をすべて登録し、[`ChildRegistry::reap_all`] で全員の
//! 終了を待つ。終了の報告順はプラットフォーム任せで、起動順とは無関係。
//! 同時に抱えられる子の数には固定の上限があり、超過した起動は呼び出し側
//! （launcher）が拒否する。

use libc::pid_t;

use crate::shell::ShellError;

/// 同時に未回収でいられる子プロセス数の上限。
pub const MAX_CHILDREN: usize = 10;

/// 生存中の子プロセスの集合。
///
/// [`Shell`](crate::shell::Shell) が所有する。`reap_all` から戻った時点で空。
pub struct ChildRegistry {
    pids: Vec<pid_t>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self { pids: Vec::new() }
    }

    /// 登録済みの子の数。
    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// 上限に達しているか。達していれば新しい起動は拒否される。
    pub fn is_full(&self) -> bool {
        self.pids.len() >= MAX_CHILDREN
    }

    /// 起動済みの子 PID を登録する。
    pub fn register(&mut self, pid: pid_t) {
        self.pids.push(pid);
    }

    /// 登録済みの子がすべて終了するまでブロックする。
    ///
    /// `waitpid(-1, 0)` をループし、報告された PID をレジストリから外していく。
    /// レジストリにない PID が報告された場合は無視して待機を続ける。
    /// `waitpid` の失敗は回復不能として [`ShellError::Wait`] を返す。
    /// 正常に戻ったとき、レジストリは空である。
    pub fn reap_all(&mut self) -> Result<(), ShellError> {
        while !self.pids.is_empty() {
            let mut status: i32 = 0;
            let pid = unsafe { libc::waitpid(-1, &mut status, 0) };
            if pid < 0 {
                return Err(ShellError::Wait);
            }
            self.pids.retain(|&p| p != pid);
        }
        Ok(())
    }
}

// ── テスト ──────────────────────────────────────────────────────────
