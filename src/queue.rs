//! 保留コマンドキュー: 1 行分のコマンドグループを起動まで溜める。
//!
//! ディスパッチ中にグループ単位で積まれ、flush でまとめて launcher に渡る。
//! enqueue 時にトークン列からディープコピーするので、キューの中身は入力行
//! バッファとは独立の寿命を持つ（行バッファは次の行で再利用される）。

use crate::parser::Token;
use crate::shell::ShellError;

/// キューに積めるコマンドグループ数の上限。
pub const MAX_PENDING: usize = 15;

/// 起動待ちの 1 コマンド分の引数リスト。演算子は字句そのままで保持され、
/// リダイレクトの分割は launcher が行う。
pub type CommandArgs = Vec<String>;

/// 起動待ちコマンドの順序付きキュー。
pub struct CommandQueue {
    pending: Vec<CommandArgs>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// トークン列を所有権付きの引数リストに複製して末尾に積む。
    ///
    /// 上限を超える場合は [`ShellError::QueueFull`]。
    pub fn enqueue(&mut self, tokens: &[Token<'_>]) -> Result<(), ShellError> {
        if self.pending.len() >= MAX_PENDING {
            return Err(ShellError::QueueFull);
        }
        let args: CommandArgs = tokens
            .iter()
            .map(|t| match t {
                Token::Word(w) => w.to_string(),
                Token::Redirect => ">".to_string(),
                Token::Amp => "&".to_string(),
            })
            .collect();
        self.pending.push(args);
        Ok(())
    }

    /// 積まれた全グループを起動順のまま取り出し、キューを空にする。
    ///
    /// 取り出されたグループの所有権は呼び出し側に移り、launch の成否に
    /// かかわらずドロップ時に解放される。
    pub fn take(&mut self) -> Vec<CommandArgs> {
        std::mem::take(&mut self.pending)
    }
}

// ── テスト ──────────────────────────────────────────────────────────
