//! ビルトインコマンドの実装。
//!
//! ビルトインは fork/exec を経由せずプロセス内で直接実行される。
//! 判定は行頭トークンのみ・大文字小文字を区別する。`try_exec()` が
//! `Some(result)` を返せばビルトインとして処理済み、`None` なら外部コマンド
//! としてディスパッチャに委ねる。

use std::path::Path;

use crate::parser::Token;
use crate::shell::{Shell, ShellError};

/// ビルトインコマンドの実行を試みる。
///
/// 戻り値:
/// - `Some(result)` — ビルトインとして実行済み（引数検証の失敗を含む）
/// - `None` — 該当するビルトインなし（コマンドグループとして処理すべき）
pub fn try_exec(shell: &mut Shell, tokens: &[Token<'_>]) -> Option<Result<(), ShellError>> {
    match tokens.first()?.as_word()? {
        "cd" => Some(builtin_cd(&tokens[1..])),
        "path" => Some(builtin_path(shell, &tokens[1..])),
        "exit" => Some(builtin_exit(shell, &tokens[1..])),
        _ => None,
    }
}

/// `cd <dir>` — カレントディレクトリを変更する。引数はちょうど 1 個のワード。
fn builtin_cd(args: &[Token<'_>]) -> Result<(), ShellError> {
    match args {
        &[Token::Word(dir)] => {
            std::env::set_current_dir(Path::new(dir)).map_err(|_| ShellError::Chdir)
        }
        _ => Err(ShellError::CdArity),
    }
}

/// `path [dir ...]` — 検索パスをまるごと置き換える。引数なしなら空リスト。
///
/// 全引数を検証してから置き換える（reject-all）。
/// 検証は [`SearchPath`](crate::path::SearchPath) 側で行う。
fn builtin_path(shell: &mut Shell, args: &[Token<'_>]) -> Result<(), ShellError> {
    let mut dirs = Vec::with_capacity(args.len());
    for token in args {
        match token.as_word() {
            Some(dir) => dirs.push(dir),
            None => return Err(ShellError::PathArgs),
        }
    }
    shell.search_path.replace(&dirs)
}

/// `exit` — 引数なしのみ。セッションの終了フラグを立てる。
///
/// 実際のプロセス終了は入力ループが行う。同じ行で積まれたコマンドは
/// ディスパッチ末尾の flush が先に起動・回収する。
fn builtin_exit(shell: &mut Shell, args: &[Token<'_>]) -> Result<(), ShellError> {
    if !args.is_empty() {
        return Err(ShellError::ExitArity);
    }
    shell.should_exit = true;
    Ok(())
}

// ── テスト ──────────────────────────────────────────────────────────
