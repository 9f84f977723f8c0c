//! ディスパッチャと launcher: 1 行分のトークン列を実行に落とす。
//!
//! ## 1 行の処理の流れ
//!
//! - [`process_line`]: トークナイズして [`dispatch`] に渡す入口
//! - [`dispatch`]: 行頭トークンでビルトインを判定し、それ以外は `&` 境界で
//!   グループに分割して保留キューに積む。最後に必ず [`flush`] を 1 回呼ぶ
//! - [`flush`]: キューの全グループを積まれた順に起動し、全子プロセスを reap
//!   する。1 行分のコマンドは全員が起動してから待たれる（`&` 区切りの
//!   グループが互いに並列に走るのはこのため）
//! - `launch`: 上限チェック → リダイレクト分割・宛先オープン → コマンド解決
//!   → spawn → PID 登録 → 宛先クローズ
//!
//! リダイレクトは起動 1 回分にだけ適用される。宛先 fd のオープンとクローズは
//! 必ず対になり、次の起動の出力に影響を残さない。

use std::fs::OpenOptions;
use std::os::unix::io::IntoRawFd;

use crate::builtins;
use crate::parser::{self, Token};
use crate::queue::CommandArgs;
use crate::shell::{Shell, ShellError};
use crate::spawn;

/// 1 行を処理する。周囲の入力ループから呼ばれる唯一の入口。
pub fn process_line(shell: &mut Shell, line: &str) -> Result<(), ShellError> {
    let tokens = parser::tokenize(line);
    dispatch(shell, &tokens)
}

/// トークン列を分類して実行する。
///
/// ビルトインは即時実行、それ以外はグループ分割してキューに積む。
/// どちらの経路でも flush は行ごとにちょうど 1 回呼ばれる。何も積まれて
/// いなくても呼ぶことで reap 点が行単位で揃う。
pub fn dispatch(shell: &mut Shell, tokens: &[Token<'_>]) -> Result<(), ShellError> {
    if tokens.is_empty() {
        return Err(ShellError::EmptyCommand);
    }

    match builtins::try_exec(shell, tokens) {
        Some(result) => result?,
        None => route(shell, tokens)?,
    }

    flush(shell)
}

/// トークン列を `&` 境界で独立グループに分割し、検証して積む。
fn route(shell: &mut Shell, tokens: &[Token<'_>]) -> Result<(), ShellError> {
    let groups: Vec<&[Token<'_>]> = tokens.split(|t| *t == Token::Amp).collect();
    let last = groups.len() - 1;

    for (i, group) in groups.iter().enumerate() {
        if group.is_empty() {
            // 行頭の `&` の前、および行末の `&` の後の空グループは何も寄与しない。
            // 2 つの `&` に挟まれた空グループは構文エラー。
            if i == 0 || i == last {
                continue;
            }
            return Err(ShellError::AdjacentAmp);
        }
        check_redirect(group)?;
        shell.pending.enqueue(group)?;
    }
    Ok(())
}

/// グループ内のリダイレクトの形を検証する。
///
/// `>` があるなら、その直後にワードがちょうど 1 個、その後には何もないこと。
/// `>` の前にコマンド部がないのもエラー。実際の分割は launch が行う。
fn check_redirect(group: &[Token<'_>]) -> Result<(), ShellError> {
    if let Some(pos) = group.iter().position(|t| *t == Token::Redirect) {
        if pos == 0 {
            return Err(ShellError::RedirectSyntax);
        }
        match &group[pos + 1..] {
            [Token::Word(_)] => {}
            _ => return Err(ShellError::RedirectSyntax),
        }
    }
    Ok(())
}

/// キューの全グループを起動し、起動した全子プロセスを回収する。
///
/// 取り出したグループは launch の成否にかかわらずこの関数を抜けるときに
/// 解放される。途中の launch が失敗した場合は残りを起動せずエラーを返す
/// （呼び出し側が即終了させる）。
pub fn flush(shell: &mut Shell) -> Result<(), ShellError> {
    let batch = shell.pending.take();
    for args in &batch {
        launch(shell, args)?;
    }
    shell.children.reap_all()
}

/// 1 グループを起動する。
fn launch(shell: &mut Shell, args: &CommandArgs) -> Result<(), ShellError> {
    if shell.children.is_full() {
        return Err(ShellError::TooManyChildren);
    }

    let (argv, destination) = split_redirect(args)?;

    let redirect_fd = match destination {
        Some(dest) => Some(open_destination(dest)?),
        None => None,
    };

    match resolve_and_spawn(shell, argv, redirect_fd) {
        Ok(pid) => {
            shell.children.register(pid);
            if let Some(fd) = redirect_fd {
                unsafe { libc::close(fd) };
            }
            Ok(())
        }
        Err(e) => {
            if let Some(fd) = redirect_fd {
                unsafe { libc::close(fd) };
            }
            Err(e)
        }
    }
}

/// 引数リストを `>` で分割する。launcher 側の再検証を兼ねる。
fn split_redirect(args: &[String]) -> Result<(&[String], Option<&str>), ShellError> {
    match args.iter().position(|a| a.as_str() == ">") {
        Some(pos) => {
            if pos == 0 {
                return Err(ShellError::RedirectSyntax);
            }
            match &args[pos + 1..] {
                [dest] if dest.as_str() != ">" => Ok((&args[..pos], Some(dest.as_str()))),
                _ => Err(ShellError::RedirectSyntax),
            }
        }
        None => Ok((args, None)),
    }
}

/// リダイレクト宛先を truncate-create-write でオープンし、raw fd を返す。
///
/// 返った fd を閉じる責任は呼び出し側にある。
fn open_destination(dest: &str) -> Result<i32, ShellError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
        .map_err(|_| ShellError::RedirectOpen)?;
    Ok(file.into_raw_fd())
}

/// argv[0] を検索パスで解決して spawn する。argv[0] は入力されたまま渡す。
fn resolve_and_spawn(
    shell: &Shell,
    argv: &[String],
    redirect_fd: Option<i32>,
) -> Result<libc::pid_t, ShellError> {
    let program = shell.search_path.resolve(&argv[0])?;
    let arg_refs: Vec<&str> = argv.iter().map(|s| s.as_str()).collect();
    Ok(spawn::spawn(&program, &arg_refs, redirect_fd)?)
}

// ── テスト ──────────────────────────────────────────────────────────
