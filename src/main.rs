//! pash — 並列実行を一次機能とする小さなRust製シェル
//!
//! 入力ループ: 1 行読む → ディスパッチ（ビルトイン即時実行 or グループ分割して
//! キュー）→ flush（全グループ起動 → 全子プロセス reap）→ 次の行。
//! コア機能はライブラリ側（`lib.rs` のモジュール表を参照）にあり、
//! このバイナリは入力の取得とエラー報告だけを担う。
//!
//! ## 起動モードと終了ステータス
//!
//! - 引数なし: 対話モード。`pash> ` プロンプト、EOF で改行を出して 0 終了
//! - 引数 1 個: バッチモード。ファイルの各行を処理して 0 終了
//! - 引数 2 個以上: 起動エラー。ステータス 1
//!
//! 実行時エラーはすべて固定の診断 1 行を stderr に出してステータス 0 で即終了
//! する。非ゼロで終了するのは起動時のエラーだけ: 引数過多と、バッチファイルの
//! オープン失敗（こちらは別メッセージ）。

use std::io::{self, BufRead, Write};

use pash::executor;
use pash::shell::Shell;

/// 固定の診断メッセージ。実行時エラーはすべてこの 1 行で報告される。
const ERROR_MESSAGE: &str = "An error has occurred";

/// 実行時エラー: 固定メッセージを出して即終了する。行単位の回復はしない。
fn fatal() -> ! {
    eprintln!("{}", ERROR_MESSAGE);
    std::process::exit(0);
}

/// 1 行をコアに渡す。エラーなら固定診断を出して終了する。
fn run_line(shell: &mut Shell, line: &str) {
    if executor::process_line(shell, line).is_err() {
        fatal();
    }
}

/// 対話モード: プロンプトを出して stdin を 1 行ずつ処理する。
fn interactive() -> ! {
    let mut shell = Shell::new();
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut input = String::new();

    loop {
        print!("pash> ");
        let _ = io::stdout().flush();

        input.clear();
        match reader.read_line(&mut input) {
            Ok(0) => {
                // EOF (Ctrl+D): 改行を出力して正常終了
                println!();
                break;
            }
            Ok(_) => {}
            Err(_) => fatal(),
        }

        let line = input.trim_end_matches('\n');
        // 空行・空白のみの行はディスパッチに渡さない
        if line.trim().is_empty() {
            continue;
        }

        run_line(&mut shell, line);
        if shell.should_exit {
            break;
        }
    }

    std::process::exit(0);
}

/// バッチモード: ファイルの各行を処理して正常終了する。
fn batch(file_name: &str) -> ! {
    let content = match std::fs::read_to_string(file_name) {
        Ok(c) => c,
        Err(_) => {
            // バッチファイルが開けない場合だけ別メッセージ + ステータス 1
            eprintln!("pash: cannot open batch file");
            std::process::exit(1);
        }
    };

    let mut shell = Shell::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        run_line(&mut shell, line);
        if shell.should_exit {
            break;
        }
    }

    std::process::exit(0);
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.len() {
        0 => interactive(),
        1 => batch(&args[0]),
        _ => {
            // 起動引数の数のエラーだけは非ゼロ終了
            eprintln!("{}", ERROR_MESSAGE);
            std::process::exit(1);
        }
    }
}
