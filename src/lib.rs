//! pash ライブラリ — ベンチマーク・テスト用にモジュールを公開する。
//!
//! バイナリ本体は `main.rs` の入力ループ（対話 / バッチ）。
//! この `lib.rs` は `benches/bench_main.rs` 等の外部クレートから
//! トークナイザ・検索パス・spawn 機能に直接アクセスするために存在する。
//!
//! ## モジュール構成
//!
//! | モジュール | 役割 |
//! |-----------|------|
//! | [`parser`] | トークナイザ（ワード、`>`、`&`） |
//! | [`path`] | 検索パス（`path` ビルトインで全置換、cwd → リスト順の解決） |
//! | [`queue`] | 保留コマンドキュー（enqueue でディープコピー、flush で一括起動） |
//! | [`children`] | 子プロセスレジストリ（上限付き登録、waitpid による一括 reap） |
//! | [`spawn`] | `posix_spawn` ラッパー（リダイレクト fd の複製込み） |
//! | [`builtins`] | ビルトイン（`cd`, `path`, `exit`） |
//! | [`executor`] | ディスパッチャ + launcher（行の分類、グループ分割、flush） |
//! | [`shell`] | セッション状態とエラー型 |

pub mod builtins;
pub mod children;
pub mod executor;
pub mod parser;
pub mod path;
pub mod queue;
pub mod shell;
pub mod spawn;
